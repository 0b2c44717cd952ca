//! # Base Distribution Families
//!
//! Each family maps a rounded tick to a liquidity density and to the
//! cumulative token amounts held by the buckets on either side. A bucket is
//! `[t, t + spacing)`; per unit of liquidity it holds
//! `sqrtP(t + s) - sqrtP(t)` of token1 and `1/sqrtP(t) - 1/sqrtP(t + s)` of
//! token0 (all X64).
//!
//! `DensityCurve` is the uniform output contract. Its provided methods build
//! the query and swap-inversion results on top of the three per-family
//! primitives, so every family inverts its curve the same way.

pub mod carpet;
pub mod carpeted_double_geometric;
pub mod carpeted_geometric;
pub mod geometric;
pub mod uniform;

pub use carpet::Carpet;
pub use carpeted_double_geometric::CarpetedDoubleGeometricDistribution;
pub use carpeted_geometric::CarpetedGeometricDistribution;
pub use geometric::GeometricSegment;
pub use uniform::UniformDistribution;

use ethnum::U256;
use serde::{Deserialize, Serialize};

use crate::errors::LdfResult;
use crate::math::{
    inv_sqrt_price_at_tick, is_aligned, max_usable_tick, min_usable_tick, sqrt_price_at_tick,
    to_u128_saturating,
};
use crate::types::{DistributionFamily, FamilyParams, LdfType, ShiftMode};

/// Density of a rounded tick plus the cumulative densities beside it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DensityQuery {
    pub liquidity_density_x64: u128,
    /// Token0 per unit liquidity in the buckets right of the rounded tick
    pub cumulative_amount0_density_x64: u128,
    /// Token1 per unit liquidity in the buckets left of the rounded tick
    pub cumulative_amount1_density_x64: u128,
}

/// Result of inverting a cumulative amount curve.
/// The other fields are meaningless unless `success` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapInversion {
    pub success: bool,
    pub rounded_tick: i32,
    pub cumulative_amount0: u128,
    pub cumulative_amount1: u128,
    pub swap_liquidity: u128,
}

impl SwapInversion {
    pub fn miss() -> Self {
        Self {
            success: false,
            rounded_tick: 0,
            cumulative_amount0: 0,
            cumulative_amount1: 0,
            swap_liquidity: 0,
        }
    }
}

/// Liquidity shape laid out on rounded ticks
pub trait DensityCurve {
    fn tick_spacing(&self) -> i32;

    /// Fraction of total liquidity in the bucket starting at `rounded_tick`
    fn liquidity_density_x64(&self, rounded_tick: i32) -> LdfResult<u128>;

    /// Token0 per unit liquidity in buckets `[rounded_tick, max]`
    fn cumulative_amount0_x64(&self, rounded_tick: i32) -> LdfResult<u128>;

    /// Token1 per unit liquidity in buckets `[min, rounded_tick]`
    fn cumulative_amount1_x64(&self, rounded_tick: i32) -> LdfResult<u128>;

    fn query(&self, rounded_tick: i32) -> LdfResult<DensityQuery> {
        let spacing = self.tick_spacing();
        Ok(DensityQuery {
            liquidity_density_x64: self.liquidity_density_x64(rounded_tick)?,
            cumulative_amount0_density_x64: self.cumulative_amount0_x64(rounded_tick + spacing)?,
            cumulative_amount1_density_x64: self.cumulative_amount1_x64(rounded_tick - spacing)?,
        })
    }

    fn cumulative_amount0(&self, rounded_tick: i32, total_liquidity: u128) -> LdfResult<u128> {
        Ok(scale_by_liquidity(self.cumulative_amount0_x64(rounded_tick)?, total_liquidity))
    }

    fn cumulative_amount1(&self, rounded_tick: i32, total_liquidity: u128) -> LdfResult<u128> {
        Ok(scale_by_liquidity(self.cumulative_amount1_x64(rounded_tick)?, total_liquidity))
    }

    /// Find the rounded tick a swap of `input` reaches.
    ///
    /// When `exact_in == zero_for_one` the input is a token0 amount and the
    /// result is the largest rounded tick whose cumulative token0 still
    /// covers it; otherwise it is a token1 amount and the result is the
    /// smallest rounded tick whose cumulative token1 covers it. The returned
    /// cumulative amounts exclude the bucket that handles the remainder.
    fn compute_swap(
        &self,
        input: u128,
        total_liquidity: u128,
        zero_for_one: bool,
        exact_in: bool,
    ) -> LdfResult<SwapInversion> {
        let spacing = self.tick_spacing();
        let min_tick = min_usable_tick(spacing);
        let buckets = (max_usable_tick(spacing) - min_tick) / spacing;
        if buckets <= 0 {
            return Ok(SwapInversion::miss());
        }
        let tick_at = |index: i32| min_tick + index * spacing;

        let (rounded_tick, cumulative_amount0, cumulative_amount1) = if exact_in == zero_for_one {
            if self.cumulative_amount0(tick_at(0), total_liquidity)? < input {
                return Ok(SwapInversion::miss());
            }
            // cumulative token0 is non-increasing in the tick
            let (mut lo, mut hi) = (0, buckets - 1);
            while lo < hi {
                let mid = lo + (hi - lo + 1) / 2;
                if self.cumulative_amount0(tick_at(mid), total_liquidity)? >= input {
                    lo = mid;
                } else {
                    hi = mid - 1;
                }
            }
            let tick = tick_at(lo);
            let amount0_from = if exact_in { tick + spacing } else { tick };
            let amount1_to = if exact_in { tick } else { tick - spacing };
            (
                tick,
                self.cumulative_amount0(amount0_from, total_liquidity)?,
                self.cumulative_amount1(amount1_to, total_liquidity)?,
            )
        } else {
            if self.cumulative_amount1(tick_at(buckets - 1), total_liquidity)? < input {
                return Ok(SwapInversion::miss());
            }
            // cumulative token1 is non-decreasing in the tick
            let (mut lo, mut hi) = (0, buckets - 1);
            while lo < hi {
                let mid = lo + (hi - lo) / 2;
                if self.cumulative_amount1(tick_at(mid), total_liquidity)? >= input {
                    hi = mid;
                } else {
                    lo = mid + 1;
                }
            }
            let tick = tick_at(lo);
            let amount1_to = if exact_in { tick - spacing } else { tick };
            let amount0_from = if exact_in { tick } else { tick + spacing };
            (
                tick,
                self.cumulative_amount0(amount0_from, total_liquidity)?,
                self.cumulative_amount1(amount1_to, total_liquidity)?,
            )
        };

        Ok(SwapInversion {
            success: true,
            rounded_tick,
            cumulative_amount0,
            cumulative_amount1,
            swap_liquidity: scale_by_liquidity(
                self.liquidity_density_x64(rounded_tick)?,
                total_liquidity,
            ),
        })
    }
}

/// A family the dispatcher can decode, validate and re-anchor
pub trait BaseFamily: DensityCurve + Sized {
    const FAMILY: DistributionFamily;

    /// Decode the shape against the current reference tick. Total: params
    /// that fail validation still decode to some shape.
    fn decode(reference_tick: i32, tick_spacing: i32, params: &FamilyParams) -> Self;

    fn is_valid_params(
        tick_spacing: i32,
        twap_lookback_seconds: u32,
        params: &FamilyParams,
        ldf_type: LdfType,
    ) -> bool;

    fn shift_mode(&self) -> ShiftMode;

    fn anchor_tick(&self) -> i32;

    /// Same shape moved to a new anchor, clamped into the usable domain
    fn with_anchor(&self, anchor_tick: i32) -> Self;
}

/// Query a family shape decoded straight from its params, without any
/// engine state
pub fn query<F: BaseFamily>(
    rounded_tick: i32,
    reference_tick: i32,
    tick_spacing: i32,
    params: &FamilyParams,
) -> LdfResult<DensityQuery> {
    F::decode(reference_tick, tick_spacing, params).query(rounded_tick)
}

pub fn cumulative_amount0<F: BaseFamily>(
    rounded_tick: i32,
    total_liquidity: u128,
    reference_tick: i32,
    tick_spacing: i32,
    params: &FamilyParams,
) -> LdfResult<u128> {
    F::decode(reference_tick, tick_spacing, params).cumulative_amount0(rounded_tick, total_liquidity)
}

pub fn cumulative_amount1<F: BaseFamily>(
    rounded_tick: i32,
    total_liquidity: u128,
    reference_tick: i32,
    tick_spacing: i32,
    params: &FamilyParams,
) -> LdfResult<u128> {
    F::decode(reference_tick, tick_spacing, params).cumulative_amount1(rounded_tick, total_liquidity)
}

pub fn compute_swap<F: BaseFamily>(
    input: u128,
    total_liquidity: u128,
    zero_for_one: bool,
    exact_in: bool,
    reference_tick: i32,
    tick_spacing: i32,
    params: &FamilyParams,
) -> LdfResult<SwapInversion> {
    F::decode(reference_tick, tick_spacing, params).compute_swap(
        input,
        total_liquidity,
        zero_for_one,
        exact_in,
    )
}

/// total_liquidity * amount_x64 / 2^64, clamped at u128::MAX
pub fn scale_by_liquidity(amount_x64: u128, total_liquidity: u128) -> u128 {
    to_u128_saturating((U256::new(amount_x64) * U256::new(total_liquidity)) >> 64u32)
}

/// Shift mode byte of any family's params; unknown values decode as static
pub(crate) fn decode_shift_mode(params: &FamilyParams) -> ShiftMode {
    ShiftMode::from_byte(params[0]).unwrap_or(ShiftMode::Static)
}

/// Clamp `[lower, lower + span)` into the usable domain, keeping the span
pub(crate) fn clamp_range(lower: i32, span: i64, tick_spacing: i32) -> (i32, i32) {
    let min_tick = min_usable_tick(tick_spacing);
    let max_tick = max_usable_tick(tick_spacing);
    let span = span.clamp(0, (max_tick - min_tick) as i64) as i32;
    let lower = lower.clamp(min_tick, max_tick - span);
    (lower, lower + span)
}

/// Placement rules shared by the carpeted families: the main support must
/// leave room for the carpet, static shapes must sit inside the domain, and
/// dynamic shapes need stateful storage and a manipulation-resistant
/// reference tick.
pub(crate) fn is_valid_placement(
    shift_mode: ShiftMode,
    tick_or_offset: i32,
    length: u32,
    tick_spacing: i32,
    twap_lookback_seconds: u32,
    ldf_type: LdfType,
) -> bool {
    let min_tick = min_usable_tick(tick_spacing) as i64;
    let max_tick = max_usable_tick(tick_spacing) as i64;
    let span = length as i64 * tick_spacing as i64;
    if length == 0 || span >= max_tick - min_tick || !is_aligned(tick_or_offset, tick_spacing) {
        return false;
    }
    if shift_mode.is_dynamic() {
        ldf_type == LdfType::DynamicAndStateful && twap_lookback_seconds != 0
    } else {
        tick_or_offset as i64 >= min_tick && tick_or_offset as i64 + span <= max_tick
    }
}

/// Token1 held by every bucket of `[lower, upper)` up to and including the
/// bucket at `rounded_tick`, one unit of liquidity per bucket
pub(crate) fn range_amount1_x64(lower: i32, upper: i32, rounded_tick: i32, tick_spacing: i32) -> u128 {
    if upper <= lower {
        return 0;
    }
    let end = rounded_tick.saturating_add(tick_spacing).clamp(lower, upper);
    sqrt_price_at_tick(end) - sqrt_price_at_tick(lower)
}

/// Token0 held by every bucket of `[lower, upper)` from the bucket at
/// `rounded_tick` upward, one unit of liquidity per bucket
pub(crate) fn range_amount0_x64(lower: i32, upper: i32, rounded_tick: i32) -> u128 {
    if upper <= lower {
        return 0;
    }
    let start = rounded_tick.clamp(lower, upper);
    inv_sqrt_price_at_tick(start) - inv_sqrt_price_at_tick(upper)
}
