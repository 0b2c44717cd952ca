//! Uniform distribution over `[tick_lower, tick_upper)`.

use crate::codec::read_i24;
use crate::constants::Q64;
use crate::distributions::{
    clamp_range, decode_shift_mode, range_amount0_x64, range_amount1_x64, BaseFamily, DensityCurve,
};
use crate::errors::LdfResult;
use crate::math::{is_aligned, max_usable_tick, min_usable_tick, round_tick_down};
use crate::types::{DistributionFamily, FamilyParams, LdfType, ShiftMode};

const SHIFT_MODE_OFFSET: usize = 0;
/// tick_lower (static) or offset from the reference tick (dynamic)
const FIRST_OFFSET: usize = 1;
/// tick_upper (static) or length in tick spacings (dynamic)
const SECOND_OFFSET: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformDistribution {
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub tick_spacing: i32,
    pub shift_mode: ShiftMode,
}

impl UniformDistribution {
    pub fn new(tick_lower: i32, tick_upper: i32, tick_spacing: i32, shift_mode: ShiftMode) -> Self {
        Self {
            tick_lower,
            tick_upper,
            tick_spacing,
            shift_mode,
        }
    }

    /// Number of buckets in the range; zero for an empty or inverted range
    pub fn bucket_count(&self) -> u128 {
        if self.tick_upper <= self.tick_lower {
            return 0;
        }
        ((self.tick_upper - self.tick_lower) / self.tick_spacing) as u128
    }

    fn contains(&self, rounded_tick: i32) -> bool {
        rounded_tick >= self.tick_lower && rounded_tick < self.tick_upper
    }
}

impl DensityCurve for UniformDistribution {
    fn tick_spacing(&self) -> i32 {
        self.tick_spacing
    }

    fn liquidity_density_x64(&self, rounded_tick: i32) -> LdfResult<u128> {
        let buckets = self.bucket_count();
        if buckets == 0 || !self.contains(rounded_tick) {
            return Ok(0);
        }
        Ok(Q64 / buckets)
    }

    fn cumulative_amount0_x64(&self, rounded_tick: i32) -> LdfResult<u128> {
        let buckets = self.bucket_count();
        if buckets == 0 {
            return Ok(0);
        }
        Ok(range_amount0_x64(self.tick_lower, self.tick_upper, rounded_tick) / buckets)
    }

    fn cumulative_amount1_x64(&self, rounded_tick: i32) -> LdfResult<u128> {
        let buckets = self.bucket_count();
        if buckets == 0 {
            return Ok(0);
        }
        Ok(range_amount1_x64(
            self.tick_lower,
            self.tick_upper,
            rounded_tick,
            self.tick_spacing,
        ) / buckets)
    }
}

impl BaseFamily for UniformDistribution {
    const FAMILY: DistributionFamily = DistributionFamily::Uniform;

    fn decode(reference_tick: i32, tick_spacing: i32, params: &FamilyParams) -> Self {
        let shift_mode = decode_shift_mode(params);
        let first = read_i24(params, FIRST_OFFSET);
        let second = read_i24(params, SECOND_OFFSET);

        if !shift_mode.is_dynamic() {
            return Self::new(first, second, tick_spacing, shift_mode);
        }

        let lower = round_tick_down(reference_tick.saturating_add(first), tick_spacing);
        let span = second as i64 * tick_spacing as i64;
        let (tick_lower, tick_upper) = clamp_range(lower, span, tick_spacing);
        Self::new(tick_lower, tick_upper, tick_spacing, shift_mode)
    }

    fn is_valid_params(
        tick_spacing: i32,
        twap_lookback_seconds: u32,
        params: &FamilyParams,
        ldf_type: LdfType,
    ) -> bool {
        let Some(shift_mode) = ShiftMode::from_byte(params[SHIFT_MODE_OFFSET]) else {
            return false;
        };
        let min_tick = min_usable_tick(tick_spacing);
        let max_tick = max_usable_tick(tick_spacing);
        let first = read_i24(params, FIRST_OFFSET);
        let second = read_i24(params, SECOND_OFFSET);

        if shift_mode.is_dynamic() {
            let span = second as i64 * tick_spacing as i64;
            ldf_type == LdfType::DynamicAndStateful
                && twap_lookback_seconds != 0
                && is_aligned(first, tick_spacing)
                && second > 0
                && span <= (max_tick - min_tick) as i64
        } else {
            is_aligned(first, tick_spacing)
                && is_aligned(second, tick_spacing)
                && first < second
                && first >= min_tick
                && second <= max_tick
        }
    }

    fn shift_mode(&self) -> ShiftMode {
        self.shift_mode
    }

    fn anchor_tick(&self) -> i32 {
        self.tick_lower
    }

    fn with_anchor(&self, anchor_tick: i32) -> Self {
        let span = (self.tick_upper - self.tick_lower) as i64;
        let (tick_lower, tick_upper) = clamp_range(anchor_tick, span, self.tick_spacing);
        Self::new(tick_lower, tick_upper, self.tick_spacing, self.shift_mode)
    }
}
