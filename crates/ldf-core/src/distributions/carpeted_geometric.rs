//! Geometric segment on top of a flat carpet.
//!
//! Family params: `[0]` shift mode, `[1..4]` min tick (static) or offset
//! from the reference tick (dynamic), `[4..6]` length in spacings, `[6..10]`
//! alpha (1e8 = 1.0), `[10..14]` carpet weight (1e9 = 1.0).

use crate::codec::{read_i24, read_u16, read_u32};
use crate::constants::MIN_BUCKET_DENSITY_X64;
use crate::distributions::carpet::is_valid_carpet_weight;
use crate::distributions::geometric::is_valid_alpha;
use crate::distributions::{
    clamp_range, decode_shift_mode, is_valid_placement, BaseFamily, Carpet, DensityCurve,
    GeometricSegment,
};
use crate::errors::LdfResult;
use crate::math::round_tick_down;
use crate::types::{DistributionFamily, FamilyParams, LdfType, ShiftMode};

const SHIFT_MODE_OFFSET: usize = 0;
const MIN_TICK_OFFSET: usize = 1;
const LENGTH_OFFSET: usize = 4;
const ALPHA_OFFSET: usize = 6;
const CARPET_WEIGHT_OFFSET: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarpetedGeometricDistribution {
    pub segment: GeometricSegment,
    pub carpet: Carpet,
    pub shift_mode: ShiftMode,
    alpha: u32,
    carpet_weight: u32,
}

impl CarpetedGeometricDistribution {
    pub fn new(
        min_tick: i32,
        length: u32,
        alpha: u32,
        carpet_weight: u32,
        tick_spacing: i32,
        shift_mode: ShiftMode,
    ) -> Self {
        let span = length as i64 * tick_spacing as i64;
        let (lower, upper) = clamp_range(min_tick, span, tick_spacing);
        Self {
            segment: GeometricSegment::new(lower, length, alpha, tick_spacing),
            carpet: Carpet::new(lower, upper, tick_spacing, carpet_weight),
            shift_mode,
            alpha,
            carpet_weight,
        }
    }
}

impl DensityCurve for CarpetedGeometricDistribution {
    fn tick_spacing(&self) -> i32 {
        self.segment.tick_spacing
    }

    fn liquidity_density_x64(&self, rounded_tick: i32) -> LdfResult<u128> {
        let main = self.carpet.scale_main(self.segment.density_x64(rounded_tick)?)?;
        Ok(main + self.carpet.density_x64(rounded_tick)?)
    }

    fn cumulative_amount0_x64(&self, rounded_tick: i32) -> LdfResult<u128> {
        let main = self
            .carpet
            .scale_main(self.segment.cumulative_amount0_x64(rounded_tick)?)?;
        Ok(main + self.carpet.cumulative_amount0_x64(rounded_tick)?)
    }

    fn cumulative_amount1_x64(&self, rounded_tick: i32) -> LdfResult<u128> {
        let main = self
            .carpet
            .scale_main(self.segment.cumulative_amount1_x64(rounded_tick)?)?;
        Ok(main + self.carpet.cumulative_amount1_x64(rounded_tick)?)
    }
}

impl BaseFamily for CarpetedGeometricDistribution {
    const FAMILY: DistributionFamily = DistributionFamily::GeometricWithCarpet;

    fn decode(reference_tick: i32, tick_spacing: i32, params: &FamilyParams) -> Self {
        let shift_mode = decode_shift_mode(params);
        let tick = read_i24(params, MIN_TICK_OFFSET);
        let min_tick = if shift_mode.is_dynamic() {
            round_tick_down(reference_tick.saturating_add(tick), tick_spacing)
        } else {
            tick
        };
        Self::new(
            min_tick,
            read_u16(params, LENGTH_OFFSET) as u32,
            read_u32(params, ALPHA_OFFSET),
            read_u32(params, CARPET_WEIGHT_OFFSET),
            tick_spacing,
            shift_mode,
        )
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
        let length = read_u16(params, LENGTH_OFFSET) as u32;
        let alpha = read_u32(params, ALPHA_OFFSET);
        if !is_valid_alpha(alpha)
            || !is_valid_carpet_weight(read_u32(params, CARPET_WEIGHT_OFFSET))
            || !is_valid_placement(
                shift_mode,
                read_i24(params, MIN_TICK_OFFSET),
                length,
                tick_spacing,
                twap_lookback_seconds,
                ldf_type,
            )
        {
            return false;
        }
        GeometricSegment::new(0, length, alpha, tick_spacing)
            .min_bucket_density_x64()
            .map_or(false, |density| density >= MIN_BUCKET_DENSITY_X64)
    }

    fn shift_mode(&self) -> ShiftMode {
        self.shift_mode
    }

    fn anchor_tick(&self) -> i32 {
        self.segment.min_tick
    }

    fn with_anchor(&self, anchor_tick: i32) -> Self {
        Self::new(
            anchor_tick,
            self.segment.length,
            self.alpha,
            self.carpet_weight,
            self.segment.tick_spacing,
            self.shift_mode,
        )
    }
}
