//! Two geometric segments side by side on top of a flat carpet.
//!
//! Family params:
//!
//! | bytes  | field                                   |
//! |--------|-----------------------------------------|
//! | 0      | shift mode                              |
//! | 1..4   | min tick (static) / offset (dynamic)    |
//! | 4..6   | length0                                 |
//! | 6..10  | alpha0                                  |
//! | 10..14 | weight0                                 |
//! | 14..16 | length1                                 |
//! | 16..20 | alpha1                                  |
//! | 20..24 | weight1                                 |
//! | 24..28 | carpet weight                           |
//!
//! Segment 1 starts at the min tick; segment 0 starts where segment 1 ends.

use ethnum::U256;

use crate::codec::{read_i24, read_u16, read_u32};
use crate::constants::MIN_BUCKET_DENSITY_X64;
use crate::distributions::carpet::is_valid_carpet_weight;
use crate::distributions::geometric::is_valid_alpha;
use crate::distributions::{
    clamp_range, decode_shift_mode, is_valid_placement, BaseFamily, Carpet, DensityCurve,
    GeometricSegment,
};
use crate::errors::{LdfError, LdfResult};
use crate::math::{mul_x64, round_tick_down, to_u128, ONE_X64};
use crate::types::{DistributionFamily, FamilyParams, LdfType, ShiftMode};

const SHIFT_MODE_OFFSET: usize = 0;
const MIN_TICK_OFFSET: usize = 1;
const LENGTH0_OFFSET: usize = 4;
const ALPHA0_OFFSET: usize = 6;
const WEIGHT0_OFFSET: usize = 10;
const LENGTH1_OFFSET: usize = 14;
const ALPHA1_OFFSET: usize = 16;
const WEIGHT1_OFFSET: usize = 20;
const CARPET_WEIGHT_OFFSET: usize = 24;

/// Raw per-segment fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentParams {
    pub length: u32,
    pub alpha: u32,
    pub weight: u32,
}

impl SegmentParams {
    fn read(params: &FamilyParams, length: usize, alpha: usize, weight: usize) -> Self {
        Self {
            length: read_u16(params, length) as u32,
            alpha: read_u32(params, alpha),
            weight: read_u32(params, weight),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarpetedDoubleGeometricDistribution {
    /// Segment 0, right of segment 1
    pub right: GeometricSegment,
    /// Segment 1, starting at the min tick
    pub left: GeometricSegment,
    /// Share of the main support held by segment 0
    pub right_share_x64: U256,
    pub carpet: Carpet,
    pub shift_mode: ShiftMode,
    segment0: SegmentParams,
    segment1: SegmentParams,
    carpet_weight: u32,
}

impl CarpetedDoubleGeometricDistribution {
    pub fn new(
        min_tick: i32,
        segment0: SegmentParams,
        segment1: SegmentParams,
        carpet_weight: u32,
        tick_spacing: i32,
        shift_mode: ShiftMode,
    ) -> Self {
        let span = (segment0.length as i64 + segment1.length as i64) * tick_spacing as i64;
        let (lower, upper) = clamp_range(min_tick, span, tick_spacing);
        let left = GeometricSegment::new(lower, segment1.length, segment1.alpha, tick_spacing);
        let right = GeometricSegment::new(
            left.max_tick(),
            segment0.length,
            segment0.alpha,
            tick_spacing,
        );
        Self {
            right,
            left,
            right_share_x64: right_share_x64(segment0.weight, segment1.weight),
            carpet: Carpet::new(lower, upper, tick_spacing, carpet_weight),
            shift_mode,
            segment0,
            segment1,
            carpet_weight,
        }
    }

    /// Mix two per-segment values by the segment weights
    fn mix(&self, right_value: u128, left_value: u128) -> LdfResult<u128> {
        let right = mul_x64(U256::new(right_value), self.right_share_x64)?;
        let left = mul_x64(U256::new(left_value), ONE_X64 - self.right_share_x64)?;
        to_u128(right.checked_add(left).ok_or(LdfError::MathOverflow)?)
    }

    fn main_density_x64(&self, rounded_tick: i32) -> LdfResult<u128> {
        self.mix(
            self.right.density_x64(rounded_tick)?,
            self.left.density_x64(rounded_tick)?,
        )
    }
}

fn right_share_x64(weight0: u32, weight1: u32) -> U256 {
    let total = weight0 as u128 + weight1 as u128;
    if total == 0 {
        return U256::ZERO;
    }
    (U256::new(weight0 as u128) << 64u32) / U256::new(total)
}

impl DensityCurve for CarpetedDoubleGeometricDistribution {
    fn tick_spacing(&self) -> i32 {
        self.left.tick_spacing
    }

    fn liquidity_density_x64(&self, rounded_tick: i32) -> LdfResult<u128> {
        let main = self.carpet.scale_main(self.main_density_x64(rounded_tick)?)?;
        Ok(main + self.carpet.density_x64(rounded_tick)?)
    }

    fn cumulative_amount0_x64(&self, rounded_tick: i32) -> LdfResult<u128> {
        let main = self.mix(
            self.right.cumulative_amount0_x64(rounded_tick)?,
            self.left.cumulative_amount0_x64(rounded_tick)?,
        )?;
        Ok(self.carpet.scale_main(main)? + self.carpet.cumulative_amount0_x64(rounded_tick)?)
    }

    fn cumulative_amount1_x64(&self, rounded_tick: i32) -> LdfResult<u128> {
        let main = self.mix(
            self.right.cumulative_amount1_x64(rounded_tick)?,
            self.left.cumulative_amount1_x64(rounded_tick)?,
        )?;
        Ok(self.carpet.scale_main(main)? + self.carpet.cumulative_amount1_x64(rounded_tick)?)
    }
}

impl BaseFamily for CarpetedDoubleGeometricDistribution {
    const FAMILY: DistributionFamily = DistributionFamily::DoubleGeometricWithCarpet;

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
            SegmentParams::read(params, LENGTH0_OFFSET, ALPHA0_OFFSET, WEIGHT0_OFFSET),
            SegmentParams::read(params, LENGTH1_OFFSET, ALPHA1_OFFSET, WEIGHT1_OFFSET),
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
        let segment0 = SegmentParams::read(params, LENGTH0_OFFSET, ALPHA0_OFFSET, WEIGHT0_OFFSET);
        let segment1 = SegmentParams::read(params, LENGTH1_OFFSET, ALPHA1_OFFSET, WEIGHT1_OFFSET);
        let segments_valid = [segment0, segment1]
            .iter()
            .all(|segment| segment.length > 0 && segment.weight > 0 && is_valid_alpha(segment.alpha));
        if !segments_valid
            || !is_valid_carpet_weight(read_u32(params, CARPET_WEIGHT_OFFSET))
            || !is_valid_placement(
                shift_mode,
                read_i24(params, MIN_TICK_OFFSET),
                segment0.length + segment1.length,
                tick_spacing,
                twap_lookback_seconds,
                ldf_type,
            )
        {
            return false;
        }

        // lightest bucket of each segment after mixing by the weights
        let share0 = right_share_x64(segment0.weight, segment1.weight);
        let share1 = ONE_X64 - share0;
        [(segment0, share0), (segment1, share1)]
            .iter()
            .all(|(segment, share)| {
                GeometricSegment::new(0, segment.length, segment.alpha, tick_spacing)
                    .min_bucket_density_x64()
                    .and_then(|density| mul_x64(U256::new(density), *share))
                    .map_or(false, |density| density >= U256::new(MIN_BUCKET_DENSITY_X64))
            })
    }

    fn shift_mode(&self) -> ShiftMode {
        self.shift_mode
    }

    fn anchor_tick(&self) -> i32 {
        self.left.min_tick
    }

    fn with_anchor(&self, anchor_tick: i32) -> Self {
        Self::new(
            anchor_tick,
            self.segment0,
            self.segment1,
            self.carpet_weight,
            self.left.tick_spacing,
            self.shift_mode,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{write_i24, write_u16, write_u32};
    use crate::constants::{FAMILY_PARAMS_SIZE, Q64, WEIGHT_BASE};
    use crate::math::{max_usable_tick, min_usable_tick};

    fn params(
        mode: ShiftMode,
        tick: i32,
        segment0: SegmentParams,
        segment1: SegmentParams,
        carpet: u32,
    ) -> FamilyParams {
        let mut bytes = [0u8; FAMILY_PARAMS_SIZE];
        bytes[SHIFT_MODE_OFFSET] = mode as u8;
        write_i24(&mut bytes, MIN_TICK_OFFSET, tick);
        write_u16(&mut bytes, LENGTH0_OFFSET, segment0.length as u16);
        write_u32(&mut bytes, ALPHA0_OFFSET, segment0.alpha);
        write_u32(&mut bytes, WEIGHT0_OFFSET, segment0.weight);
        write_u16(&mut bytes, LENGTH1_OFFSET, segment1.length as u16);
        write_u32(&mut bytes, ALPHA1_OFFSET, segment1.alpha);
        write_u32(&mut bytes, WEIGHT1_OFFSET, segment1.weight);
        write_u32(&mut bytes, CARPET_WEIGHT_OFFSET, carpet);
        bytes
    }

    fn segment(length: u32, alpha: u32, weight: u32) -> SegmentParams {
        SegmentParams { length, alpha, weight }
    }

    #[test]
    fn test_segment_layout() {
        let shape = CarpetedDoubleGeometricDistribution::decode(
            0,
            10,
            &params(
                ShiftMode::Static,
                -100,
                segment(10, 80_000_000, 1),
                segment(10, 125_000_000, 1),
                WEIGHT_BASE / 100,
            ),
        );
        assert_eq!(shape.anchor_tick(), -100);
        assert_eq!(shape.left.max_tick(), 0);
        assert_eq!(shape.right.min_tick, 0);
        assert_eq!(shape.right.max_tick(), 100);
        assert_eq!((shape.carpet.main_lower, shape.carpet.main_upper), (-100, 100));

        // peak sits where the two segments meet
        let peak_left = shape.liquidity_density_x64(-10).unwrap();
        let peak_right = shape.liquidity_density_x64(0).unwrap();
        assert!(peak_left > shape.liquidity_density_x64(-20).unwrap());
        assert!(peak_right > shape.liquidity_density_x64(10).unwrap());
        assert!(shape.liquidity_density_x64(200).unwrap() < peak_right / 100);
    }

    #[test]
    fn test_total_density_is_one() {
        let spacing = 1_000;
        let shape = CarpetedDoubleGeometricDistribution::decode(
            0,
            spacing,
            &params(
                ShiftMode::Static,
                -10_000,
                segment(10, 90_000_000, 3),
                segment(10, 110_000_000, 1),
                WEIGHT_BASE / 50,
            ),
        );
        let mut sum = 0u128;
        let mut tick = min_usable_tick(spacing);
        while tick < max_usable_tick(spacing) {
            sum += shape.liquidity_density_x64(tick).unwrap();
            tick += spacing;
        }
        assert!(sum.abs_diff(Q64) < 1 << 24);
    }

    #[test]
    fn test_validation() {
        let stateful = LdfType::DynamicAndStateful;
        let good = params(
            ShiftMode::Static,
            -100,
            segment(10, 80_000_000, 1),
            segment(10, 125_000_000, 1),
            WEIGHT_BASE / 100,
        );
        assert!(CarpetedDoubleGeometricDistribution::is_valid_params(10, 0, &good, stateful));

        let zero_weight = params(
            ShiftMode::Static,
            -100,
            segment(10, 80_000_000, 0),
            segment(10, 125_000_000, 1),
            WEIGHT_BASE / 100,
        );
        assert!(!CarpetedDoubleGeometricDistribution::is_valid_params(10, 0, &zero_weight, stateful));

        let lopsided = params(
            ShiftMode::Static,
            -100,
            segment(10, 80_000_000, WEIGHT_BASE),
            segment(10, 125_000_000, 1),
            WEIGHT_BASE / 100,
        );
        assert!(CarpetedDoubleGeometricDistribution::is_valid_params(10, 0, &lopsided, stateful));

        // segment 1 squeezed below the bucket floor by its tiny weight
        let starved = params(
            ShiftMode::Static,
            -100,
            segment(10, 80_000_000, u32::MAX),
            segment(1_000, 101_000_000, 1),
            WEIGHT_BASE / 100,
        );
        assert!(!CarpetedDoubleGeometricDistribution::is_valid_params(10, 0, &starved, stateful));

        let dynamic = params(
            ShiftMode::Both,
            -100,
            segment(10, 80_000_000, 1),
            segment(10, 125_000_000, 1),
            WEIGHT_BASE / 100,
        );
        assert!(!CarpetedDoubleGeometricDistribution::is_valid_params(10, 0, &dynamic, stateful));
        assert!(CarpetedDoubleGeometricDistribution::is_valid_params(10, 30, &dynamic, stateful));
    }

    #[test]
    fn test_with_anchor_moves_both_segments() {
        let shape = CarpetedDoubleGeometricDistribution::decode(
            0,
            10,
            &params(
                ShiftMode::Left,
                -100,
                segment(10, 80_000_000, 1),
                segment(5, 125_000_000, 1),
                WEIGHT_BASE / 100,
            ),
        );
        assert_eq!(shape.anchor_tick(), -100);
        let moved = shape.with_anchor(-300);
        assert_eq!(moved.left.min_tick, -300);
        assert_eq!(moved.right.min_tick, -250);
        assert_eq!(moved.carpet.main_upper, -150);
    }
}
