//! # Geometric Segment
//!
//! `length` buckets starting at `min_tick`; bucket `i` carries weight
//! `alpha^i`, normalised so the segment holds one unit of liquidity.
//!
//! Cumulative amounts are closed geometric series. With `g = sqrtP(s)` and
//! `q = 1/g`, bucket `i` holds `sqrtP(min) * g^i * (g - 1)` token1 and
//! `q^i * (1 - q) / sqrtP(min)` token0 per unit, so
//!
//! ```text
//! cum1(b) = sqrtP(min) * (g - 1) * Σ_{i<=b} (alpha*g)^i / W
//! cum0(b) = alpha^b / sqrtP(min + b*s) * (1 - q) * Σ_{j<n-b} (alpha*q)^j / W
//! ```
//!
//! where `W = Σ_{i<n} alpha^i`.

use ethnum::U256;

use crate::constants::{ALPHA_BASE, MAX_ALPHA, MIN_ALPHA};
use crate::errors::LdfResult;
use crate::math::{
    div_x64, geometric_sum_x64, inv_sqrt_price_at_tick, mul_x64, pow_x64, ratio_to_x64,
    sqrt_price_at_tick, to_u128, ONE_X64,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometricSegment {
    pub min_tick: i32,
    pub length: u32,
    pub alpha_x64: U256,
    pub tick_spacing: i32,
}

impl GeometricSegment {
    /// `alpha` is scaled by `ALPHA_BASE`
    pub fn new(min_tick: i32, length: u32, alpha: u32, tick_spacing: i32) -> Self {
        Self {
            min_tick,
            length,
            alpha_x64: ratio_to_x64(alpha, ALPHA_BASE),
            tick_spacing,
        }
    }

    /// Exclusive upper bound of the segment
    pub fn max_tick(&self) -> i32 {
        (self.min_tick as i64 + self.length as i64 * self.tick_spacing as i64)
            .clamp(i32::MIN as i64, i32::MAX as i64) as i32
    }

    pub fn contains(&self, rounded_tick: i32) -> bool {
        self.length > 0 && rounded_tick >= self.min_tick && rounded_tick < self.max_tick()
    }

    fn bucket_index(&self, rounded_tick: i32) -> u32 {
        if rounded_tick <= self.min_tick {
            return 0;
        }
        let index = (rounded_tick as i64 - self.min_tick as i64) / self.tick_spacing as i64;
        index.min(self.length.saturating_sub(1) as i64) as u32
    }

    fn total_weight(&self) -> LdfResult<U256> {
        geometric_sum_x64(self.alpha_x64, self.length)
    }

    pub fn density_x64(&self, rounded_tick: i32) -> LdfResult<u128> {
        if !self.contains(rounded_tick) {
            return Ok(0);
        }
        self.bucket_density_x64(self.bucket_index(rounded_tick))
    }

    fn bucket_density_x64(&self, index: u32) -> LdfResult<u128> {
        to_u128(div_x64(pow_x64(self.alpha_x64, index)?, self.total_weight()?)?)
    }

    /// Density of the lightest bucket: the first one when alpha > 1, the
    /// last one otherwise
    pub fn min_bucket_density_x64(&self) -> LdfResult<u128> {
        if self.length == 0 {
            return Ok(0);
        }
        let first = self.bucket_density_x64(0)?;
        let last = self.bucket_density_x64(self.length - 1)?;
        Ok(first.min(last))
    }

    pub fn cumulative_amount0_x64(&self, rounded_tick: i32) -> LdfResult<u128> {
        if self.length == 0 || rounded_tick >= self.max_tick() {
            return Ok(0);
        }
        let first = self.bucket_index(rounded_tick);
        let bucket_tick = self.min_tick + first as i32 * self.tick_spacing;

        let q = U256::new(inv_sqrt_price_at_tick(self.tick_spacing));
        let series = geometric_sum_x64(mul_x64(self.alpha_x64, q)?, self.length - first)?;
        let head = mul_x64(
            pow_x64(self.alpha_x64, first)?,
            U256::new(inv_sqrt_price_at_tick(bucket_tick)),
        )?;
        let total = mul_x64(mul_x64(head, series)?, ONE_X64 - q)?;
        to_u128(div_x64(total, self.total_weight()?)?)
    }

    pub fn cumulative_amount1_x64(&self, rounded_tick: i32) -> LdfResult<u128> {
        if self.length == 0 || rounded_tick < self.min_tick {
            return Ok(0);
        }
        let last = self.bucket_index(rounded_tick);

        let g = U256::new(sqrt_price_at_tick(self.tick_spacing));
        let series = geometric_sum_x64(mul_x64(self.alpha_x64, g)?, last + 1)?;
        let head = U256::new(sqrt_price_at_tick(self.min_tick));
        let total = mul_x64(mul_x64(head, series)?, g - ONE_X64)?;
        to_u128(div_x64(total, self.total_weight()?)?)
    }
}

/// Alpha within bounds and not 1.0 (a flat segment is the uniform family)
pub fn is_valid_alpha(alpha: u32) -> bool {
    (MIN_ALPHA..=MAX_ALPHA).contains(&alpha) && alpha != ALPHA_BASE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{MIN_BUCKET_DENSITY_X64, Q64};

    #[test]
    fn test_density_ratio_is_alpha() {
        let segment = GeometricSegment::new(0, 8, 2 * ALPHA_BASE, 10);
        let d0 = segment.density_x64(0).unwrap();
        let d1 = segment.density_x64(10).unwrap();
        // W = 255, d0 = 1/255
        assert!(d0.abs_diff(Q64 / 255) <= 1);
        assert!(d1.abs_diff(2 * d0) <= 2);
        assert_eq!(segment.density_x64(80).unwrap(), 0);
        assert_eq!(segment.density_x64(-10).unwrap(), 0);
    }

    #[test]
    fn test_densities_sum_to_one() {
        let segment = GeometricSegment::new(-200, 40, 90_000_000, 10);
        let sum: u128 = (0..40)
            .map(|i| segment.density_x64(-200 + i * 10).unwrap())
            .sum();
        assert!(sum.abs_diff(Q64) < 1 << 20);
    }

    #[test]
    fn test_cumulative_amounts_match_bucket_sums() {
        let segment = GeometricSegment::new(-50, 10, 120_000_000, 10);
        let mut amount1 = 0u128;
        for i in 0..10 {
            let tick = -50 + i * 10;
            let density = segment.density_x64(tick).unwrap();
            let bucket = sqrt_price_at_tick(tick + 10) - sqrt_price_at_tick(tick);
            amount1 += ((U256::new(density) * U256::new(bucket)) >> 64u32).as_u128();
        }
        let closed = segment.cumulative_amount1_x64(40).unwrap();
        assert!(closed.abs_diff(amount1) < 1 << 16);

        let mut amount0 = 0u128;
        for i in 3..10 {
            let tick = -50 + i * 10;
            let density = segment.density_x64(tick).unwrap();
            let bucket = inv_sqrt_price_at_tick(tick) - inv_sqrt_price_at_tick(tick + 10);
            amount0 += ((U256::new(density) * U256::new(bucket)) >> 64u32).as_u128();
        }
        let closed = segment.cumulative_amount0_x64(-20).unwrap();
        assert!(closed.abs_diff(amount0) < 1 << 16);
    }

    #[test]
    fn test_cumulative_bounds() {
        let segment = GeometricSegment::new(0, 10, 50_000_000, 10);
        assert_eq!(segment.cumulative_amount1_x64(-10).unwrap(), 0);
        assert_eq!(segment.cumulative_amount0_x64(100).unwrap(), 0);
        assert_eq!(
            segment.cumulative_amount1_x64(90).unwrap(),
            segment.cumulative_amount1_x64(1_000).unwrap()
        );
    }

    #[test]
    fn test_min_bucket_density() {
        let steep = GeometricSegment::new(0, 200, 50_000_000, 1);
        assert!(steep.min_bucket_density_x64().unwrap() < MIN_BUCKET_DENSITY_X64);

        let mild = GeometricSegment::new(0, 20, 110_000_000, 1);
        assert_eq!(
            mild.min_bucket_density_x64().unwrap(),
            mild.density_x64(0).unwrap()
        );
    }

    #[test]
    fn test_alpha_bounds() {
        assert!(is_valid_alpha(MIN_ALPHA));
        assert!(is_valid_alpha(MAX_ALPHA));
        assert!(!is_valid_alpha(ALPHA_BASE));
        assert!(!is_valid_alpha(MIN_ALPHA - 1));
        assert!(!is_valid_alpha(MAX_ALPHA + 1));
    }
}
