//! Flat carpet spread over every usable bucket outside a main support, so
//! a curated shape never leaves the pool without liquidity at any price.

use ethnum::U256;

use crate::constants::{Q64, WEIGHT_BASE};
use crate::distributions::{range_amount0_x64, range_amount1_x64};
use crate::errors::LdfResult;
use crate::math::{max_usable_tick, min_usable_tick, mul_x64, ratio_to_x64, to_u128, ONE_X64};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Carpet {
    /// First bucket of the main support
    pub main_lower: i32,
    /// Exclusive end of the main support
    pub main_upper: i32,
    pub tick_spacing: i32,
    /// Share of total liquidity held by the carpet; zero when there is no
    /// bucket left outside the main support
    pub weight_x64: U256,
}

impl Carpet {
    /// `weight` is scaled by `WEIGHT_BASE`
    pub fn new(main_lower: i32, main_upper: i32, tick_spacing: i32, weight: u32) -> Self {
        let mut carpet = Self {
            main_lower,
            main_upper,
            tick_spacing,
            weight_x64: ratio_to_x64(weight.min(WEIGHT_BASE), WEIGHT_BASE),
        };
        if carpet.bucket_count() == 0 {
            carpet.weight_x64 = U256::ZERO;
        }
        carpet
    }

    fn usable_range(&self) -> (i32, i32) {
        (min_usable_tick(self.tick_spacing), max_usable_tick(self.tick_spacing))
    }

    /// Usable buckets outside the main support
    pub fn bucket_count(&self) -> u128 {
        let (min_tick, max_tick) = self.usable_range();
        let left = (self.main_lower.clamp(min_tick, max_tick) - min_tick) / self.tick_spacing;
        let right = (max_tick - self.main_upper.clamp(min_tick, max_tick)) / self.tick_spacing;
        (left + right) as u128
    }

    /// Share of total liquidity left for the main support
    pub fn main_weight_x64(&self) -> U256 {
        ONE_X64 - self.weight_x64
    }

    /// Scale a main-support value by the main share
    pub fn scale_main(&self, value_x64: u128) -> LdfResult<u128> {
        to_u128(mul_x64(U256::new(value_x64), self.main_weight_x64())?)
    }

    fn share(&self, amount_x64: u128) -> LdfResult<u128> {
        let buckets = self.bucket_count();
        if buckets == 0 {
            return Ok(0);
        }
        Ok(to_u128(mul_x64(U256::new(amount_x64), self.weight_x64)?)? / buckets)
    }

    pub fn density_x64(&self, rounded_tick: i32) -> LdfResult<u128> {
        let (min_tick, max_tick) = self.usable_range();
        let in_domain = rounded_tick >= min_tick && rounded_tick < max_tick;
        let in_main = rounded_tick >= self.main_lower && rounded_tick < self.main_upper;
        if !in_domain || in_main {
            return Ok(0);
        }
        self.share(Q64)
    }

    pub fn cumulative_amount0_x64(&self, rounded_tick: i32) -> LdfResult<u128> {
        let (min_tick, max_tick) = self.usable_range();
        let left = range_amount0_x64(min_tick, self.main_lower, rounded_tick);
        let right = range_amount0_x64(self.main_upper, max_tick, rounded_tick);
        self.share(left + right)
    }

    pub fn cumulative_amount1_x64(&self, rounded_tick: i32) -> LdfResult<u128> {
        let (min_tick, max_tick) = self.usable_range();
        let left = range_amount1_x64(min_tick, self.main_lower, rounded_tick, self.tick_spacing);
        let right = range_amount1_x64(self.main_upper, max_tick, rounded_tick, self.tick_spacing);
        self.share(left + right)
    }
}

/// Carpet weight strictly between zero and one
pub fn is_valid_carpet_weight(weight: u32) -> bool {
    weight > 0 && weight < WEIGHT_BASE
}
