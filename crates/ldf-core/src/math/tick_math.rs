//! # Tick Math
//!
//! Tick to sqrt-price conversions (X64) backed by Orca Whirlpools core, plus
//! the rounding and usable-range helpers the distributions are laid out on.

use ethnum::U256;
use orca_whirlpools_core::tick_index_to_sqrt_price;

use crate::constants::{MAX_TICK, MIN_TICK};

/// sqrt(1.0001^tick) in X64. Ticks outside the domain are clamped.
pub fn sqrt_price_at_tick(tick: i32) -> u128 {
    u128::from(tick_index_to_sqrt_price(tick.clamp(MIN_TICK, MAX_TICK)))
}

/// 1 / sqrt(1.0001^tick) in X64
pub fn inv_sqrt_price_at_tick(tick: i32) -> u128 {
    // sqrt prices are above 2^32 across the domain, so the quotient fits in 96 bits
    ((U256::ONE << 128u32) / U256::new(sqrt_price_at_tick(tick))).as_u128()
}

/// Round a tick down (towards negative infinity) to a multiple of the spacing
pub fn round_tick_down(tick: i32, tick_spacing: i32) -> i32 {
    tick.div_euclid(tick_spacing) * tick_spacing
}

/// Whether the tick is a multiple of the spacing
pub fn is_aligned(tick: i32, tick_spacing: i32) -> bool {
    tick.rem_euclid(tick_spacing) == 0
}

/// Smallest tick aligned to the spacing inside the domain
pub fn min_usable_tick(tick_spacing: i32) -> i32 {
    -(MAX_TICK / tick_spacing) * tick_spacing
}

/// Largest tick aligned to the spacing inside the domain
pub fn max_usable_tick(tick_spacing: i32) -> i32 {
    (MAX_TICK / tick_spacing) * tick_spacing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::Q64;

    #[test]
    fn test_sqrt_price_at_zero_is_one() {
        assert_eq!(sqrt_price_at_tick(0), Q64);
        assert_eq!(inv_sqrt_price_at_tick(0), Q64);
    }

    #[test]
    fn test_sqrt_price_is_monotonic() {
        let ticks = [MIN_TICK, -100_000, -1, 0, 1, 60, 100_000, MAX_TICK];
        for pair in ticks.windows(2) {
            assert!(sqrt_price_at_tick(pair[0]) < sqrt_price_at_tick(pair[1]));
            assert!(inv_sqrt_price_at_tick(pair[0]) > inv_sqrt_price_at_tick(pair[1]));
        }
        assert_eq!(sqrt_price_at_tick(MAX_TICK + 10), sqrt_price_at_tick(MAX_TICK));
    }

    #[test]
    fn test_rounding_and_usable_ticks() {
        assert_eq!(round_tick_down(5, 10), 0);
        assert_eq!(round_tick_down(-5, 10), -10);
        assert_eq!(round_tick_down(-10, 10), -10);
        assert!(is_aligned(-20, 10));
        assert!(!is_aligned(-21, 10));

        assert_eq!(min_usable_tick(1), MIN_TICK);
        assert_eq!(max_usable_tick(1), MAX_TICK);
        assert_eq!(max_usable_tick(60), 443_580);
        assert_eq!(min_usable_tick(60), -443_580);
    }
}
