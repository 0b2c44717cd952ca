//! # X64 Fixed-Point Arithmetic
//!
//! All fractional values are unsigned X64 (`1.0 == 2^64`). Intermediates use
//! `ethnum::U256`; every operation is checked and reports `MathOverflow`
//! instead of wrapping.

use ethnum::U256;

use crate::constants::Q64;
use crate::errors::{LdfError, LdfResult};

/// 1.0 in X64
pub const ONE_X64: U256 = U256::new(Q64);

/// (a * b) >> 64
pub fn mul_x64(a: U256, b: U256) -> LdfResult<U256> {
    a.checked_mul(b)
        .map(|product| product >> 64u32)
        .ok_or(LdfError::MathOverflow)
}

/// (a << 64) / b
pub fn div_x64(a: U256, b: U256) -> LdfResult<U256> {
    if b == U256::ZERO {
        return Err(LdfError::DivisionByZero);
    }
    if a.leading_zeros() < 64 {
        return Err(LdfError::MathOverflow);
    }
    Ok((a << 64u32) / b)
}

/// base^exp by square-and-multiply
pub fn pow_x64(base: U256, exp: u32) -> LdfResult<U256> {
    let mut result = ONE_X64;
    let mut square = base;
    let mut remaining = exp;
    while remaining > 0 {
        if remaining & 1 == 1 {
            result = mul_x64(result, square)?;
        }
        remaining >>= 1;
        if remaining > 0 {
            square = mul_x64(square, square)?;
        }
    }
    Ok(result)
}

/// Σ_{i < terms} ratio^i, built by doubling over the bits of `terms`.
///
/// Never divides by `ratio - 1`, so ratios arbitrarily close to one keep
/// full precision.
pub fn geometric_sum_x64(ratio: U256, terms: u32) -> LdfResult<U256> {
    let mut sum = U256::ZERO;
    let mut power = ONE_X64;
    let bits = u32::BITS - terms.leading_zeros();
    for bit in (0..bits).rev() {
        // S(2m) = S(m) + r^m * S(m)
        sum = sum
            .checked_add(mul_x64(power, sum)?)
            .ok_or(LdfError::MathOverflow)?;
        power = mul_x64(power, power)?;
        if (terms >> bit) & 1 == 1 {
            // S(m + 1) = S(m) + r^m
            sum = sum.checked_add(power).ok_or(LdfError::MathOverflow)?;
            power = mul_x64(power, ratio)?;
        }
    }
    Ok(sum)
}

/// Narrow a U256 to u128
pub fn to_u128(value: U256) -> LdfResult<u128> {
    if value > U256::new(u128::MAX) {
        return Err(LdfError::MathOverflow);
    }
    Ok(value.as_u128())
}

/// Narrow a U256 to u128, clamping at u128::MAX
pub fn to_u128_saturating(value: U256) -> u128 {
    if value > U256::new(u128::MAX) {
        u128::MAX
    } else {
        value.as_u128()
    }
}

/// Convert a parameter stored against `base` (e.g. alpha * 1e8) to X64
pub fn ratio_to_x64(value: u32, base: u32) -> U256 {
    (U256::new(value as u128) << 64u32) / U256::new(base as u128)
}
