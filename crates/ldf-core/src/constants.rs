//! # Engine Constants
//!
//! Fixed-point scales, tick domain bounds, parameter bases and word layout
//! offsets shared by the codec, the base families and the engine.

// ============================================================================
// Mathematical Constants
// ============================================================================

/// Q64 fixed-point scale factor: 2^64
pub const Q64: u128 = 1u128 << 64;

// ============================================================================
// Tick Domain
// ============================================================================

/// Minimum tick of the price-representable domain
pub const MIN_TICK: i32 = -443_636;

/// Maximum tick of the price-representable domain
pub const MAX_TICK: i32 = 443_636;

/// Minimum tick spacing
pub const MIN_TICK_SPACING: i32 = 1;

/// Maximum tick spacing
pub const MAX_TICK_SPACING: i32 = 16_384;

// ============================================================================
// Distribution Parameter Bases
// ============================================================================

/// Alpha is stored as `alpha * ALPHA_BASE`
pub const ALPHA_BASE: u32 = 100_000_000;

/// Smallest accepted geometric decay factor (0.01)
pub const MIN_ALPHA: u32 = 1_000_000;

/// Largest accepted geometric growth factor (12.0)
pub const MAX_ALPHA: u32 = 1_200_000_000;

/// Weights (carpet and segment weights) are stored as `weight * WEIGHT_BASE`
pub const WEIGHT_BASE: u32 = 1_000_000_000;

/// Every bucket of a geometric shape must hold at least 2^-40 of its mass
pub const MIN_BUCKET_DENSITY_X64: u128 = 1u128 << 24;

/// Default floor for the density at the spot tick after a parameter update (0.1%)
pub const DEFAULT_MIN_SPOT_DENSITY_X64: u128 = Q64 / 1_000;

// ============================================================================
// Word Layout
// ============================================================================

/// Size of a params or state word
pub const WORD_SIZE: usize = 32;

/// Size of the family-specific parameter block
pub const FAMILY_PARAMS_SIZE: usize = 28;

/// Largest lookback window a params word can carry (u24)
pub const MAX_TWAP_LOOKBACK_SECONDS: u32 = (1 << 24) - 1;
