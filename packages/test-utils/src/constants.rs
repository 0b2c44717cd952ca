use ldf_core::{PoolId, Principal, TrustedCallers};

pub const HUB: Principal = Principal::new([1u8; 32]);
pub const QUOTER: Principal = Principal::new([2u8; 32]);
pub const INSTANCE: Principal = Principal::new([3u8; 32]);
pub const OWNER: Principal = Principal::new([10u8; 32]);
pub const NEW_OWNER: Principal = Principal::new([11u8; 32]);
pub const STRANGER: Principal = Principal::new([99u8; 32]);

pub const POOL_ID: PoolId = PoolId([42u8; 32]);
pub const OTHER_POOL_ID: PoolId = PoolId([43u8; 32]);

pub const DEFAULT_TICK_SPACING: i32 = 10;

/// Alpha of 0.9 (base 1e8)
pub const ALPHA_DECAY: u32 = 90_000_000;
/// Alpha of 1.1 (base 1e8)
pub const ALPHA_GROWTH: u32 = 110_000_000;
/// Carpet weight of 1% (base 1e9)
pub const CARPET_ONE_PERCENT: u32 = 10_000_000;

pub fn trusted_callers() -> TrustedCallers {
    TrustedCallers {
        hub: HUB,
        quoter: QUOTER,
        instance: INSTANCE,
    }
}
