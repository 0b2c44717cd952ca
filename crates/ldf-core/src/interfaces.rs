//! # Collaborator Interfaces
//!
//! The engine never owns pool state. Spot ticks, stored distribution state,
//! TWAP observations, oracle capacity and pool ownership are read through
//! these traits so the host (or a test mock) decides where they live.

use serde::{Deserialize, Serialize};

use crate::errors::LdfResult;
use crate::types::{PoolId, Principal, StateWord};

/// Pool-level settings the engine needs when validating updates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PoolConfig {
    /// TWAP window configured for the pool; 0 disables it
    pub twap_lookback_seconds: u32,
    /// Minimum seconds between oracle observations
    pub oracle_min_interval: u32,
}

/// The AMM engine hosting the pools
pub trait PoolEngine {
    fn spot_tick(&self, pool: &PoolId) -> i32;

    /// Distribution state word last committed by the pool
    fn ldf_state(&self, pool: &PoolId) -> StateWord;

    fn pool_config(&self, pool: &PoolId) -> PoolConfig;

    /// Time-weighted average tick over the trailing window
    fn twap_tick(&self, pool: &PoolId, lookback_seconds: u32) -> LdfResult<i32>;

    /// Observations the pool's oracle can currently hold
    fn oracle_capacity(&self, pool: &PoolId) -> u32;

    fn request_oracle_capacity(&mut self, pool: &PoolId, capacity: u32);
}

/// Resolves the current owner of a pool
pub trait OwnerRegistry {
    fn owner_of(&self, pool: &PoolId) -> Option<Principal>;
}
