pub mod constants;
pub mod helpers;

pub use constants::*;
pub use helpers::*;

use std::collections::BTreeMap;

use ldf_core::{
    CallContext, CuratedDistribution, DistributionFamily, EngineConfig, FamilyParams,
    InMemoryOverrideStore, LdfError, LdfResult, OwnerRegistry, ParamsUpdated, ParamsWord,
    PoolConfig, PoolEngine, PoolId, PoolKey, Principal, QueryContext, QueryOutput, StateWord,
};
use tracing_subscriber::EnvFilter;

/// Install a test-writer subscriber honouring `RUST_LOG`; repeated calls
/// are no-ops
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ============================================================================
// Mock collaborators
// ============================================================================

/// One pool as seen by the mock engine
#[derive(Debug, Clone, Default)]
pub struct MockPool {
    pub spot_tick: i32,
    pub state: StateWord,
    pub config: PoolConfig,
    /// TWAP tick served for any window; `None` makes the oracle unavailable
    pub twap_tick: Option<i32>,
    pub oracle_capacity: u32,
    /// Every capacity requested through `request_oracle_capacity`
    pub capacity_requests: Vec<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct MockPoolEngine {
    pub pools: BTreeMap<PoolId, MockPool>,
}

impl MockPoolEngine {
    pub fn with_pool(pool: PoolId, state: MockPool) -> Self {
        let mut engine = Self::default();
        engine.pools.insert(pool, state);
        engine
    }

    pub fn pool_mut(&mut self, pool: &PoolId) -> &mut MockPool {
        self.pools.entry(*pool).or_default()
    }
}

impl PoolEngine for MockPoolEngine {
    fn spot_tick(&self, pool: &PoolId) -> i32 {
        self.pools.get(pool).map_or(0, |p| p.spot_tick)
    }

    fn ldf_state(&self, pool: &PoolId) -> StateWord {
        self.pools.get(pool).map(|p| p.state).unwrap_or_default()
    }

    fn pool_config(&self, pool: &PoolId) -> PoolConfig {
        self.pools.get(pool).map(|p| p.config).unwrap_or_default()
    }

    fn twap_tick(&self, pool: &PoolId, lookback_seconds: u32) -> LdfResult<i32> {
        self.pools
            .get(pool)
            .and_then(|p| p.twap_tick)
            .ok_or_else(|| {
                LdfError::OracleUnavailable(format!(
                    "no observations covering {}s on pool {}",
                    lookback_seconds, pool
                ))
            })
    }

    fn oracle_capacity(&self, pool: &PoolId) -> u32 {
        self.pools.get(pool).map_or(0, |p| p.oracle_capacity)
    }

    fn request_oracle_capacity(&mut self, pool: &PoolId, capacity: u32) {
        let entry = self.pool_mut(pool);
        entry.capacity_requests.push(capacity);
        entry.oracle_capacity = entry.oracle_capacity.max(capacity);
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockOwnerRegistry {
    pub owners: BTreeMap<PoolId, Principal>,
}

impl MockOwnerRegistry {
    pub fn with_owner(pool: PoolId, owner: Principal) -> Self {
        let mut registry = Self::default();
        registry.owners.insert(pool, owner);
        registry
    }

    pub fn transfer(&mut self, pool: PoolId, new_owner: Principal) {
        self.owners.insert(pool, new_owner);
    }
}

impl OwnerRegistry for MockOwnerRegistry {
    fn owner_of(&self, pool: &PoolId) -> Option<Principal> {
        self.owners.get(pool).copied()
    }
}

// ============================================================================
// Test context
// ============================================================================

pub type TestEngine = CuratedDistribution<InMemoryOverrideStore, MockPoolEngine, MockOwnerRegistry>;

/// An engine wired to mocks for a single pool owned by `OWNER`
pub struct TestContext {
    pub engine: TestEngine,
    pub pool: PoolKey,
}

impl TestContext {
    pub fn new(tick_spacing: i32) -> Self {
        Self::with_pool(tick_spacing, MockPool::default())
    }

    pub fn with_pool(tick_spacing: i32, pool: MockPool) -> Self {
        Self::with_config(tick_spacing, pool, EngineConfig::new(trusted_callers()))
    }

    pub fn with_config(tick_spacing: i32, pool: MockPool, config: EngineConfig) -> Self {
        init_tracing();
        let engine = CuratedDistribution::new(
            &config,
            InMemoryOverrideStore::new(),
            MockPoolEngine::with_pool(POOL_ID, pool),
            MockOwnerRegistry::with_owner(POOL_ID, OWNER),
        )
        .expect("test config is valid");
        Self {
            engine,
            pool: PoolKey {
                id: POOL_ID,
                tick_spacing,
            },
        }
    }

    /// Call context of the hub executing inside the deployed instance
    pub fn hub_call() -> CallContext {
        CallContext::new(HUB, INSTANCE)
    }

    pub fn mock_pool(&mut self) -> &mut MockPool {
        self.engine.pool_engine_mut().pool_mut(&POOL_ID)
    }

    pub fn context(
        &self,
        rounded_tick: i32,
        reference_tick: i32,
        params: ParamsWord,
        state: StateWord,
    ) -> QueryContext {
        QueryContext {
            pool: self.pool,
            rounded_tick,
            reference_tick,
            spot_tick: rounded_tick,
            params,
            state,
        }
    }

    /// Query as the hub, persisting nothing
    pub fn query(
        &self,
        rounded_tick: i32,
        reference_tick: i32,
        params: ParamsWord,
        state: StateWord,
    ) -> LdfResult<QueryOutput> {
        let ctx = self.context(rounded_tick, reference_tick, params, state);
        self.engine.query(&ctx, &Self::hub_call())
    }

    /// Query as the hub and persist the new state in the mock pool, the way
    /// the pool engine would after a swap
    pub fn query_and_commit(
        &mut self,
        rounded_tick: i32,
        reference_tick: i32,
        params: ParamsWord,
    ) -> LdfResult<QueryOutput> {
        let state = self.mock_pool().state;
        let output = self.query(rounded_tick, reference_tick, params, state)?;
        self.mock_pool().state = output.new_state;
        Ok(output)
    }

    pub fn set_params_as(
        &mut self,
        caller: &Principal,
        family: DistributionFamily,
        family_params: FamilyParams,
        twap_lookback_seconds: u32,
    ) -> LdfResult<ParamsUpdated> {
        let pool = self.pool;
        self.engine
            .set_params(pool, family, family_params, twap_lookback_seconds, caller)
    }

    pub fn set_params(
        &mut self,
        family: DistributionFamily,
        family_params: FamilyParams,
        twap_lookback_seconds: u32,
    ) -> LdfResult<ParamsUpdated> {
        self.set_params_as(&OWNER, family, family_params, twap_lookback_seconds)
    }
}
