//! # Curated Distribution Engine
//!
//! Pool-facing facade over the base families. Every query runs the same
//! pipeline:
//!
//! 1. An owner override, when stored, replaces the supplied params word.
//! 2. Params and state words are decoded.
//! 3. A stored state whose family or shape-relevant bytes differ from the
//!    current params is discarded and a surge is signalled.
//! 4. The reference tick becomes the TWAP tick when a lookback is set.
//! 5. The family shape is decoded against the reference tick.
//! 6. A surviving state constrains the new anchor through the shift mode;
//!    any anchor movement signals a surge.
//! 7. The new state word records the family, anchor and raw params.
//!
//! Owners update params through `set_params`, which validates the proposal,
//! dry-runs the pipeline at the spot tick and only then commits.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::codec::{decode_params, decode_state, DistributionParams, DistributionState, SanitizeTable};
use crate::config::EngineConfig;
use crate::constants::{MAX_TICK_SPACING, MAX_TWAP_LOOKBACK_SECONDS, MIN_TICK_SPACING};
use crate::dispatch::{is_valid_params, Shape};
use crate::distributions::{DensityCurve, SwapInversion};
use crate::errors::{LdfError, LdfResult};
use crate::events::ParamsUpdated;
use crate::guard::{AccessGuard, CallContext};
use crate::interfaces::{OwnerRegistry, PoolEngine};
use crate::math::round_tick_down;
use crate::shift::enforce_shift;
use crate::store::OverrideStore;
use crate::types::{DistributionFamily, FamilyParams, LdfType, ParamsWord, PoolId, PoolKey, Principal, StateWord};

/// Inputs shared by every query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryContext {
    pub pool: PoolKey,
    pub rounded_tick: i32,
    /// Used as-is when the params carry no TWAP lookback
    pub reference_tick: i32,
    pub spot_tick: i32,
    pub params: ParamsWord,
    pub state: StateWord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOutput {
    pub liquidity_density_x64: u128,
    pub cumulative_amount0_density_x64: u128,
    pub cumulative_amount1_density_x64: u128,
    /// State word the pool should persist for the next query
    pub new_state: StateWord,
    /// The shape moved or changed since the stored state
    pub should_surge: bool,
}

/// Pipeline output before a specific question is asked of the shape
#[derive(Debug, Clone, Copy)]
struct Resolved {
    shape: Shape,
    new_state: StateWord,
    should_surge: bool,
}

pub struct CuratedDistribution<S, P, R> {
    guard: AccessGuard,
    min_spot_density_x64: u128,
    sanitize: SanitizeTable,
    store: S,
    pool_engine: P,
    owners: R,
}

impl<S, P, R> CuratedDistribution<S, P, R>
where
    S: OverrideStore,
    P: PoolEngine,
    R: OwnerRegistry,
{
    pub fn new(config: &EngineConfig, store: S, pool_engine: P, owners: R) -> LdfResult<Self> {
        config.validate()?;
        Ok(Self {
            guard: AccessGuard::new(config.trusted),
            min_spot_density_x64: config.min_spot_density_x64()?,
            sanitize: config.sanitize.clone(),
            store,
            pool_engine,
            owners,
        })
    }

    pub fn guard(&self) -> &AccessGuard {
        &self.guard
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn pool_engine(&self) -> &P {
        &self.pool_engine
    }

    pub fn pool_engine_mut(&mut self) -> &mut P {
        &mut self.pool_engine
    }

    pub fn owners(&self) -> &R {
        &self.owners
    }

    pub fn owners_mut(&mut self) -> &mut R {
        &mut self.owners
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn query(&self, ctx: &QueryContext, call: &CallContext) -> LdfResult<QueryOutput> {
        self.authorize(call)?;
        let resolved = self.resolve(ctx)?;
        let query = resolved.shape.query(ctx.rounded_tick)?;
        Ok(QueryOutput {
            liquidity_density_x64: query.liquidity_density_x64,
            cumulative_amount0_density_x64: query.cumulative_amount0_density_x64,
            cumulative_amount1_density_x64: query.cumulative_amount1_density_x64,
            new_state: resolved.new_state,
            should_surge: resolved.should_surge,
        })
    }

    /// Density at the context's rounded tick, without the cumulative sides
    pub fn liquidity_density_x64(&self, ctx: &QueryContext, call: &CallContext) -> LdfResult<u128> {
        self.authorize(call)?;
        self.resolve(ctx)?
            .shape
            .liquidity_density_x64(ctx.rounded_tick)
    }

    pub fn cumulative_amount0(
        &self,
        ctx: &QueryContext,
        total_liquidity: u128,
        call: &CallContext,
    ) -> LdfResult<u128> {
        self.authorize(call)?;
        self.resolve(ctx)?
            .shape
            .cumulative_amount0(ctx.rounded_tick, total_liquidity)
    }

    pub fn cumulative_amount1(
        &self,
        ctx: &QueryContext,
        total_liquidity: u128,
        call: &CallContext,
    ) -> LdfResult<u128> {
        self.authorize(call)?;
        self.resolve(ctx)?
            .shape
            .cumulative_amount1(ctx.rounded_tick, total_liquidity)
    }

    /// Invert the cumulative curve for a swap; a miss is `success == false`
    pub fn compute_swap(
        &self,
        ctx: &QueryContext,
        input: u128,
        total_liquidity: u128,
        zero_for_one: bool,
        exact_in: bool,
        call: &CallContext,
    ) -> LdfResult<SwapInversion> {
        self.authorize(call)?;
        let inversion = self.resolve(ctx)?.shape.compute_swap(
            input,
            total_liquidity,
            zero_for_one,
            exact_in,
        )?;
        if !inversion.success {
            debug!(
                "Swap inversion miss on pool {}: input {} exceeds reserves",
                ctx.pool.id, input
            );
        }
        Ok(inversion)
    }

    /// Currently stored override for the pool, if any
    pub fn override_of(&self, pool: &PoolId) -> Option<DistributionParams> {
        self.store.get(pool).map(|word| decode_params(&word))
    }

    // ========================================================================
    // Owner Updates
    // ========================================================================

    /// Validate, dry-run and commit new params for a pool.
    ///
    /// Nothing is written unless every check passes. On success the pool's
    /// oracle is asked for enough capacity to serve the new lookback.
    pub fn set_params(
        &mut self,
        pool: PoolKey,
        family: DistributionFamily,
        family_params: FamilyParams,
        twap_lookback_seconds: u32,
        caller: &Principal,
    ) -> LdfResult<ParamsUpdated> {
        if let Err(err) = self.guard.authorize_owner(&self.owners, &pool.id, caller) {
            warn!("Rejected params update on pool {}: {}", pool.id, err);
            return Err(err);
        }

        let pool_config = self.pool_engine.pool_config(&pool.id);
        let effective_lookback = if twap_lookback_seconds != 0 {
            twap_lookback_seconds
        } else {
            pool_config.twap_lookback_seconds
        };
        let valid = twap_lookback_seconds <= MAX_TWAP_LOOKBACK_SECONDS
            && is_valid_spacing(pool.tick_spacing)
            && is_valid_params(
                pool.tick_spacing,
                effective_lookback,
                family,
                &family_params,
                LdfType::DynamicAndStateful,
            );
        if !valid {
            warn!(
                "Rejected params update on pool {}: invalid {:?} params",
                pool.id, family
            );
            return Err(LdfError::InvalidParams);
        }

        let spot_tick = self.pool_engine.spot_tick(&pool.id);
        let reference_tick = if twap_lookback_seconds != 0 {
            self.pool_engine.twap_tick(&pool.id, twap_lookback_seconds)?
        } else if pool_config.twap_lookback_seconds != 0 {
            self.pool_engine
                .twap_tick(&pool.id, pool_config.twap_lookback_seconds)?
        } else {
            spot_tick
        };

        let params = DistributionParams::new(family, twap_lookback_seconds, family_params);
        let state = self.pool_engine.ldf_state(&pool.id);
        let resolved = self.resolve_params(&pool, reference_tick, &params, &state)?;
        let density_x64 = resolved
            .shape
            .liquidity_density_x64(round_tick_down(spot_tick, pool.tick_spacing))?;
        if density_x64 < self.min_spot_density_x64 {
            warn!(
                "Rejected params update on pool {}: spot density {} below floor {}",
                pool.id, density_x64, self.min_spot_density_x64
            );
            return Err(LdfError::DensityTooLow { density_x64 });
        }

        self.store.set(pool.id, params.encode());
        if twap_lookback_seconds != 0 {
            self.ensure_oracle_capacity(&pool.id, twap_lookback_seconds, pool_config.oracle_min_interval);
        }

        let event = ParamsUpdated {
            pool: pool.id,
            family,
            family_params: self.sanitize.sanitize(family, &family_params),
            twap_lookback_seconds,
        };
        info!(
            "Params updated on pool {}: family {:?}, lookback {}s",
            pool.id, family, twap_lookback_seconds
        );
        Ok(event)
    }

    fn ensure_oracle_capacity(&mut self, pool: &PoolId, lookback_seconds: u32, min_interval: u32) {
        let required = lookback_seconds.div_ceil(min_interval.max(1)) + 1;
        let current = self.pool_engine.oracle_capacity(pool);
        if current < required {
            info!(
                "Requesting oracle capacity {} (from {}) on pool {}",
                required, current, pool
            );
            self.pool_engine.request_oracle_capacity(pool, required);
        }
    }

    // ========================================================================
    // Pipeline
    // ========================================================================

    fn authorize(&self, call: &CallContext) -> LdfResult<()> {
        self.guard.authorize_query(call).map_err(|err| {
            warn!("Rejected query: {}", err);
            err
        })
    }

    fn resolve(&self, ctx: &QueryContext) -> LdfResult<Resolved> {
        let word = self.store.get(&ctx.pool.id).unwrap_or(ctx.params);
        self.resolve_params(&ctx.pool, ctx.reference_tick, &decode_params(&word), &ctx.state)
    }

    fn resolve_params(
        &self,
        pool: &PoolKey,
        reference_tick: i32,
        params: &DistributionParams,
        state: &StateWord,
    ) -> LdfResult<Resolved> {
        if !is_valid_spacing(pool.tick_spacing) {
            return Err(LdfError::InvalidParams);
        }
        let state = decode_state(state);
        let mut should_surge = false;

        let last_anchor = if state.initialized() {
            if self.shape_changed(&state, params) {
                debug!(
                    "Shape changed on pool {}: {:?} -> {:?}",
                    pool.id, state.last_family, params.family
                );
                should_surge = true;
                None
            } else {
                Some(state.last_anchor_tick)
            }
        } else {
            None
        };

        let reference_tick = if params.twap_lookback_seconds != 0 {
            self.pool_engine
                .twap_tick(&pool.id, params.twap_lookback_seconds)?
        } else {
            reference_tick
        };

        let mut shape = Shape::decode(
            params.family,
            reference_tick,
            pool.tick_spacing,
            &params.family_params,
        )?;

        if let Some(last_anchor) = last_anchor {
            let anchor = enforce_shift(shape.anchor_tick(), last_anchor, shape.shift_mode());
            if anchor != shape.anchor_tick() {
                debug!(
                    "Shift mode {:?} holds anchor at {} instead of {} on pool {}",
                    shape.shift_mode(),
                    anchor,
                    shape.anchor_tick(),
                    pool.id
                );
                shape = shape.with_anchor(anchor);
            }
            if shape.anchor_tick() != last_anchor {
                debug!(
                    "Anchor moved {} -> {} on pool {}",
                    last_anchor,
                    shape.anchor_tick(),
                    pool.id
                );
                should_surge = true;
            }
        }

        let new_state =
            DistributionState::new(params.family, shape.anchor_tick(), params.family_params).encode();
        Ok(Resolved {
            shape,
            new_state,
            should_surge,
        })
    }

    fn shape_changed(&self, state: &DistributionState, params: &DistributionParams) -> bool {
        state.last_family != params.family
            || self.sanitize.sanitize(state.last_family, &state.last_family_params)
                != self.sanitize.sanitize(params.family, &params.family_params)
    }
}

fn is_valid_spacing(tick_spacing: i32) -> bool {
    (MIN_TICK_SPACING..=MAX_TICK_SPACING).contains(&tick_spacing)
}
