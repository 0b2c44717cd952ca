//! # Access Guard
//!
//! Queries are served only to the trusted set fixed at construction and only
//! while executing inside the deployed engine instance. Parameter updates
//! are gated on the pool owner, resolved fresh from the registry every time
//! so ownership transfers take effect immediately.

use serde::{Deserialize, Serialize};

use crate::errors::{LdfError, LdfResult};
use crate::interfaces::OwnerRegistry;
use crate::types::{PoolId, Principal};

/// Identities allowed to query the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustedCallers {
    /// Liquidity hub that executes swaps and deposits
    pub hub: Principal,
    /// Off-chain quoter
    pub quoter: Principal,
    /// The engine instance itself
    pub instance: Principal,
}

impl TrustedCallers {
    pub fn contains(&self, caller: &Principal) -> bool {
        *caller == self.hub || *caller == self.quoter || *caller == self.instance
    }
}

/// Who is calling, and which instance is executing the call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Principal,
    pub executing_instance: Principal,
}

impl CallContext {
    pub fn new(caller: Principal, executing_instance: Principal) -> Self {
        Self {
            caller,
            executing_instance,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessGuard {
    trusted: TrustedCallers,
}

impl AccessGuard {
    pub fn new(trusted: TrustedCallers) -> Self {
        Self { trusted }
    }

    pub fn trusted(&self) -> &TrustedCallers {
        &self.trusted
    }

    pub fn authorize_query(&self, call: &CallContext) -> LdfResult<()> {
        if call.executing_instance != self.trusted.instance {
            return Err(LdfError::ForeignExecutionContext);
        }
        if !self.trusted.contains(&call.caller) {
            return Err(LdfError::UntrustedCaller {
                caller: call.caller,
            });
        }
        Ok(())
    }

    pub fn authorize_owner<R: OwnerRegistry>(
        &self,
        registry: &R,
        pool: &PoolId,
        caller: &Principal,
    ) -> LdfResult<()> {
        match registry.owner_of(pool) {
            Some(owner) if owner == *caller => Ok(()),
            _ => Err(LdfError::NotPoolOwner { caller: *caller }),
        }
    }
}
