//! Event definitions

use serde::{Deserialize, Serialize};

#[cfg(feature = "client")]
use borsh::{BorshDeserialize, BorshSerialize};

use crate::types::{DistributionFamily, FamilyParams, PoolId};

/// Emitted when a pool owner commits new distribution params
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "client", derive(BorshSerialize, BorshDeserialize))]
pub struct ParamsUpdated {
    pub pool: PoolId,
    pub family: DistributionFamily,
    /// Shape-relevant bytes only; the shift mode and unused bytes are zeroed
    pub family_params: FamilyParams,
    pub twap_lookback_seconds: u32,
}
