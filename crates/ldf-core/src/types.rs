//! # Core Types
//!
//! Identities, opaque storage words and the small enums that travel through
//! the codec: distribution family tags, shift modes and LDF statefulness.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[cfg(feature = "client")]
use borsh::{BorshDeserialize, BorshSerialize};

use crate::constants::{FAMILY_PARAMS_SIZE, WORD_SIZE};
use crate::errors::LdfError;

/// Family-specific parameter block of a params word
pub type FamilyParams = [u8; FAMILY_PARAMS_SIZE];

// ============================================================================
// Identities
// ============================================================================

/// A 32-byte account identity (caller, owner, engine instance)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[cfg_attr(feature = "client", derive(BorshSerialize, BorshDeserialize))]
pub struct Principal([u8; 32]);

impl Principal {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl FromStr for Principal {
    type Err = LdfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| LdfError::InvalidConfig(format!("invalid principal {}: {}", s, e)))?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| LdfError::InvalidConfig(format!("principal {} is not 32 bytes", s)))?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Principal {
    type Error = LdfError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Principal> for String {
    fn from(value: Principal) -> Self {
        value.to_string()
    }
}

/// Identity of a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "client", derive(BorshSerialize, BorshDeserialize))]
pub struct PoolId(pub [u8; 32]);

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

/// Pool identity plus the tick spacing the distribution is laid out on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "client", derive(BorshSerialize, BorshDeserialize))]
pub struct PoolKey {
    pub id: PoolId,
    pub tick_spacing: i32,
}

// ============================================================================
// Storage Words
// ============================================================================

/// Serialized `DistributionParams` (see `codec::params` for the layout)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "client", derive(BorshSerialize, BorshDeserialize))]
pub struct ParamsWord(pub [u8; WORD_SIZE]);

/// Serialized `DistributionState` (see `codec::state` for the layout)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "client", derive(BorshSerialize, BorshDeserialize))]
pub struct StateWord(pub [u8; WORD_SIZE]);

// ============================================================================
// Enums
// ============================================================================

/// Distribution family tag. Decoding is total: unknown tags are preserved
/// as `Unrecognized` so that encode(decode(x)) == x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "client", derive(BorshSerialize, BorshDeserialize))]
pub enum DistributionFamily {
    /// No override configured
    None,
    Uniform,
    GeometricWithCarpet,
    DoubleGeometricWithCarpet,
    Unrecognized(u8),
}

impl DistributionFamily {
    pub fn from_tag(tag: u8) -> Self {
        match tag {
            0 => Self::None,
            1 => Self::Uniform,
            2 => Self::GeometricWithCarpet,
            3 => Self::DoubleGeometricWithCarpet,
            other => Self::Unrecognized(other),
        }
    }

    pub fn tag(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::Uniform => 1,
            Self::GeometricWithCarpet => 2,
            Self::DoubleGeometricWithCarpet => 3,
            Self::Unrecognized(tag) => *tag,
        }
    }
}

/// Policy for moving a shape's anchor tick between queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "client", derive(BorshSerialize, BorshDeserialize))]
#[repr(u8)]
pub enum ShiftMode {
    /// Anchor follows the reference tick freely
    Both = 0,
    /// Anchor may only move toward lower ticks
    Left = 1,
    /// Anchor may only move toward higher ticks
    Right = 2,
    /// Shape is pinned to absolute ticks
    Static = 3,
}

impl ShiftMode {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Both),
            1 => Some(Self::Left),
            2 => Some(Self::Right),
            3 => Some(Self::Static),
            _ => None,
        }
    }

    /// Dynamic shapes are positioned relative to the reference tick
    pub fn is_dynamic(&self) -> bool {
        *self != Self::Static
    }
}

/// How much state an LDF is allowed to carry between queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LdfType {
    Static,
    DynamicNotStateful,
    DynamicAndStateful,
}
