//! # Engine Error Types
//!
//! A single error enum covers math, validation, authorization, oracle and
//! configuration failures. Swap-inversion misses are not errors: they are
//! reported through `SwapInversion::success`.

use thiserror::Error;

use crate::types::Principal;

/// Errors surfaced by the curated distribution engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub enum LdfError {
    // ========================================================================
    // Math Errors
    // ========================================================================

    #[error("Math overflow")]
    MathOverflow,

    #[error("Division by zero")]
    DivisionByZero,

    // ========================================================================
    // Validation Errors
    // ========================================================================

    #[error("Invalid distribution params")]
    InvalidParams,

    #[error("Liquidity density at spot tick too low: {density_x64} (X64)")]
    DensityTooLow { density_x64: u128 },

    // ========================================================================
    // Authorization Errors
    // ========================================================================

    #[error("Caller {caller} is not a trusted caller")]
    UntrustedCaller { caller: Principal },

    #[error("Call is not executing in the deployed instance")]
    ForeignExecutionContext,

    #[error("Caller {caller} is not the pool owner")]
    NotPoolOwner { caller: Principal },

    // ========================================================================
    // Oracle Errors
    // ========================================================================

    #[error("TWAP oracle unavailable: {0}")]
    OracleUnavailable(String),

    // ========================================================================
    // Configuration Errors
    // ========================================================================

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to access config file: {0}")]
    ConfigIo(String),

    #[error("Failed to parse config: {0}")]
    ConfigParse(String),
}

/// Result type using engine errors
pub type LdfResult<T> = Result<T, LdfError>;

impl LdfError {
    /// Create an invalid configuration error for a named field
    pub fn invalid_config(field: &str, reason: &str) -> Self {
        Self::InvalidConfig(format!("{}: {}", field, reason))
    }

    /// Whether the error is an authorization failure
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::UntrustedCaller { .. } | Self::ForeignExecutionContext | Self::NotPoolOwner { .. }
        )
    }
}

impl From<std::io::Error> for LdfError {
    fn from(err: std::io::Error) -> Self {
        LdfError::ConfigIo(err.to_string())
    }
}

impl From<toml::de::Error> for LdfError {
    fn from(err: toml::de::Error) -> Self {
        LdfError::ConfigParse(err.to_string())
    }
}

impl From<toml::ser::Error> for LdfError {
    fn from(err: toml::ser::Error) -> Self {
        LdfError::ConfigParse(err.to_string())
    }
}
