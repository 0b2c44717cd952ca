//! # LDF Core - Curated Liquidity Density Engine
//!
//! A liquidity density function (LDF) answers, for any rounded tick, what
//! fraction of a pool's liquidity sits there and how many tokens the buckets
//! on either side hold. This crate lets a pool owner curate that shape:
//!
//! - Parametrized base families (uniform, geometric with carpet, double
//!   geometric with carpet) decoded from packed 32-byte params words
//! - Owner overrides with change detection and a surge signal
//! - Shift modes that keep a dynamic shape's anchor moving in one direction
//! - A minimum-density floor at the spot tick for every accepted update
//! - A guard restricting queries to a fixed set of trusted callers
//!
//! The pool engine, ownership registry and override storage are injected
//! through the traits in [`interfaces`] and [`store`].
//!
//! ## Feature Flags
//!
//! - `client`: Enables borsh serialization of public value types

pub mod codec;
pub mod config;
pub mod constants;
pub mod dispatch;
pub mod distributions;
pub mod engine;
pub mod errors;
pub mod events;
pub mod guard;
pub mod interfaces;
pub mod math;
pub mod shift;
pub mod store;
pub mod types;

// Re-export commonly used items
pub use codec::{DistributionParams, DistributionState, SanitizeTable};
pub use config::EngineConfig;
pub use constants::*;
pub use dispatch::Shape;
pub use distributions::{DensityCurve, DensityQuery, SwapInversion};
pub use engine::{CuratedDistribution, QueryContext, QueryOutput};
pub use errors::{LdfError, LdfResult};
pub use events::ParamsUpdated;
pub use guard::{AccessGuard, CallContext, TrustedCallers};
pub use interfaces::{OwnerRegistry, PoolConfig, PoolEngine};
pub use store::{InMemoryOverrideStore, OverrideStore};
pub use types::*;
