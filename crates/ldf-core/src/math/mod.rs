//! # Mathematical Functions
//!
//! X64 fixed-point helpers and tick math used by the base distributions.

pub mod fixed_point;
pub mod tick_math;

pub use fixed_point::*;
pub use tick_math::*;
