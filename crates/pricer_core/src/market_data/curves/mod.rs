//! Yield curves used for discounting and rate projection.
//!
//! This module provides:
//! - [`YieldCurve`]: Generic trait for discount factor and rate calculations
//! - [`FlatCurve`]: Constant rate curve

mod flat;
mod traits;

pub use flat::FlatCurve;
pub use traits::YieldCurve;
