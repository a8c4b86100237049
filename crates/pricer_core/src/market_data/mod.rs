//! Market data for trade valuation.
//!
//! # Components
//!
//! - [`curves`]: Yield curve trait and implementations (FlatCurve)
//! - [`environment`]: The [`MarketEnvironment`] lookup trait and [`MarketSnapshot`]
//! - [`error`]: Market data error types (MarketDataError)
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use pricer_core::market_data::{FlatCurve, MarketEnvironment, MarketSnapshot};
//! use pricer_core::types::{Currency, Date};
//!
//! let market = MarketSnapshot::new("EOD")
//!     .with_discount_curve(Currency::USD, Arc::new(FlatCurve::new(0.05)));
//!
//! let today = Date::from_ymd(2025, 1, 1).unwrap();
//! let in_one_year = Date::from_ymd(2026, 1, 1).unwrap();
//! let df = market.discount_factor(Currency::USD, today, in_one_year).unwrap();
//! assert!((df - 0.951229).abs() < 1e-5);
//! ```

pub mod curves;
pub mod environment;
pub mod error;

pub use curves::{FlatCurve, YieldCurve};
pub use environment::{year_fraction, CurveHandle, MarketEnvironment, MarketSnapshot};
pub use error::MarketDataError;
