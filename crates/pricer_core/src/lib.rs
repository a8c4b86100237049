//! # pricer_core: Foundation types for trade valuation
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core is the bottom layer of the workspace, providing:
//! - Time types: `Date`, `DayCountConvention`, `BusinessDayConvention` (`types::time`)
//! - Business centres and calendars: `BusinessCalendar`, `CalendarResolver` (`types::calendar`)
//! - Currency types: `Currency` (`types::currency`)
//! - Market data: `YieldCurve`, `MarketEnvironment`, `MarketSnapshot` (`market_data`)
//! - Error types: `DateError`, `CurrencyError`, `CalendarError`, `MarketDataError`
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other workspace crates, with minimal external dependencies:
//! - num-traits: Generic floating point curve arithmetic
//! - chrono: Date arithmetic
//! - thiserror: Error derivation
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::types::{Currency, Date, DayCountConvention};
//!
//! let start = Date::from_ymd(2024, 1, 1).unwrap();
//! let end = Date::from_ymd(2024, 7, 1).unwrap();
//! let year_fraction = DayCountConvention::ActualActual365.year_fraction_dates(start, end);
//! assert!((year_fraction - 182.0 / 365.0).abs() < 1e-12);
//!
//! let usd = Currency::USD;
//! assert_eq!(usd.code(), "USD");
//! assert_eq!(usd.decimal_places(), 2);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Enable serialisation for dates, currencies, conventions and business centres

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod market_data;
pub mod types;
