//! Error types for structured error handling.
//!
//! This module provides:
//! - `DateError`: Errors from date construction, parsing and shifting
//! - `CurrencyError`: Errors from currency parsing
//! - `CalendarError`: Errors from business centre parsing and calendar resolution

use thiserror::Error;

/// Date-related errors.
///
/// # Examples
/// ```
/// use pricer_core::types::DateError;
///
/// let err = DateError::InvalidDate { year: 2024, month: 2, day: 30 };
/// assert_eq!(format!("{}", err), "Invalid date: 2024-2-30");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// Invalid date components (e.g., February 30th).
    #[error("Invalid date: {year}-{month}-{day}")]
    InvalidDate {
        /// Year component
        year: i32,
        /// Month component (1-12)
        month: u32,
        /// Day component (1-31)
        day: u32,
    },

    /// Failed to parse date string.
    #[error("Date parse error: {0}")]
    ParseError(String),

    /// Date shift left the representable range.
    #[error("Date overflow: {0}")]
    Overflow(String),
}

/// Currency-related errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CurrencyError {
    /// Unknown currency code.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),
}

/// Business calendar errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    /// Business centre code is not a four-letter FpML code.
    #[error("Invalid business centre code: {0}")]
    InvalidBusinessCenter(String),

    /// No calendar is known for the requested business centre.
    #[error("No calendar available for business centre: {0}")]
    UnknownBusinessCenter(String),

    /// Rolling found no business day within the search window.
    #[error("No business day found: {0}")]
    NoBusinessDay(String),

    /// A calendar was requested for an empty set of business centres.
    #[error("No business centres supplied")]
    NoBusinessCenters,

    /// Date adjustment failed.
    #[error("Calendar date error: {0}")]
    Date(#[from] DateError),
}
