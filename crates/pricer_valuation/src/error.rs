//! Valuation error types.

use adapter_fpml::{PropertyError, TradeType};
use pricer_core::market_data::MarketDataError;
use pricer_core::types::{CalendarError, DateError};
use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised while binding or pricing a trade.
///
/// Every variant is fatal for the request that raised it: construction
/// failures mean the trade cannot be priced, pricing failures mean the
/// scenario or configuration is invalid. Nothing is retried or downgraded.
///
/// # Examples
///
/// ```
/// use pricer_valuation::ValuationError;
///
/// let err = ValuationError::MissingProperty("EffectiveDate".to_string());
/// assert_eq!(format!("{}", err), "Missing required property: EffectiveDate");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValuationError {
    /// Neither the explicit product type nor the payload discriminant maps to a pricer.
    #[error("Unsupported product type: {0}")]
    UnsupportedProductType(String),

    /// A required trade property is absent.
    #[error("Missing required property: {0}")]
    MissingProperty(String),

    /// A coded trade property does not parse against its closed set.
    #[error("Invalid value for {field}: {value}")]
    InvalidEnumValue {
        /// Property name
        field: String,
        /// Rejected value
        value: String,
    },

    /// The pricer or the market environment is absent at calculation time.
    #[error("Null prerequisite: {0} is not available")]
    NullPrerequisite(&'static str),

    /// The bound product cannot serve the request.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// The explicit product type names a payload the trade does not carry.
    #[error("Product type {product_type} expects a {expected} payload, found {found}")]
    ProductMismatch {
        /// Explicit product type
        product_type: String,
        /// Payload the product type is priced from
        expected: TradeType,
        /// Payload carried by the trade
        found: TradeType,
    },

    /// The requesting party is neither counterparty, by role or by name.
    #[error("Requesting party {0} is not a counterparty of the trade")]
    UnknownParty(String),

    /// Calendar resolution or date adjustment failed.
    #[error("Calendar error: {0}")]
    Calendar(#[from] CalendarError),

    /// Market data lookup failed.
    #[error("Market data error: {0}")]
    MarketData(#[from] MarketDataError),

    /// Cashflow schedule generation failed.
    #[error("Schedule error: {0}")]
    Schedule(String),

    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl From<PropertyError> for ValuationError {
    fn from(err: PropertyError) -> Self {
        match err {
            PropertyError::Missing(key) => ValuationError::MissingProperty(key),
            PropertyError::InvalidValue { key, value, .. } => ValuationError::InvalidEnumValue {
                field: key,
                value,
            },
        }
    }
}

impl From<DateError> for ValuationError {
    fn from(err: DateError) -> Self {
        ValuationError::Schedule(err.to_string())
    }
}
