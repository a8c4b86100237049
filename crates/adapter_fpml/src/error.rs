//! Error types for the trade model.

use thiserror::Error;

/// Errors raised while reading coded values of the trade model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FpmlError {
    /// A code did not match any member of its closed set.
    #[error("Unknown {kind}: {value}")]
    UnknownCode {
        /// Name of the code set (e.g. "product type")
        kind: &'static str,
        /// The rejected text
        value: String,
    },
}

/// Errors raised when reading values out of [`TradeProperties`](crate::TradeProperties).
///
/// # Examples
///
/// ```
/// use adapter_fpml::{PropertyError, TradeProperties};
///
/// let props = TradeProperties::new();
/// match props.require_str("Party1") {
///     Err(PropertyError::Missing(key)) => assert_eq!(key, "Party1"),
///     other => panic!("unexpected {:?}", other),
/// }
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PropertyError {
    /// A required key is absent (or blank).
    #[error("Missing required property: {0}")]
    Missing(String),

    /// A key is present but its value does not parse.
    #[error("Invalid value for property {key}: {value} ({reason})")]
    InvalidValue {
        /// Property key
        key: String,
        /// Raw value
        value: String,
        /// Parser message
        reason: String,
    },
}
