//! Market data error types.

use crate::types::Currency;
use thiserror::Error;

/// Market data lookup and construction errors.
///
/// # Examples
///
/// ```
/// use pricer_core::market_data::MarketDataError;
/// use pricer_core::types::Currency;
///
/// let err = MarketDataError::MissingDiscountCurve(Currency::AUD);
/// assert_eq!(format!("{}", err), "No discount curve for AUD");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketDataError {
    /// Invalid maturity (negative time).
    #[error("Invalid maturity: t = {t}")]
    InvalidMaturity {
        /// The invalid maturity value
        t: f64,
    },

    /// No discount curve registered for the currency.
    #[error("No discount curve for {0}")]
    MissingDiscountCurve(Currency),

    /// No forecast curve registered for the rate index.
    #[error("No forecast curve for index {0}")]
    MissingForecastCurve(String),

    /// No FX rate, direct, inverse or via USD, between the currencies.
    #[error("No FX rate for {from}/{to}")]
    MissingFxRate {
        /// Base currency
        from: Currency,
        /// Quote currency
        to: Currency,
    },

    /// No price quoted for the asset identifier.
    #[error("No price for asset {0}")]
    MissingAssetPrice(String),

    /// No volatility quoted for the key.
    #[error("No volatility for {0}")]
    MissingVolatility(String),

    /// Quoted value is not usable (non-finite, or non-positive where required).
    #[error("Invalid quote for {key}: {value}")]
    InvalidQuote {
        /// Lookup key of the quote
        key: String,
        /// The rejected value
        value: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fx_display() {
        let err = MarketDataError::MissingFxRate {
            from: Currency::EUR,
            to: Currency::JPY,
        };
        assert_eq!(format!("{}", err), "No FX rate for EUR/JPY");
    }

    #[test]
    fn test_invalid_quote_display() {
        let err = MarketDataError::InvalidQuote {
            key: "BHP.AX".to_string(),
            value: -1.0,
        };
        assert_eq!(format!("{}", err), "Invalid quote for BHP.AX: -1");
    }

    #[test]
    fn test_error_trait_implementation() {
        let err = MarketDataError::MissingForecastCurve("AUD-BBSW-3M".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
