//! ISO 4217 currency codes used for payments, curves and reporting.
//!
//! ```
//! use pricer_core::types::currency::Currency;
//!
//! let aud: Currency = "aud".parse().unwrap();
//! assert_eq!(aud, Currency::AUD);
//! assert_eq!(Currency::JPY.decimal_places(), 0);
//! ```

use std::fmt;
use std::str::FromStr;

use super::error::CurrencyError;

/// Settlement and reporting currencies.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Currency {
    /// Australian Dollar
    AUD,
    /// Canadian Dollar
    CAD,
    /// Swiss Franc
    CHF,
    /// Euro
    EUR,
    /// British Pound Sterling
    GBP,
    /// Hong Kong Dollar
    HKD,
    /// Japanese Yen
    JPY,
    /// New Zealand Dollar
    NZD,
    /// Singapore Dollar
    SGD,
    /// United States Dollar
    USD,
}

impl Currency {
    /// All supported currencies in code order.
    pub const ALL: [Currency; 10] = [
        Currency::AUD,
        Currency::CAD,
        Currency::CHF,
        Currency::EUR,
        Currency::GBP,
        Currency::HKD,
        Currency::JPY,
        Currency::NZD,
        Currency::SGD,
        Currency::USD,
    ];

    /// Returns the three-letter ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::AUD => "AUD",
            Currency::CAD => "CAD",
            Currency::CHF => "CHF",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::HKD => "HKD",
            Currency::JPY => "JPY",
            Currency::NZD => "NZD",
            Currency::SGD => "SGD",
            Currency::USD => "USD",
        }
    }

    /// Returns the number of minor-unit decimal places.
    pub fn decimal_places(&self) -> u8 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }
}

impl FromStr for Currency {
    type Err = CurrencyError;

    /// Parses an ISO 4217 code, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, CurrencyError> {
        let code = s.trim().to_uppercase();
        Currency::ALL
            .iter()
            .copied()
            .find(|c| c.code() == code)
            .ok_or_else(|| CurrencyError::UnknownCurrency(s.to_string()))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
