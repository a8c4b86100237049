//! Trade property bag.
//!
//! Trade metadata travels beside the FpML payload as string key/value pairs.
//! [`TradeProperties`] stores them and offers typed, required-or-optional
//! getters; [`keys`] names the well-known entries.

use std::collections::BTreeMap;
use std::str::FromStr;

use pricer_core::types::Date;

use crate::error::PropertyError;

/// Well-known property keys.
pub mod keys {
    /// Unique trade identifier.
    pub const TRADE_ID: &str = "TradeId";
    /// System or book the trade came from.
    pub const SOURCE: &str = "TradeSource";
    /// Trade date, `YYYY-MM-DD`.
    pub const TRADE_DATE: &str = "TradeDate";
    /// Effective (settlement) date, `YYYY-MM-DD`.
    pub const EFFECTIVE_DATE: &str = "EffectiveDate";
    /// Party from whose standpoint the trade is booked.
    pub const BASE_PARTY: &str = "BaseParty";
    /// Name of the first counterparty.
    pub const PARTY1: &str = "Party1";
    /// Name of the second counterparty.
    pub const PARTY2: &str = "Party2";
    /// Explicit product classification.
    pub const PRODUCT_TYPE: &str = "ProductType";
    /// Reference property of a property transaction.
    pub const PROPERTY_IDENTIFIER: &str = "PropertyIdentifier";
    /// Reference lease of a lease transaction.
    pub const LEASE_IDENTIFIER: &str = "LeaseIdentifier";
    /// Reference equity of an equity transaction.
    pub const REFERENCE_EQUITY: &str = "ReferenceEquity";
    /// Bond classification of a bond transaction.
    pub const BOND_TYPE: &str = "BondType";
    /// Futures contract class of a future transaction.
    pub const FUTURES_TYPE: &str = "FuturesType";
}

/// Immutable-by-convention string property bag.
///
/// Keys are case sensitive. Blank values count as absent.
///
/// # Examples
///
/// ```
/// use adapter_fpml::{keys, TradeProperties};
/// use pricer_core::types::Date;
///
/// let props = TradeProperties::new()
///     .with(keys::PARTY1, "BankA")
///     .with(keys::TRADE_DATE, "2025-03-14");
///
/// assert_eq!(props.require_str(keys::PARTY1).unwrap(), "BankA");
/// assert_eq!(props.get_date(keys::TRADE_DATE).unwrap(), Some(Date::from_ymd(2025, 3, 14).unwrap()));
/// assert_eq!(props.get_str(keys::BOND_TYPE), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TradeProperties {
    values: BTreeMap<String, String>,
}

impl TradeProperties {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the bag with `key` set to `value`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Sets `key` to `value`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when the bag is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Optional string value, trimmed; blank is `None`.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Required string value.
    pub fn require_str(&self, key: &str) -> Result<&str, PropertyError> {
        self.get_str(key)
            .ok_or_else(|| PropertyError::Missing(key.to_string()))
    }

    /// Optional value parsed with `FromStr`.
    pub fn get_parsed<T>(&self, key: &str) -> Result<Option<T>, PropertyError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get_str(key) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<T>()
                .map(Some)
                .map_err(|e| PropertyError::InvalidValue {
                    key: key.to_string(),
                    value: raw.to_string(),
                    reason: e.to_string(),
                }),
        }
    }

    /// Required value parsed with `FromStr`.
    pub fn require_parsed<T>(&self, key: &str) -> Result<T, PropertyError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get_parsed(key)?
            .ok_or_else(|| PropertyError::Missing(key.to_string()))
    }

    /// Optional ISO date.
    pub fn get_date(&self, key: &str) -> Result<Option<Date>, PropertyError> {
        self.get_parsed::<Date>(key)
    }

    /// Required ISO date.
    pub fn require_date(&self, key: &str) -> Result<Date, PropertyError> {
        self.require_parsed::<Date>(key)
    }
}

impl<K, V> FromIterator<(K, V)> for TradeProperties
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExchangeContractType;

    #[test]
    fn test_blank_value_is_missing() {
        let props = TradeProperties::new().with(keys::PARTY2, "   ");
        assert_eq!(props.get_str(keys::PARTY2), None);
        assert_eq!(
            props.require_str(keys::PARTY2),
            Err(PropertyError::Missing("Party2".to_string()))
        );
    }

    #[test]
    fn test_invalid_date() {
        let props = TradeProperties::new().with(keys::EFFECTIVE_DATE, "2025-13-01");
        match props.require_date(keys::EFFECTIVE_DATE) {
            Err(PropertyError::InvalidValue { key, value, .. }) => {
                assert_eq!(key, "EffectiveDate");
                assert_eq!(value, "2025-13-01");
            }
            other => panic!("Expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_parsed_enum() {
        let props = TradeProperties::new().with(keys::FUTURES_TYPE, "bondfuture");
        let parsed: ExchangeContractType = props.require_parsed(keys::FUTURES_TYPE).unwrap();
        assert_eq!(parsed, ExchangeContractType::BondFuture);
    }

    #[test]
    fn test_from_iterator_and_iter_order() {
        let props: TradeProperties = [("b", "2"), ("a", "1")].into_iter().collect();
        let keys: Vec<_> = props.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(props.len(), 2);
    }
}
