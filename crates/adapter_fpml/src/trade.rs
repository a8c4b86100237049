//! Trade envelope: header, counterparties, payload and collateral.

use std::fmt;
use std::str::FromStr;

use pricer_core::types::{BusinessCenter, BusinessDayConvention, Currency, Date};

use crate::error::FpmlError;
use crate::product::Product;
use crate::properties::{keys, TradeProperties};
use crate::types::{ProductType, TradeType};

/// Reference to one of the two counterparties of a trade.
///
/// Payloads name payers, receivers, buyers and sellers by role, never by
/// party name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PartyRole {
    /// First counterparty.
    Party1,
    /// Second counterparty.
    Party2,
}

impl PartyRole {
    /// The other counterparty.
    #[inline]
    pub fn other(&self) -> PartyRole {
        match self {
            PartyRole::Party1 => PartyRole::Party2,
            PartyRole::Party2 => PartyRole::Party1,
        }
    }

    /// Position in the ordered party pair.
    #[inline]
    pub fn index(&self) -> usize {
        match self {
            PartyRole::Party1 => 0,
            PartyRole::Party2 => 1,
        }
    }

    /// Role identifier, `"Party1"` or `"Party2"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            PartyRole::Party1 => "Party1",
            PartyRole::Party2 => "Party2",
        }
    }
}

impl FromStr for PartyRole {
    type Err = FpmlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("party1") {
            Ok(PartyRole::Party1)
        } else if trimmed.eq_ignore_ascii_case("party2") {
            Ok(PartyRole::Party2)
        } else {
            Err(FpmlError::UnknownCode {
                kind: "party role",
                value: s.to_string(),
            })
        }
    }
}

impl fmt::Display for PartyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Amount in a currency.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Money {
    /// Amount
    pub amount: f64,
    /// Currency of the amount
    pub currency: Currency,
}

impl Money {
    /// Creates an amount.
    pub fn new(amount: f64, currency: Currency) -> Self {
        Self { amount, currency }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dp = self.currency.decimal_places() as usize;
        write!(f, "{} {:.*}", self.currency, dp, self.amount)
    }
}

/// Rolling rule and the business centres whose holidays apply.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BusinessDayAdjustments {
    /// Rolling rule
    pub convention: BusinessDayConvention,
    /// Business centres, e.g. `USNY`
    pub business_centers: Vec<BusinessCenter>,
}

impl BusinessDayAdjustments {
    /// Creates an adjustment clause.
    pub fn new(convention: BusinessDayConvention, business_centers: Vec<BusinessCenter>) -> Self {
        Self {
            convention,
            business_centers,
        }
    }
}

/// Unadjusted date with an optional adjustment clause.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdjustableDate {
    /// Date before business day adjustment
    pub unadjusted_date: Date,
    /// How to adjust it, if at all
    pub adjustments: Option<BusinessDayAdjustments>,
}

impl AdjustableDate {
    /// A date with no adjustment clause.
    pub fn unadjusted(date: Date) -> Self {
        Self {
            unadjusted_date: date,
            adjustments: None,
        }
    }

    /// A date adjusted under `adjustments`.
    pub fn adjusted(date: Date, adjustments: BusinessDayAdjustments) -> Self {
        Self {
            unadjusted_date: date,
            adjustments: Some(adjustments),
        }
    }
}

/// Named counterparty.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Party {
    /// Party identifier within the trade document
    pub id: String,
    /// Legal or short name
    pub name: String,
}

impl Party {
    /// Creates a party.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Trade header.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TradeHeader {
    /// Identifier assigned by the booking system
    pub trade_id: String,
    /// Trade date, when known
    pub trade_date: Option<Date>,
}

/// Collateral agreement covering the trade.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollateralTerms {
    /// Independent amount posted, if any
    pub independent_amount: Option<Money>,
    /// Currency collateral is posted in
    pub currency: Currency,
}

/// FpML trade: header, two counterparties, one product payload and optional collateral.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trade {
    /// Trade header
    pub header: TradeHeader,
    /// Counterparties in declaration order
    pub parties: [Party; 2],
    /// Product payload
    pub product: Product,
    /// Collateral terms
    pub collateral: Option<CollateralTerms>,
}

impl Trade {
    /// Creates an uncollateralised trade.
    pub fn new(header: TradeHeader, parties: [Party; 2], product: Product) -> Self {
        Self {
            header,
            parties,
            product,
            collateral: None,
        }
    }

    /// Attaches collateral terms.
    pub fn with_collateral(mut self, collateral: CollateralTerms) -> Self {
        self.collateral = Some(collateral);
        self
    }

    /// Legacy discriminant: the payload element name.
    #[inline]
    pub fn trade_type(&self) -> TradeType {
        self.product.trade_type()
    }

    /// Returns `true` when collateral terms are present.
    #[inline]
    pub fn is_collateralised(&self) -> bool {
        self.collateral.is_some()
    }
}

/// Identity of a trade for pricing and reporting.
///
/// Built from the property bag, falling back to the header for the id and
/// trade date.
///
/// ```
/// use adapter_fpml::{keys, ProductType, TradeHeader, TradeIdentifier, TradeProperties};
///
/// let header = TradeHeader { trade_id: "H-1".into(), trade_date: None };
/// let props = TradeProperties::new()
///     .with(keys::TRADE_ID, "T-42")
///     .with(keys::SOURCE, "Murex")
///     .with(keys::PRODUCT_TYPE, "FRA");
///
/// let id = TradeIdentifier::from_properties(&props, &header).unwrap();
/// assert_eq!(id.unique_identifier(), "Murex.T-42");
/// assert_eq!(id.product_type, Some(ProductType::FRA));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TradeIdentifier {
    /// Trade id
    pub id: String,
    /// Source system, when supplied
    pub source: Option<String>,
    /// Explicit product classification, when supplied
    pub product_type: Option<ProductType>,
    /// Trade date, when supplied
    pub trade_date: Option<Date>,
}

impl TradeIdentifier {
    /// Reads the identifier out of `props`, using `header` as a fallback.
    ///
    /// # Errors
    ///
    /// `PropertyError::InvalidValue` if the product type or trade date do not parse.
    pub fn from_properties(
        props: &TradeProperties,
        header: &TradeHeader,
    ) -> Result<Self, crate::PropertyError> {
        let id = props
            .get_str(keys::TRADE_ID)
            .unwrap_or(header.trade_id.as_str())
            .to_string();
        let source = props.get_str(keys::SOURCE).map(str::to_string);
        let product_type = props.get_parsed::<ProductType>(keys::PRODUCT_TYPE)?;
        let trade_date = props.get_date(keys::TRADE_DATE)?.or(header.trade_date);
        Ok(Self {
            id,
            source,
            product_type,
            trade_date,
        })
    }

    /// `source.id`, or the bare id when no source is known.
    pub fn unique_identifier(&self) -> String {
        match &self.source {
            Some(source) => format!("{}.{}", source, self.id),
            None => self.id.clone(),
        }
    }
}

impl fmt::Display for TradeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.unique_identifier())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_party_role_parse() {
        assert_eq!("PARTY2".parse::<PartyRole>().unwrap(), PartyRole::Party2);
        assert!("BankA".parse::<PartyRole>().is_err());
        assert_eq!(PartyRole::Party1.other(), PartyRole::Party2);
        assert_eq!(PartyRole::Party2.index(), 1);
    }

    #[test]
    fn test_money_display_uses_minor_units() {
        assert_eq!(Money::new(1234.5, Currency::USD).to_string(), "USD 1234.50");
        assert_eq!(Money::new(1234.25, Currency::JPY).to_string(), "JPY 1234");
    }

    #[test]
    fn test_identifier_falls_back_to_header() {
        let date = Date::from_ymd(2024, 11, 1).unwrap();
        let header = TradeHeader {
            trade_id: "HDR-9".to_string(),
            trade_date: Some(date),
        };
        let id = TradeIdentifier::from_properties(&TradeProperties::new(), &header).unwrap();
        assert_eq!(id.id, "HDR-9");
        assert_eq!(id.trade_date, Some(date));
        assert_eq!(id.product_type, None);
        assert_eq!(id.unique_identifier(), "HDR-9");
    }

    #[test]
    fn test_identifier_rejects_bad_product_type() {
        let header = TradeHeader {
            trade_id: "X".to_string(),
            trade_date: None,
        };
        let props = TradeProperties::new().with(keys::PRODUCT_TYPE, "Spaceship");
        assert!(TradeIdentifier::from_properties(&props, &header).is_err());
    }
}
