//! Trade classification.
//!
//! A trade is classified once, before any pricer exists. Two inputs are
//! consulted in order:
//!
//! 1. the explicit `ProductType` property, authoritative unless `Undefined`;
//! 2. the payload discriminant ([`TradeType`]), mapped through the legacy table.

use std::fmt;

use adapter_fpml::{ProductType, TradeType};
use tracing::debug;

use crate::error::ValuationError;
use crate::factory::table;

/// Which input decided the product type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ClassificationPath {
    /// The explicit `ProductType` property.
    Explicit,
    /// The payload discriminant.
    Legacy,
}

impl fmt::Display for ClassificationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassificationPath::Explicit => f.write_str("explicit"),
            ClassificationPath::Legacy => f.write_str("legacy"),
        }
    }
}

/// Result of classifying a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Resolved product type, never `Undefined`
    pub product_type: ProductType,
    /// Input that decided it
    pub path: ClassificationPath,
}

/// Maps trade discriminants to a [`ProductType`].
///
/// # Examples
///
/// ```
/// use adapter_fpml::{ProductType, TradeType};
/// use pricer_valuation::{ClassificationPath, TradeClassifier};
///
/// let c = TradeClassifier::classify(None, TradeType::FxSingleLeg).unwrap();
/// assert_eq!(c.product_type, ProductType::FxSpot);
/// assert_eq!(c.path, ClassificationPath::Legacy);
///
/// let c = TradeClassifier::classify(Some(ProductType::FxForward), TradeType::FxSingleLeg).unwrap();
/// assert_eq!(c.product_type, ProductType::FxForward);
/// assert_eq!(c.path, ClassificationPath::Explicit);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TradeClassifier;

impl TradeClassifier {
    /// Classifies a trade.
    ///
    /// # Errors
    ///
    /// `UnsupportedProductType` when the explicit tag is absent or `Undefined`
    /// and the payload discriminant has no legacy mapping.
    pub fn classify(
        explicit: Option<ProductType>,
        trade_type: TradeType,
    ) -> Result<Classification, ValuationError> {
        let classification = match explicit {
            Some(product_type) if !product_type.is_undefined() => Classification {
                product_type,
                path: ClassificationPath::Explicit,
            },
            _ => Classification {
                product_type: Self::legacy_product_type(trade_type)?,
                path: ClassificationPath::Legacy,
            },
        };

        debug!(
            product_type = %classification.product_type,
            trade_type = %trade_type,
            path = %classification.path,
            "Classified trade"
        );
        Ok(classification)
    }

    /// Legacy mapping of a payload discriminant.
    ///
    /// # Errors
    ///
    /// `UnsupportedProductType` carrying the discriminant when it has no mapping.
    pub fn legacy_product_type(trade_type: TradeType) -> Result<ProductType, ValuationError> {
        table::legacy_product_type(trade_type)
            .ok_or_else(|| ValuationError::UnsupportedProductType(trade_type.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_tag_is_authoritative() {
        let c = TradeClassifier::classify(Some(ProductType::CrossCurrencySwap), TradeType::Swap)
            .unwrap();
        assert_eq!(c.product_type, ProductType::CrossCurrencySwap);
        assert_eq!(c.path, ClassificationPath::Explicit);
    }

    #[test]
    fn test_undefined_tag_falls_back_to_legacy() {
        let c = TradeClassifier::classify(Some(ProductType::Undefined), TradeType::Swap).unwrap();
        assert_eq!(c.product_type, ProductType::InterestRateSwap);
        assert_eq!(c.path, ClassificationPath::Legacy);
    }

    #[test]
    fn test_legacy_mapping() {
        let expected = [
            (TradeType::LeaseTransaction, ProductType::LeaseTransaction),
            (TradeType::PropertyTransaction, ProductType::PropertyTransaction),
            (TradeType::EquityTransaction, ProductType::EquityTransaction),
            (TradeType::BondTransaction, ProductType::BondTransaction),
            (TradeType::FutureTransaction, ProductType::FutureTransaction),
            (TradeType::Swap, ProductType::InterestRateSwap),
            (TradeType::Fra, ProductType::FRA),
            (TradeType::CapFloor, ProductType::CapFloor),
            (TradeType::FxSingleLeg, ProductType::FxSpot),
            (TradeType::FxSwap, ProductType::FxSwap),
            (TradeType::BulletPayment, ProductType::BulletPayment),
            (TradeType::TermDeposit, ProductType::TermDeposit),
            (TradeType::Swaption, ProductType::InterestRateSwaption),
            (TradeType::FxOption, ProductType::FxOption),
        ];
        for (trade_type, product_type) in expected {
            assert_eq!(
                TradeClassifier::legacy_product_type(trade_type).unwrap(),
                product_type,
                "{}",
                trade_type
            );
        }
    }

    #[test]
    fn test_unknown_discriminant_is_rejected() {
        let err = TradeClassifier::classify(None, TradeType::CreditDefaultSwap).unwrap_err();
        assert_eq!(
            err,
            ValuationError::UnsupportedProductType("creditDefaultSwap".to_string())
        );
    }
}
