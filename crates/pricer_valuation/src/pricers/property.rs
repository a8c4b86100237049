//! Property purchase.

use adapter_fpml::{Product, PropertyTransaction, TradeType};
use pricer_core::market_data::MarketEnvironment;
use pricer_core::types::{BusinessDayConvention, Currency, Date};

use super::{CashflowKind, CashflowRow, PricerCommon, PricerKind, ProductPricer};
use crate::error::ValuationError;
use crate::factory::BuildInput;

/// Buyer pays the purchase price and receives a property valued at its
/// market price on the settlement date.
#[derive(Debug, Clone)]
pub(crate) struct PropertyPricer {
    pub payload: PropertyTransaction,
    /// Market data key of the property value
    pub property_key: String,
    pub trade_date: Option<Date>,
    pub settlement_date: Date,
}

impl PropertyPricer {
    pub(crate) fn build(input: &BuildInput<'_>) -> Result<PricerKind, ValuationError> {
        let Product::PropertyTransaction(payload) = &input.trade.product else {
            return Err(input.mismatch(TradeType::PropertyTransaction));
        };
        let settlement_date = input.adjust(
            input.settlement_calendar().as_ref(),
            &payload.payment_date,
            BusinessDayConvention::Following,
        )?;
        Ok(PricerKind::PropertyTransaction(PropertyPricer {
            property_key: input
                .fields
                .reference
                .clone()
                .unwrap_or_else(|| payload.property_id.clone()),
            payload: payload.clone(),
            trade_date: input.fields.trade_date,
            settlement_date,
        }))
    }
}

impl ProductPricer for PropertyPricer {
    fn payment_currencies(&self) -> Vec<Currency> {
        vec![self.payload.purchase_price.currency]
    }

    fn expected_cashflows(
        &self,
        common: &PricerCommon,
        valuation_date: Date,
        market: &dyn MarketEnvironment,
    ) -> Result<Vec<CashflowRow>, ValuationError> {
        let price = self.payload.purchase_price;
        let value = market.asset_price(&self.property_key)?;
        let payment = CashflowRow::new(
            "Purchase",
            CashflowKind::Payment,
            price.currency,
            self.settlement_date,
            common.sign_received_by(self.payload.seller) * price.amount,
        );
        let delivery = CashflowRow::new(
            "Property",
            CashflowKind::Delivery,
            price.currency,
            self.settlement_date,
            common.sign_received_by(self.payload.buyer) * value,
        );
        vec![payment, delivery]
            .into_iter()
            .map(|row| row.discount(valuation_date, market))
            .collect()
    }

    fn implied_quote(
        &self,
        _common: &PricerCommon,
        _valuation_date: Date,
        market: &dyn MarketEnvironment,
    ) -> Result<Option<f64>, ValuationError> {
        Ok(Some(market.asset_price(&self.property_key)?))
    }

    fn has_implied_quote(&self) -> bool {
        true
    }

    fn build_the_product(&self) -> Product {
        Product::PropertyTransaction(self.payload.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use adapter_fpml::{AdjustableDate, Money, PartyRole, ProductType};
    use approx::assert_relative_eq;

    fn pricer() -> PropertyPricer {
        let payload = PropertyTransaction {
            property_id: "PROP-1".to_string(),
            buyer: PartyRole::Party1,
            seller: PartyRole::Party2,
            purchase_price: Money::new(2_000_000.0, Currency::AUD),
            payment_date: AdjustableDate::unadjusted(d(2026, 1, 1)),
        };
        PropertyPricer {
            property_key: "PROP-1".to_string(),
            settlement_date: payload.payment_date.unadjusted_date,
            trade_date: None,
            payload,
        }
    }

    #[test]
    fn test_buyer_gains_value_over_price() {
        let market = flat_market(0.0).with_asset_price("PROP-1", 2_100_000.0);
        let rows = pricer()
            .expected_cashflows(
                &common(ProductType::PropertyTransaction, PartyRole::Party1),
                d(2025, 1, 1),
                &market,
            )
            .unwrap();
        assert_relative_eq!(total_pv(&rows), 100_000.0, epsilon = 1e-6);

        let rows = pricer()
            .expected_cashflows(
                &common(ProductType::PropertyTransaction, PartyRole::Party2),
                d(2025, 1, 1),
                &market,
            )
            .unwrap();
        assert_relative_eq!(total_pv(&rows), -100_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_missing_property_value() {
        let result = pricer().expected_cashflows(
            &common(ProductType::PropertyTransaction, PartyRole::Party1),
            d(2025, 1, 1),
            &flat_market(0.0),
        );
        assert!(matches!(result, Err(ValuationError::MarketData(_))));
    }
}
