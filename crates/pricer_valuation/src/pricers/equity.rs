//! Share purchase.

use adapter_fpml::{EquityTransaction, Product, TradeType};
use pricer_core::market_data::MarketEnvironment;
use pricer_core::types::{BusinessDayConvention, Currency, Date};

use super::schedule;
use super::{CashflowKind, CashflowRow, PricerCommon, PricerKind, ProductPricer};
use crate::error::ValuationError;
use crate::factory::BuildInput;

#[derive(Debug, Clone)]
pub(crate) struct EquityPricer {
    pub payload: EquityTransaction,
    /// Market data key of the share price
    pub equity_key: String,
    pub trade_date: Option<Date>,
    pub effective_date: Date,
    pub settlement_date: Date,
}

impl EquityPricer {
    pub(crate) fn build(input: &BuildInput<'_>) -> Result<PricerKind, ValuationError> {
        let Product::EquityTransaction(payload) = &input.trade.product else {
            return Err(input.mismatch(TradeType::EquityTransaction));
        };
        let effective_date = input.effective_date()?;
        let settlement_date = schedule::adjust(
            input.settlement_calendar().as_deref(),
            effective_date,
            BusinessDayConvention::Following,
        )?;
        Ok(PricerKind::EquityTransaction(EquityPricer {
            equity_key: input
                .fields
                .reference
                .clone()
                .unwrap_or_else(|| payload.equity_id.clone()),
            payload: payload.clone(),
            trade_date: input.fields.trade_date,
            effective_date,
            settlement_date,
        }))
    }

    fn consideration(&self) -> f64 {
        self.payload.number_of_units * self.payload.unit_price.amount
    }
}

impl ProductPricer for EquityPricer {
    fn payment_currencies(&self) -> Vec<Currency> {
        vec![self.payload.unit_price.currency]
    }

    fn expected_cashflows(
        &self,
        common: &PricerCommon,
        valuation_date: Date,
        market: &dyn MarketEnvironment,
    ) -> Result<Vec<CashflowRow>, ValuationError> {
        let currency = self.payload.unit_price.currency;
        let units = self.payload.number_of_units;
        let price = market.asset_price(&self.equity_key)?;
        let rows = [
            CashflowRow::new(
                "Consideration",
                CashflowKind::Payment,
                currency,
                self.settlement_date,
                common.sign_received_by(self.payload.seller) * self.consideration(),
            )
            .with_rate(Some(self.payload.unit_price.amount)),
            CashflowRow::new(
                "Shares",
                CashflowKind::Delivery,
                currency,
                self.settlement_date,
                common.sign_received_by(self.payload.buyer) * units * price,
            )
            .with_rate(Some(price)),
        ];
        rows.into_iter()
            .map(|row| row.with_notional(units).discount(valuation_date, market))
            .collect()
    }

    fn implied_quote(
        &self,
        _common: &PricerCommon,
        _valuation_date: Date,
        market: &dyn MarketEnvironment,
    ) -> Result<Option<f64>, ValuationError> {
        Ok(Some(market.asset_price(&self.equity_key)?))
    }

    fn has_implied_quote(&self) -> bool {
        true
    }

    fn build_the_product(&self) -> Product {
        Product::EquityTransaction(self.payload.clone())
    }
}
