//! Exchange traded futures position, marked to market.

use adapter_fpml::{ExchangeContractType, FutureTransaction, Product, TradeType};
use pricer_core::market_data::MarketEnvironment;
use pricer_core::types::{Currency, Date};

use super::{CashflowKind, CashflowRow, PricerCommon, PricerKind, ProductPricer};
use crate::error::ValuationError;
use crate::factory::BuildInput;

#[derive(Debug, Clone)]
pub(crate) struct FuturePricer {
    pub payload: FutureTransaction,
    pub futures_type: ExchangeContractType,
    pub trade_date: Option<Date>,
}

impl FuturePricer {
    pub(crate) fn build(input: &BuildInput<'_>) -> Result<PricerKind, ValuationError> {
        let Product::FutureTransaction(payload) = &input.trade.product else {
            return Err(input.mismatch(TradeType::FutureTransaction));
        };
        let futures_type = input.fields.futures_type.ok_or_else(|| {
            ValuationError::MissingProperty(adapter_fpml::keys::FUTURES_TYPE.to_string())
        })?;
        Ok(PricerKind::FutureTransaction(FuturePricer {
            payload: payload.clone(),
            futures_type,
            trade_date: input.fields.trade_date,
        }))
    }

    /// Variation margin owed to the buyer at `market_price`.
    fn variation_margin(&self, market_price: f64) -> f64 {
        let f = &self.payload;
        (market_price - f.trade_price) * f.point_value * f.number_of_contracts
    }
}

impl ProductPricer for FuturePricer {
    fn payment_currencies(&self) -> Vec<Currency> {
        vec![self.payload.currency]
    }

    /// One margin flow on the valuation date, realised once the contract has
    /// stopped trading.
    fn expected_cashflows(
        &self,
        common: &PricerCommon,
        valuation_date: Date,
        market: &dyn MarketEnvironment,
    ) -> Result<Vec<CashflowRow>, ValuationError> {
        let f = &self.payload;
        let price = market.asset_price(&f.contract_code)?;
        let settlement_date = valuation_date.min(f.last_trading_date);
        let row = CashflowRow::new(
            "Margin",
            CashflowKind::Settlement,
            f.currency,
            settlement_date,
            common.sign_received_by(f.buyer) * self.variation_margin(price),
        )
        .with_notional(f.number_of_contracts * f.point_value)
        .with_rate(Some(price));
        Ok(vec![row.discount(valuation_date, market)?])
    }

    fn implied_quote(
        &self,
        _common: &PricerCommon,
        _valuation_date: Date,
        market: &dyn MarketEnvironment,
    ) -> Result<Option<f64>, ValuationError> {
        Ok(Some(market.asset_price(&self.payload.contract_code)?))
    }

    fn has_implied_quote(&self) -> bool {
        true
    }

    fn build_the_product(&self) -> Product {
        Product::FutureTransaction(self.payload.clone())
    }
}
