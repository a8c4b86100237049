//! European FX option on the notional currency, priced with Black-76 on the
//! outright forward.

use adapter_fpml::{FxOption, Product, TradeType};
use pricer_core::market_data::{year_fraction, MarketEnvironment};
use pricer_core::types::{BusinessDayConvention, Currency, Date};

use super::black::black_price;
use super::cap_floor::premium_row;
use super::fx::outright_forward;
use super::schedule;
use super::{CashflowKind, CashflowRow, PricerCommon, PricerKind, ProductPricer};
use crate::error::ValuationError;
use crate::factory::BuildInput;

#[derive(Debug, Clone)]
pub(crate) struct FxOptionPricer {
    pub payload: FxOption,
    pub expiry_date: Date,
    pub value_date: Date,
    pub premium_date: Option<Date>,
}

impl FxOptionPricer {
    pub(crate) fn build(input: &BuildInput<'_>) -> Result<PricerKind, ValuationError> {
        let Product::FxOption(payload) = &input.trade.product else {
            return Err(input.mismatch(TradeType::FxOption));
        };
        let payment_calendar = input.payment_calendar();
        let expiry_date = schedule::adjust(
            input.fixing_calendar().as_deref(),
            payload.expiry_date,
            BusinessDayConvention::Preceding,
        )?;
        let value_date = schedule::adjust(
            payment_calendar.as_deref(),
            payload.value_date,
            BusinessDayConvention::Following,
        )?;
        let premium_date = payload
            .premium
            .as_ref()
            .map(|p| input.adjust(payment_calendar.as_ref(), &p.payment_date, BusinessDayConvention::Following))
            .transpose()?;
        Ok(PricerKind::FxOption(FxOptionPricer {
            payload: payload.clone(),
            expiry_date,
            value_date,
            premium_date,
        }))
    }

    /// Volatility key of the currency pair, e.g. `AUDUSD`.
    pub(crate) fn pair(&self) -> String {
        format!(
            "{}{}",
            self.payload.notional.currency.code(),
            self.payload.counter_currency.code()
        )
    }

    fn forward(&self, valuation_date: Date, market: &dyn MarketEnvironment) -> Result<f64, ValuationError> {
        outright_forward(
            market,
            self.payload.notional.currency,
            self.payload.counter_currency,
            valuation_date,
            self.value_date,
        )
    }
}

impl ProductPricer for FxOptionPricer {
    fn payment_currencies(&self) -> Vec<Currency> {
        let mut out = vec![self.payload.counter_currency];
        if let Some(premium) = &self.payload.premium {
            if !out.contains(&premium.amount.currency) {
                out.push(premium.amount.currency);
            }
        }
        out
    }

    fn expected_cashflows(
        &self,
        common: &PricerCommon,
        valuation_date: Date,
        market: &dyn MarketEnvironment,
    ) -> Result<Vec<CashflowRow>, ValuationError> {
        let option = &self.payload;
        let forward = self.forward(valuation_date, market)?;
        let expiry = year_fraction(valuation_date, self.expiry_date);
        let vol = if expiry > 0.0 {
            market.volatility(&self.pair())?
        } else {
            0.0
        };
        let unit = black_price(option.option_type, forward, option.strike, vol, expiry);

        let mut rows = vec![CashflowRow::new(
            "Option",
            CashflowKind::OptionPayoff,
            option.counter_currency,
            self.value_date,
            common.sign_received_by(option.buyer) * option.notional.amount * unit,
        )
        .with_notional(option.notional.amount)
        .with_rate(Some(option.strike))];
        if let (Some(premium), Some(date)) = (&option.premium, self.premium_date) {
            rows.push(premium_row(common, premium, date));
        }
        rows.into_iter()
            .map(|row| row.discount(valuation_date, market))
            .collect()
    }

    fn implied_quote(
        &self,
        _common: &PricerCommon,
        valuation_date: Date,
        market: &dyn MarketEnvironment,
    ) -> Result<Option<f64>, ValuationError> {
        self.forward(valuation_date, market).map(Some)
    }

    fn has_implied_quote(&self) -> bool {
        true
    }

    fn build_the_product(&self) -> Product {
        Product::FxOption(self.payload.clone())
    }
}
