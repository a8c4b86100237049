//! Forward rate agreement, settled at the start of the accrual period.

use adapter_fpml::{Fra, Product, TradeType};
use pricer_core::market_data::MarketEnvironment;
use pricer_core::types::{BusinessDayConvention, Currency, Date};

use super::schedule;
use super::{forward_rate, CashflowKind, CashflowRow, PricerCommon, PricerKind, ProductPricer};
use crate::error::ValuationError;
use crate::factory::BuildInput;

#[derive(Debug, Clone)]
pub(crate) struct FraPricer {
    pub payload: Fra,
    /// Effective date rolled back onto the fixing calendar
    pub fixing_date: Date,
    pub payment_date: Date,
}

impl FraPricer {
    pub(crate) fn build(input: &BuildInput<'_>) -> Result<PricerKind, ValuationError> {
        let Product::Fra(payload) = &input.trade.product else {
            return Err(input.mismatch(TradeType::Fra));
        };
        let fixing_date = schedule::adjust(
            input.fixing_calendar().as_deref(),
            payload.adjusted_effective_date,
            BusinessDayConvention::Preceding,
        )?;
        let payment_date = input.adjust(
            input.payment_calendar().as_ref(),
            &payload.payment_date,
            BusinessDayConvention::Following,
        )?;
        Ok(PricerKind::Fra(FraPricer {
            payload: payload.clone(),
            fixing_date,
            payment_date,
        }))
    }

    fn year_fraction(&self) -> f64 {
        self.payload.day_count.year_fraction_dates(
            self.payload.adjusted_effective_date,
            self.payload.adjusted_termination_date,
        )
    }

    fn forward(
        &self,
        common: &PricerCommon,
        valuation_date: Date,
        market: &dyn MarketEnvironment,
    ) -> Result<Option<f64>, ValuationError> {
        let fra = &self.payload;
        let curve = common.projection_curve(market, &fra.index, fra.notional.currency)?;
        forward_rate(
            curve,
            valuation_date,
            fra.adjusted_effective_date,
            fra.adjusted_termination_date,
            fra.day_count,
        )
    }
}

impl ProductPricer for FraPricer {
    fn payment_currencies(&self) -> Vec<Currency> {
        vec![self.payload.notional.currency]
    }

    fn expected_cashflows(
        &self,
        common: &PricerCommon,
        valuation_date: Date,
        market: &dyn MarketEnvironment,
    ) -> Result<Vec<CashflowRow>, ValuationError> {
        let fra = &self.payload;
        let tau = self.year_fraction();
        let forward = self.forward(common, valuation_date, market)?;
        let amount = forward.map_or(0.0, |f| {
            common.sign_received_by(fra.buyer) * fra.notional.amount * (f - fra.fixed_rate) * tau
                / (1.0 + f * tau)
        });
        let row = CashflowRow::new(
            "FRA",
            CashflowKind::FloatingCoupon,
            fra.notional.currency,
            self.payment_date,
            amount,
        )
        .with_notional(fra.notional.amount)
        .with_rate(forward)
        .with_accrual(fra.adjusted_effective_date, fra.adjusted_termination_date, tau)
        .discounted_settlement();
        Ok(vec![row.discount(valuation_date, market)?])
    }

    fn implied_quote(
        &self,
        common: &PricerCommon,
        valuation_date: Date,
        market: &dyn MarketEnvironment,
    ) -> Result<Option<f64>, ValuationError> {
        self.forward(common, valuation_date, market)
    }

    fn has_implied_quote(&self) -> bool {
        true
    }

    fn build_the_product(&self) -> Product {
        Product::Fra(self.payload.clone())
    }
}
