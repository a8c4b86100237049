//! Interest rate, asset and cross currency swaps.

use adapter_fpml::{LegRate, Product, Swap, SwapLeg, TradeType};
use pricer_core::market_data::MarketEnvironment;
use pricer_core::types::{BusinessDayConvention, Currency, Date, SharedCalendar};

use super::schedule::{self, Period, ScheduleBuilder};
use super::{forward_rate, CashflowKind, CashflowRow, PricerCommon, PricerKind, ProductPricer};
use crate::error::ValuationError;
use crate::factory::BuildInput;

/// Accrual schedule of one swap leg.
#[derive(Debug, Clone)]
pub(crate) struct LegSchedule {
    pub periods: Vec<Period>,
    /// Adjusted effective and termination dates for principal exchange
    pub start_payment: Date,
    pub end_payment: Date,
}

impl LegSchedule {
    /// Builds the accrual schedule of `leg`, with payments rolled on `calendar`.
    pub(crate) fn build(leg: &SwapLeg, calendar: Option<SharedCalendar>) -> Result<Self, ValuationError> {
        let convention = leg
            .payment_adjustments
            .as_ref()
            .map(|a| a.convention)
            .unwrap_or(BusinessDayConvention::ModifiedFollowing);
        let start_payment = schedule::adjust(calendar.as_deref(), leg.effective_date, convention)?;
        let end_payment = schedule::adjust(calendar.as_deref(), leg.termination_date, convention)?;
        let periods = ScheduleBuilder::new()
            .start(leg.effective_date)
            .end(leg.termination_date)
            .frequency(leg.frequency)
            .day_count(leg.day_count)
            .payment_calendar(calendar, convention)
            .build()?;
        Ok(Self {
            periods,
            start_payment,
            end_payment,
        })
    }
}

/// Projects every leg's coupons and optional principal exchanges.
#[derive(Debug, Clone)]
pub(crate) struct SwapPricer {
    pub payload: Swap,
    pub schedules: Vec<LegSchedule>,
}

impl SwapPricer {
    pub(crate) fn build(input: &BuildInput<'_>) -> Result<PricerKind, ValuationError> {
        let Product::Swap(payload) = &input.trade.product else {
            return Err(input.mismatch(TradeType::Swap));
        };
        let schedules = payload
            .legs
            .iter()
            .enumerate()
            .map(|(i, leg)| LegSchedule::build(leg, input.leg_payment_calendar(i)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PricerKind::Swap(SwapPricer {
            payload: payload.clone(),
            schedules,
        }))
    }
}

/// Leg label used in reports.
pub(crate) fn leg_label(index: usize) -> String {
    format!("Leg{}", index + 1)
}

/// Projected flows of one leg, signed for the base party.
pub(crate) fn leg_cashflows(
    common: &PricerCommon,
    label: &str,
    leg: &SwapLeg,
    schedule: &LegSchedule,
    valuation_date: Date,
    market: &dyn MarketEnvironment,
) -> Result<Vec<CashflowRow>, ValuationError> {
    let sign = common.sign_received_by(leg.receiver);
    let currency = leg.notional.currency;
    let notional = leg.notional.amount;
    let mut rows = Vec::with_capacity(schedule.periods.len() + 2);

    if leg.principal_exchange {
        rows.push(
            CashflowRow::new(label, CashflowKind::Principal, currency, schedule.start_payment, -sign * notional)
                .with_notional(notional),
        );
    }

    for period in &schedule.periods {
        let yf = period.year_fraction();
        let (kind, rate) = match &leg.rate {
            LegRate::Fixed(k) => (CashflowKind::FixedCoupon, Some(*k)),
            LegRate::Floating { index, spread } => {
                let curve = common.projection_curve(market, index, currency)?;
                let projected =
                    forward_rate(curve, valuation_date, period.start(), period.end(), leg.day_count)?;
                (CashflowKind::FloatingCoupon, projected.map(|f| f + spread))
            }
        };
        let amount = rate.map_or(0.0, |r| sign * notional * r * yf);
        rows.push(
            CashflowRow::new(label, kind, currency, period.payment(), amount)
                .with_notional(notional)
                .with_rate(rate)
                .with_accrual(period.start(), period.end(), yf),
        );
    }

    if leg.principal_exchange {
        rows.push(
            CashflowRow::new(label, CashflowKind::Principal, currency, schedule.end_payment, sign * notional)
                .with_notional(notional),
        );
    }

    rows.into_iter()
        .map(|row| row.discount(valuation_date, market))
        .collect()
}

/// Notional weighted annuity of the unrealised coupon periods of `leg`.
pub(crate) fn annuity(
    leg: &SwapLeg,
    schedule: &LegSchedule,
    valuation_date: Date,
    market: &dyn MarketEnvironment,
) -> Result<f64, ValuationError> {
    let mut total = 0.0;
    for period in schedule.periods.iter().filter(|p| p.payment() >= valuation_date) {
        let df = market.discount_factor(leg.notional.currency, valuation_date, period.payment())?;
        total += leg.notional.amount * period.year_fraction() * df;
    }
    Ok(total)
}

impl ProductPricer for SwapPricer {
    fn payment_currencies(&self) -> Vec<Currency> {
        self.payload.currencies()
    }

    fn expected_cashflows(
        &self,
        common: &PricerCommon,
        valuation_date: Date,
        market: &dyn MarketEnvironment,
    ) -> Result<Vec<CashflowRow>, ValuationError> {
        let mut rows = Vec::new();
        for (i, (leg, schedule)) in self.payload.legs.iter().zip(&self.schedules).enumerate() {
            rows.extend(leg_cashflows(common, &leg_label(i), leg, schedule, valuation_date, market)?);
        }
        Ok(rows)
    }

    /// Fixed rate that sets the swap's value to zero.
    fn implied_quote(
        &self,
        common: &PricerCommon,
        valuation_date: Date,
        market: &dyn MarketEnvironment,
    ) -> Result<Option<f64>, ValuationError> {
        let Some(fixed_index) = self.payload.legs.iter().position(SwapLeg::is_fixed) else {
            return Ok(None);
        };
        let fixed_leg = &self.payload.legs[fixed_index];
        let LegRate::Fixed(fixed_rate) = fixed_leg.rate else {
            return Ok(None);
        };
        let annuity = annuity(fixed_leg, &self.schedules[fixed_index], valuation_date, market)?;
        if annuity == 0.0 {
            return Ok(None);
        }
        let rows = self.expected_cashflows(common, valuation_date, market)?;
        let pv = super::cashflow::sum_in_currency(
            &rows,
            fixed_leg.notional.currency,
            market,
            |r| r.present_value,
        )?;
        let sign = common.sign_received_by(fixed_leg.receiver);
        Ok(Some(fixed_rate - pv / (sign * annuity)))
    }

    fn has_implied_quote(&self) -> bool {
        self.payload.fixed_leg().is_some()
    }

    fn build_the_product(&self) -> Product {
        Product::Swap(self.payload.clone())
    }
}
