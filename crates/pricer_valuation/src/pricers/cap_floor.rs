//! Caps, floors and collars on a floating leg, priced with Black-76.

use adapter_fpml::{CapFloor, LegRate, OptionType, Payment, Product, TradeType};
use pricer_core::market_data::{year_fraction, MarketEnvironment};
use pricer_core::types::{BusinessDayConvention, Currency, Date};

use super::black::black_price;
use super::schedule;
use super::swap::LegSchedule;
use super::{forward_rate, CashflowKind, CashflowRow, PricerCommon, PricerKind, ProductPricer};
use crate::error::ValuationError;
use crate::factory::BuildInput;

/// Buyer is long the caplets and, for a collar, short the floorlets.
#[derive(Debug, Clone)]
pub(crate) struct CapFloorPricer {
    pub payload: CapFloor,
    pub schedule: LegSchedule,
    /// Fixing date of each optionlet, aligned with the schedule periods
    pub fixing_dates: Vec<Date>,
    pub premium_date: Option<Date>,
}

impl CapFloorPricer {
    pub(crate) fn build(input: &BuildInput<'_>) -> Result<PricerKind, ValuationError> {
        let Product::CapFloor(payload) = &input.trade.product else {
            return Err(input.mismatch(TradeType::CapFloor));
        };
        if payload.cap_rate.is_none() && payload.floor_rate.is_none() {
            return Err(ValuationError::MissingProperty("capRate or floorRate".to_string()));
        }
        let payment_calendar = input.payment_calendar();
        let schedule = LegSchedule::build(&payload.floating_leg, payment_calendar.clone())?;
        let fixing_calendar = input.fixing_calendar();
        let fixing_dates = schedule
            .periods
            .iter()
            .map(|p| {
                schedule::adjust(
                    fixing_calendar.as_deref(),
                    p.start(),
                    BusinessDayConvention::Preceding,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        let premium_date = payload
            .premium
            .as_ref()
            .map(|p| input.adjust(payment_calendar.as_ref(), &p.payment_date, BusinessDayConvention::Following))
            .transpose()?;
        Ok(PricerKind::CapFloor(CapFloorPricer {
            payload: payload.clone(),
            schedule,
            fixing_dates,
            premium_date,
        }))
    }

    fn index(&self) -> &str {
        match &self.payload.floating_leg.rate {
            LegRate::Floating { index, .. } => index,
            LegRate::Fixed(_) => "",
        }
    }

    /// Undiscounted payoff per unit notional and year fraction.
    fn optionlet_rate(&self, forward: f64, vol: Option<f64>, expiry: f64) -> f64 {
        let vol = vol.unwrap_or(0.0);
        let cap = self
            .payload
            .cap_rate
            .map_or(0.0, |k| black_price(OptionType::Call, forward, k, vol, expiry));
        let floor = self
            .payload
            .floor_rate
            .map_or(0.0, |k| black_price(OptionType::Put, forward, k, vol, expiry));
        if self.payload.cap_rate.is_some() {
            cap - floor
        } else {
            floor
        }
    }
}

pub(crate) fn premium_row(
    common: &PricerCommon,
    premium: &Payment,
    payment_date: Date,
) -> CashflowRow {
    CashflowRow::new(
        "Premium",
        CashflowKind::Premium,
        premium.amount.currency,
        payment_date,
        common.sign_received_by(premium.receiver) * premium.amount.amount,
    )
}

impl ProductPricer for CapFloorPricer {
    fn payment_currencies(&self) -> Vec<Currency> {
        let mut out = vec![self.payload.floating_leg.notional.currency];
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
        let leg = &self.payload.floating_leg;
        let currency = leg.notional.currency;
        let notional = leg.notional.amount;
        let sign = common.sign_received_by(self.payload.buyer);
        let curve = common.projection_curve(market, self.index(), currency)?;
        let spread = match &leg.rate {
            LegRate::Floating { spread, .. } => *spread,
            LegRate::Fixed(_) => 0.0,
        };

        let mut vol = None;
        let mut rows = Vec::with_capacity(self.schedule.periods.len() + 1);
        for (period, fixing) in self.schedule.periods.iter().zip(&self.fixing_dates) {
            let yf = period.year_fraction();
            let forward = forward_rate(curve, valuation_date, period.start(), period.end(), leg.day_count)?
                .map(|f| f + spread);
            let expiry = year_fraction(valuation_date, *fixing);
            if expiry > 0.0 && vol.is_none() {
                vol = Some(market.volatility(self.index())?);
            }
            let amount = forward.map_or(0.0, |f| sign * notional * yf * self.optionlet_rate(f, vol, expiry));
            rows.push(
                CashflowRow::new("Optionlet", CashflowKind::OptionPayoff, currency, period.payment(), amount)
                    .with_notional(notional)
                    .with_rate(forward)
                    .with_accrual(period.start(), period.end(), yf),
            );
        }
        if let (Some(premium), Some(date)) = (&self.payload.premium, self.premium_date) {
            rows.push(premium_row(common, premium, date));
        }

        rows.into_iter()
            .map(|row| row.discount(valuation_date, market))
            .collect()
    }

    fn build_the_product(&self) -> Product {
        Product::CapFloor(self.payload.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::super::swap::tests::leg;
    use super::super::test_support::*;
    use super::*;
    use adapter_fpml::{AdjustableDate, LegRate, Money, PartyRole, ProductType};
    use approx::assert_relative_eq;

    fn pricer(cap: Option<f64>, floor: Option<f64>, premium: Option<Payment>) -> CapFloorPricer {
        let floating_leg = leg(
            PartyRole::Party2,
            LegRate::Floating {
                index: "AUD-BBSW-6M".to_string(),
                spread: 0.0,
            },
        );
        let schedule = LegSchedule::build(&floating_leg, None).unwrap();
        let fixing_dates = schedule.periods.iter().map(|p| p.start()).collect();
        let premium_date = premium.as_ref().map(|p| p.payment_date.unadjusted_date);
        CapFloorPricer {
            payload: CapFloor {
                buyer: PartyRole::Party1,
                seller: PartyRole::Party2,
                floating_leg,
                cap_rate: cap,
                floor_rate: floor,
                premium,
            },
            schedule,
            fixing_dates,
            premium_date,
        }
    }

    #[test]
    fn test_cap_has_positive_value_for_buyer() {
        let market = flat_market(0.04).with_volatility("AUD-BBSW-6M", 0.25);
        let buyer = common(ProductType::CapFloor, PartyRole::Party1);
        let rows = pricer(Some(0.045), None, None)
            .expected_cashflows(&buyer, d(2025, 1, 15), &market)
            .unwrap();
        assert_eq!(rows.len(), 10);
        assert!(total_pv(&rows) > 0.0);
    }

    #[test]
    fn test_collar_is_cap_minus_floor() {
        let market = flat_market(0.04).with_volatility("AUD-BBSW-6M", 0.25);
        let buyer = common(ProductType::CapFloor, PartyRole::Party1);
        let val = d(2025, 1, 15);
        let cap = total_pv(&pricer(Some(0.05), None, None).expected_cashflows(&buyer, val, &market).unwrap());
        let floor = total_pv(&pricer(None, Some(0.03), None).expected_cashflows(&buyer, val, &market).unwrap());
        let collar =
            total_pv(&pricer(Some(0.05), Some(0.03), None).expected_cashflows(&buyer, val, &market).unwrap());
        assert_relative_eq!(collar, cap - floor, epsilon = 1e-6);
    }

    #[test]
    fn test_premium_paid_by_buyer() {
        let premium = Payment {
            payer: PartyRole::Party1,
            receiver: PartyRole::Party2,
            amount: Money::new(25_000.0, Currency::AUD),
            payment_date: AdjustableDate::unadjusted(d(2025, 1, 17)),
        };
        let market = flat_market(0.0).with_volatility("AUD-BBSW-6M", 0.25);
        let rows = pricer(Some(0.05), None, Some(premium))
            .expected_cashflows(&common(ProductType::CapFloor, PartyRole::Party1), d(2025, 1, 15), &market)
            .unwrap();
        let last = rows.last().unwrap();
        assert_eq!(last.kind, CashflowKind::Premium);
        assert_eq!(last.amount, -25_000.0);
    }

    #[test]
    fn test_missing_volatility() {
        let result = pricer(Some(0.05), None, None).expected_cashflows(
            &common(ProductType::CapFloor, PartyRole::Party1),
            d(2025, 1, 15),
            &flat_market(0.04),
        );
        assert!(matches!(result, Err(ValuationError::MarketData(_))));
    }
}
