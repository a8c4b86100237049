//! Property lease.

use adapter_fpml::{LeaseTransaction, Product, TradeType};
use pricer_core::market_data::MarketEnvironment;
use pricer_core::types::{BusinessDayConvention, Currency, Date, SharedCalendar};

use super::schedule;
use super::{CashflowKind, CashflowRow, PricerCommon, PricerKind, ProductPricer};
use crate::error::ValuationError;
use crate::factory::BuildInput;

/// Rent paid by the tenant to the landlord, escalated once a year.
#[derive(Debug, Clone)]
pub(crate) struct LeasePricer {
    pub payload: LeaseTransaction,
    pub lease_reference: String,
    pub trade_date: Option<Date>,
    pub payment_calendar: Option<SharedCalendar>,
}

impl LeasePricer {
    pub(crate) fn build(input: &BuildInput<'_>) -> Result<PricerKind, ValuationError> {
        let Product::LeaseTransaction(payload) = &input.trade.product else {
            return Err(input.mismatch(TradeType::LeaseTransaction));
        };
        Ok(PricerKind::LeaseTransaction(LeasePricer {
            lease_reference: input
                .fields
                .reference
                .clone()
                .unwrap_or_else(|| payload.lease_id.clone()),
            payload: payload.clone(),
            trade_date: input.fields.trade_date,
            payment_calendar: input.settlement_calendar(),
        }))
    }

    /// Rent payment dates (adjusted) and amounts.
    pub(crate) fn rent_schedule(&self) -> Result<Vec<(Date, f64)>, ValuationError> {
        let lease = &self.payload;
        let months = lease.payment_frequency.months();
        let per_year = lease.payment_frequency.periods_per_year();
        let mut out = Vec::with_capacity(lease.number_of_payments as usize);
        for k in 0..lease.number_of_payments {
            let unadjusted = lease.start_date.add_months(months * k)?;
            let date = schedule::adjust(
                self.payment_calendar.as_deref(),
                unadjusted,
                BusinessDayConvention::ModifiedFollowing,
            )?;
            let lease_year = (k / per_year) as i32;
            let amount = lease.rent.amount * (1.0 + lease.annual_escalation).powi(lease_year);
            out.push((date, amount));
        }
        Ok(out)
    }
}

impl ProductPricer for LeasePricer {
    fn payment_currencies(&self) -> Vec<Currency> {
        vec![self.payload.rent.currency]
    }

    fn expected_cashflows(
        &self,
        common: &PricerCommon,
        valuation_date: Date,
        market: &dyn MarketEnvironment,
    ) -> Result<Vec<CashflowRow>, ValuationError> {
        let sign = common.sign_received_by(self.payload.landlord);
        let currency = self.payload.rent.currency;
        self.rent_schedule()?
            .into_iter()
            .map(|(date, amount)| {
                CashflowRow::new("Rent", CashflowKind::Payment, currency, date, sign * amount)
                    .with_notional(amount)
                    .discount(valuation_date, market)
            })
            .collect()
    }

    fn build_the_product(&self) -> Product {
        Product::LeaseTransaction(self.payload.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use adapter_fpml::{Frequency, Money, PartyRole, ProductType};
    use approx::assert_relative_eq;

    fn pricer() -> LeasePricer {
        LeasePricer {
            payload: LeaseTransaction {
                lease_id: "L-1".to_string(),
                tenant: PartyRole::Party2,
                landlord: PartyRole::Party1,
                start_date: d(2025, 1, 1),
                payment_frequency: Frequency::Quarterly,
                number_of_payments: 8,
                rent: Money::new(10_000.0, Currency::AUD),
                annual_escalation: 0.03,
            },
            lease_reference: "L-1".to_string(),
            trade_date: None,
            payment_calendar: None,
        }
    }

    #[test]
    fn test_rent_escalates_each_year() {
        let schedule = pricer().rent_schedule().unwrap();
        assert_eq!(schedule.len(), 8);
        assert_eq!(schedule[3], (d(2025, 10, 1), 10_000.0));
        assert_eq!(schedule[4].0, d(2026, 1, 1));
        assert_relative_eq!(schedule[4].1, 10_300.0, epsilon = 1e-9);
    }

    #[test]
    fn test_landlord_receives_rent() {
        let rows = pricer()
            .expected_cashflows(
                &common(ProductType::LeaseTransaction, PartyRole::Party1),
                d(2025, 1, 1),
                &flat_market(0.0),
            )
            .unwrap();
        assert_relative_eq!(total_pv(&rows), 4.0 * 10_000.0 + 4.0 * 10_300.0, epsilon = 1e-6);
    }

    #[test]
    fn test_paid_rent_is_realised() {
        let rows = pricer()
            .expected_cashflows(
                &common(ProductType::LeaseTransaction, PartyRole::Party2),
                d(2025, 6, 1),
                &flat_market(0.0),
            )
            .unwrap();
        assert_eq!(rows.iter().filter(|r| r.is_realised).count(), 2);
        assert_relative_eq!(total_pv(&rows), -(2.0 * 10_000.0 + 4.0 * 10_300.0), epsilon = 1e-6);
    }
}
