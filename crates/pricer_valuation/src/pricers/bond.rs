//! Fixed coupon bond purchase.

use adapter_fpml::{BondTransaction, Product, TradeType};
use pricer_core::market_data::MarketEnvironment;
use pricer_core::types::{BusinessDayConvention, Currency, Date, SharedCalendar};

use super::schedule::{self, Period};
use super::{CashflowKind, CashflowRow, PricerCommon, PricerKind, ProductPricer};
use crate::error::ValuationError;
use crate::factory::BuildInput;

/// Buyer pays the agreed price on settlement and receives the remaining
/// coupons and the redemption.
#[derive(Debug, Clone)]
pub(crate) struct BondPricer {
    pub payload: BondTransaction,
    pub bond_type: Option<String>,
    pub trade_date: Option<Date>,
    pub effective_date: Date,
    pub settlement_date: Date,
    /// Coupon periods paid after settlement
    pub coupons: Vec<Period>,
}

impl BondPricer {
    pub(crate) fn build(input: &BuildInput<'_>) -> Result<PricerKind, ValuationError> {
        let Product::BondTransaction(payload) = &input.trade.product else {
            return Err(input.mismatch(TradeType::BondTransaction));
        };
        let effective_date = input.effective_date()?;
        let settlement_date = schedule::adjust(
            input.settlement_calendar().as_deref(),
            effective_date,
            BusinessDayConvention::Following,
        )?;
        let coupons = coupon_periods(payload, settlement_date, input.payment_calendar().as_ref())?;
        Ok(PricerKind::BondTransaction(BondPricer {
            payload: payload.clone(),
            bond_type: input.fields.bond_type.clone(),
            trade_date: input.fields.trade_date,
            effective_date,
            settlement_date,
            coupons,
        }))
    }

    fn coupon_amount(&self, period: &Period) -> f64 {
        self.payload.notional.amount * self.payload.coupon_rate * period.year_fraction()
    }

    fn redemption_date(&self) -> Date {
        self.coupons
            .last()
            .map(|p| p.payment())
            .unwrap_or(self.payload.maturity_date)
    }
}

/// Coupon periods rolled back from maturity, keeping those ending after settlement.
fn coupon_periods(
    bond: &BondTransaction,
    settlement_date: Date,
    calendar: Option<&SharedCalendar>,
) -> Result<Vec<Period>, ValuationError> {
    if bond.maturity_date <= settlement_date {
        return Err(ValuationError::Schedule(format!(
            "Bond {} matures on {} before settlement on {}",
            bond.bond_id, bond.maturity_date, settlement_date
        )));
    }
    let months = bond.coupon_frequency.months();
    let ends = schedule::roll_back(bond.maturity_date, settlement_date, bond.coupon_frequency)?;
    let mut start = schedule::months_before(ends[0], months)?;
    let mut periods = Vec::with_capacity(ends.len());
    for end in ends {
        let payment = schedule::adjust(
            calendar.map(|c| c.as_ref()),
            end,
            BusinessDayConvention::Following,
        )?;
        periods.push(Period::new(start, end, payment, bond.day_count));
        start = end;
    }
    Ok(periods)
}

impl ProductPricer for BondPricer {
    fn payment_currencies(&self) -> Vec<Currency> {
        vec![self.payload.notional.currency]
    }

    fn expected_cashflows(
        &self,
        common: &PricerCommon,
        valuation_date: Date,
        market: &dyn MarketEnvironment,
    ) -> Result<Vec<CashflowRow>, ValuationError> {
        let bond = &self.payload;
        let currency = bond.notional.currency;
        let notional = bond.notional.amount;
        let to_buyer = common.sign_received_by(bond.buyer);

        let mut rows = Vec::with_capacity(self.coupons.len() + 2);
        rows.push(
            CashflowRow::new(
                "Purchase",
                CashflowKind::Payment,
                currency,
                self.settlement_date,
                -to_buyer * notional * bond.purchase_price / 100.0,
            )
            .with_notional(notional)
            .with_rate(Some(bond.purchase_price)),
        );
        for period in &self.coupons {
            rows.push(
                CashflowRow::new(
                    "Coupon",
                    CashflowKind::FixedCoupon,
                    currency,
                    period.payment(),
                    to_buyer * self.coupon_amount(period),
                )
                .with_notional(notional)
                .with_rate(Some(bond.coupon_rate))
                .with_accrual(period.start(), period.end(), period.year_fraction()),
            );
        }
        rows.push(
            CashflowRow::new(
                "Redemption",
                CashflowKind::Principal,
                currency,
                self.redemption_date(),
                to_buyer * notional,
            )
            .with_notional(notional),
        );

        rows.into_iter()
            .map(|row| row.discount(valuation_date, market))
            .collect()
    }

    /// Model clean price, percent of face, for settlement on the later of
    /// the settlement and valuation dates.
    fn implied_quote(
        &self,
        _common: &PricerCommon,
        valuation_date: Date,
        market: &dyn MarketEnvironment,
    ) -> Result<Option<f64>, ValuationError> {
        let bond = &self.payload;
        let currency = bond.notional.currency;
        let quote_date = self.settlement_date.max(valuation_date);
        let df_quote = market.discount_factor(currency, valuation_date, quote_date)?;

        let mut dirty = 0.0;
        let mut accrued = 0.0;
        for period in &self.coupons {
            if period.payment() <= quote_date {
                continue;
            }
            let df = market.discount_factor(currency, valuation_date, period.payment())?;
            dirty += self.coupon_amount(period) * df;
            if period.start() < quote_date {
                let partial = Period::new(period.start(), quote_date, quote_date, bond.day_count);
                accrued = self.coupon_amount(&partial);
            }
        }
        let df_redemption = market.discount_factor(currency, valuation_date, self.redemption_date())?;
        dirty += bond.notional.amount * df_redemption;

        let clean = (dirty / df_quote - accrued) / bond.notional.amount * 100.0;
        Ok(Some(clean))
    }

    fn has_implied_quote(&self) -> bool {
        true
    }

    fn build_the_product(&self) -> Product {
        Product::BondTransaction(self.payload.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use adapter_fpml::{Frequency, Money, PartyRole, ProductType};
    use approx::assert_relative_eq;
    use pricer_core::types::DayCountConvention;

    fn bond(price: f64) -> BondTransaction {
        BondTransaction {
            bond_id: "ACGB-2030".to_string(),
            buyer: PartyRole::Party1,
            seller: PartyRole::Party2,
            notional: Money::new(1_000_000.0, Currency::AUD),
            coupon_rate: 0.04,
            coupon_frequency: Frequency::SemiAnnual,
            day_count: DayCountConvention::Thirty360,
            maturity_date: d(2030, 6, 15),
            purchase_price: price,
        }
    }

    fn pricer(price: f64, settlement: Date) -> BondPricer {
        let payload = bond(price);
        let coupons = coupon_periods(&payload, settlement, None).unwrap();
        BondPricer {
            payload,
            bond_type: None,
            trade_date: None,
            effective_date: settlement,
            settlement_date: settlement,
            coupons,
        }
    }

    #[test]
    fn test_coupon_periods_after_settlement() {
        let p = pricer(100.0, d(2028, 8, 1));
        assert_eq!(p.coupons.len(), 4);
        assert_eq!(p.coupons[0].start(), d(2028, 6, 15));
        assert_eq!(p.coupons[0].end(), d(2028, 12, 15));
        assert_relative_eq!(p.coupon_amount(&p.coupons[0]), 20_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_rate_clean_price_is_par_plus_coupons() {
        // Settle on a coupon date: no accrued interest
        let p = pricer(100.0, d(2028, 6, 15));
        let quote = p
            .implied_quote(
                &common(ProductType::BondTransaction, PartyRole::Party1),
                d(2028, 6, 15),
                &flat_market(0.0),
            )
            .unwrap()
            .unwrap();
        assert_relative_eq!(quote, 100.0 + 4.0 * 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_buyer_npv_at_zero_rates() {
        let p = pricer(101.0, d(2028, 6, 15));
        let rows = p
            .expected_cashflows(
                &common(ProductType::BondTransaction, PartyRole::Party1),
                d(2028, 6, 15),
                &flat_market(0.0),
            )
            .unwrap();
        // -1.01m + 4 coupons of 20k + 1m
        assert_relative_eq!(total_pv(&rows), 70_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_matured_bond_rejected() {
        let result = coupon_periods(&bond(100.0), d(2031, 1, 1), None);
        assert!(matches!(result, Err(ValuationError::Schedule(_))));
    }
}
