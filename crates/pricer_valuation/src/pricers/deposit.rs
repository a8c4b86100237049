//! Fixed rate term deposit.

use adapter_fpml::{Product, TermDeposit, TradeType};
use pricer_core::market_data::MarketEnvironment;
use pricer_core::types::{Currency, Date};

use super::{CashflowKind, CashflowRow, PricerCommon, PricerKind, ProductPricer};
use crate::error::ValuationError;
use crate::factory::BuildInput;

/// Principal placed on the start date, repaid with simple interest at maturity.
#[derive(Debug, Clone)]
pub(crate) struct TermDepositPricer {
    pub payload: TermDeposit,
}

impl TermDepositPricer {
    pub(crate) fn build(input: &BuildInput<'_>) -> Result<PricerKind, ValuationError> {
        let Product::TermDeposit(payload) = &input.trade.product else {
            return Err(input.mismatch(TradeType::TermDeposit));
        };
        if payload.maturity_date <= payload.start_date {
            return Err(ValuationError::Schedule(format!(
                "Term deposit matures on {} before it starts on {}",
                payload.maturity_date, payload.start_date
            )));
        }
        Ok(PricerKind::TermDeposit(TermDepositPricer {
            payload: payload.clone(),
        }))
    }

    fn year_fraction(&self) -> f64 {
        self.payload
            .day_count
            .year_fraction_dates(self.payload.start_date, self.payload.maturity_date)
    }
}

impl ProductPricer for TermDepositPricer {
    fn payment_currencies(&self) -> Vec<Currency> {
        vec![self.payload.principal.currency]
    }

    fn expected_cashflows(
        &self,
        common: &PricerCommon,
        valuation_date: Date,
        market: &dyn MarketEnvironment,
    ) -> Result<Vec<CashflowRow>, ValuationError> {
        let deposit = &self.payload;
        let currency = deposit.principal.currency;
        let principal = deposit.principal.amount;
        let tau = self.year_fraction();
        // The initial payer is the depositor and receives the repayment
        let to_depositor = common.sign_received_by(deposit.initial_payer);
        [
            CashflowRow::new(
                "Deposit",
                CashflowKind::Principal,
                currency,
                deposit.start_date,
                -to_depositor * principal,
            )
            .with_notional(principal),
            CashflowRow::new(
                "Repayment",
                CashflowKind::FixedCoupon,
                currency,
                deposit.maturity_date,
                to_depositor * principal * (1.0 + deposit.fixed_rate * tau),
            )
            .with_notional(principal)
            .with_rate(Some(deposit.fixed_rate))
            .with_accrual(deposit.start_date, deposit.maturity_date, tau),
        ]
        .into_iter()
        .map(|row| row.discount(valuation_date, market))
        .collect()
    }

    /// Deposit rate implied by the discount curve over the deposit term.
    fn implied_quote(
        &self,
        _common: &PricerCommon,
        valuation_date: Date,
        market: &dyn MarketEnvironment,
    ) -> Result<Option<f64>, ValuationError> {
        let deposit = &self.payload;
        let currency = deposit.principal.currency;
        let start = deposit.start_date.max(valuation_date);
        if start >= deposit.maturity_date {
            return Ok(None);
        }
        let df_start = market.discount_factor(currency, valuation_date, start)?;
        let df_end = market.discount_factor(currency, valuation_date, deposit.maturity_date)?;
        let tau = deposit.day_count.year_fraction_dates(start, deposit.maturity_date);
        Ok(Some((df_start / df_end - 1.0) / tau))
    }

    fn has_implied_quote(&self) -> bool {
        true
    }

    fn build_the_product(&self) -> Product {
        Product::TermDeposit(self.payload.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use adapter_fpml::{Money, PartyRole, ProductType};
    use approx::assert_relative_eq;
    use pricer_core::types::DayCountConvention;

    fn pricer(rate: f64) -> TermDepositPricer {
        TermDepositPricer {
            payload: TermDeposit {
                initial_payer: PartyRole::Party1,
                initial_receiver: PartyRole::Party2,
                start_date: d(2025, 1, 2),
                maturity_date: d(2025, 7, 2),
                principal: Money::new(5_000_000.0, Currency::AUD),
                fixed_rate: rate,
                day_count: DayCountConvention::ActualActual365,
            },
        }
    }

    #[test]
    fn test_deposit_at_implied_rate_is_worthless() {
        let market = flat_market(0.045);
        let depositor = common(ProductType::TermDeposit, PartyRole::Party1);
        let rate = pricer(0.0)
            .implied_quote(&depositor, d(2025, 1, 2), &market)
            .unwrap()
            .unwrap();
        let rows = pricer(rate).expected_cashflows(&depositor, d(2025, 1, 2), &market).unwrap();
        assert_relative_eq!(total_pv(&rows), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_borrower_side() {
        let rows = pricer(0.05)
            .expected_cashflows(
                &common(ProductType::TermDeposit, PartyRole::Party2),
                d(2025, 1, 2),
                &flat_market(0.0),
            )
            .unwrap();
        assert_eq!(rows[0].amount, 5_000_000.0);
        assert!(rows[1].amount < -5_000_000.0);
    }

    #[test]
    fn test_matured_deposit_has_no_quote() {
        let common = common(ProductType::TermDeposit, PartyRole::Party1);
        let quote = pricer(0.05)
            .implied_quote(&common, d(2025, 8, 1), &flat_market(0.0))
            .unwrap();
        assert_eq!(quote, None);
    }
}
