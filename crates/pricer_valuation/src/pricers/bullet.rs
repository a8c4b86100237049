//! Single fixed payment.

use adapter_fpml::{BulletPayment, Product, TradeType};
use pricer_core::market_data::MarketEnvironment;
use pricer_core::types::{BusinessDayConvention, Currency, Date};

use super::{CashflowKind, CashflowRow, PricerCommon, PricerKind, ProductPricer};
use crate::error::ValuationError;
use crate::factory::BuildInput;

#[derive(Debug, Clone)]
pub(crate) struct BulletPaymentPricer {
    pub payload: BulletPayment,
    /// Name of the calendar the payment date was rolled on
    pub calendar_name: Option<String>,
    pub payment_date: Date,
}

impl BulletPaymentPricer {
    pub(crate) fn build(input: &BuildInput<'_>) -> Result<PricerKind, ValuationError> {
        let Product::BulletPayment(payload) = &input.trade.product else {
            return Err(input.mismatch(TradeType::BulletPayment));
        };
        let calendar = input.bullet_payment_calendar(&payload.payment.payment_date)?;
        let payment_date = input.adjust(
            calendar.as_ref(),
            &payload.payment.payment_date,
            BusinessDayConvention::Following,
        )?;
        Ok(PricerKind::BulletPayment(BulletPaymentPricer {
            calendar_name: calendar.map(|c| c.name()),
            payload: payload.clone(),
            payment_date,
        }))
    }
}

impl ProductPricer for BulletPaymentPricer {
    fn payment_currencies(&self) -> Vec<Currency> {
        vec![self.payload.payment.amount.currency]
    }

    fn expected_cashflows(
        &self,
        common: &PricerCommon,
        valuation_date: Date,
        market: &dyn MarketEnvironment,
    ) -> Result<Vec<CashflowRow>, ValuationError> {
        let payment = &self.payload.payment;
        let row = CashflowRow::new(
            "Payment",
            CashflowKind::Payment,
            payment.amount.currency,
            self.payment_date,
            common.sign_received_by(payment.receiver) * payment.amount.amount,
        );
        Ok(vec![row.discount(valuation_date, market)?])
    }

    fn build_the_product(&self) -> Product {
        Product::BulletPayment(self.payload.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use adapter_fpml::{AdjustableDate, Money, PartyRole, Payment, ProductType};
    use approx::assert_relative_eq;

    #[test]
    fn test_receiver_values_discounted_amount() {
        let pricer = BulletPaymentPricer {
            payload: BulletPayment {
                payment: Payment {
                    payer: PartyRole::Party1,
                    receiver: PartyRole::Party2,
                    amount: Money::new(1_000_000.0, Currency::USD),
                    payment_date: AdjustableDate::unadjusted(d(2026, 1, 1)),
                },
            },
            calendar_name: None,
            payment_date: d(2026, 1, 1),
        };
        let market = flat_market(0.05);
        let rows = pricer
            .expected_cashflows(&common(ProductType::BulletPayment, PartyRole::Party2), d(2025, 1, 1), &market)
            .unwrap();
        assert_relative_eq!(rows[0].present_value, 1_000_000.0 * (-0.05_f64).exp(), epsilon = 1e-6);
        let rows = pricer
            .expected_cashflows(&common(ProductType::BulletPayment, PartyRole::Party1), d(2025, 1, 1), &market)
            .unwrap();
        assert!(rows[0].present_value < 0.0);
    }
}
