//! FX spot, outright forward and FX swap.

use adapter_fpml::{FxSingleLeg, FxSwap, Product, TradeType};
use pricer_core::market_data::MarketEnvironment;
use pricer_core::types::{Currency, Date};

use super::{CashflowKind, CashflowRow, PricerCommon, PricerKind, ProductPricer};
use crate::error::ValuationError;
use crate::factory::BuildInput;

/// Outright forward in units of `counter` per `base` for `value_date`,
/// from spot and the two discount curves.
pub(crate) fn outright_forward(
    market: &dyn MarketEnvironment,
    base: Currency,
    counter: Currency,
    valuation_date: Date,
    value_date: Date,
) -> Result<f64, ValuationError> {
    let spot = market.fx_rate(base, counter)?;
    let df_base = market.discount_factor(base, valuation_date, value_date)?;
    let df_counter = market.discount_factor(counter, valuation_date, value_date)?;
    Ok(spot * df_base / df_counter)
}

/// The two exchanged amounts of one FX leg.
fn exchange_rows(
    common: &PricerCommon,
    label: &str,
    leg: &FxSingleLeg,
    valuation_date: Date,
    market: &dyn MarketEnvironment,
) -> Result<Vec<CashflowRow>, ValuationError> {
    let to_payer1 = common.sign_received_by(leg.currency1_payer);
    let rate = Some(leg.contract_rate());
    [
        CashflowRow::new(
            label,
            CashflowKind::Payment,
            leg.currency1.currency,
            leg.value_date,
            -to_payer1 * leg.currency1.amount,
        ),
        CashflowRow::new(
            label,
            CashflowKind::Payment,
            leg.currency2.currency,
            leg.value_date,
            to_payer1 * leg.currency2.amount,
        ),
    ]
    .into_iter()
    .map(|row| row.with_rate(rate).discount(valuation_date, market))
    .collect()
}

#[derive(Debug, Clone)]
pub(crate) struct FxSingleLegPricer {
    pub payload: FxSingleLeg,
}

impl FxSingleLegPricer {
    pub(crate) fn build(input: &BuildInput<'_>) -> Result<PricerKind, ValuationError> {
        let Product::FxSingleLeg(payload) = &input.trade.product else {
            return Err(input.mismatch(TradeType::FxSingleLeg));
        };
        Ok(PricerKind::FxSingleLeg(FxSingleLegPricer {
            payload: payload.clone(),
        }))
    }
}

impl ProductPricer for FxSingleLegPricer {
    fn payment_currencies(&self) -> Vec<Currency> {
        vec![self.payload.currency1.currency, self.payload.currency2.currency]
    }

    fn expected_cashflows(
        &self,
        common: &PricerCommon,
        valuation_date: Date,
        market: &dyn MarketEnvironment,
    ) -> Result<Vec<CashflowRow>, ValuationError> {
        exchange_rows(common, "Exchange", &self.payload, valuation_date, market)
    }

    fn implied_quote(
        &self,
        _common: &PricerCommon,
        valuation_date: Date,
        market: &dyn MarketEnvironment,
    ) -> Result<Option<f64>, ValuationError> {
        let leg = &self.payload;
        outright_forward(market, leg.currency1.currency, leg.currency2.currency, valuation_date, leg.value_date)
            .map(Some)
    }

    fn has_implied_quote(&self) -> bool {
        true
    }

    fn build_the_product(&self) -> Product {
        Product::FxSingleLeg(self.payload.clone())
    }
}

#[derive(Debug, Clone)]
pub(crate) struct FxSwapPricer {
    pub payload: FxSwap,
}

impl FxSwapPricer {
    pub(crate) fn build(input: &BuildInput<'_>) -> Result<PricerKind, ValuationError> {
        let Product::FxSwap(payload) = &input.trade.product else {
            return Err(input.mismatch(TradeType::FxSwap));
        };
        if payload.far_leg.value_date < payload.near_leg.value_date {
            return Err(ValuationError::Schedule(format!(
                "FX swap far value date {} precedes near value date {}",
                payload.far_leg.value_date, payload.near_leg.value_date
            )));
        }
        Ok(PricerKind::FxSwap(FxSwapPricer {
            payload: payload.clone(),
        }))
    }
}

impl ProductPricer for FxSwapPricer {
    fn payment_currencies(&self) -> Vec<Currency> {
        vec![
            self.payload.near_leg.currency1.currency,
            self.payload.near_leg.currency2.currency,
        ]
    }

    fn expected_cashflows(
        &self,
        common: &PricerCommon,
        valuation_date: Date,
        market: &dyn MarketEnvironment,
    ) -> Result<Vec<CashflowRow>, ValuationError> {
        let mut rows = exchange_rows(common, "Near", &self.payload.near_leg, valuation_date, market)?;
        rows.extend(exchange_rows(common, "Far", &self.payload.far_leg, valuation_date, market)?);
        Ok(rows)
    }

    fn implied_quote(
        &self,
        _common: &PricerCommon,
        valuation_date: Date,
        market: &dyn MarketEnvironment,
    ) -> Result<Option<f64>, ValuationError> {
        let far = &self.payload.far_leg;
        outright_forward(market, far.currency1.currency, far.currency2.currency, valuation_date, far.value_date)
            .map(Some)
    }

    fn has_implied_quote(&self) -> bool {
        true
    }

    fn build_the_product(&self) -> Product {
        Product::FxSwap(self.payload.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use adapter_fpml::{Money, PartyRole, ProductType};
    use approx::assert_relative_eq;
    use pricer_core::market_data::{FlatCurve, MarketSnapshot};
    use std::sync::Arc;

    fn leg(aud: f64, rate: f64, value_date: Date) -> FxSingleLeg {
        FxSingleLeg {
            currency1_payer: PartyRole::Party1,
            currency1: Money::new(aud, Currency::AUD),
            currency2: Money::new(aud * rate, Currency::USD),
            value_date,
        }
    }

    fn market() -> MarketSnapshot {
        MarketSnapshot::new("fx")
            .with_discount_curve(Currency::AUD, Arc::new(FlatCurve::new(0.04)))
            .with_discount_curve(Currency::USD, Arc::new(FlatCurve::new(0.05)))
            .with_fx_rate(Currency::AUD, Currency::USD, 0.65)
    }

    #[test]
    fn test_forward_at_market_is_worthless() {
        let val = d(2025, 1, 2);
        let value_date = d(2026, 1, 2);
        let fwd = outright_forward(&market(), Currency::AUD, Currency::USD, val, value_date).unwrap();
        assert_relative_eq!(fwd, 0.65 * (0.01_f64).exp(), epsilon = 1e-12);

        let pricer = FxSingleLegPricer {
            payload: leg(1_000_000.0, fwd, value_date),
        };
        let c = common(ProductType::FxForward, PartyRole::Party1);
        let rows = pricer.expected_cashflows(&c, val, &market()).unwrap();
        let npv = super::super::cashflow::sum_in_currency(&rows, Currency::AUD, &market(), |r| r.present_value)
            .unwrap();
        assert_relative_eq!(npv, 0.0, epsilon = 1e-6);
        assert_eq!(pricer.implied_quote(&c, val, &market()).unwrap(), Some(fwd));
    }

    #[test]
    fn test_payer_of_currency1_receives_currency2() {
        let pricer = FxSingleLegPricer {
            payload: leg(1_000_000.0, 0.66, d(2025, 1, 2)),
        };
        let rows = pricer
            .expected_cashflows(&common(ProductType::FxSpot, PartyRole::Party1), d(2025, 1, 2), &market())
            .unwrap();
        assert_eq!(rows[0].amount, -1_000_000.0);
        assert_eq!(rows[1].currency, Currency::USD);
        assert_relative_eq!(rows[1].amount, 660_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_fx_swap_near_leg_realised() {
        let mut far = leg(1_000_000.0, 0.655, d(2025, 7, 2));
        far.currency1_payer = PartyRole::Party2;
        let pricer = FxSwapPricer {
            payload: FxSwap {
                near_leg: leg(1_000_000.0, 0.65, d(2025, 1, 2)),
                far_leg: far,
            },
        };
        let rows = pricer
            .expected_cashflows(&common(ProductType::FxSwap, PartyRole::Party1), d(2025, 3, 1), &market())
            .unwrap();
        assert_eq!(rows.len(), 4);
        assert!(rows[0].is_realised && rows[1].is_realised);
        assert_eq!(rows[2].leg, "Far");
        assert_eq!(rows[2].amount, 1_000_000.0);
    }
}
