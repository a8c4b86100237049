//! European swaption, priced with Black-76 on the forward swap rate.

use adapter_fpml::{LegRate, OptionType, Product, Swaption, TradeType};
use pricer_core::market_data::{year_fraction, MarketEnvironment};
use pricer_core::types::{Currency, Date};

use super::black::black_price;
use super::cap_floor::premium_row;
use super::swap::{annuity, LegSchedule};
use super::{forward_rate, CashflowKind, CashflowRow, PricerCommon, PricerKind, ProductPricer};
use crate::error::ValuationError;
use crate::factory::BuildInput;

#[derive(Debug, Clone)]
pub(crate) struct SwaptionPricer {
    pub payload: Swaption,
    pub effective_date: Date,
    pub schedules: Vec<LegSchedule>,
    fixed_index: usize,
    floating_index: usize,
}

impl SwaptionPricer {
    pub(crate) fn build(input: &BuildInput<'_>) -> Result<PricerKind, ValuationError> {
        let Product::Swaption(payload) = &input.trade.product else {
            return Err(input.mismatch(TradeType::Swaption));
        };
        let effective_date = input.effective_date()?;
        let legs = &payload.swap.legs;
        let fixed_index = legs.iter().position(|l| l.is_fixed()).ok_or_else(|| {
            ValuationError::UnsupportedOperation("Swaption underlying has no fixed leg".to_string())
        })?;
        let floating_index = legs.iter().position(|l| !l.is_fixed()).ok_or_else(|| {
            ValuationError::UnsupportedOperation("Swaption underlying has no floating leg".to_string())
        })?;
        let schedules = legs
            .iter()
            .map(|leg| LegSchedule::build(leg, None))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PricerKind::Swaption(SwaptionPricer {
            payload: payload.clone(),
            effective_date,
            schedules,
            fixed_index,
            floating_index,
        }))
    }

    fn index(&self) -> &str {
        match &self.payload.swap.legs[self.floating_index].rate {
            LegRate::Floating { index, .. } => index,
            LegRate::Fixed(_) => "",
        }
    }

    fn strike(&self) -> f64 {
        match self.payload.swap.legs[self.fixed_index].rate {
            LegRate::Fixed(rate) => rate,
            LegRate::Floating { .. } => 0.0,
        }
    }

    /// Payer swaption when the holder pays the fixed leg.
    fn option_type(&self) -> OptionType {
        if self.payload.buyer == self.payload.swap.legs[self.fixed_index].payer {
            OptionType::Call
        } else {
            OptionType::Put
        }
    }

    /// Forward swap rate and notional weighted fixed leg annuity.
    fn forward_swap_rate(
        &self,
        common: &PricerCommon,
        valuation_date: Date,
        market: &dyn MarketEnvironment,
    ) -> Result<(f64, f64), ValuationError> {
        let fixed = &self.payload.swap.legs[self.fixed_index];
        let floating = &self.payload.swap.legs[self.floating_index];
        let annuity = annuity(fixed, &self.schedules[self.fixed_index], valuation_date, market)?;
        if annuity == 0.0 {
            return Ok((0.0, 0.0));
        }

        let LegRate::Floating { index, spread } = &floating.rate else {
            return Ok((0.0, annuity));
        };
        let currency = floating.notional.currency;
        let curve = common.projection_curve(market, index, currency)?;
        let mut floating_pv = 0.0;
        for period in &self.schedules[self.floating_index].periods {
            let Some(f) = forward_rate(curve, valuation_date, period.start(), period.end(), floating.day_count)?
            else {
                continue;
            };
            let df = market.discount_factor(currency, valuation_date, period.payment())?;
            floating_pv += floating.notional.amount * (f + spread) * period.year_fraction() * df;
        }
        if currency != fixed.notional.currency {
            floating_pv *= market.fx_rate(currency, fixed.notional.currency)?;
        }
        Ok((floating_pv / annuity, annuity))
    }
}

impl ProductPricer for SwaptionPricer {
    fn payment_currencies(&self) -> Vec<Currency> {
        let mut out = vec![self.payload.swap.legs[self.fixed_index].notional.currency];
        if let Some(premium) = &self.payload.premium {
            if !out.contains(&premium.amount.currency) {
                out.push(premium.amount.currency);
            }
        }
        out
    }

    /// The option value as a single flow on the expiry date.
    fn expected_cashflows(
        &self,
        common: &PricerCommon,
        valuation_date: Date,
        market: &dyn MarketEnvironment,
    ) -> Result<Vec<CashflowRow>, ValuationError> {
        let fixed = &self.payload.swap.legs[self.fixed_index];
        let currency = fixed.notional.currency;
        let expiry_date = self.payload.expiry_date;
        let (forward, annuity) = self.forward_swap_rate(common, valuation_date, market)?;

        let expiry = year_fraction(valuation_date, expiry_date);
        let vol = if expiry > 0.0 {
            market.volatility(self.index())?
        } else {
            0.0
        };
        let pv = annuity * black_price(self.option_type(), forward, self.strike(), vol, expiry);
        let df_expiry = market.discount_factor(currency, valuation_date, expiry_date)?;
        let amount = if df_expiry > 0.0 { pv / df_expiry } else { 0.0 };

        let mut rows = vec![CashflowRow::new(
            "Option",
            CashflowKind::OptionPayoff,
            currency,
            expiry_date,
            common.sign_received_by(self.payload.buyer) * amount,
        )
        .with_notional(fixed.notional.amount)
        .with_rate(Some(self.strike()))];
        if let Some(premium) = &self.payload.premium {
            rows.push(premium_row(common, premium, premium.payment_date.unadjusted_date));
        }
        rows.into_iter()
            .map(|row| row.discount(valuation_date, market))
            .collect()
    }

    fn implied_quote(
        &self,
        common: &PricerCommon,
        valuation_date: Date,
        market: &dyn MarketEnvironment,
    ) -> Result<Option<f64>, ValuationError> {
        let (forward, annuity) = self.forward_swap_rate(common, valuation_date, market)?;
        Ok((annuity != 0.0).then_some(forward))
    }

    fn has_implied_quote(&self) -> bool {
        true
    }

    fn build_the_product(&self) -> Product {
        Product::Swaption(self.payload.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::super::swap::tests::vanilla;
    use super::super::test_support::*;
    use super::*;
    use adapter_fpml::{PartyRole, ProductType};
    use approx::assert_relative_eq;

    fn pricer(buyer: PartyRole, strike: f64) -> SwaptionPricer {
        let underlying = vanilla(strike);
        SwaptionPricer {
            payload: Swaption {
                buyer,
                seller: buyer.other(),
                swap: underlying.payload,
                expiry_date: d(2025, 1, 13),
                premium: None,
            },
            effective_date: d(2025, 1, 15),
            schedules: underlying.schedules,
            fixed_index: 0,
            floating_index: 1,
        }
    }

    #[test]
    fn test_forward_swap_rate_matches_par_rate() {
        let market = flat_market(0.04).with_volatility("AUD-BBSW-6M", 0.2);
        let c = common(ProductType::InterestRateSwaption, PartyRole::Party1);
        let val = d(2024, 7, 15);
        let forward = pricer(PartyRole::Party1, 0.04).implied_quote(&c, val, &market).unwrap().unwrap();
        let par = vanilla(0.04).implied_quote(&c, val, &market).unwrap().unwrap();
        assert_relative_eq!(forward, par, epsilon = 1e-10);
    }

    #[test]
    fn test_payer_minus_receiver_is_forward_swap() {
        let market = flat_market(0.04).with_volatility("AUD-BBSW-6M", 0.2);
        let val = d(2024, 7, 15);
        // Party1 pays fixed on the underlying
        let payer = pricer(PartyRole::Party1, 0.045);
        let receiver = pricer(PartyRole::Party2, 0.045);
        let c = common(ProductType::InterestRateSwaption, PartyRole::Party1);
        let p = total_pv(&payer.expected_cashflows(&c, val, &market).unwrap());
        let c2 = common(ProductType::InterestRateSwaption, PartyRole::Party2);
        let r = total_pv(&receiver.expected_cashflows(&c2, val, &market).unwrap());
        let swap = total_pv(&vanilla(0.045).expected_cashflows(&c, val, &market).unwrap());
        assert_eq!(payer.option_type(), OptionType::Call);
        assert_eq!(receiver.option_type(), OptionType::Put);
        assert_relative_eq!(p - r, swap, epsilon = 1e-2);
    }
}
