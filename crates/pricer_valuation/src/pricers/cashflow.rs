//! Projected cashflows.

use std::fmt;

use pricer_core::market_data::MarketEnvironment;
use pricer_core::types::{Currency, Date};
use serde::Serialize;

use crate::error::ValuationError;

/// What a cashflow pays for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CashflowKind {
    /// Fixed rate coupon
    FixedCoupon,
    /// Floating rate coupon
    FloatingCoupon,
    /// Principal or notional exchange
    Principal,
    /// Single fixed payment
    Payment,
    /// Upfront option premium
    Premium,
    /// Value of the delivered asset
    Delivery,
    /// Expected option payoff
    OptionPayoff,
    /// Variation margin or contract settlement
    Settlement,
}

impl CashflowKind {
    /// Name as shown in reports.
    pub fn name(&self) -> &'static str {
        match self {
            CashflowKind::FixedCoupon => "FixedRateCoupon",
            CashflowKind::FloatingCoupon => "FloatingRateCoupon",
            CashflowKind::Principal => "PrincipalExchange",
            CashflowKind::Payment => "Payment",
            CashflowKind::Premium => "Premium",
            CashflowKind::Delivery => "Delivery",
            CashflowKind::OptionPayoff => "OptionPayoff",
            CashflowKind::Settlement => "Settlement",
        }
    }
}

impl fmt::Display for CashflowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One projected cashflow, signed from the base party's side
/// (positive when the base party receives).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashflowRow {
    /// Leg or stream label
    pub leg: String,
    /// Cashflow type
    pub kind: CashflowKind,
    /// Accrual notional
    pub notional: Option<f64>,
    /// Accrual rate (fixed, projected or strike)
    pub rate: Option<f64>,
    /// Payment currency
    pub currency: Currency,
    /// Accrual start
    pub accrual_start: Option<Date>,
    /// Accrual end
    pub accrual_end: Option<Date>,
    /// Accrual year fraction
    pub year_fraction: Option<f64>,
    /// Adjusted payment date
    pub payment_date: Date,
    /// Undiscounted amount
    pub amount: f64,
    /// Discount factor to the payment date; zero once realised
    pub discount_factor: f64,
    /// Discounted amount; zero once realised
    pub present_value: f64,
    /// Settled at accrual start, discounted at the accrual rate
    pub is_discounted: bool,
    /// Paid on or before the valuation date
    pub is_realised: bool,
}

impl CashflowRow {
    /// A flow of `amount` on `payment_date`, not yet discounted.
    pub fn new(
        leg: impl Into<String>,
        kind: CashflowKind,
        currency: Currency,
        payment_date: Date,
        amount: f64,
    ) -> Self {
        Self {
            leg: leg.into(),
            kind,
            notional: None,
            rate: None,
            currency,
            accrual_start: None,
            accrual_end: None,
            year_fraction: None,
            payment_date,
            amount,
            discount_factor: 0.0,
            present_value: 0.0,
            is_discounted: false,
            is_realised: false,
        }
    }

    /// Sets the accrual period.
    pub fn with_accrual(mut self, start: Date, end: Date, year_fraction: f64) -> Self {
        self.accrual_start = Some(start);
        self.accrual_end = Some(end);
        self.year_fraction = Some(year_fraction);
        self
    }

    /// Sets the notional.
    pub fn with_notional(mut self, notional: f64) -> Self {
        self.notional = Some(notional);
        self
    }

    /// Sets the rate.
    pub fn with_rate(mut self, rate: Option<f64>) -> Self {
        self.rate = rate;
        self
    }

    /// Marks the flow as settled at accrual start.
    pub fn discounted_settlement(mut self) -> Self {
        self.is_discounted = true;
        self
    }

    /// Discounts the flow to `valuation_date`. Flows paid before the
    /// valuation date are realised and carry no value.
    ///
    /// # Errors
    ///
    /// `MarketData` when the payment currency has no discount curve.
    pub fn discount(
        mut self,
        valuation_date: Date,
        market: &dyn MarketEnvironment,
    ) -> Result<Self, ValuationError> {
        if self.payment_date < valuation_date {
            self.is_realised = true;
            self.discount_factor = 0.0;
            self.present_value = 0.0;
            return Ok(self);
        }
        self.discount_factor =
            market.discount_factor(self.currency, valuation_date, self.payment_date)?;
        self.present_value = self.amount * self.discount_factor;
        Ok(self)
    }

    /// Undiscounted amount still to be paid.
    #[inline]
    pub fn expected_amount(&self) -> f64 {
        if self.is_realised {
            0.0
        } else {
            self.amount
        }
    }
}

/// Sums `value` over `rows`, converting each into `currency` at spot.
pub(crate) fn sum_in_currency<F>(
    rows: &[CashflowRow],
    currency: Currency,
    market: &dyn MarketEnvironment,
    value: F,
) -> Result<f64, ValuationError>
where
    F: Fn(&CashflowRow) -> f64,
{
    let mut total = 0.0;
    for row in rows {
        let v = value(row);
        if v == 0.0 {
            continue;
        }
        let fx = if row.currency == currency {
            1.0
        } else {
            market.fx_rate(row.currency, currency)?
        };
        total += v * fx;
    }
    Ok(total)
}
