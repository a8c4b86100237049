//! Product pricers.
//!
//! One pricer per product family, dispatched statically through
//! `PricerKind`. Every pricer projects its cashflows from the base party's
//! side; [`PriceableProduct::calculate`] aggregates them into metrics and
//! applies the requested `Multiplier`. Calculation takes `&self` and keeps
//! no per call state.
//!
//! | Pricer | Payload | Implied quote |
//! |---|---|---|
//! | `PropertyPricer` | property purchase | market value |
//! | `LeasePricer` | rent schedule | - |
//! | `EquityPricer` | share purchase | share price |
//! | `BondPricer` | bond purchase | model clean price |
//! | `FuturePricer` | futures position | market price |
//! | `SwapPricer` | swap legs | fixed leg par rate |
//! | `FraPricer` | FRA | forward rate |
//! | `CapFloorPricer` | caplets / floorlets | - |
//! | `FxSingleLegPricer` | FX spot / forward | outright forward |
//! | `FxSwapPricer` | near and far exchange | far outright forward |
//! | `FxOptionPricer` | European FX option | outright forward |
//! | `BulletPaymentPricer` | one payment | - |
//! | `SwaptionPricer` | European swaption | forward swap rate |
//! | `TermDepositPricer` | deposit | par deposit rate |

mod black;
mod cashflow;
pub(crate) mod schedule;

mod bond;
mod bullet;
mod cap_floor;
mod deposit;
mod equity;
mod fra;
mod future;
mod fx;
mod fx_option;
mod lease;
mod property;
mod swap;
mod swaption;

pub(crate) use bond::BondPricer;
pub(crate) use bullet::BulletPaymentPricer;
pub(crate) use cap_floor::CapFloorPricer;
pub use cashflow::{CashflowKind, CashflowRow};
pub(crate) use deposit::TermDepositPricer;
pub(crate) use equity::EquityPricer;
pub(crate) use fra::FraPricer;
pub(crate) use future::FuturePricer;
pub(crate) use fx::{FxSingleLegPricer, FxSwapPricer};
pub(crate) use fx_option::FxOptionPricer;
pub(crate) use lease::LeasePricer;
pub(crate) use property::PropertyPricer;
pub(crate) use swap::SwapPricer;
pub(crate) use swaption::SwaptionPricer;

use adapter_fpml::{PartyRole, Product, ProductType, TradeIdentifier};
use pricer_core::market_data::{year_fraction, MarketEnvironment, YieldCurve};
use pricer_core::types::{Currency, Date, DayCountConvention};
use tracing::trace;

use crate::error::ValuationError;
use crate::scenario::{AssetValuation, MarketScenario, Metric, Multiplier, Quotation};

/// Behaviour shared by every product pricer.
pub(crate) trait ProductPricer {
    /// Currencies of the product's payments, in payload order.
    fn payment_currencies(&self) -> Vec<Currency>;

    /// Projected and discounted cashflows from the base party's side.
    fn expected_cashflows(
        &self,
        common: &PricerCommon,
        valuation_date: Date,
        market: &dyn MarketEnvironment,
    ) -> Result<Vec<CashflowRow>, ValuationError>;

    /// Market implied quote, `None` when the product has none.
    fn implied_quote(
        &self,
        _common: &PricerCommon,
        _valuation_date: Date,
        _market: &dyn MarketEnvironment,
    ) -> Result<Option<f64>, ValuationError> {
        Ok(None)
    }

    /// Whether `implied_quote` can return a value.
    fn has_implied_quote(&self) -> bool {
        false
    }

    /// Structural snapshot of the priced product.
    fn build_the_product(&self) -> Product;
}

/// Parameterisation shared by every pricer.
#[derive(Debug, Clone)]
pub(crate) struct PricerCommon {
    /// Resolved product type
    pub product_type: ProductType,
    /// Product identifier
    pub identifier: TradeIdentifier,
    /// Party whose side the cashflows are projected from
    pub base_party: PartyRole,
    /// Ordered party names, once attached
    pub party_names: Option<[String; 2]>,
    /// Whether the trade carries collateral terms, once attached
    pub is_collateralised: bool,
    /// Project floating rates off index forecast curves
    pub forecast_rate_interpolation: bool,
}

impl PricerCommon {
    /// Cashflow sign for a flow received by `receiver`.
    #[inline]
    pub(crate) fn sign_received_by(&self, receiver: PartyRole) -> f64 {
        if receiver == self.base_party {
            1.0
        } else {
            -1.0
        }
    }

    /// Curve floating rates on `index` are projected from.
    pub(crate) fn projection_curve<'m>(
        &self,
        market: &'m dyn MarketEnvironment,
        index: &str,
        currency: Currency,
    ) -> Result<&'m dyn YieldCurve<f64>, ValuationError> {
        if self.forecast_rate_interpolation {
            Ok(market.forecast_curve(index)?)
        } else {
            Ok(market.discount_curve(currency)?)
        }
    }
}

/// Simply compounded forward rate over `[start, end]` on `curve`, accrued
/// under `day_count`. Periods already started project from the valuation date.
pub(crate) fn forward_rate(
    curve: &dyn YieldCurve<f64>,
    valuation_date: Date,
    start: Date,
    end: Date,
    day_count: DayCountConvention,
) -> Result<Option<f64>, ValuationError> {
    let t1 = year_fraction(valuation_date, start).max(0.0);
    let t2 = year_fraction(valuation_date, end);
    let tau = day_count.year_fraction_dates(start, end);
    if t2 <= t1 || tau <= 0.0 {
        return Ok(None);
    }
    let df1 = curve.discount_factor(t1)?;
    let df2 = curve.discount_factor(t2)?;
    Ok(Some((df1 / df2 - 1.0) / tau))
}

/// Product pricer bound to a trade.
#[derive(Debug, Clone)]
pub(crate) enum PricerKind {
    PropertyTransaction(PropertyPricer),
    LeaseTransaction(LeasePricer),
    EquityTransaction(EquityPricer),
    BondTransaction(BondPricer),
    FutureTransaction(FuturePricer),
    Swap(SwapPricer),
    Fra(FraPricer),
    CapFloor(CapFloorPricer),
    FxSingleLeg(FxSingleLegPricer),
    FxSwap(FxSwapPricer),
    FxOption(FxOptionPricer),
    BulletPayment(BulletPaymentPricer),
    Swaption(SwaptionPricer),
    TermDeposit(TermDepositPricer),
}

macro_rules! dispatch {
    ($kind:expr, $p:ident => $call:expr) => {
        match $kind {
            PricerKind::PropertyTransaction($p) => $call,
            PricerKind::LeaseTransaction($p) => $call,
            PricerKind::EquityTransaction($p) => $call,
            PricerKind::BondTransaction($p) => $call,
            PricerKind::FutureTransaction($p) => $call,
            PricerKind::Swap($p) => $call,
            PricerKind::Fra($p) => $call,
            PricerKind::CapFloor($p) => $call,
            PricerKind::FxSingleLeg($p) => $call,
            PricerKind::FxSwap($p) => $call,
            PricerKind::FxOption($p) => $call,
            PricerKind::BulletPayment($p) => $call,
            PricerKind::Swaption($p) => $call,
            PricerKind::TermDeposit($p) => $call,
        }
    };
}

/// Pricing strategy bound to one trade.
///
/// Built by the [`PricerFactory`](crate::PricerFactory); never constructed
/// half way. The valuation sign is an argument of [`calculate`](Self::calculate),
/// so [`multiplier`](Self::multiplier) always reports the identity value.
#[derive(Debug, Clone)]
pub struct PriceableProduct {
    common: PricerCommon,
    kind: PricerKind,
}

impl PriceableProduct {
    pub(crate) fn new(common: PricerCommon, kind: PricerKind) -> Self {
        Self { common, kind }
    }

    pub(crate) fn kind(&self) -> &PricerKind {
        &self.kind
    }

    pub(crate) fn common(&self) -> &PricerCommon {
        &self.common
    }

    /// Attaches the ordered party names and the collateral flag.
    pub(crate) fn attach_party_context(&mut self, party_names: [String; 2], is_collateralised: bool) {
        self.common.party_names = Some(party_names);
        self.common.is_collateralised = is_collateralised;
    }

    /// Resolved product type.
    #[inline]
    pub fn product_type(&self) -> ProductType {
        self.common.product_type
    }

    /// Product identifier.
    #[inline]
    pub fn identifier(&self) -> &TradeIdentifier {
        &self.common.identifier
    }

    /// Base party.
    #[inline]
    pub fn base_party(&self) -> PartyRole {
        self.common.base_party
    }

    /// Ordered party names, when attached at construction.
    #[inline]
    pub fn party_names(&self) -> Option<&[String; 2]> {
        self.common.party_names.as_ref()
    }

    /// Collateral flag, when attached at construction.
    #[inline]
    pub fn is_collateralised(&self) -> bool {
        self.common.is_collateralised
    }

    /// Standing multiplier. Always [`Multiplier::Positive`].
    ///
    /// The party multiplier is an argument of [`calculate`](Self::calculate)
    /// and is never stored, so this value is constant. Perspective tests compare
    /// repeated valuations instead of reading it back.
    #[inline]
    pub fn multiplier(&self) -> Multiplier {
        Multiplier::Positive
    }

    /// Payment currencies in payload order.
    pub fn payment_currencies(&self) -> Vec<Currency> {
        dispatch!(&self.kind, p => p.payment_currencies())
    }

    /// Metrics this product can compute.
    pub fn supported_metrics(&self) -> Vec<Metric> {
        let has_quote = dispatch!(&self.kind, p => p.has_implied_quote());
        Metric::ALL
            .iter()
            .copied()
            .filter(|m| *m != Metric::ImpliedQuote || has_quote)
            .collect()
    }

    /// Projected cashflows from the base party's side.
    pub fn expected_cashflows(
        &self,
        valuation_date: Date,
        market: &dyn MarketEnvironment,
    ) -> Result<Vec<CashflowRow>, ValuationError> {
        dispatch!(&self.kind, p => p.expected_cashflows(&self.common, valuation_date, market))
    }

    /// Market implied quote.
    ///
    /// # Errors
    ///
    /// `UnsupportedOperation` when the product has no implied quote.
    pub fn implied_quote(
        &self,
        valuation_date: Date,
        market: &dyn MarketEnvironment,
    ) -> Result<f64, ValuationError> {
        dispatch!(&self.kind, p => p.implied_quote(&self.common, valuation_date, market))?
            .ok_or_else(|| {
                ValuationError::UnsupportedOperation(format!(
                    "{} has no implied quote",
                    self.common.product_type
                ))
            })
    }

    /// Structural snapshot of the product.
    pub fn build_the_product(&self) -> Product {
        dispatch!(&self.kind, p => p.build_the_product())
    }

    /// Computes `metrics` under `scenario`, scaled by `multiplier`.
    ///
    /// # Errors
    ///
    /// `NullPrerequisite` without a market environment, `MarketData` for
    /// missing curves or quotes, `UnsupportedOperation` for an implied quote
    /// the product does not have.
    pub fn calculate(
        &self,
        scenario: &MarketScenario,
        metrics: &[Metric],
        multiplier: Multiplier,
    ) -> Result<AssetValuation, ValuationError> {
        let market = scenario.market()?;
        let valuation_date = scenario.valuation_date();
        let reporting = scenario.reporting_currency();

        let needs_cashflows = metrics.iter().any(|m| m.is_signed());
        let rows = if needs_cashflows {
            self.expected_cashflows(valuation_date, market)?
        } else {
            Vec::new()
        };

        let mut quotes = Vec::with_capacity(metrics.len());
        for metric in metrics {
            let (value, currency) = match metric {
                Metric::Npv => {
                    let pv = cashflow::sum_in_currency(&rows, reporting, market, |r| r.present_value)?;
                    (multiplier.apply(pv), Some(reporting))
                }
                Metric::ExpectedValue => {
                    let ev =
                        cashflow::sum_in_currency(&rows, reporting, market, |r| r.expected_amount())?;
                    (multiplier.apply(ev), Some(reporting))
                }
                Metric::ImpliedQuote => (self.implied_quote(valuation_date, market)?, None),
            };
            quotes.push(Quotation {
                measure: *metric,
                value,
                currency,
                valuation_date,
            });
        }

        trace!(
            trade = %self.common.identifier,
            multiplier = multiplier.value(),
            metrics = quotes.len(),
            "Calculated valuation"
        );

        Ok(AssetValuation {
            object_reference: self.common.identifier.unique_identifier(),
            quotes,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use approx::assert_relative_eq;
    use pricer_core::market_data::FlatCurve;

    #[test]
    fn test_forward_rate_on_flat_curve() {
        let curve = FlatCurve::new(0.05);
        let f = forward_rate(
            &curve,
            d(2025, 1, 1),
            d(2026, 1, 1),
            d(2027, 1, 1),
            DayCountConvention::ActualActual365,
        )
        .unwrap()
        .unwrap();
        assert_relative_eq!(f, 0.05_f64.exp() - 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_forward_rate_of_elapsed_period() {
        let curve = FlatCurve::new(0.05);
        let f = forward_rate(
            &curve,
            d(2025, 1, 1),
            d(2024, 1, 1),
            d(2024, 7, 1),
            DayCountConvention::ActualActual365,
        )
        .unwrap();
        assert_eq!(f, None);
    }

    #[test]
    fn test_sign_received_by() {
        let c = common(ProductType::BulletPayment, PartyRole::Party2);
        assert_eq!(c.sign_received_by(PartyRole::Party2), 1.0);
        assert_eq!(c.sign_received_by(PartyRole::Party1), -1.0);
    }
}
