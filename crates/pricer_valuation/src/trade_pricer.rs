//! Bound trade pricer.

use std::sync::Arc;

use adapter_fpml::{PartyRole, Product, ProductType, Trade, TradeHeader, TradeIdentifier, TradeProperties};
use pricer_core::market_data::MarketEnvironment;
use pricer_core::types::{Currency, Date, StaticCalendarResolver};
use tracing::debug;

use crate::classifier::{Classification, ClassificationPath};
use crate::config::PricerConfig;
use crate::error::ValuationError;
use crate::factory::{CalendarPair, PricerFactory};
use crate::pricers::{CashflowRow, PriceableProduct};
use crate::report::{ValuationReport, ValuationReportAssembler, ValuationReportType};
use crate::reporters::{ProductReporter, ProductSummary, ReportGrid};
use crate::scenario::{MarketScenario, Metric};
use crate::valuator::PartyRelativeValuator;

/// A trade bound to its pricer and reporter.
///
/// Only [`PricerFactory::construct`] creates one, so every value is fully
/// bound. Pricing takes `&self`; a `TradePricer` can be shared across threads.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use adapter_fpml::{
///     keys, AdjustableDate, BulletPayment, Money, Party, PartyRole, Payment, Product, Trade,
///     TradeHeader, TradeProperties,
/// };
/// use pricer_core::market_data::{FlatCurve, MarketSnapshot};
/// use pricer_core::types::{Currency, Date};
/// use pricer_valuation::TradePricer;
///
/// let trade = Trade::new(
///     TradeHeader { trade_id: "BP-1".into(), trade_date: None },
///     [Party::new("p1", "BankA"), Party::new("p2", "BankB")],
///     Product::BulletPayment(BulletPayment {
///         payment: Payment {
///             payer: PartyRole::Party1,
///             receiver: PartyRole::Party2,
///             amount: Money::new(1_000_000.0, Currency::USD),
///             payment_date: AdjustableDate::unadjusted(Date::from_ymd(2026, 3, 20).unwrap()),
///         },
///     }),
/// );
/// let props = TradeProperties::new()
///     .with(keys::PARTY1, "BankA")
///     .with(keys::PARTY2, "BankB");
/// let pricer = TradePricer::new(&trade, &props, &[], None).unwrap();
///
/// let market = Arc::new(
///     MarketSnapshot::new("EOD").with_discount_curve(Currency::USD, Arc::new(FlatCurve::new(0.0))),
/// );
/// let valuation_date = Date::from_ymd(2025, 3, 20).unwrap();
/// let payer = pricer.npv("BankA", Currency::USD, valuation_date, market.clone()).unwrap();
/// let receiver = pricer.npv("BankB", Currency::USD, valuation_date, market).unwrap();
/// assert_eq!(payer, -1_000_000.0);
/// assert_eq!(receiver, 1_000_000.0);
/// ```
#[derive(Debug, Clone)]
pub struct TradePricer {
    product: PriceableProduct,
    reporter: ProductReporter,
    classification: Classification,
    party_names: [String; 2],
    header: TradeHeader,
    config: PricerConfig,
}

impl TradePricer {
    pub(crate) fn from_parts(
        product: PriceableProduct,
        reporter: ProductReporter,
        classification: Classification,
        party_names: [String; 2],
        header: TradeHeader,
        config: PricerConfig,
    ) -> Self {
        Self {
            product,
            reporter,
            classification,
            party_names,
            header,
            config,
        }
    }

    /// Binds `trade` with the default configuration and a calendar resolver
    /// that treats every business centre as weekends only.
    ///
    /// # Errors
    ///
    /// As [`PricerFactory::construct`].
    pub fn new(
        trade: &Trade,
        props: &TradeProperties,
        calendar_pairs: &[CalendarPair],
        forecast_rate_interpolation: Option<bool>,
    ) -> Result<Self, ValuationError> {
        PricerFactory::new(
            Arc::new(StaticCalendarResolver::with_weekend_fallback()),
            PricerConfig::default(),
        )
        .construct(trade, props, calendar_pairs, forecast_rate_interpolation)
    }

    fn metrics_for<'s>(&'s self, scenario: &'s MarketScenario) -> &'s [Metric] {
        if scenario.metrics().is_empty() {
            &self.config.default_metrics
        } else {
            scenario.metrics()
        }
    }

    /// Values the trade under `scenario` from its requesting party's side.
    ///
    /// # Errors
    ///
    /// - `NullPrerequisite` when the scenario has no market environment
    /// - `UnknownParty` when the requesting party is not a counterparty
    /// - `MarketData` and `UnsupportedOperation` from the calculation
    pub fn price(
        &self,
        scenario: &MarketScenario,
        report_type: ValuationReportType,
    ) -> Result<ValuationReport, ValuationError> {
        let valuator = PartyRelativeValuator::new(self.product.base_party(), &self.party_names);
        let valuation = valuator.value(Some(&self.product), scenario, self.metrics_for(scenario))?;
        Ok(ValuationReportAssembler::assemble(
            valuation,
            report_type,
            scenario,
            &self.header,
            &self.product,
        ))
    }

    /// One report per scenario, in scenario order.
    ///
    /// Fails as a whole on the first failing scenario. With the `parallel`
    /// feature, batches of at least `parallel_batch_threshold` scenarios are
    /// priced on the rayon pool.
    ///
    /// # Errors
    ///
    /// As [`price`](Self::price).
    pub fn price_batch(
        &self,
        scenarios: &[MarketScenario],
        report_type: ValuationReportType,
    ) -> Result<Vec<ValuationReport>, ValuationError> {
        debug!(
            trade = %self.product.identifier(),
            scenarios = scenarios.len(),
            report_type = %report_type,
            "Pricing scenario batch"
        );

        #[cfg(feature = "parallel")]
        {
            if scenarios.len() >= self.config.parallel_batch_threshold {
                use rayon::prelude::*;
                return scenarios
                    .par_iter()
                    .map(|scenario| self.price(scenario, report_type))
                    .collect();
            }
        }

        scenarios
            .iter()
            .map(|scenario| self.price(scenario, report_type))
            .collect()
    }

    /// Net present value for `requesting_party` in `reporting_currency`.
    ///
    /// # Errors
    ///
    /// As [`price`](Self::price).
    pub fn npv(
        &self,
        requesting_party: &str,
        reporting_currency: Currency,
        valuation_date: Date,
        market: Arc<dyn MarketEnvironment>,
    ) -> Result<f64, ValuationError> {
        let scenario = MarketScenario::new(market, valuation_date, reporting_currency, requesting_party)
            .with_metrics(vec![Metric::Npv]);
        self.single_quote(&scenario, Metric::Npv)
    }

    /// Market implied quote (par rate, forward, price), reported in the
    /// product's first payment currency.
    ///
    /// # Errors
    ///
    /// `UnsupportedOperation` when the product has no implied quote, otherwise
    /// as [`price`](Self::price).
    pub fn par_rate(
        &self,
        requesting_party: &str,
        valuation_date: Date,
        market: Arc<dyn MarketEnvironment>,
    ) -> Result<f64, ValuationError> {
        let currency = self
            .product
            .payment_currencies()
            .first()
            .copied()
            .ok_or_else(|| {
                ValuationError::UnsupportedOperation(format!(
                    "{} has no payment currency",
                    self.product.product_type()
                ))
            })?;
        let scenario = MarketScenario::new(market, valuation_date, currency, requesting_party)
            .with_metrics(vec![Metric::ImpliedQuote]);
        self.single_quote(&scenario, Metric::ImpliedQuote)
    }

    fn single_quote(&self, scenario: &MarketScenario, metric: Metric) -> Result<f64, ValuationError> {
        let report = self.price(scenario, ValuationReportType::Summary)?;
        report
            .valuation()
            .and_then(|v| v.quote(metric))
            .ok_or_else(|| ValuationError::UnsupportedOperation(format!("{} was not computed", metric)))
    }

    /// Bound pricing strategy.
    pub fn priceable_product(&self) -> &PriceableProduct {
        &self.product
    }

    /// Structural snapshot of the priced product.
    pub fn build_the_product(&self) -> Product {
        self.product.build_the_product()
    }

    /// Classified product type.
    pub fn product_type(&self) -> ProductType {
        self.classification.product_type
    }

    /// Input that decided the product type.
    pub fn classification_path(&self) -> ClassificationPath {
        self.classification.path
    }

    /// Base party.
    pub fn base_party(&self) -> PartyRole {
        self.product.base_party()
    }

    /// Ordered party names.
    pub fn party_names(&self) -> &[String; 2] {
        &self.party_names
    }

    /// Trade identifier.
    pub fn trade_identifier(&self) -> &TradeIdentifier {
        self.product.identifier()
    }

    /// Reporter bound at construction.
    pub fn reporter(&self) -> ProductReporter {
        self.reporter
    }

    /// Key/value summary of the bound product.
    ///
    /// # Errors
    ///
    /// See [`ProductReporter::do_report`].
    pub fn do_report(&self) -> Result<ProductSummary, ValuationError> {
        self.reporter.do_report(&self.product)
    }

    /// Projected cashflows of the bound product.
    ///
    /// # Errors
    ///
    /// See [`ProductReporter::do_expected_cashflow_report`].
    pub fn do_expected_cashflow_report(
        &self,
        valuation_date: Date,
        market: &dyn MarketEnvironment,
    ) -> Result<Vec<CashflowRow>, ValuationError> {
        self.reporter
            .do_expected_cashflow_report(&self.product, valuation_date, market)
    }

    /// Field/value grid of the bound product and `props`.
    ///
    /// # Errors
    ///
    /// See [`ProductReporter::do_product_report`].
    pub fn do_product_report(&self, props: &TradeProperties) -> Result<ReportGrid, ValuationError> {
        self.reporter
            .do_product_report(&self.product.build_the_product(), props)
    }

    /// Spreadsheet style cashflow grid of the bound product.
    ///
    /// # Errors
    ///
    /// See [`ProductReporter::do_xl_report`].
    pub fn do_xl_report(
        &self,
        valuation_date: Date,
        market: &dyn MarketEnvironment,
    ) -> Result<ReportGrid, ValuationError> {
        self.reporter.do_xl_report(&self.product, valuation_date, market)
    }
}
