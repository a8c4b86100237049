//! Market scenarios and valuation results.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use pricer_core::market_data::MarketEnvironment;
use pricer_core::types::{Currency, Date};
use serde::{Deserialize, Serialize};

use crate::error::ValuationError;

/// Measure computed for a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    /// Present value of unrealised cashflows in the reporting currency.
    Npv,
    /// Market implied quote of the product (par rate, forward, price).
    /// Independent of the requesting party.
    ImpliedQuote,
    /// Undiscounted sum of unrealised cashflows in the reporting currency.
    ExpectedValue,
}

impl Metric {
    /// Every metric.
    pub const ALL: [Metric; 3] = [Metric::Npv, Metric::ImpliedQuote, Metric::ExpectedValue];

    /// Measure name as reported.
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Npv => "NPV",
            Metric::ImpliedQuote => "ImpliedQuote",
            Metric::ExpectedValue => "ExpectedValue",
        }
    }

    /// Whether the value changes sign with the requesting party.
    #[inline]
    pub fn is_signed(&self) -> bool {
        !matches!(self, Metric::ImpliedQuote)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = ValuationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Metric::ALL
            .iter()
            .copied()
            .find(|m| m.name().eq_ignore_ascii_case(wanted) || format!("{:?}", m).eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValuationError::InvalidEnumValue {
                field: "Metric".to_string(),
                value: s.to_string(),
            })
    }
}

/// Sign applied to a valuation to express it from the requesting party's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Multiplier {
    /// +1: the requesting party is the base party. Identity value.
    #[default]
    Positive,
    /// -1: the requesting party is the other counterparty.
    Negative,
    /// 0: counterparty agnostic valuation.
    Neutral,
}

impl Multiplier {
    /// Numeric value: +1, -1 or 0.
    #[inline]
    pub fn value(&self) -> f64 {
        match self {
            Multiplier::Positive => 1.0,
            Multiplier::Negative => -1.0,
            Multiplier::Neutral => 0.0,
        }
    }

    /// Scales `amount`. `Neutral` yields exactly `0.0`.
    #[inline]
    pub fn apply(&self, amount: f64) -> f64 {
        match self {
            Multiplier::Positive => amount,
            Multiplier::Negative => -amount,
            Multiplier::Neutral => 0.0,
        }
    }
}

/// One computed measure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quotation {
    /// Measure
    pub measure: Metric,
    /// Value
    pub value: f64,
    /// Currency of the value; `None` for rates and prices
    pub currency: Option<Currency>,
    /// Valuation date
    pub valuation_date: Date,
}

/// Measures computed for one trade under one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetValuation {
    /// Trade reference, `source.id`
    pub object_reference: String,
    /// Computed measures in request order
    pub quotes: Vec<Quotation>,
}

impl AssetValuation {
    /// Value of `metric`, if it was computed.
    pub fn quote(&self, metric: Metric) -> Option<f64> {
        self.quotes
            .iter()
            .find(|q| q.measure == metric)
            .map(|q| q.value)
    }
}

/// One immutable bundle of market data, valuation date, reporting currency
/// and requesting party.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use pricer_core::market_data::MarketSnapshot;
/// use pricer_core::types::{Currency, Date};
/// use pricer_valuation::{MarketScenario, Metric};
///
/// let scenario = MarketScenario::new(
///     Arc::new(MarketSnapshot::new("EOD")),
///     Date::from_ymd(2025, 6, 30).unwrap(),
///     Currency::AUD,
///     "BankB",
/// )
/// .with_metrics(vec![Metric::Npv, Metric::ImpliedQuote]);
///
/// assert_eq!(scenario.requesting_party(), "BankB");
/// assert!(scenario.market().is_ok());
/// ```
#[derive(Clone)]
pub struct MarketScenario {
    market: Option<Arc<dyn MarketEnvironment>>,
    valuation_date: Date,
    reporting_currency: Currency,
    requesting_party: String,
    metrics: Vec<Metric>,
    counterparty_neutral: bool,
}

impl MarketScenario {
    /// Creates a scenario over `market`.
    pub fn new(
        market: Arc<dyn MarketEnvironment>,
        valuation_date: Date,
        reporting_currency: Currency,
        requesting_party: impl Into<String>,
    ) -> Self {
        Self {
            market: Some(market),
            valuation_date,
            reporting_currency,
            requesting_party: requesting_party.into(),
            metrics: Vec::new(),
            counterparty_neutral: false,
        }
    }

    /// Creates a scenario with no market environment. Pricing it fails.
    pub fn without_market(
        valuation_date: Date,
        reporting_currency: Currency,
        requesting_party: impl Into<String>,
    ) -> Self {
        Self {
            market: None,
            valuation_date,
            reporting_currency,
            requesting_party: requesting_party.into(),
            metrics: Vec::new(),
            counterparty_neutral: false,
        }
    }

    /// Requests `metrics`. An empty list means the configured defaults.
    pub fn with_metrics(mut self, metrics: Vec<Metric>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Marks the valuation counterparty agnostic.
    pub fn with_counterparty_neutral(mut self, neutral: bool) -> Self {
        self.counterparty_neutral = neutral;
        self
    }

    /// Market environment.
    ///
    /// # Errors
    ///
    /// `NullPrerequisite` when the scenario carries none.
    pub fn market(&self) -> Result<&dyn MarketEnvironment, ValuationError> {
        self.market
            .as_deref()
            .ok_or(ValuationError::NullPrerequisite("market environment"))
    }

    /// Returns `true` when a market environment is attached.
    #[inline]
    pub fn has_market(&self) -> bool {
        self.market.is_some()
    }

    /// Valuation date.
    #[inline]
    pub fn valuation_date(&self) -> Date {
        self.valuation_date
    }

    /// Reporting currency.
    #[inline]
    pub fn reporting_currency(&self) -> Currency {
        self.reporting_currency
    }

    /// Requesting party: a role (`Party1`/`Party2`) or a party name.
    #[inline]
    pub fn requesting_party(&self) -> &str {
        &self.requesting_party
    }

    /// Requested metrics; empty means the configured defaults.
    #[inline]
    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    /// Counterparty agnostic flag.
    #[inline]
    pub fn is_counterparty_neutral(&self) -> bool {
        self.counterparty_neutral
    }
}

impl fmt::Debug for MarketScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarketScenario")
            .field("market", &self.market.as_ref().map(|m| m.name().to_string()))
            .field("valuation_date", &self.valuation_date)
            .field("reporting_currency", &self.reporting_currency)
            .field("requesting_party", &self.requesting_party)
            .field("metrics", &self.metrics)
            .field("counterparty_neutral", &self.counterparty_neutral)
            .finish()
    }
}
