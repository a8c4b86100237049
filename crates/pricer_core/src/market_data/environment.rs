//! Market environments consumed by product pricers.
//!
//! A [`MarketEnvironment`] is a read-only view over everything a pricer may
//! look up for one valuation: discount curves per currency, forecast curves
//! per rate index, FX spot rates, asset prices and volatilities.
//! [`MarketSnapshot`] is the in-memory implementation, assembled with
//! builder-style `with_*` methods.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::curves::YieldCurve;
use super::error::MarketDataError;
use crate::types::{Currency, Date, DayCountConvention};

/// Shared, thread-safe curve handle.
pub type CurveHandle = Arc<dyn YieldCurve<f64> + Send + Sync>;

/// Time basis used to convert dates into curve time.
const CURVE_BASIS: DayCountConvention = DayCountConvention::ActualActual365;

/// Read-only market data for a single valuation.
pub trait MarketEnvironment: Send + Sync {
    /// Environment name, e.g. the scenario or curve set it was built from.
    fn name(&self) -> &str;

    /// Discount curve for cashflows paid in `currency`.
    fn discount_curve(&self, currency: Currency) -> Result<&dyn YieldCurve<f64>, MarketDataError>;

    /// Forecast curve for a floating rate index.
    fn forecast_curve(&self, index: &str) -> Result<&dyn YieldCurve<f64>, MarketDataError>;

    /// Units of `to` per unit of `from`.
    fn fx_rate(&self, from: Currency, to: Currency) -> Result<f64, MarketDataError>;

    /// Spot price for an asset identifier (equity ticker, bond, property, future code).
    fn asset_price(&self, asset: &str) -> Result<f64, MarketDataError>;

    /// Black volatility for a key (index, currency pair or asset identifier).
    fn volatility(&self, key: &str) -> Result<f64, MarketDataError>;

    /// Discount factor from `valuation_date` to `payment_date` in `currency`.
    ///
    /// Dates on or before the valuation date discount at par.
    fn discount_factor(
        &self,
        currency: Currency,
        valuation_date: Date,
        payment_date: Date,
    ) -> Result<f64, MarketDataError> {
        let t = year_fraction(valuation_date, payment_date);
        if t <= 0.0 {
            return Ok(1.0);
        }
        self.discount_curve(currency)?.discount_factor(t)
    }
}

/// Curve time between two dates.
#[inline]
pub fn year_fraction(from: Date, to: Date) -> f64 {
    CURVE_BASIS.year_fraction_dates(from, to)
}

/// In-memory [`MarketEnvironment`].
///
/// FX lookups try the direct quote, then its inverse, then a cross through USD.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use pricer_core::market_data::{FlatCurve, MarketEnvironment, MarketSnapshot};
/// use pricer_core::types::Currency;
///
/// let market = MarketSnapshot::new("EOD")
///     .with_discount_curve(Currency::AUD, Arc::new(FlatCurve::new(0.04)))
///     .with_fx_rate(Currency::AUD, Currency::USD, 0.65)
///     .with_fx_rate(Currency::EUR, Currency::USD, 1.10);
///
/// assert!((market.fx_rate(Currency::USD, Currency::AUD).unwrap() - 1.0 / 0.65).abs() < 1e-12);
/// assert!((market.fx_rate(Currency::EUR, Currency::AUD).unwrap() - 1.10 / 0.65).abs() < 1e-12);
/// assert!(market.discount_curve(Currency::GBP).is_err());
/// ```
#[derive(Clone, Default)]
pub struct MarketSnapshot {
    name: String,
    discount_curves: HashMap<Currency, CurveHandle>,
    forecast_curves: HashMap<String, CurveHandle>,
    fx_rates: HashMap<(Currency, Currency), f64>,
    asset_prices: HashMap<String, f64>,
    volatilities: HashMap<String, f64>,
}

impl MarketSnapshot {
    /// Creates an empty snapshot.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds the discount curve for a currency.
    pub fn with_discount_curve(mut self, currency: Currency, curve: CurveHandle) -> Self {
        self.discount_curves.insert(currency, curve);
        self
    }

    /// Adds the forecast curve for a rate index.
    pub fn with_forecast_curve(mut self, index: impl Into<String>, curve: CurveHandle) -> Self {
        self.forecast_curves.insert(index.into(), curve);
        self
    }

    /// Adds an FX quote: units of `to` per unit of `from`.
    pub fn with_fx_rate(mut self, from: Currency, to: Currency, rate: f64) -> Self {
        self.fx_rates.insert((from, to), rate);
        self
    }

    /// Adds an asset price.
    pub fn with_asset_price(mut self, asset: impl Into<String>, price: f64) -> Self {
        self.asset_prices.insert(asset.into(), price);
        self
    }

    /// Adds a volatility quote.
    pub fn with_volatility(mut self, key: impl Into<String>, vol: f64) -> Self {
        self.volatilities.insert(key.into(), vol);
        self
    }

    fn direct_or_inverse(&self, from: Currency, to: Currency) -> Option<f64> {
        if from == to {
            return Some(1.0);
        }
        if let Some(rate) = self.fx_rates.get(&(from, to)) {
            return Some(*rate);
        }
        self.fx_rates
            .get(&(to, from))
            .filter(|rate| **rate != 0.0)
            .map(|rate| 1.0 / rate)
    }
}

impl MarketEnvironment for MarketSnapshot {
    fn name(&self) -> &str {
        &self.name
    }

    fn discount_curve(&self, currency: Currency) -> Result<&dyn YieldCurve<f64>, MarketDataError> {
        self.discount_curves
            .get(&currency)
            .map(|curve| curve.as_ref() as &dyn YieldCurve<f64>)
            .ok_or(MarketDataError::MissingDiscountCurve(currency))
    }

    fn forecast_curve(&self, index: &str) -> Result<&dyn YieldCurve<f64>, MarketDataError> {
        self.forecast_curves
            .get(index)
            .map(|curve| curve.as_ref() as &dyn YieldCurve<f64>)
            .ok_or_else(|| MarketDataError::MissingForecastCurve(index.to_string()))
    }

    fn fx_rate(&self, from: Currency, to: Currency) -> Result<f64, MarketDataError> {
        if let Some(rate) = self.direct_or_inverse(from, to) {
            return Ok(rate);
        }
        let via_usd = self
            .direct_or_inverse(from, Currency::USD)
            .zip(self.direct_or_inverse(Currency::USD, to))
            .map(|(a, b)| a * b);
        via_usd.ok_or(MarketDataError::MissingFxRate { from, to })
    }

    fn asset_price(&self, asset: &str) -> Result<f64, MarketDataError> {
        self.asset_prices
            .get(asset)
            .copied()
            .ok_or_else(|| MarketDataError::MissingAssetPrice(asset.to_string()))
    }

    fn volatility(&self, key: &str) -> Result<f64, MarketDataError> {
        let vol = self
            .volatilities
            .get(key)
            .copied()
            .ok_or_else(|| MarketDataError::MissingVolatility(key.to_string()))?;
        if !vol.is_finite() || vol <= 0.0 {
            return Err(MarketDataError::InvalidQuote {
                key: key.to_string(),
                value: vol,
            });
        }
        Ok(vol)
    }
}

impl fmt::Debug for MarketSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut discount: Vec<_> = self.discount_curves.keys().collect();
        discount.sort();
        let mut forecast: Vec<_> = self.forecast_curves.keys().collect();
        forecast.sort();
        f.debug_struct("MarketSnapshot")
            .field("name", &self.name)
            .field("discount_curves", &discount)
            .field("forecast_curves", &forecast)
            .field("fx_rates", &self.fx_rates.len())
            .field("asset_prices", &self.asset_prices.len())
            .field("volatilities", &self.volatilities.len())
            .finish()
    }
}
