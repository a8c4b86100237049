//! Flat yield curve.

use super::YieldCurve;
use crate::market_data::error::MarketDataError;
use num_traits::Float;

/// Curve with one continuously compounded rate at every maturity.
///
/// # Example
///
/// ```
/// use pricer_core::market_data::curves::{YieldCurve, FlatCurve};
///
/// let curve = FlatCurve::new(0.05_f64);
/// let df = curve.discount_factor(1.0).unwrap();
/// assert!((df - 0.951229).abs() < 1e-5);
/// assert_eq!(curve.zero_rate(5.0).unwrap(), 0.05);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlatCurve<T: Float> {
    rate: T,
}

impl<T: Float> FlatCurve<T> {
    /// Creates a flat curve at `rate`.
    #[inline]
    pub fn new(rate: T) -> Self {
        Self { rate }
    }

    /// The constant rate.
    #[inline]
    pub fn rate(&self) -> T {
        self.rate
    }

    /// Returns a copy with the rate moved by `bump`.
    #[inline]
    pub fn shifted(&self, bump: T) -> Self {
        Self::new(self.rate + bump)
    }
}

impl<T: Float> YieldCurve<T> for FlatCurve<T> {
    fn discount_factor(&self, t: T) -> Result<T, MarketDataError> {
        if t < T::zero() {
            return Err(MarketDataError::InvalidMaturity {
                t: t.to_f64().unwrap_or(0.0),
            });
        }
        Ok((-self.rate * t).exp())
    }

    fn zero_rate(&self, t: T) -> Result<T, MarketDataError> {
        if t <= T::zero() {
            return Err(MarketDataError::InvalidMaturity {
                t: t.to_f64().unwrap_or(0.0),
            });
        }
        Ok(self.rate)
    }
}
