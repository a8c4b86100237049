//! Yield curve trait definition.

use crate::market_data::error::MarketDataError;
use num_traits::Float;

/// Discounting and rate projection over year-fraction time.
///
/// Implementors provide [`discount_factor`](YieldCurve::discount_factor);
/// continuously compounded zero and forward rates derive from it. Simple
/// (money market) forwards used for coupon projection come from
/// [`simple_forward_rate`](YieldCurve::simple_forward_rate).
///
/// The trait is object safe, so environments can hold heterogeneous curves
/// behind `dyn YieldCurve<f64>`.
pub trait YieldCurve<T: Float> {
    /// Discount factor for maturity `t` (years, `t >= 0`).
    fn discount_factor(&self, t: T) -> Result<T, MarketDataError>;

    /// Continuously compounded zero rate to `t` (`t > 0`).
    fn zero_rate(&self, t: T) -> Result<T, MarketDataError> {
        if t <= T::zero() {
            return Err(MarketDataError::InvalidMaturity {
                t: t.to_f64().unwrap_or(0.0),
            });
        }
        let df = self.discount_factor(t)?;
        Ok(-df.ln() / t)
    }

    /// Continuously compounded forward rate between `t1` and `t2`.
    fn forward_rate(&self, t1: T, t2: T) -> Result<T, MarketDataError> {
        let dt = t2 - t1;
        if dt <= T::zero() {
            return Err(MarketDataError::InvalidMaturity {
                t: dt.to_f64().unwrap_or(0.0),
            });
        }
        let df1 = self.discount_factor(t1)?;
        let df2 = self.discount_factor(t2)?;
        Ok(-(df2 / df1).ln() / dt)
    }

    /// Simply compounded forward rate `(D(t1)/D(t2) - 1) / (t2 - t1)`.
    fn simple_forward_rate(&self, t1: T, t2: T) -> Result<T, MarketDataError> {
        let dt = t2 - t1;
        if dt <= T::zero() {
            return Err(MarketDataError::InvalidMaturity {
                t: dt.to_f64().unwrap_or(0.0),
            });
        }
        let df1 = self.discount_factor(t1)?;
        let df2 = self.discount_factor(t2)?;
        Ok((df1 / df2 - T::one()) / dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    struct ExpCurve {
        rate: f64,
    }

    impl YieldCurve<f64> for ExpCurve {
        fn discount_factor(&self, t: f64) -> Result<f64, MarketDataError> {
            if t < 0.0 {
                return Err(MarketDataError::InvalidMaturity { t });
            }
            Ok((-self.rate * t).exp())
        }
    }

    #[test]
    fn test_zero_rate_recovers_rate() {
        let curve = ExpCurve { rate: 0.04 };
        assert_relative_eq!(curve.zero_rate(2.5).unwrap(), 0.04, epsilon = 1e-12);
        assert!(curve.zero_rate(0.0).is_err());
    }

    #[test]
    fn test_simple_forward_exceeds_continuous() {
        let curve = ExpCurve { rate: 0.05 };
        let cont = curve.forward_rate(1.0, 1.5).unwrap();
        let simple = curve.simple_forward_rate(1.0, 1.5).unwrap();
        assert_relative_eq!(cont, 0.05, epsilon = 1e-12);
        assert_relative_eq!(simple, ((0.05_f64 * 0.5).exp() - 1.0) / 0.5, epsilon = 1e-12);
        assert!(simple > cont);
    }

    #[test]
    fn test_reversed_forward_period_rejected() {
        let curve = ExpCurve { rate: 0.05 };
        match curve.simple_forward_rate(2.0, 1.0) {
            Err(MarketDataError::InvalidMaturity { t }) => assert_eq!(t, -1.0),
            other => panic!("Expected InvalidMaturity, got {:?}", other),
        }
    }

    #[test]
    fn test_object_safe() {
        let curve: Box<dyn YieldCurve<f64>> = Box::new(ExpCurve { rate: 0.01 });
        assert!(curve.discount_factor(1.0).unwrap() < 1.0);
    }
}
