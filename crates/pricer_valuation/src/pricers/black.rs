//! Black-76 on a forward.

use num_traits::Float;

use adapter_fpml::OptionType;

/// Standard normal CDF, Abramowitz and Stegun 7.1.26 (|error| < 1.5e-7).
#[inline]
pub fn norm_cdf<T: Float>(x: T) -> T {
    let c = |v: f64| T::from(v).unwrap_or_else(T::zero);
    let one = T::one();

    let z = (-x / c(std::f64::consts::SQRT_2)).abs();
    let t = one / (one + c(0.3275911) * z);
    let poly = c(0.254829592)
        + t * (c(-0.284496736) + t * (c(1.421413741) + t * (c(-1.453152027) + t * c(1.061405429))));
    let erfc_abs = t * poly * (-z * z).exp();

    // erfc(-x / sqrt 2) / 2
    let erfc = if -x < T::zero() { c(2.0) - erfc_abs } else { erfc_abs };
    c(0.5) * erfc
}

/// Undiscounted Black price of an option on `forward`.
///
/// Expired or zero volatility options return intrinsic value.
///
/// ```ignore
/// let atm = black_price(OptionType::Call, 0.04, 0.04, 0.2, 1.0);
/// assert!((atm - 0.04 * (2.0 * norm_cdf(0.1) - 1.0)).abs() < 1e-7);
/// ```
pub fn black_price<T: Float>(option_type: OptionType, forward: T, strike: T, vol: T, expiry: T) -> T {
    let zero = T::zero();
    let intrinsic = match option_type {
        OptionType::Call => (forward - strike).max(zero),
        OptionType::Put => (strike - forward).max(zero),
    };

    let std_dev = vol * expiry.max(zero).sqrt();
    if std_dev <= zero || forward <= zero || strike <= zero {
        return intrinsic;
    }

    let half = T::from(0.5).unwrap_or_else(T::zero);
    let d1 = ((forward / strike).ln() + half * std_dev * std_dev) / std_dev;
    let d2 = d1 - std_dev;
    match option_type {
        OptionType::Call => forward * norm_cdf(d1) - strike * norm_cdf(d2),
        OptionType::Put => strike * norm_cdf(-d2) - forward * norm_cdf(-d1),
    }
}
