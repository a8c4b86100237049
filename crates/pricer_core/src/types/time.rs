//! Time types for trade valuation.
//!
//! This module provides:
//! - [`Date`]: Calendar date newtype over `chrono::NaiveDate`
//! - [`DayCountConvention`]: Accrual year fraction conventions
//! - [`BusinessDayConvention`]: Rolling rules used when a date is not a business day
//!
//! Date arithmetic is limited to what schedule generation and discounting
//! need (day and month offsets, weekday checks). Calendar-aware adjustment
//! lives in [`crate::types::calendar`].

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use super::error::DateError;

/// Calendar date used throughout trade and market data definitions.
///
/// # Examples
///
/// ```
/// use pricer_core::types::time::Date;
///
/// let date = Date::from_ymd(2024, 6, 14).unwrap();
/// let parsed: Date = "2024-06-14".parse().unwrap();
/// assert_eq!(date, parsed);
///
/// let later = date.add_months(3).unwrap();
/// assert_eq!(later, Date::from_ymd(2024, 9, 14).unwrap());
/// assert_eq!(later - date, 92);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a date from year, month and day components.
    ///
    /// Returns `DateError::InvalidDate` for impossible dates such as 30 February.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or(DateError::InvalidDate { year, month, day })
    }

    /// Parses an ISO 8601 date (`YYYY-MM-DD`).
    pub fn parse(s: &str) -> Result<Self, DateError> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Date)
            .map_err(|e| DateError::ParseError(format!("{}: {}", s, e)))
    }

    /// Returns the underlying `NaiveDate`.
    #[inline]
    pub fn into_inner(self) -> NaiveDate {
        self.0
    }

    /// Returns the year component.
    #[inline]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    #[inline]
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day-of-month component (1-31).
    #[inline]
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Returns the day of the week.
    #[inline]
    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Returns `true` for Saturdays and Sundays.
    #[inline]
    pub fn is_weekend(&self) -> bool {
        matches!(self.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Shifts the date by a signed number of calendar days.
    pub fn add_days(self, days: i64) -> Result<Self, DateError> {
        let shifted = if days >= 0 {
            self.0.checked_add_days(Days::new(days as u64))
        } else {
            self.0.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        shifted
            .map(Date)
            .ok_or_else(|| DateError::Overflow(format!("{} + {} days", self, days)))
    }

    /// Shifts the date by a number of calendar months, clamping to month end.
    pub fn add_months(self, months: u32) -> Result<Self, DateError> {
        self.0
            .checked_add_months(Months::new(months))
            .map(Date)
            .ok_or_else(|| DateError::Overflow(format!("{} + {} months", self, months)))
    }
}

impl Sub for Date {
    type Output = i64;

    /// Number of calendar days from `rhs` to `self`.
    fn sub(self, rhs: Self) -> Self::Output {
        (self.0 - rhs.0).num_days()
    }
}

impl FromStr for Date {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Date::parse(s)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Date(date)
    }
}

/// Day count convention for accrual year fractions.
///
/// # Examples
///
/// ```
/// use pricer_core::types::time::{Date, DayCountConvention};
///
/// let start = Date::from_ymd(2024, 1, 1).unwrap();
/// let end = Date::from_ymd(2024, 7, 1).unwrap();
///
/// let yf = DayCountConvention::ActualActual360.year_fraction_dates(start, end);
/// assert!((yf - 182.0 / 360.0).abs() < 1e-12);
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DayCountConvention {
    /// Actual/365 Fixed.
    #[default]
    ActualActual365,
    /// Actual/360, the money market convention.
    ActualActual360,
    /// 30/360 US bond basis.
    Thirty360,
}

impl DayCountConvention {
    /// Returns the standard convention name.
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::ActualActual365 => "ACT/365",
            DayCountConvention::ActualActual360 => "ACT/360",
            DayCountConvention::Thirty360 => "30/360",
        }
    }

    /// Year fraction between two dates. Negative when `start > end`.
    pub fn year_fraction_dates(&self, start: Date, end: Date) -> f64 {
        match self {
            DayCountConvention::ActualActual365 => (end - start) as f64 / 365.0,
            DayCountConvention::ActualActual360 => (end - start) as f64 / 360.0,
            DayCountConvention::Thirty360 => {
                let (from, to, sign) = if start <= end {
                    (start, end, 1.0)
                } else {
                    (end, start, -1.0)
                };
                let d1 = if from.day() == 31 { 30 } else { from.day() };
                let d2 = if to.day() == 31 && d1 == 30 { 30 } else { to.day() };
                let days = 360 * (to.year() - from.year())
                    + 30 * (to.month() as i32 - from.month() as i32)
                    + (d2 as i32 - d1 as i32);
                sign * days as f64 / 360.0
            }
        }
    }
}

impl FromStr for DayCountConvention {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace(['.', ' ', '_'], "").as_str() {
            "ACT/365" | "ACT/365F" | "ACT/365FIXED" | "ACTUAL/365" | "A365" => {
                Ok(DayCountConvention::ActualActual365)
            }
            "ACT/360" | "ACTUAL/360" | "A360" => Ok(DayCountConvention::ActualActual360),
            "30/360" | "30E/360" | "THIRTY360" => Ok(DayCountConvention::Thirty360),
            _ => Err(format!("Unknown day count convention: {}", s)),
        }
    }
}

impl fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Rolling rule applied when a date falls on a non-business day.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BusinessDayConvention {
    /// Move forward to the next business day.
    Following,
    /// Move forward unless that crosses a month boundary, then move back.
    #[default]
    ModifiedFollowing,
    /// Move back to the previous business day.
    Preceding,
    /// Move back unless that crosses a month boundary, then move forward.
    ModifiedPreceding,
    /// Leave the date unchanged.
    #[cfg_attr(feature = "serde", serde(alias = "NONE"))]
    Unadjusted,
}

impl BusinessDayConvention {
    /// Returns the FpML code for this convention.
    ///
    /// ```
    /// use pricer_core::types::time::BusinessDayConvention;
    ///
    /// assert_eq!(BusinessDayConvention::ModifiedFollowing.code(), "MODFOLLOWING");
    /// ```
    #[inline]
    pub fn code(&self) -> &'static str {
        match self {
            BusinessDayConvention::Following => "FOLLOWING",
            BusinessDayConvention::ModifiedFollowing => "MODFOLLOWING",
            BusinessDayConvention::Preceding => "PRECEDING",
            BusinessDayConvention::ModifiedPreceding => "MODPRECEDING",
            BusinessDayConvention::Unadjusted => "NONE",
        }
    }
}

impl fmt::Display for BusinessDayConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for BusinessDayConvention {
    type Err = String;

    /// Accepts FpML codes and the short forms (`F`, `MF`, `P`, `MP`, `U`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace([' ', '_', '-'], "").as_str() {
            "following" | "f" => Ok(BusinessDayConvention::Following),
            "modfollowing" | "modifiedfollowing" | "mf" => {
                Ok(BusinessDayConvention::ModifiedFollowing)
            }
            "preceding" | "p" => Ok(BusinessDayConvention::Preceding),
            "modpreceding" | "modifiedpreceding" | "mp" => {
                Ok(BusinessDayConvention::ModifiedPreceding)
            }
            "none" | "unadjusted" | "u" => Ok(BusinessDayConvention::Unadjusted),
            _ => Err(format!("Unknown business day convention: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ymd_rejects_invalid() {
        assert!(Date::from_ymd(2023, 2, 29).is_err());
        assert!(Date::from_ymd(2024, 2, 29).is_ok());
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let date = Date::parse(" 2025-03-31 ").unwrap();
        assert_eq!(date.month(), 3);
        assert_eq!(date.day(), 31);
    }

    #[test]
    fn test_add_months_clamps_to_month_end() {
        let date = Date::from_ymd(2025, 1, 31).unwrap();
        assert_eq!(date.add_months(1).unwrap(), Date::from_ymd(2025, 2, 28).unwrap());
    }

    #[test]
    fn test_add_days_negative() {
        let date = Date::from_ymd(2025, 3, 1).unwrap();
        assert_eq!(date.add_days(-1).unwrap(), Date::from_ymd(2025, 2, 28).unwrap());
    }

    #[test]
    fn test_weekend() {
        // 2025-06-14 is a Saturday
        assert!(Date::from_ymd(2025, 6, 14).unwrap().is_weekend());
        assert!(!Date::from_ymd(2025, 6, 16).unwrap().is_weekend());
    }

    #[test]
    fn test_thirty_360_reversed_is_negative() {
        let a = Date::from_ymd(2024, 1, 31).unwrap();
        let b = Date::from_ymd(2024, 7, 31).unwrap();
        let forward = DayCountConvention::Thirty360.year_fraction_dates(a, b);
        let backward = DayCountConvention::Thirty360.year_fraction_dates(b, a);
        assert!((forward - 0.5).abs() < 1e-12);
        assert!((forward + backward).abs() < 1e-12);
    }

    #[test]
    fn test_business_day_convention_parse() {
        assert_eq!(
            "MODFOLLOWING".parse::<BusinessDayConvention>().unwrap(),
            BusinessDayConvention::ModifiedFollowing
        );
        assert_eq!(
            "none".parse::<BusinessDayConvention>().unwrap(),
            BusinessDayConvention::Unadjusted
        );
        assert!("sideways".parse::<BusinessDayConvention>().is_err());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn date_strategy() -> impl Strategy<Value = Date> {
            (2000i32..2100i32, 1u32..13u32, 1u32..29u32)
                .prop_filter_map("valid date", |(y, m, d)| Date::from_ymd(y, m, d).ok())
        }

        proptest! {
            #[test]
            fn test_act_365_antisymmetric(a in date_strategy(), b in date_strategy()) {
                let ab = DayCountConvention::ActualActual365.year_fraction_dates(a, b);
                let ba = DayCountConvention::ActualActual365.year_fraction_dates(b, a);
                prop_assert!((ab + ba).abs() < 1e-12);
            }
        }
    }
}
