//! Business centres and holiday calendars.
//!
//! A [`BusinessCalendar`] answers whether a date is a good business day and
//! rolls dates under a [`BusinessDayConvention`]. Calendars are built from
//! FpML business centre codes (`USNY`, `GBLO`, `AUSY`, ...) through a
//! [`CalendarResolver`]; the bundled [`StaticCalendarResolver`] serves
//! calendars from an in-memory registry.
//!
//! # Examples
//!
//! ```
//! use pricer_core::types::calendar::{
//!     BusinessCalendar, BusinessCenter, CalendarResolver, StaticCalendarResolver,
//! };
//! use pricer_core::types::time::{BusinessDayConvention, Date};
//!
//! let usny = BusinessCenter::new("USNY").unwrap();
//! let july4 = Date::from_ymd(2025, 7, 4).unwrap();
//!
//! let mut resolver = StaticCalendarResolver::new();
//! resolver.register(usny.clone(), [july4]);
//!
//! let calendar = resolver.resolve(&[usny]).unwrap();
//! assert!(!calendar.is_business_day(july4));
//!
//! // Friday holiday rolls to Monday 7 July
//! let adjusted = calendar.adjust(july4, BusinessDayConvention::Following).unwrap();
//! assert_eq!(adjusted, Date::from_ymd(2025, 7, 7).unwrap());
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::error::CalendarError;
use super::time::{BusinessDayConvention, Date};

/// Shared handle to a resolved calendar.
pub type SharedCalendar = Arc<dyn BusinessCalendar>;

/// Longest run of consecutive non-business days a calendar may contain.
const MAX_ROLL_DAYS: i64 = 366;

/// FpML business centre code, e.g. `USNY` or `AUSY`.
///
/// Codes are four ASCII letters, stored upper-case.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct BusinessCenter(String);

impl BusinessCenter {
    /// Validates and normalises a business centre code.
    pub fn new(code: &str) -> Result<Self, CalendarError> {
        let trimmed = code.trim();
        if trimmed.len() == 4 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(BusinessCenter(trimmed.to_ascii_uppercase()))
        } else {
            Err(CalendarError::InvalidBusinessCenter(code.to_string()))
        }
    }

    /// Returns the four-letter code.
    #[inline]
    pub fn code(&self) -> &str {
        &self.0
    }
}

impl FromStr for BusinessCenter {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BusinessCenter::new(s)
    }
}

impl TryFrom<String> for BusinessCenter {
    type Error = CalendarError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        BusinessCenter::new(&value)
    }
}

impl From<BusinessCenter> for String {
    fn from(center: BusinessCenter) -> Self {
        center.0
    }
}

impl fmt::Display for BusinessCenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Date adjustment capable calendar.
///
/// Implementors supply [`is_holiday`](BusinessCalendar::is_holiday); weekend
/// handling and the rolling rules are provided.
pub trait BusinessCalendar: fmt::Debug + Send + Sync {
    /// Calendar name, conventionally the joined business centre codes.
    fn name(&self) -> String;

    /// Returns `true` if `date` is a listed holiday (weekends excluded).
    fn is_holiday(&self, date: Date) -> bool;

    /// Returns `true` if `date` is neither a weekend nor a holiday.
    fn is_business_day(&self, date: Date) -> bool {
        !date.is_weekend() && !self.is_holiday(date)
    }

    /// Rolls `date` onto a business day under `convention`.
    fn adjust(&self, date: Date, convention: BusinessDayConvention) -> Result<Date, CalendarError> {
        match convention {
            BusinessDayConvention::Unadjusted => Ok(date),
            BusinessDayConvention::Following => roll(self, date, 1),
            BusinessDayConvention::Preceding => roll(self, date, -1),
            BusinessDayConvention::ModifiedFollowing => {
                let following = roll(self, date, 1)?;
                if following.month() == date.month() {
                    Ok(following)
                } else {
                    roll(self, date, -1)
                }
            }
            BusinessDayConvention::ModifiedPreceding => {
                let preceding = roll(self, date, -1)?;
                if preceding.month() == date.month() {
                    Ok(preceding)
                } else {
                    roll(self, date, 1)
                }
            }
        }
    }
}

fn roll<C: BusinessCalendar + ?Sized>(
    calendar: &C,
    date: Date,
    step: i64,
) -> Result<Date, CalendarError> {
    let mut current = date;
    for _ in 0..MAX_ROLL_DAYS {
        if calendar.is_business_day(current) {
            return Ok(current);
        }
        current = current.add_days(step)?;
    }
    Err(CalendarError::NoBusinessDay(format!(
        "{} within {} days of {}",
        calendar.name(),
        MAX_ROLL_DAYS,
        date
    )))
}

/// Weekend-plus-holiday-list calendar for one or more business centres.
///
/// A joint calendar treats a date as a holiday when any constituent centre
/// observes it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HolidayCalendar {
    centers: Vec<BusinessCenter>,
    holidays: BTreeSet<Date>,
}

impl HolidayCalendar {
    /// Creates a calendar that only closes on weekends.
    pub fn weekends_only(centers: Vec<BusinessCenter>) -> Self {
        Self {
            centers,
            holidays: BTreeSet::new(),
        }
    }

    /// Creates a calendar with the given holiday list.
    pub fn with_holidays<I>(centers: Vec<BusinessCenter>, holidays: I) -> Self
    where
        I: IntoIterator<Item = Date>,
    {
        Self {
            centers,
            holidays: holidays.into_iter().collect(),
        }
    }

    /// Adds a holiday.
    pub fn add_holiday(&mut self, date: Date) {
        self.holidays.insert(date);
    }

    /// Business centres covered by this calendar.
    pub fn centers(&self) -> &[BusinessCenter] {
        &self.centers
    }

    /// Combines calendars; the result closes whenever any input closes.
    pub fn join<'a, I>(calendars: I) -> Self
    where
        I: IntoIterator<Item = &'a HolidayCalendar>,
    {
        let mut joined = HolidayCalendar::default();
        for calendar in calendars {
            for center in &calendar.centers {
                if !joined.centers.contains(center) {
                    joined.centers.push(center.clone());
                }
            }
            joined.holidays.extend(calendar.holidays.iter().copied());
        }
        joined
    }
}

impl BusinessCalendar for HolidayCalendar {
    fn name(&self) -> String {
        if self.centers.is_empty() {
            return "WEEKENDS".to_string();
        }
        self.centers
            .iter()
            .map(BusinessCenter::code)
            .collect::<Vec<_>>()
            .join("-")
    }

    fn is_holiday(&self, date: Date) -> bool {
        self.holidays.contains(&date)
    }
}

/// Resolves business centre codes into a calendar.
pub trait CalendarResolver: Send + Sync {
    /// Builds the joint calendar for `centers`.
    ///
    /// # Errors
    ///
    /// Returns `CalendarError::NoBusinessCenters` for an empty slice and
    /// `CalendarError::UnknownBusinessCenter` when a centre has no calendar.
    fn resolve(&self, centers: &[BusinessCenter]) -> Result<SharedCalendar, CalendarError>;
}

/// In-memory calendar registry keyed by business centre.
///
/// Unregistered centres are rejected unless the resolver was built with
/// [`with_weekend_fallback`](StaticCalendarResolver::with_weekend_fallback),
/// in which case they contribute weekends only.
#[derive(Clone, Debug, Default)]
pub struct StaticCalendarResolver {
    calendars: BTreeMap<BusinessCenter, HolidayCalendar>,
    weekend_fallback: bool,
}

impl StaticCalendarResolver {
    /// Creates an empty, strict resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty resolver that treats unknown centres as weekend-only.
    pub fn with_weekend_fallback() -> Self {
        Self {
            calendars: BTreeMap::new(),
            weekend_fallback: true,
        }
    }

    /// Registers (or extends) the holiday list for a centre.
    pub fn register<I>(&mut self, center: BusinessCenter, holidays: I)
    where
        I: IntoIterator<Item = Date>,
    {
        let entry = self
            .calendars
            .entry(center.clone())
            .or_insert_with(|| HolidayCalendar::weekends_only(vec![center]));
        for date in holidays {
            entry.add_holiday(date);
        }
    }

    /// Returns `true` if the centre has a registered calendar.
    pub fn contains(&self, center: &BusinessCenter) -> bool {
        self.calendars.contains_key(center)
    }
}

impl CalendarResolver for StaticCalendarResolver {
    fn resolve(&self, centers: &[BusinessCenter]) -> Result<SharedCalendar, CalendarError> {
        if centers.is_empty() {
            return Err(CalendarError::NoBusinessCenters);
        }

        let mut parts = Vec::with_capacity(centers.len());
        for center in centers {
            match self.calendars.get(center) {
                Some(calendar) => parts.push(calendar.clone()),
                None if self.weekend_fallback => {
                    parts.push(HolidayCalendar::weekends_only(vec![center.clone()]))
                }
                None => return Err(CalendarError::UnknownBusinessCenter(center.to_string())),
            }
        }

        Ok(Arc::new(HolidayCalendar::join(&parts)))
    }
}
