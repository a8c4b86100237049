//! Core time, calendar and currency types.
//!
//! This module provides:
//! - `time`: [`Date`], [`DayCountConvention`], [`BusinessDayConvention`]
//! - `calendar`: business centres, [`BusinessCalendar`] and calendar resolution
//! - `currency`: ISO 4217 currency codes
//! - `error`: Structured error types for date, currency and calendar operations

pub mod calendar;
pub mod currency;
pub mod error;
pub mod time;

pub use calendar::{
    BusinessCalendar, BusinessCenter, CalendarResolver, HolidayCalendar, SharedCalendar,
    StaticCalendarResolver,
};
pub use currency::Currency;
pub use error::{CalendarError, CurrencyError, DateError};
pub use time::{BusinessDayConvention, Date, DayCountConvention};
