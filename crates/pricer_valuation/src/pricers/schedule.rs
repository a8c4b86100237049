//! Accrual schedules with adjusted payment dates.

use adapter_fpml::Frequency;
use chrono::Months;
use pricer_core::types::{BusinessCalendar, BusinessDayConvention, Date, DayCountConvention, SharedCalendar};

use crate::error::ValuationError;

/// One accrual period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Period {
    start: Date,
    end: Date,
    payment: Date,
    day_count: DayCountConvention,
}

impl Period {
    /// Creates a period.
    #[inline]
    pub fn new(start: Date, end: Date, payment: Date, day_count: DayCountConvention) -> Self {
        Self {
            start,
            end,
            payment,
            day_count,
        }
    }

    /// Accrual start.
    #[inline]
    pub fn start(&self) -> Date {
        self.start
    }

    /// Accrual end.
    #[inline]
    pub fn end(&self) -> Date {
        self.end
    }

    /// Adjusted payment date.
    #[inline]
    pub fn payment(&self) -> Date {
        self.payment
    }

    /// Accrual year fraction.
    #[inline]
    pub fn year_fraction(&self) -> f64 {
        self.day_count.year_fraction_dates(self.start, self.end)
    }
}

/// Builds forward generated schedules with a short final stub.
///
/// ```ignore
/// let periods = ScheduleBuilder::new()
///     .start(effective)
///     .end(termination)
///     .frequency(Frequency::Quarterly)
///     .payment_calendar(calendar, BusinessDayConvention::ModifiedFollowing)
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct ScheduleBuilder {
    start_date: Option<Date>,
    end_date: Option<Date>,
    frequency: Option<Frequency>,
    day_count: DayCountConvention,
    calendar: Option<SharedCalendar>,
    convention: BusinessDayConvention,
}

impl Default for ScheduleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleBuilder {
    /// New builder: ACT/365, unadjusted payments.
    pub fn new() -> Self {
        Self {
            start_date: None,
            end_date: None,
            frequency: None,
            day_count: DayCountConvention::ActualActual365,
            calendar: None,
            convention: BusinessDayConvention::Unadjusted,
        }
    }

    /// Sets the accrual start.
    pub fn start(mut self, date: Date) -> Self {
        self.start_date = Some(date);
        self
    }

    /// Sets the accrual end.
    pub fn end(mut self, date: Date) -> Self {
        self.end_date = Some(date);
        self
    }

    /// Sets the frequency.
    pub fn frequency(mut self, freq: Frequency) -> Self {
        self.frequency = Some(freq);
        self
    }

    /// Sets the day count.
    pub fn day_count(mut self, dc: DayCountConvention) -> Self {
        self.day_count = dc;
        self
    }

    /// Adjusts payment dates on `calendar`. `None` leaves them unadjusted.
    pub fn payment_calendar(
        mut self,
        calendar: Option<SharedCalendar>,
        convention: BusinessDayConvention,
    ) -> Self {
        self.calendar = calendar;
        self.convention = convention;
        self
    }

    /// Builds the periods.
    ///
    /// # Errors
    ///
    /// `Schedule` when a field is missing, the range is empty or date
    /// arithmetic overflows; `Calendar` when a payment date cannot be rolled.
    pub fn build(self) -> Result<Vec<Period>, ValuationError> {
        let start = self
            .start_date
            .ok_or_else(|| ValuationError::Schedule("Missing schedule start".to_string()))?;
        let end = self
            .end_date
            .ok_or_else(|| ValuationError::Schedule("Missing schedule end".to_string()))?;
        let frequency = self
            .frequency
            .ok_or_else(|| ValuationError::Schedule("Missing schedule frequency".to_string()))?;

        if start >= end {
            return Err(ValuationError::Schedule(format!(
                "Invalid date range: start {} is not before end {}",
                start, end
            )));
        }

        let mut periods = Vec::new();
        let mut current_start = start;
        let mut n = 1u32;

        while current_start < end {
            // Roll from the anchor so month-end dates do not drift
            let current_end = start.add_months(frequency.months() * n)?;
            let period_end = if current_end > end { end } else { current_end };
            let payment = adjust(self.calendar.as_deref(), period_end, self.convention)?;
            periods.push(Period::new(current_start, period_end, payment, self.day_count));
            current_start = period_end;
            n += 1;
        }

        Ok(periods)
    }
}

/// Adjusts `date` on `calendar`, or returns it as is when there is none.
pub fn adjust(
    calendar: Option<&dyn BusinessCalendar>,
    date: Date,
    convention: BusinessDayConvention,
) -> Result<Date, ValuationError> {
    match calendar {
        Some(cal) => Ok(cal.adjust(date, convention)?),
        None => Ok(date),
    }
}

/// `date` moved back by `months`, clamped to month end.
pub fn months_before(date: Date, months: u32) -> Result<Date, ValuationError> {
    date.into_inner()
        .checked_sub_months(Months::new(months))
        .map(Date::from)
        .ok_or_else(|| ValuationError::Schedule(format!("Cannot roll back {} months from {}", months, date)))
}

/// Regular dates rolled back from `end` by `frequency`, strictly after `after`,
/// in ascending order. `end` is always included.
pub fn roll_back(end: Date, after: Date, frequency: Frequency) -> Result<Vec<Date>, ValuationError> {
    let mut dates = Vec::new();
    let mut k = 0u32;
    loop {
        let date = months_before(end, frequency.months() * k)?;
        if date <= after && k > 0 {
            break;
        }
        dates.push(date);
        k += 1;
    }
    dates.reverse();
    Ok(dates)
}
