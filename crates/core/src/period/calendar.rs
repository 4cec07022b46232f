//! Calendar arithmetic on `NaiveDate`.
//!
//! Month and year shifts clamp the day to the end of the target month, so
//! Feb 29 minus one year lands on Feb 28 and Mar 31 minus one month lands on
//! the last day of February.

use chrono::{Datelike, Days, Months, NaiveDate};

use super::error::PeriodError;
use super::types::WeekStart;

/// Builds a date, mapping invalid components to `InvalidPeriodSpecification`.
pub fn ymd(year: i32, month: u32, day: u32) -> Result<NaiveDate, PeriodError> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        PeriodError::InvalidPeriodSpecification(format!("{year:04}-{month:02}-{day:02}"))
    })
}

/// First day of the date's month.
#[must_use]
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Last day of the date's month.
pub fn month_end(date: NaiveDate) -> Result<NaiveDate, PeriodError> {
    let next = add_months(month_start(date), 1)?;
    next.pred_opt().ok_or(PeriodError::OutOfRange(date))
}

/// Number of days in the date's month.
pub fn days_in_month(date: NaiveDate) -> Result<u32, PeriodError> {
    Ok(month_end(date)?.day())
}

/// First day of the date's calendar quarter.
pub fn quarter_start(date: NaiveDate) -> Result<NaiveDate, PeriodError> {
    let first_month = (date.month0() / 3) * 3 + 1;
    ymd(date.year(), first_month, 1)
}

/// First day of the date's year.
pub fn year_start(date: NaiveDate) -> Result<NaiveDate, PeriodError> {
    ymd(date.year(), 1, 1)
}

/// Shifts a date by whole months (negative goes back), clamping the day.
pub fn add_months(date: NaiveDate, months: i32) -> Result<NaiveDate, PeriodError> {
    let magnitude = Months::new(months.unsigned_abs());
    let shifted = if months >= 0 {
        date.checked_add_months(magnitude)
    } else {
        date.checked_sub_months(magnitude)
    };
    shifted.ok_or(PeriodError::OutOfRange(date))
}

/// Shifts a date by whole years, clamping Feb 29 to Feb 28.
pub fn add_years(date: NaiveDate, years: i32) -> Result<NaiveDate, PeriodError> {
    let months = years
        .checked_mul(12)
        .ok_or(PeriodError::OutOfRange(date))?;
    add_months(date, months)
}

/// Shifts a date by whole days.
pub fn add_days(date: NaiveDate, days: i64) -> Result<NaiveDate, PeriodError> {
    let magnitude = Days::new(days.unsigned_abs());
    let shifted = if days >= 0 {
        date.checked_add_days(magnitude)
    } else {
        date.checked_sub_days(magnitude)
    };
    shifted.ok_or(PeriodError::OutOfRange(date))
}

/// First day of the week containing `date`.
#[must_use]
pub fn week_start(date: NaiveDate, convention: WeekStart) -> NaiveDate {
    let offset = match convention {
        WeekStart::Sunday => date.weekday().num_days_from_sunday(),
        WeekStart::Monday => date.weekday().num_days_from_monday(),
    };
    date.checked_sub_days(Days::new(u64::from(offset)))
        .unwrap_or(date)
}
