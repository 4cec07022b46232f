//! Period value types.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::error::PeriodError;

/// An inclusive `[start, end]` day range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Period {
    /// First day of the range.
    pub start: NaiveDate,
    /// Last day of the range (inclusive).
    pub end: NaiveDate,
}

impl Period {
    /// Creates a range, rejecting `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PeriodError> {
        if start > end {
            return Err(PeriodError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// A range covering exactly one day.
    #[must_use]
    pub const fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Number of days in the range, both endpoints included.
    #[must_use]
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Returns true if the date falls within the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Returns true if both ranges share at least one day.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Iterates over every day of the range in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |d| *d <= self.end)
    }

    /// Shifts both endpoints back by `days`.
    pub fn shifted_back(&self, days: i64) -> Result<Self, PeriodError> {
        let delta = Duration::days(days);
        let start = self
            .start
            .checked_sub_signed(delta)
            .ok_or(PeriodError::OutOfRange(self.start))?;
        let end = self
            .end
            .checked_sub_signed(delta)
            .ok_or(PeriodError::OutOfRange(self.end))?;
        Ok(Self { start, end })
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// Named period kinds a report can be requested for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodType {
    /// A calendar month (`YYYY-MM`).
    #[default]
    Month,
    /// A calendar quarter (`YYYY-Qn`).
    Quarter,
    /// A calendar year (`YYYY`).
    Year,
    /// From the first day of the current year through today.
    Ytd,
    /// An explicit start/end range.
    Custom,
}

impl PeriodType {
    /// Wire name of the period type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
            Self::Ytd => "ytd",
            Self::Custom => "custom",
        }
    }
}

impl FromStr for PeriodType {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "month" => Ok(Self::Month),
            "quarter" => Ok(Self::Quarter),
            "year" => Ok(Self::Year),
            "ytd" => Ok(Self::Ytd),
            "custom" => Ok(Self::Custom),
            other => Err(PeriodError::InvalidPeriodSpecification(format!(
                "unknown period type '{other}'"
            ))),
        }
    }
}

/// Bucket granularity for time series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// One bucket per calendar day.
    Day,
    /// One bucket per week.
    Week,
    /// One bucket per calendar month.
    #[default]
    Month,
}

impl FromStr for Granularity {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" | "daily" => Ok(Self::Day),
            "week" | "weekly" => Ok(Self::Week),
            "month" | "monthly" => Ok(Self::Month),
            other => Err(PeriodError::InvalidPeriodSpecification(format!(
                "unknown granularity '{other}'"
            ))),
        }
    }
}

/// What a period is compared against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonKind {
    /// The immediately preceding block of equal length.
    #[default]
    PreviousPeriod,
    /// The same dates one calendar year earlier.
    SamePeriodLastYear,
    /// The active budget targets; has no comparison range.
    Budget,
}

impl FromStr for ComparisonKind {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "previous_period" => Ok(Self::PreviousPeriod),
            "same_period_last_year" => Ok(Self::SamePeriodLastYear),
            "budget" => Ok(Self::Budget),
            other => Err(PeriodError::InvalidPeriodSpecification(format!(
                "unknown comparison '{other}'"
            ))),
        }
    }
}

/// First day of a week bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekStart {
    /// Weeks run Sunday through Saturday.
    #[default]
    Sunday,
    /// Weeks run Monday through Sunday.
    Monday,
}

impl FromStr for WeekStart {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sunday" | "sun" => Ok(Self::Sunday),
            "monday" | "mon" => Ok(Self::Monday),
            other => Err(PeriodError::InvalidPeriodSpecification(format!(
                "unknown week start '{other}'"
            ))),
        }
    }
}

/// How a malformed named period value is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// Fall back to the current period.
    #[default]
    Lenient,
    /// Reject with `InvalidPeriodSpecification`.
    Strict,
}

/// Step used for sparklines of periods that are not calendar aligned (custom ranges).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SparklineFallback {
    /// Step back by the period's own inclusive duration.
    #[default]
    Duration,
    /// Step back one calendar month per point.
    Month,
}

impl FromStr for SparklineFallback {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "duration" => Ok(Self::Duration),
            "month" => Ok(Self::Month),
            other => Err(PeriodError::InvalidPeriodSpecification(format!(
                "unknown sparkline fallback '{other}'"
            ))),
        }
    }
}

/// Raw period input as it arrives from a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeriodSpec {
    /// Named period type.
    #[serde(default)]
    pub period_type: PeriodType,
    /// Value for the named type, e.g. `2025-01`, `2025-Q2`, `2025`.
    #[serde(default)]
    pub period_value: Option<String>,
    /// Custom range start (`YYYY-MM-DD` or an RFC 3339 timestamp).
    #[serde(default)]
    pub start: Option<String>,
    /// Custom range end (`YYYY-MM-DD` or an RFC 3339 timestamp).
    #[serde(default)]
    pub end: Option<String>,
}

impl PeriodSpec {
    /// A named period with an explicit value.
    #[must_use]
    pub fn named(period_type: PeriodType, value: impl Into<String>) -> Self {
        Self {
            period_type,
            period_value: Some(value.into()),
            ..Self::default()
        }
    }

    /// A custom range.
    #[must_use]
    pub fn custom(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            period_type: PeriodType::Custom,
            start: Some(start.into()),
            end: Some(end.into()),
            ..Self::default()
        }
    }
}

/// A resolved period: the concrete range plus the type it was resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedPeriod {
    /// The period type used for calendar stepping.
    pub period_type: PeriodType,
    /// The concrete day range.
    pub range: Period,
}

/// One time-series bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodBucket {
    /// Stable calendar key (ISO date of the calendar bucket start).
    pub key: String,
    /// Human readable label.
    pub label: String,
    /// First day covered by this bucket.
    pub start: NaiveDate,
    /// Last day covered by this bucket (inclusive).
    pub end: NaiveDate,
}
