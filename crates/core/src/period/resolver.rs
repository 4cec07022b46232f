//! Period resolution, comparison ranges, and sparkline ranges.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use tracing::warn;

use super::calendar::{add_days, add_months, add_years, month_end, month_start, year_start, ymd};
use super::error::PeriodError;
use super::types::{
    ComparisonKind, ParseMode, Period, PeriodSpec, PeriodType, ResolvedPeriod, SparklineFallback,
};

/// Resolves period requests against a fixed "today".
///
/// The resolver is a pure value: it holds the parse policy and the reference
/// date, so two resolvers with the same inputs always agree.
#[derive(Debug, Clone, Copy)]
pub struct PeriodResolver {
    mode: ParseMode,
    fallback: SparklineFallback,
    today: NaiveDate,
}

impl PeriodResolver {
    /// Creates a resolver for the given parse mode and reference date.
    #[must_use]
    pub const fn new(mode: ParseMode, today: NaiveDate) -> Self {
        Self {
            mode,
            fallback: SparklineFallback::Duration,
            today,
        }
    }

    /// Sets the sparkline step used for custom ranges.
    #[must_use]
    pub const fn with_sparkline_fallback(mut self, fallback: SparklineFallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// The reference date.
    #[must_use]
    pub const fn today(&self) -> NaiveDate {
        self.today
    }

    /// The parse mode.
    #[must_use]
    pub const fn mode(&self) -> ParseMode {
        self.mode
    }

    /// Resolves a period request to a concrete day range.
    ///
    /// Named types without a value resolve to the current period. A malformed
    /// named value falls back to the current period in lenient mode and is
    /// rejected in strict mode. Malformed custom dates are always rejected.
    pub fn resolve(&self, spec: &PeriodSpec) -> Result<ResolvedPeriod, PeriodError> {
        let range = match spec.period_type {
            PeriodType::Month => self.named(spec, Self::parse_month, Self::current_month)?,
            PeriodType::Quarter => self.named(spec, Self::parse_quarter, Self::current_quarter)?,
            PeriodType::Year => self.named(spec, Self::parse_year, Self::current_year)?,
            PeriodType::Ytd => Period::new(year_start(self.today)?, self.today)?,
            PeriodType::Custom => self.custom(spec)?,
        };

        Ok(ResolvedPeriod {
            period_type: spec.period_type,
            range,
        })
    }

    fn named(
        &self,
        spec: &PeriodSpec,
        parse: fn(&str) -> Result<Period, PeriodError>,
        current: fn(&Self) -> Result<Period, PeriodError>,
    ) -> Result<Period, PeriodError> {
        let Some(value) = spec.period_value.as_deref().map(str::trim) else {
            return current(self);
        };
        if value.is_empty() || value.eq_ignore_ascii_case("current") {
            return current(self);
        }

        match parse(value) {
            Ok(period) => Ok(period),
            Err(err) => match self.mode {
                ParseMode::Strict => Err(err),
                ParseMode::Lenient => {
                    warn!(
                        period_type = spec.period_type.as_str(),
                        value,
                        "Malformed period value, falling back to current period"
                    );
                    current(self)
                }
            },
        }
    }

    fn custom(&self, spec: &PeriodSpec) -> Result<Period, PeriodError> {
        let start = match spec.start.as_deref() {
            Some(raw) => parse_day(raw)?,
            None => month_start(self.today),
        };
        let end = match spec.end.as_deref() {
            Some(raw) => parse_day(raw)?,
            None => month_end(self.today)?,
        };
        Period::new(start, end).map_err(|_| {
            PeriodError::InvalidPeriodSpecification(format!(
                "custom range start {start} is after end {end}"
            ))
        })
    }

    fn current_month(&self) -> Result<Period, PeriodError> {
        month_period(self.today.year(), self.today.month())
    }

    fn current_quarter(&self) -> Result<Period, PeriodError> {
        quarter_period(self.today.year(), self.today.month0() / 3 + 1)
    }

    fn current_year(&self) -> Result<Period, PeriodError> {
        year_period(self.today.year())
    }

    fn parse_month(value: &str) -> Result<Period, PeriodError> {
        let invalid = || PeriodError::InvalidPeriodSpecification(format!("month '{value}'"));
        let (year, month) = value.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.is_empty() || month.len() > 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        month_period(year, month)
    }

    fn parse_quarter(value: &str) -> Result<Period, PeriodError> {
        let invalid = || PeriodError::InvalidPeriodSpecification(format!("quarter '{value}'"));
        let (year, quarter) = value.split_once('-').ok_or_else(invalid)?;
        let quarter = quarter
            .strip_prefix('Q')
            .or_else(|| quarter.strip_prefix('q'))
            .ok_or_else(invalid)?;
        if year.len() != 4 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let quarter: u32 = quarter.parse().map_err(|_| invalid())?;
        if !(1..=4).contains(&quarter) {
            return Err(invalid());
        }
        quarter_period(year, quarter)
    }

    fn parse_year(value: &str) -> Result<Period, PeriodError> {
        let invalid = || PeriodError::InvalidPeriodSpecification(format!("year '{value}'"));
        if value.len() != 4 {
            return Err(invalid());
        }
        let year: i32 = value.parse().map_err(|_| invalid())?;
        year_period(year)
    }

    /// Derives the range the current range is compared against.
    ///
    /// `previous_period` is the immediately preceding block of equal inclusive
    /// length; `same_period_last_year` moves both endpoints back one calendar
    /// year (Feb 29 clamps to Feb 28); `budget` has no range.
    pub fn comparison_range(
        current: &Period,
        kind: ComparisonKind,
    ) -> Result<Option<Period>, PeriodError> {
        match kind {
            ComparisonKind::PreviousPeriod => current.shifted_back(current.duration_days()).map(Some),
            ComparisonKind::SamePeriodLastYear => {
                let start = add_years(current.start, -1)?;
                let end = add_years(current.end, -1)?;
                Period::new(start, end).map(Some)
            }
            ComparisonKind::Budget => Ok(None),
        }
    }

    /// Returns `count` trailing periods ending with `current`, oldest first.
    ///
    /// Month, quarter and year periods step by their calendar unit and each
    /// point spans the whole unit. Year-to-date steps by year, keeping the
    /// same day-of-year window. Custom ranges step by the configured fallback.
    pub fn sparkline_periods(
        &self,
        current: &ResolvedPeriod,
        count: usize,
    ) -> Result<Vec<Period>, PeriodError> {
        let range = current.range;
        let mut periods = Vec::with_capacity(count);

        for offset in (0..count).rev() {
            let i = i32::try_from(offset).map_err(|_| PeriodError::OutOfRange(range.start))?;
            let period = match current.period_type {
                PeriodType::Month => aligned_unit(range.start, -i, 1)?,
                PeriodType::Quarter => aligned_unit(range.start, -i * 3, 3)?,
                PeriodType::Year => aligned_unit(range.start, -i * 12, 12)?,
                PeriodType::Ytd => {
                    Period::new(add_years(range.start, -i)?, add_years(range.end, -i)?)?
                }
                PeriodType::Custom => match self.fallback {
                    SparklineFallback::Duration => {
                        range.shifted_back(range.duration_days() * i64::from(i))?
                    }
                    SparklineFallback::Month => {
                        Period::new(add_months(range.start, -i)?, add_months(range.end, -i)?)?
                    }
                },
            };
            periods.push(period);
        }

        Ok(periods)
    }
}

/// A unit of `unit_months` months starting at the month of `anchor` shifted by `shift` months.
fn aligned_unit(anchor: NaiveDate, shift: i32, unit_months: i32) -> Result<Period, PeriodError> {
    let start = add_months(month_start(anchor), shift)?;
    let end = add_days(add_months(start, unit_months)?, -1)?;
    Period::new(start, end)
}

/// The full calendar month.
pub fn month_period(year: i32, month: u32) -> Result<Period, PeriodError> {
    let start = ymd(year, month, 1)?;
    Period::new(start, month_end(start)?)
}

/// The full calendar quarter (`quarter` in 1..=4).
pub fn quarter_period(year: i32, quarter: u32) -> Result<Period, PeriodError> {
    let start = ymd(year, (quarter - 1) * 3 + 1, 1)?;
    aligned_unit(start, 0, 3)
}

/// The full calendar year.
pub fn year_period(year: i32) -> Result<Period, PeriodError> {
    Period::new(ymd(year, 1, 1)?, ymd(year, 12, 31)?)
}

/// Parses a day, accepting `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS` or RFC 3339.
///
/// Timestamps are clamped to their calendar day.
pub fn parse_day(raw: &str) -> Result<NaiveDate, PeriodError> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.date_naive());
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(ts.date());
    }
    Err(PeriodError::InvalidPeriodSpecification(format!(
        "unparsable date '{raw}'"
    )))
}
