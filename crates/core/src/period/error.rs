//! Period error types.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur while resolving or deriving periods.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    /// The period input could not be parsed.
    #[error("Invalid period specification: {0}")]
    InvalidPeriodSpecification(String),

    /// The range start is after its end.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// Calendar arithmetic left the supported date range.
    #[error("Date arithmetic out of range from {0}")]
    OutOfRange(NaiveDate),
}
