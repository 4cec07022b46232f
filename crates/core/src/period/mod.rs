//! Calendar period algebra.
//!
//! - `resolver` - turns a period type and value into a concrete day range,
//!   derives comparison ranges and trailing sparkline ranges
//! - `bucketer` - splits a range into ordered day/week/month buckets
//! - `calendar` - month/quarter/year arithmetic on `NaiveDate`

pub mod bucketer;
pub mod calendar;
pub mod error;
pub mod resolver;
pub mod types;

#[cfg(test)]
mod props;

pub use bucketer::PeriodBucketer;
pub use error::PeriodError;
pub use resolver::PeriodResolver;
pub use types::{
    ComparisonKind, Granularity, ParseMode, Period, PeriodBucket, PeriodSpec, PeriodType,
    ResolvedPeriod, SparklineFallback, WeekStart,
};
