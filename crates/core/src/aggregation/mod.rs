//! Sums, counts and derived metrics over filtered ledger entries.
//!
//! All totals are in the base currency and keep full precision.

pub mod aggregator;
pub mod error;
pub mod metrics;
pub mod types;

#[cfg(test)]
mod aggregator_props;

pub use aggregator::LedgerAggregator;
pub use error::AggregationError;
pub use metrics::{Metric, MetricSet};
pub use types::{AggregationDimension, CategoryTotal, ConvertedEntry, DailyTotal, Group};
