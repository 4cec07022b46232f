//! Report requests.

use serde::{Deserialize, Serialize};

use super::error::ReportError;
use crate::aggregation::{AggregationDimension, Metric};
use crate::ledger::{ReportFilters, TransactionType};
use crate::period::{ComparisonKind, Granularity, PeriodSpec};

/// Default number of months in the expense pace report.
pub const DEFAULT_PACE_MONTHS: usize = 2;

/// Default number of rows in the top expenses report.
pub const DEFAULT_TOP_LIMIT: usize = 10;

/// Largest accepted `limit` or `months` value.
pub const MAX_LIMIT: usize = 500;

/// Inputs shared by every named report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportRequest {
    /// Period to report on.
    #[serde(default)]
    pub period: PeriodSpec,
    /// Account, category and tag restrictions.
    #[serde(default)]
    pub filters: ReportFilters,
    /// What the current period is compared against.
    #[serde(default)]
    pub comparison: ComparisonKind,
}

impl ReportRequest {
    /// A request for `period` with no filters and the default comparison.
    #[must_use]
    pub fn for_period(period: PeriodSpec) -> Self {
        Self {
            period,
            ..Self::default()
        }
    }

    /// Sets the comparison kind.
    #[must_use]
    pub fn with_comparison(mut self, comparison: ComparisonKind) -> Self {
        self.comparison = comparison;
        self
    }

    /// Sets the filters.
    #[must_use]
    pub fn with_filters(mut self, filters: ReportFilters) -> Self {
        self.filters = filters;
        self
    }
}

/// Definition of an ad-hoc report.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdHocDefinition {
    /// Transaction type to aggregate.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Period to report on.
    #[serde(default)]
    pub period: PeriodSpec,
    /// Account, category and tag restrictions.
    #[serde(default)]
    pub filters: ReportFilters,
    /// First grouping dimension.
    #[serde(default)]
    pub group_by: AggregationDimension,
    /// Optional second dimension, producing `children` rows.
    #[serde(default)]
    pub then_by: Option<AggregationDimension>,
    /// Bucket size when grouping by period.
    #[serde(default)]
    pub granularity: Granularity,
    /// Metrics to compute per row.
    #[serde(default = "default_metrics")]
    pub metrics: Vec<Metric>,
    /// Keep only the first `limit` rows after ranking by sum.
    #[serde(default)]
    pub limit: Option<usize>,
    /// Optional comparison.
    #[serde(default)]
    pub comparison: Option<ComparisonKind>,
}

/// Budgets only cap spending, so only expense reports compare against them.
pub(super) fn check_budget_comparison(
    comparison: ComparisonKind,
    transaction_type: TransactionType,
) -> Result<(), ReportError> {
    if comparison == ComparisonKind::Budget && transaction_type != TransactionType::Expense {
        return Err(ReportError::InvalidRequest(format!(
            "budget comparison needs expense, got {}",
            transaction_type.as_str()
        )));
    }
    Ok(())
}

fn default_metrics() -> Vec<Metric> {
    vec![Metric::Sum, Metric::Count]
}

impl AdHocDefinition {
    /// A definition with default options.
    #[must_use]
    pub fn new(transaction_type: TransactionType, period: PeriodSpec) -> Self {
        Self {
            transaction_type,
            period,
            filters: ReportFilters::default(),
            group_by: AggregationDimension::None,
            then_by: None,
            granularity: Granularity::Month,
            metrics: default_metrics(),
            limit: None,
            comparison: None,
        }
    }
}
