//! Report response types.
//!
//! Money is rounded to 2 dp and percentages to 1 dp before a value lands in
//! one of these types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tally_shared::types::{AccountId, CategoryId, TransactionId};

use crate::aggregation::{AggregationDimension, Metric, MetricSet};
use crate::budget::VarianceStatus;
use crate::flow::{FlowLink, FlowNode};
use crate::ledger::{AccountType, TransactionType};
use crate::period::{ComparisonKind, Period};

/// A headline figure with its comparison value and trailing series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricCard {
    /// Value for the current period.
    pub value: Decimal,
    /// Value for the comparison period, or the budget target.
    pub previous: Option<Decimal>,
    /// Trailing values, oldest first, ending with the current period.
    pub sparkline: Vec<Decimal>,
}

/// Overview report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewReport {
    /// Income total.
    pub income: MetricCard,
    /// Expense total.
    pub expenses: MetricCard,
    /// Income minus expenses.
    pub net_cash_flow: MetricCard,
    /// Net cash flow as a percentage of income.
    pub savings_rate: MetricCard,
    /// Base currency symbol.
    pub currency: String,
}

/// Cash-flow totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CashFlowTotals {
    /// Income total.
    pub income: Decimal,
    /// Expense total.
    pub expenses: Decimal,
    /// Income minus expenses.
    pub savings: Decimal,
}

/// Cash-flow report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CashFlowReport {
    /// Graph nodes.
    pub nodes: Vec<FlowNode>,
    /// Graph links.
    pub links: Vec<FlowLink>,
    /// Totals.
    pub totals: CashFlowTotals,
    /// Base currency symbol.
    pub currency: String,
}

/// One month of the expense pace report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaceMonth {
    /// Month label, e.g. `Jan 2025`.
    pub label: String,
    /// Prorated budget for the month.
    pub budget: Decimal,
    /// Cumulative spend at the end of each day through `current_day`.
    pub daily_expenses: Vec<Decimal>,
    /// Last day with data (today for the running month).
    pub current_day: u32,
    /// Days in the month.
    pub days_in_month: u32,
    /// Spend through `current_day`.
    pub total_spent: Decimal,
    /// First day of the month.
    pub month_start: NaiveDate,
    /// Last day of the month.
    pub month_end: NaiveDate,
}

/// Expense pace report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpensePaceReport {
    /// Months, oldest first.
    pub months: Vec<PaceMonth>,
    /// Base currency symbol.
    pub currency: String,
}

/// One day of the heatmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeatmapItem {
    /// Day.
    pub date: NaiveDate,
    /// Spend on that day.
    pub value: Decimal,
    /// Number of expenses on that day.
    pub count: usize,
}

/// Expense heatmap report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeatmapReport {
    /// One item per day of the period.
    pub items: Vec<HeatmapItem>,
    /// Largest daily value.
    pub max: Decimal,
    /// Base currency symbol.
    pub currency: String,
}

/// One category of the breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakdownItem {
    /// Category id, `None` for uncategorized.
    pub id: Option<CategoryId>,
    /// Category name.
    pub name: String,
    /// Icon name.
    pub icon: Option<String>,
    /// Display color.
    pub color: Option<String>,
    /// Category total.
    pub value: Decimal,
    /// Share of the overall total.
    pub percentage: Decimal,
}

/// Category breakdown report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryBreakdownReport {
    /// Categories by descending value.
    pub items: Vec<BreakdownItem>,
    /// Overall total.
    pub total: Decimal,
    /// Base currency symbol.
    pub currency: String,
}

/// One series of the dynamics report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dataset {
    /// Category id.
    pub id: CategoryId,
    /// Category name.
    pub name: String,
    /// Display color.
    pub color: Option<String>,
    /// One value per label.
    pub data: Vec<Decimal>,
}

/// Per-category time series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DynamicsReport {
    /// Bucket labels.
    pub labels: Vec<String>,
    /// One dataset per category, by descending total.
    pub datasets: Vec<Dataset>,
    /// Base currency symbol.
    pub currency: String,
}

/// One row of the top expenses report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopExpenseItem {
    /// Transaction id.
    pub id: TransactionId,
    /// Booking date.
    pub date: NaiveDate,
    /// Description.
    pub description: String,
    /// Category id.
    pub category_id: Option<CategoryId>,
    /// Category name.
    pub category_name: Option<String>,
    /// Source account.
    pub account_id: AccountId,
    /// Amount in the base currency.
    pub amount: Decimal,
    /// Amount in the transaction currency.
    pub original_amount: Decimal,
    /// Transaction currency code.
    pub currency_code: String,
}

/// Top expenses report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopExpensesReport {
    /// Largest expenses first.
    pub items: Vec<TopExpenseItem>,
    /// Base currency symbol.
    pub currency: String,
}

/// One account of the net worth report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetWorthAccount {
    /// Account id.
    pub id: AccountId,
    /// Account name.
    pub name: String,
    /// Account kind.
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Balance in the base currency.
    pub balance: Decimal,
    /// Share of net worth.
    pub percentage: Decimal,
}

/// Current net worth report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetWorthReport {
    /// Net worth at the reference date.
    pub current: Decimal,
    /// Net worth at the comparison date.
    pub previous: Decimal,
    /// `current - previous`.
    pub change: Decimal,
    /// Change relative to `previous`.
    pub change_percent: Decimal,
    /// Per-account balances by descending balance.
    pub accounts: Vec<NetWorthAccount>,
    /// Base currency symbol.
    pub currency: String,
}

/// Net worth history report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetWorthHistoryReport {
    /// Bucket labels.
    pub labels: Vec<String>,
    /// Net worth at the end of each bucket.
    pub values: Vec<Decimal>,
    /// Base currency symbol.
    pub currency: String,
}

/// Transaction summary report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummaryReport {
    /// Total for the current period.
    pub total: Decimal,
    /// Total for the comparison period, or the budget target.
    pub previous: Decimal,
    /// Average per day.
    pub avg_per_day: Decimal,
    /// Average per week.
    pub avg_per_week: Decimal,
    /// Comparison average per day.
    pub prev_avg_per_day: Decimal,
    /// Comparison average per week.
    pub prev_avg_per_week: Decimal,
    /// Days in the current period.
    pub days_in_period: i64,
    /// Base currency symbol.
    pub currency: String,
}

/// One row of an ad-hoc report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdHocRow {
    /// Group key.
    pub key: String,
    /// Group label.
    pub label: String,
    /// Requested metrics.
    pub metrics: MetricSet,
    /// Rows of the second dimension.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<AdHocRow>>,
}

/// Comparison block of an ad-hoc report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdHocComparison {
    /// Comparison kind.
    pub kind: ComparisonKind,
    /// Comparison range.
    pub period: Period,
    /// Totals over the comparison range.
    pub totals: MetricSet,
    /// `current - previous` per metric.
    pub change: MetricSet,
    /// Relative change per metric, in percent.
    pub change_percent: MetricSet,
}

/// Budget block of an ad-hoc report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetComparison {
    /// Prorated budget target.
    pub budgeted: Decimal,
    /// Actual total.
    pub actual: Decimal,
    /// Favorable variance is positive.
    pub variance: Decimal,
    /// Variance relative to the target.
    pub variance_percent: Decimal,
    /// Actual relative to the target.
    pub utilization_percent: Decimal,
    /// Classification.
    pub status: VarianceStatus,
}

/// Ad-hoc report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdHocReport {
    /// Aggregated transaction type.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Resolved range.
    pub period: Period,
    /// First grouping dimension.
    pub group_by: AggregationDimension,
    /// Computed metrics.
    pub metrics: Vec<Metric>,
    /// Rows.
    pub data: Vec<AdHocRow>,
    /// Metrics over all rows.
    pub totals: MetricSet,
    /// Comparison against another range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<AdHocComparison>,
    /// Comparison against budget targets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_comparison: Option<BudgetComparison>,
    /// Base currency symbol.
    pub currency: String,
}
