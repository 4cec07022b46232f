//! Ad-hoc reports: one or two grouping dimensions with requested metrics.

use rust_decimal::Decimal;
use tally_shared::types::{round_money, round_percent};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::context::ReportContext;
use super::error::ReportError;
use super::fanout::cancellable;
use super::named::{budget_target, change_percent};
use super::request::{AdHocDefinition, MAX_LIMIT, check_budget_comparison};
use super::types::{AdHocComparison, AdHocReport, AdHocRow, BudgetComparison};
use crate::aggregation::aggregator::group_entries;
use crate::aggregation::metrics::{compute, round_metrics};
use crate::aggregation::{AggregationDimension, ConvertedEntry, Group, Metric, MetricSet};
use crate::budget::BudgetService;
use crate::ledger::{CategoryKind, ReportFilters, TransactionFilter, TransactionType};
use crate::period::{Granularity, Period};

/// Rejects definitions that cannot be evaluated.
pub(super) fn validate(definition: &AdHocDefinition) -> Result<(), ReportError> {
    if definition.metrics.is_empty() {
        return Err(ReportError::InvalidRequest("at least one metric is required".into()));
    }
    if let Some(limit) = definition.limit {
        if limit == 0 || limit > MAX_LIMIT {
            return Err(ReportError::InvalidRequest(format!(
                "limit must be between 1 and {MAX_LIMIT}"
            )));
        }
    }
    if let Some(comparison) = definition.comparison {
        check_budget_comparison(comparison, definition.transaction_type)?;
    }
    if let Some(then_by) = definition.then_by {
        if definition.group_by == AggregationDimension::None {
            return Err(ReportError::InvalidRequest("then_by requires group_by".into()));
        }
        if then_by == definition.group_by {
            return Err(ReportError::InvalidRequest(
                "then_by must differ from group_by".into(),
            ));
        }
    }
    Ok(())
}

struct Denominators {
    overall: Decimal,
    income: Decimal,
}

/// Income over `range`, restricted by account only since category and tag
/// filters target the aggregated type.
async fn income_total(
    ctx: &ReportContext,
    definition: &AdHocDefinition,
    range: &Period,
) -> Result<Decimal, ReportError> {
    if definition.metrics.contains(&Metric::PercentOfIncome) {
        let filters = ReportFilters {
            account_ids: ctx.filters.account_ids.clone(),
            ..ReportFilters::default()
        };
        Ok(ctx
            .aggregator
            .sum_by_type(TransactionType::Income, range, &filters)
            .await?)
    } else {
        Ok(Decimal::ZERO)
    }
}

pub(super) async fn run(
    ctx: &ReportContext,
    definition: &AdHocDefinition,
    cancel: &CancellationToken,
) -> Result<AdHocReport, ReportError> {
    validate(definition)?;
    let range = ctx.range();
    let transaction_type = definition.transaction_type;

    let filter = TransactionFilter::for_type(transaction_type, range, &ctx.filters);
    let entries = cancellable(
        async { ctx.aggregator.entries(&filter).await.map_err(ReportError::from) },
        cancel,
    )
    .await?;
    // Totals come from the entries, not the groups, so multi-tag entries count once.
    let values: Vec<Decimal> = entries.iter().map(|e| e.base_amount).collect();
    let groups = group_along(ctx, entries, definition.group_by, definition.granularity).await?;

    let denominators = Denominators {
        overall: values.iter().copied().sum(),
        income: cancellable(income_total(ctx, definition, &range), cancel).await?,
    };
    let totals = compute(&values, &definition.metrics, denominators.overall, denominators.income);

    let data = rows(ctx, definition, groups, &denominators).await?;
    debug!(rows = data.len(), entries = values.len(), "Ad-hoc report grouped");

    let comparison = match ctx.window.comparison {
        Some(previous) if definition.comparison.is_some() => {
            Some(cancellable(compare(ctx, definition, previous, &totals), cancel).await?)
        }
        _ => None,
    };

    let budget_comparison = if ctx.window.comparison.is_none() && definition.comparison.is_some() {
        let budgeted = cancellable(budget_target(ctx, &range), cancel).await?;
        let variance = BudgetService::calculate_variance(
            budgeted,
            denominators.overall,
            CategoryKind::Expense,
        );
        Some(BudgetComparison {
            budgeted: round_money(variance.budgeted),
            actual: round_money(variance.actual),
            variance: round_money(variance.variance),
            variance_percent: round_percent(variance.variance_percent),
            utilization_percent: round_percent(variance.utilization_percent),
            status: variance.status,
        })
    } else {
        None
    };

    Ok(AdHocReport {
        transaction_type,
        period: range,
        group_by: definition.group_by,
        metrics: definition.metrics.clone(),
        data,
        totals: round_metrics(&totals),
        comparison,
        budget_comparison,
        currency: ctx.currency.clone(),
    })
}

async fn rows(
    ctx: &ReportContext,
    definition: &AdHocDefinition,
    mut groups: Vec<Group>,
    denominators: &Denominators,
) -> Result<Vec<AdHocRow>, ReportError> {
    if let Some(limit) = definition.limit {
        if definition.group_by != AggregationDimension::Period {
            groups.sort_by(|a, b| b.total().cmp(&a.total()).then_with(|| a.key.cmp(&b.key)));
        }
        groups.truncate(limit);
    }

    let mut data = Vec::with_capacity(groups.len());
    for group in groups {
        let children = match definition.then_by {
            Some(dimension) => {
                let children =
                    group_along(ctx, group.entries.clone(), dimension, definition.granularity)
                        .await?;
                Some(
                    children
                        .iter()
                        .map(|child| AdHocRow {
                            key: child.key.clone(),
                            label: child.label.clone(),
                            metrics: metrics_for(child, definition, denominators),
                            children: None,
                        })
                        .collect(),
                )
            }
            None => None,
        };
        data.push(AdHocRow {
            metrics: metrics_for(&group, definition, denominators),
            key: group.key,
            label: group.label,
            children,
        });
    }
    Ok(data)
}

/// Groups entries along `dimension` over the report range.
async fn group_along(
    ctx: &ReportContext,
    entries: Vec<ConvertedEntry>,
    dimension: AggregationDimension,
    granularity: Granularity,
) -> Result<Vec<Group>, ReportError> {
    let lookups = ctx.aggregator.lookups(dimension).await?;
    let buckets = if dimension == AggregationDimension::Period {
        ctx.aggregator.bucketer().generate(&ctx.range(), granularity)?
    } else {
        Vec::new()
    };
    Ok(group_entries(
        entries,
        dimension,
        &lookups,
        ctx.aggregator.bucketer(),
        &buckets,
        granularity,
    ))
}

fn metrics_for(group: &Group, definition: &AdHocDefinition, denominators: &Denominators) -> MetricSet {
    round_metrics(&compute(
        &group.values(),
        &definition.metrics,
        denominators.overall,
        denominators.income,
    ))
}

async fn compare(
    ctx: &ReportContext,
    definition: &AdHocDefinition,
    previous: Period,
    current: &MetricSet,
) -> Result<AdHocComparison, ReportError> {
    let filter = TransactionFilter::for_type(definition.transaction_type, previous, &ctx.filters);
    let values: Vec<Decimal> = ctx
        .aggregator
        .entries(&filter)
        .await?
        .iter()
        .map(|e| e.base_amount)
        .collect();
    let overall: Decimal = values.iter().copied().sum();
    let income = income_total(ctx, definition, &previous).await?;
    let totals = compute(&values, &definition.metrics, overall, income);

    let change: MetricSet = current
        .iter()
        .map(|(metric, value)| {
            let before = totals.get(metric).copied().unwrap_or_default();
            (*metric, *value - before)
        })
        .collect();
    let relative: MetricSet = current
        .iter()
        .map(|(metric, value)| {
            let before = totals.get(metric).copied().unwrap_or_default();
            (*metric, round_percent(change_percent(*value, before)))
        })
        .collect();

    Ok(AdHocComparison {
        kind: definition.comparison.unwrap_or(ctx.window.comparison_kind),
        period: previous,
        totals: round_metrics(&totals),
        change: round_metrics(&change),
        change_percent: relative,
    })
}
