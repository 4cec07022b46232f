//! Computations behind the named reports.
//!
//! Each function reads only from the given context and rounds figures as the
//! last step.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use tally_shared::types::{AccountId, percent_of, round_money, round_percent, safe_div};
use tokio_util::sync::CancellationToken;

use super::context::ReportContext;
use super::error::ReportError;
use super::fanout::run_bounded;
use super::types::{
    BreakdownItem, CashFlowReport, CashFlowTotals, CategoryBreakdownReport, Dataset,
    DynamicsReport, ExpensePaceReport, HeatmapItem, HeatmapReport, MetricCard, NetWorthAccount,
    NetWorthHistoryReport, NetWorthReport, OverviewReport, PaceMonth, TopExpenseItem,
    TopExpensesReport, TransactionSummaryReport,
};
use crate::aggregation::{AggregationDimension, CategoryTotal};
use crate::balance::BalanceReconstructor;
use crate::budget::{Budget, BudgetService};
use crate::flow::FlowGraphBuilder;
use crate::ledger::{Account, AccountFilter, LedgerEntry, TransactionFilter, TransactionType};
use crate::period::calendar::{add_days, add_months, month_end, month_start};
use crate::period::{Granularity, Period};

#[derive(Debug, Clone, Copy)]
struct Flow {
    income: Decimal,
    expenses: Decimal,
}

impl Flow {
    fn net(self) -> Decimal {
        self.income - self.expenses
    }

    fn savings_rate(self) -> Decimal {
        percent_of(self.net(), self.income)
    }
}

async fn flow_for(ctx: &ReportContext, range: Period) -> Result<Flow, ReportError> {
    let income = ctx
        .aggregator
        .sum_by_type(TransactionType::Income, &range, &ctx.filters)
        .await?;
    let expenses = ctx
        .aggregator
        .sum_by_type(TransactionType::Expense, &range, &ctx.filters)
        .await?;
    Ok(Flow { income, expenses })
}

fn card(
    current: Flow,
    previous: Option<Decimal>,
    trailing: &[Flow],
    value: fn(Flow) -> Decimal,
    round: fn(Decimal) -> Decimal,
) -> MetricCard {
    MetricCard {
        value: round(value(current)),
        previous: previous.map(round),
        sparkline: trailing.iter().map(|flow| round(value(*flow))).collect(),
    }
}

/// Sorts totals by descending amount, then by name.
fn rank(totals: &mut [CategoryTotal]) {
    totals.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));
}

/// Relative change in percent, zero when `previous` is zero.
pub(super) fn change_percent(current: Decimal, previous: Decimal) -> Decimal {
    safe_div(current - previous, previous.abs()) * Decimal::ONE_HUNDRED
}

/// Budgets active at either end of `range`, narrowed to the filtered categories.
pub(super) async fn budgets_for(
    ctx: &ReportContext,
    range: &Period,
) -> Result<Vec<Budget>, ReportError> {
    let mut budgets = ctx.store.get_active_budgets(range.start).await?;
    for budget in ctx.store.get_active_budgets(range.end).await? {
        if !budgets.iter().any(|b| b.id == budget.id) {
            budgets.push(budget);
        }
    }
    if !ctx.filters.category_ids.is_empty() {
        budgets.retain(|b| ctx.filters.category_ids.iter().any(|id| b.covers(Some(*id))));
    }
    Ok(budgets)
}

/// Prorated budget target for `range` in the base currency.
pub(super) async fn budget_target(
    ctx: &ReportContext,
    range: &Period,
) -> Result<Decimal, ReportError> {
    let budgets = budgets_for(ctx, range).await?;
    Ok(BudgetService::target_in_base(&budgets, range, None, &ctx.converter)?)
}

pub(super) async fn overview(
    ctx: &ReportContext,
    sparkline_count: usize,
    workers: usize,
    cancel: &CancellationToken,
) -> Result<OverviewReport, ReportError> {
    let sparkline = ctx
        .resolver
        .sparkline_periods(&ctx.window.current, sparkline_count)?;

    let mut ranges = vec![ctx.range()];
    ranges.extend(ctx.window.comparison);
    ranges.extend(sparkline.iter().copied());

    let flows = run_bounded(ranges.iter().map(|range| flow_for(ctx, *range)), workers, cancel).await?;
    let current = flows[0];
    let previous = ctx.window.comparison.map(|_| flows[1]);
    let trailing = &flows[flows.len() - sparkline.len()..];

    let budget = match ctx.window.comparison {
        Some(_) => None,
        None => Some(budget_target(ctx, &ctx.range()).await?),
    };

    Ok(OverviewReport {
        income: card(current, previous.map(|p| p.income), trailing, |f| f.income, round_money),
        expenses: card(
            current,
            previous.map(|p| p.expenses).or(budget),
            trailing,
            |f| f.expenses,
            round_money,
        ),
        net_cash_flow: card(current, previous.map(Flow::net), trailing, Flow::net, round_money),
        savings_rate: card(
            current,
            previous.map(Flow::savings_rate),
            trailing,
            Flow::savings_rate,
            round_percent,
        ),
        currency: ctx.currency.clone(),
    })
}

pub(super) async fn cash_flow(
    ctx: &ReportContext,
    workers: usize,
    cancel: &CancellationToken,
) -> Result<CashFlowReport, ReportError> {
    let range = ctx.range();
    let kinds = [TransactionType::Income, TransactionType::Expense];
    let mut grouped = run_bounded(
        kinds
            .iter()
            .map(|kind| async move {
                ctx.aggregator
                    .sum_grouped_by_category(*kind, &range, &ctx.filters)
                    .await
                    .map_err(ReportError::from)
            }),
        workers,
        cancel,
    )
    .await?;

    let mut expenses = grouped.pop().unwrap_or_default();
    let mut income = grouped.pop().unwrap_or_default();
    rank(&mut income);
    rank(&mut expenses);

    let total_income: Decimal = income.iter().map(|c| c.total).sum();
    let total_expenses: Decimal = expenses.iter().map(|c| c.total).sum();
    let graph = FlowGraphBuilder::build(&income, &expenses, total_income, total_expenses);

    Ok(CashFlowReport {
        nodes: graph.nodes,
        links: graph.links,
        totals: CashFlowTotals {
            income: round_money(total_income),
            expenses: round_money(total_expenses),
            savings: round_money(total_income - total_expenses),
        },
        currency: ctx.currency.clone(),
    })
}

pub(super) async fn expense_pace(
    ctx: &ReportContext,
    months: usize,
    workers: usize,
    cancel: &CancellationToken,
) -> Result<ExpensePaceReport, ReportError> {
    let anchor = month_start(ctx.range().end);
    let mut ranges = Vec::with_capacity(months);
    for offset in (0..months).rev() {
        let offset = i32::try_from(offset)
            .map_err(|_| ReportError::InvalidRequest(format!("months out of range: {months}")))?;
        let start = add_months(anchor, -offset)?;
        ranges.push(Period::new(start, month_end(start)?)?);
    }

    let months = run_bounded(ranges.iter().map(|month| pace_month(ctx, *month)), workers, cancel).await?;
    Ok(ExpensePaceReport {
        months,
        currency: ctx.currency.clone(),
    })
}

async fn pace_month(ctx: &ReportContext, month: Period) -> Result<PaceMonth, ReportError> {
    let today = ctx.today();
    let through = (today >= month.start).then(|| today.min(month.end));

    let daily = ctx
        .aggregator
        .daily_totals(TransactionType::Expense, &month, &ctx.filters)
        .await?;

    let mut running = Decimal::ZERO;
    let mut cumulative = Vec::new();
    for day in month.days().take_while(|day| through.is_some_and(|t| *day <= t)) {
        running += daily.get(&day).map_or(Decimal::ZERO, |d| d.total);
        cumulative.push(round_money(running));
    }

    let budget = budget_target(ctx, &month).await?;

    Ok(PaceMonth {
        label: month.start.format("%b %Y").to_string(),
        budget: round_money(budget),
        daily_expenses: cumulative,
        current_day: through.map_or(0, |d| d.day()),
        days_in_month: month.end.day(),
        total_spent: round_money(running),
        month_start: month.start,
        month_end: month.end,
    })
}

pub(super) async fn heatmap(ctx: &ReportContext) -> Result<HeatmapReport, ReportError> {
    let range = ctx.range();
    let daily = ctx
        .aggregator
        .daily_totals(TransactionType::Expense, &range, &ctx.filters)
        .await?;

    let items: Vec<HeatmapItem> = range
        .days()
        .map(|date| {
            let day = daily.get(&date).copied().unwrap_or_default();
            HeatmapItem {
                date,
                value: round_money(day.total),
                count: day.count,
            }
        })
        .collect();
    let max = items.iter().map(|i| i.value).max().unwrap_or_default();

    Ok(HeatmapReport {
        items,
        max,
        currency: ctx.currency.clone(),
    })
}

pub(super) async fn category_breakdown(
    ctx: &ReportContext,
    transaction_type: TransactionType,
) -> Result<CategoryBreakdownReport, ReportError> {
    let mut totals = ctx
        .aggregator
        .sum_grouped_by_category(transaction_type, &ctx.range(), &ctx.filters)
        .await?;
    rank(&mut totals);

    let total: Decimal = totals.iter().map(|c| c.total).sum();
    let items = totals
        .into_iter()
        .map(|c| BreakdownItem {
            percentage: round_percent(percent_of(c.total, total)),
            value: round_money(c.total),
            id: c.id,
            name: c.name,
            icon: c.icon,
            color: c.color,
        })
        .collect();

    Ok(CategoryBreakdownReport {
        items,
        total: round_money(total),
        currency: ctx.currency.clone(),
    })
}

pub(super) async fn dynamics(
    ctx: &ReportContext,
    transaction_type: TransactionType,
    granularity: Granularity,
    limit: Option<usize>,
    workers: usize,
    cancel: &CancellationToken,
) -> Result<DynamicsReport, ReportError> {
    let range = ctx.range();
    let buckets = ctx.aggregator.bucketer().generate(&range, granularity)?;

    let mut categories = ctx
        .aggregator
        .sum_grouped_by_category(transaction_type, &range, &ctx.filters)
        .await?;
    rank(&mut categories);
    // Uncategorized entries have no series of their own.
    categories.retain(|c| c.id.is_some());
    if let Some(limit) = limit {
        categories.truncate(limit);
    }

    let series = run_bounded(
        categories.iter().map(|c| async move {
            ctx.aggregator
                .grouped_by_period(transaction_type, &range, granularity, &ctx.filters, c.id)
                .await
                .map_err(ReportError::from)
        }),
        workers,
        cancel,
    )
    .await?;

    let datasets = categories
        .into_iter()
        .zip(series)
        .filter_map(|(category, totals)| {
            let id = category.id?;
            Some(Dataset {
                id,
                name: category.name,
                color: category.color,
                data: buckets
                    .iter()
                    .map(|b| round_money(totals.get(&b.key).copied().unwrap_or_default()))
                    .collect(),
            })
        })
        .collect();

    Ok(DynamicsReport {
        labels: buckets.into_iter().map(|b| b.label).collect(),
        datasets,
        currency: ctx.currency.clone(),
    })
}

pub(super) async fn top_expenses(
    ctx: &ReportContext,
    limit: usize,
) -> Result<TopExpensesReport, ReportError> {
    let entries = ctx
        .aggregator
        .top_by_amount(TransactionType::Expense, &ctx.range(), &ctx.filters, limit)
        .await?;
    let lookups = ctx.aggregator.lookups(AggregationDimension::Category).await?;

    let mut items = Vec::with_capacity(entries.len());
    for converted in entries {
        let entry = converted.entry;
        let currency = ctx.converter.get(entry.currency_id)?;
        items.push(TopExpenseItem {
            category_name: entry
                .category_id
                .and_then(|id| lookups.category(id))
                .map(|c| c.name.clone()),
            currency_code: currency.code.clone(),
            amount: round_money(converted.base_amount),
            original_amount: round_money(entry.amount),
            id: entry.id,
            date: entry.date,
            description: entry.description,
            category_id: entry.category_id,
            account_id: entry.account_id,
        });
    }

    Ok(TopExpensesReport {
        items,
        currency: ctx.currency.clone(),
    })
}

async fn accounts_and_history(
    ctx: &ReportContext,
) -> Result<(Vec<Account>, Vec<LedgerEntry>), ReportError> {
    let accounts = ctx
        .store
        .get_accounts(&AccountFilter {
            ids: Vec::new(),
            active_only: true,
        })
        .await?;
    let entries = ctx
        .store
        .list_transactions(&TransactionFilter::default())
        .await?;
    Ok((accounts, entries))
}

/// The date in `comparison` that sits as far into it as `reference` sits
/// into `range`, never past its end.
fn comparison_point(
    range: &Period,
    reference: NaiveDate,
    comparison: Period,
) -> Result<NaiveDate, ReportError> {
    if reference >= range.end {
        return Ok(comparison.end);
    }
    let offset = (reference - range.start).num_days();
    Ok(add_days(comparison.start, offset)?.min(comparison.end))
}

pub(super) async fn net_worth(ctx: &ReportContext) -> Result<NetWorthReport, ReportError> {
    let range = ctx.range();
    let reference = range.end.min(ctx.today());
    let comparison = ctx.window.comparison_or_previous()?;
    let previous_date = comparison_point(&range, reference, comparison)?;
    let (accounts, entries) = accounts_and_history(ctx).await?;
    let only = &ctx.filters.account_ids;

    let balances =
        BalanceReconstructor::balances_at_date(&accounts, &entries, reference, only, &ctx.converter)?;
    let current: Decimal = balances.iter().map(|b| b.balance_base).sum();
    let previous = BalanceReconstructor::net_worth_at_date(
        &accounts,
        &entries,
        previous_date,
        only,
        &ctx.converter,
    )?;

    let by_id: HashMap<AccountId, &Account> = accounts.iter().map(|a| (a.id, a)).collect();
    let mut rows: Vec<NetWorthAccount> = balances
        .iter()
        .filter_map(|b| {
            let account = by_id.get(&b.account_id)?;
            Some(NetWorthAccount {
                id: account.id,
                name: account.name.clone(),
                account_type: account.account_type,
                balance: round_money(b.balance_base),
                percentage: round_percent(percent_of(b.balance_base, current)),
            })
        })
        .collect();
    rows.sort_by(|a, b| b.balance.cmp(&a.balance).then_with(|| a.name.cmp(&b.name)));

    Ok(NetWorthReport {
        current: round_money(current),
        previous: round_money(previous),
        change: round_money(current - previous),
        change_percent: round_percent(change_percent(current, previous)),
        accounts: rows,
        currency: ctx.currency.clone(),
    })
}

pub(super) async fn net_worth_history(
    ctx: &ReportContext,
    granularity: Granularity,
) -> Result<NetWorthHistoryReport, ReportError> {
    let buckets = ctx.aggregator.bucketer().generate(&ctx.range(), granularity)?;
    let (accounts, entries) = accounts_and_history(ctx).await?;

    let dates: Vec<NaiveDate> = buckets.iter().map(|b| b.end).collect();
    let values = BalanceReconstructor::history(
        &accounts,
        &entries,
        &dates,
        &ctx.filters.account_ids,
        &ctx.converter,
    )?;

    Ok(NetWorthHistoryReport {
        labels: buckets.into_iter().map(|b| b.label).collect(),
        values: values.into_iter().map(round_money).collect(),
        currency: ctx.currency.clone(),
    })
}

pub(super) async fn transaction_summary(
    ctx: &ReportContext,
    transaction_type: TransactionType,
) -> Result<TransactionSummaryReport, ReportError> {
    let range = ctx.range();
    let total = ctx
        .aggregator
        .sum_by_type(transaction_type, &range, &ctx.filters)
        .await?;
    let days = range.duration_days();

    let (previous, previous_days) = match ctx.window.comparison {
        Some(comparison) => (
            ctx.aggregator
                .sum_by_type(transaction_type, &comparison, &ctx.filters)
                .await?,
            comparison.duration_days(),
        ),
        None => (budget_target(ctx, &range).await?, days),
    };

    let week = Decimal::from(7);
    let avg_per_day = safe_div(total, Decimal::from(days));
    let prev_avg_per_day = safe_div(previous, Decimal::from(previous_days));

    Ok(TransactionSummaryReport {
        total: round_money(total),
        previous: round_money(previous),
        avg_per_day: round_money(avg_per_day),
        avg_per_week: round_money(avg_per_day * week),
        prev_avg_per_day: round_money(prev_avg_per_day),
        prev_avg_per_week: round_money(prev_avg_per_day * week),
        days_in_period: days,
        currency: ctx.currency.clone(),
    })
}
