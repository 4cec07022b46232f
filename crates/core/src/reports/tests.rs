//! End-to-end report tests over an in-memory ledger.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tally_shared::types::{AccountId, BudgetId, CategoryId, CurrencyId, TransactionId};
use tokio_util::sync::CancellationToken;

use super::*;
use crate::aggregation::{AggregationDimension, Metric};
use crate::budget::{Budget, BudgetPeriod, VarianceStatus};
use crate::currency::Currency;
use crate::flow::SAVINGS_NODE;
use crate::ledger::{
    Account, AccountType, Category, CategoryKind, InMemoryLedger, LedgerData, LedgerEntry,
    ReportFilters, SnapshotSource, TransactionType,
};
use crate::period::{ComparisonKind, Granularity, ParseMode, PeriodSpec, PeriodType};

const USD: CurrencyId = CurrencyId::from_u128(1);
const EUR: CurrencyId = CurrencyId::from_u128(2);
const CHECKING: AccountId = AccountId::from_u128(10);
const EURO_SAVINGS: AccountId = AccountId::from_u128(11);
const LOAN: AccountId = AccountId::from_u128(12);
const SALARY: CategoryId = CategoryId::from_u128(100);
const FREELANCE: CategoryId = CategoryId::from_u128(101);
const RENT: CategoryId = CategoryId::from_u128(200);
const GROCERIES: CategoryId = CategoryId::from_u128(201);
const TRANSPORT: CategoryId = CategoryId::from_u128(202);
const FUN: CategoryId = CategoryId::from_u128(203);
const UTILITIES: CategoryId = CategoryId::from_u128(204);

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn category(id: CategoryId, name: &str, kind: CategoryKind) -> Category {
    Category {
        id,
        name: name.into(),
        icon: None,
        color: Some("#123456".into()),
        kind,
    }
}

fn account(
    id: AccountId,
    name: &str,
    account_type: AccountType,
    currency_id: CurrencyId,
    initial: Decimal,
) -> Account {
    Account {
        id,
        name: name.into(),
        account_type,
        currency_id,
        initial_balance: initial,
        is_active: true,
        created_on: None,
    }
}

fn entry(
    n: u128,
    transaction_type: TransactionType,
    date: NaiveDate,
    account_id: AccountId,
    category_id: CategoryId,
    amount: Decimal,
    currency_id: CurrencyId,
) -> LedgerEntry {
    LedgerEntry {
        id: TransactionId::from_u128(n),
        transaction_type,
        date,
        account_id,
        to_account_id: None,
        category_id: Some(category_id),
        amount,
        to_amount: None,
        currency_id,
        to_currency_id: None,
        description: format!("entry {n}"),
        tag_ids: Vec::new(),
    }
}

fn currencies() -> Vec<Currency> {
    vec![
        Currency {
            id: USD,
            code: "USD".into(),
            symbol: "$".into(),
            decimals: 2,
            is_base: true,
            rate: Decimal::ONE,
        },
        Currency {
            id: EUR,
            code: "EUR".into(),
            symbol: "€".into(),
            decimals: 2,
            is_base: false,
            rate: dec!(0.855),
        },
    ]
}

/// January 2025: 5000 USD salary, 1000 EUR freelance income and 2900 USD of
/// expenses spread over three days.
fn january() -> LedgerData {
    use TransactionType::{Expense, Income};

    LedgerData {
        currencies: currencies(),
        accounts: vec![
            account(CHECKING, "Checking", AccountType::Bank, USD, dec!(1000)),
            account(EURO_SAVINGS, "Euro savings", AccountType::Savings, EUR, Decimal::ZERO),
            account(LOAN, "Loan", AccountType::Debt, USD, dec!(5000)),
        ],
        categories: vec![
            category(SALARY, "Salary", CategoryKind::Income),
            category(FREELANCE, "Freelance", CategoryKind::Income),
            category(RENT, "Rent", CategoryKind::Expense),
            category(GROCERIES, "Groceries", CategoryKind::Expense),
            category(TRANSPORT, "Transport", CategoryKind::Expense),
            category(FUN, "Fun", CategoryKind::Expense),
            category(UTILITIES, "Utilities", CategoryKind::Expense),
        ],
        tags: Vec::new(),
        budgets: vec![Budget {
            id: BudgetId::from_u128(500),
            name: "Monthly spending".into(),
            amount: dec!(3000),
            currency_id: USD,
            period: BudgetPeriod::Monthly,
            category_ids: Vec::new(),
            start_date: d(2024, 1, 1),
            end_date: None,
        }],
        transactions: vec![
            entry(1, Income, d(2025, 1, 1), CHECKING, SALARY, dec!(5000), USD),
            entry(2, Income, d(2025, 1, 15), EURO_SAVINGS, FREELANCE, dec!(1000), EUR),
            entry(3, Expense, d(2025, 1, 2), CHECKING, RENT, dec!(1500), USD),
            entry(4, Expense, d(2025, 1, 10), CHECKING, GROCERIES, dec!(800), USD),
            entry(5, Expense, d(2025, 1, 10), CHECKING, TRANSPORT, dec!(300), USD),
            entry(6, Expense, d(2025, 1, 20), CHECKING, FUN, dec!(200), USD),
            entry(7, Expense, d(2025, 1, 20), CHECKING, UTILITIES, dec!(100), USD),
        ],
    }
}

fn orchestrator_with(
    data: LedgerData,
    settings: ReportSettings,
) -> (ReportOrchestrator, Arc<InMemoryLedger>) {
    let ledger = Arc::new(InMemoryLedger::new(data));
    let orchestrator = ReportOrchestrator::new(
        Arc::clone(&ledger) as Arc<dyn SnapshotSource>,
        Arc::new(FixedClock(d(2025, 2, 15))),
        settings,
    );
    (orchestrator, ledger)
}

fn orchestrator() -> ReportOrchestrator {
    orchestrator_with(january(), ReportSettings::default()).0
}

fn jan_request() -> ReportRequest {
    ReportRequest::for_period(PeriodSpec::named(PeriodType::Month, "2025-01"))
}

#[tokio::test]
async fn test_overview_end_to_end() {
    let report = orchestrator()
        .overview(&jan_request(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.income.value, dec!(5855.00));
    assert_eq!(report.expenses.value, dec!(2900.00));
    assert_eq!(report.net_cash_flow.value, dec!(2955.00));
    assert_eq!(report.savings_rate.value, dec!(50.5));
    assert_eq!(report.currency, "$");

    // December is empty.
    assert_eq!(report.income.previous, Some(Decimal::ZERO));
    assert_eq!(report.savings_rate.previous, Some(Decimal::ZERO));

    assert_eq!(report.income.sparkline.len(), 6);
    assert_eq!(report.income.sparkline.last(), Some(&dec!(5855.00)));
    assert!(report.income.sparkline[..5].iter().all(Decimal::is_zero));
}

#[tokio::test]
async fn test_overview_budget_comparison_uses_target() {
    let request = jan_request().with_comparison(ComparisonKind::Budget);
    let report = orchestrator()
        .overview(&request, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.expenses.previous, Some(dec!(3000.00)));
    assert_eq!(report.income.previous, None);
}

#[tokio::test]
async fn test_heatmap_zero_fills_every_day() {
    let report = orchestrator()
        .expense_heatmap(&jan_request(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.items.len(), 31);
    let empty = report
        .items
        .iter()
        .filter(|i| i.value.is_zero() && i.count == 0)
        .count();
    assert_eq!(empty, 28);
    assert_eq!(report.max, dec!(1500.00));

    let tenth = report.items.iter().find(|i| i.date == d(2025, 1, 10)).unwrap();
    assert_eq!(tenth.count, 2);
}

#[tokio::test]
async fn test_cash_flow_graph() {
    let report = orchestrator()
        .cash_flow(&jan_request(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.totals.income, dec!(5855.00));
    assert_eq!(report.totals.expenses, dec!(2900.00));
    assert_eq!(report.totals.savings, dec!(2955.00));

    assert_eq!(report.nodes.len(), 8);
    assert_eq!(report.nodes[0].name, "Salary");
    assert_eq!(report.nodes[2].name, "Rent");
    assert_eq!(report.nodes[7].name, SAVINGS_NODE);
    assert!(report.links.iter().all(|l| l.value > Decimal::ZERO));
}

#[tokio::test]
async fn test_category_breakdown_ranks_and_shares() {
    let report = orchestrator()
        .category_breakdown(&jan_request(), TransactionType::Expense, &CancellationToken::new())
        .await
        .unwrap();

    let names: Vec<&str> = report.items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["Rent", "Groceries", "Transport", "Fun", "Utilities"]);
    assert_eq!(report.total, dec!(2900.00));
    assert_eq!(report.items[0].percentage, dec!(51.7));
}

#[tokio::test]
async fn test_category_breakdown_rejects_transfers() {
    let err = orchestrator()
        .category_breakdown(&jan_request(), TransactionType::Transfer, &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "InvalidRequest");
}

#[tokio::test]
async fn test_dynamics_series_align_with_labels() {
    let request = ReportRequest::for_period(PeriodSpec::custom("2024-12-01", "2025-01-31"));
    let report = orchestrator()
        .category_dynamics(
            &request,
            TransactionType::Expense,
            Granularity::Month,
            Some(2),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(report.labels, ["Dec 2024", "Jan 2025"]);
    assert_eq!(report.datasets.len(), 2);
    assert_eq!(report.datasets[0].id, RENT);
    assert_eq!(report.datasets[0].data, [Decimal::ZERO, dec!(1500.00)]);
}

#[tokio::test]
async fn test_top_expenses() {
    let report = orchestrator()
        .top_expenses(&jan_request(), Some(2), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.items.len(), 2);
    assert_eq!(report.items[0].amount, dec!(1500.00));
    assert_eq!(report.items[0].category_name.as_deref(), Some("Rent"));
    assert_eq!(report.items[1].currency_code, "USD");
}

#[tokio::test]
async fn test_top_expenses_rejects_zero_limit() {
    let err = orchestrator()
        .top_expenses(&jan_request(), Some(0), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ReportError::InvalidRequest(_)));
}

#[tokio::test]
async fn test_net_worth_excludes_debt_accounts() {
    let report = orchestrator()
        .net_worth(&jan_request(), &CancellationToken::new())
        .await
        .unwrap();

    // Checking 1000 + 5000 - 2900, plus 1000 EUR at 0.855.
    assert_eq!(report.current, dec!(3955.00));
    assert_eq!(report.previous, dec!(1000.00));
    assert_eq!(report.change, dec!(2955.00));
    assert_eq!(report.change_percent, dec!(295.5));

    assert_eq!(report.accounts.len(), 2);
    assert_eq!(report.accounts[0].id, CHECKING);
    assert_eq!(report.accounts[0].percentage, dec!(78.4));
    assert!(report.accounts.iter().all(|a| a.id != LOAN));
}

#[tokio::test]
async fn test_net_worth_running_period_compares_same_day_last_year() {
    use TransactionType::Expense;

    let mut data = january();
    data.transactions.extend([
        entry(20, Expense, d(2024, 2, 10), CHECKING, GROCERIES, dec!(200), USD),
        entry(21, Expense, d(2024, 2, 20), CHECKING, GROCERIES, dec!(300), USD),
    ]);
    let (orchestrator, _) = orchestrator_with(data, ReportSettings::default());
    let mut request = ReportRequest::for_period(PeriodSpec::named(PeriodType::Month, "2025-02"));
    request.comparison = ComparisonKind::SamePeriodLastYear;

    let report = orchestrator
        .net_worth(&request, &CancellationToken::new())
        .await
        .unwrap();

    // Today is Feb 15, so last year's point is Feb 15 2024, before the Feb 20 expense.
    assert_eq!(report.current, dec!(3455.00));
    assert_eq!(report.previous, dec!(800.00));
}

#[tokio::test]
async fn test_net_worth_history_per_month() {
    let request = ReportRequest::for_period(PeriodSpec::custom("2024-12-01", "2025-01-31"));
    let report = orchestrator()
        .net_worth_history(&request, Granularity::Month, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.labels, ["Dec 2024", "Jan 2025"]);
    assert_eq!(report.values, [dec!(1000.00), dec!(3955.00)]);
}

#[tokio::test]
async fn test_transaction_summary_averages() {
    let report = orchestrator()
        .transaction_summary(&jan_request(), TransactionType::Expense, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.total, dec!(2900.00));
    assert_eq!(report.previous, Decimal::ZERO);
    assert_eq!(report.days_in_period, 31);
    assert_eq!(report.avg_per_day, dec!(93.55));
    assert_eq!(report.avg_per_week, dec!(654.84));
}

#[tokio::test]
async fn test_transaction_summary_budget_target_for_expenses() {
    let mut request = jan_request();
    request.comparison = ComparisonKind::Budget;

    let report = orchestrator()
        .transaction_summary(&request, TransactionType::Expense, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.total, dec!(2900.00));
    assert_eq!(report.previous, dec!(3000.00));
}

#[tokio::test]
async fn test_budget_comparison_rejected_for_other_types() {
    let mut request = jan_request();
    request.comparison = ComparisonKind::Budget;
    let orchestrator = orchestrator();
    let cancel = CancellationToken::new();

    for transaction_type in [TransactionType::Income, TransactionType::Transfer] {
        let err = orchestrator
            .transaction_summary(&request, transaction_type, &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, ReportError::InvalidRequest(_)));
    }

    let mut definition = AdHocDefinition::new(
        TransactionType::Income,
        PeriodSpec::named(PeriodType::Month, "2025-01"),
    );
    definition.comparison = Some(ComparisonKind::Budget);
    let err = orchestrator.custom(&definition, &cancel).await.unwrap_err();
    assert_eq!(err.kind(), "InvalidRequest");
}

#[tokio::test]
async fn test_expense_pace_running_month() {
    let request = ReportRequest::for_period(PeriodSpec::named(PeriodType::Month, "2025-02"));
    let report = orchestrator()
        .expense_pace(&request, None, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.months.len(), 2);
    let jan = &report.months[0];
    assert_eq!(jan.label, "Jan 2025");
    assert_eq!(jan.current_day, 31);
    assert_eq!(jan.daily_expenses.len(), 31);
    assert_eq!(jan.daily_expenses[0], Decimal::ZERO);
    assert_eq!(jan.daily_expenses[1], dec!(1500.00));
    assert_eq!(jan.total_spent, dec!(2900.00));
    assert_eq!(jan.budget, dec!(3000.00));

    let feb = &report.months[1];
    assert_eq!(feb.current_day, 15);
    assert_eq!(feb.days_in_month, 28);
    assert_eq!(feb.daily_expenses.len(), 15);
    assert_eq!(feb.total_spent, Decimal::ZERO);
}

#[tokio::test]
async fn test_custom_report_by_category_with_budget() {
    let mut definition = AdHocDefinition::new(
        TransactionType::Expense,
        PeriodSpec::named(PeriodType::Month, "2025-01"),
    );
    definition.group_by = AggregationDimension::Category;
    definition.then_by = Some(AggregationDimension::Period);
    definition.metrics = vec![Metric::Sum, Metric::Count, Metric::PercentOfTotal];
    definition.limit = Some(3);
    definition.comparison = Some(ComparisonKind::Budget);

    let report = orchestrator()
        .custom(&definition, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.data.len(), 3);
    assert_eq!(report.data[0].label, "Rent");
    assert_eq!(report.data[0].metrics[&Metric::Sum], dec!(1500.00));
    assert_eq!(report.data[0].metrics[&Metric::PercentOfTotal], dec!(51.7));

    let children = report.data[0].children.as_ref().unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].label, "Jan 2025");

    assert_eq!(report.totals[&Metric::Count], dec!(5));
    assert!(report.comparison.is_none());

    let budget = report.budget_comparison.unwrap();
    assert_eq!(budget.budgeted, dec!(3000.00));
    assert_eq!(budget.variance, dec!(100.00));
    assert_eq!(budget.utilization_percent, dec!(96.7));
    assert_eq!(budget.status, VarianceStatus::Favorable);
}

#[tokio::test]
async fn test_custom_report_previous_period_change() {
    let mut definition = AdHocDefinition::new(
        TransactionType::Income,
        PeriodSpec::named(PeriodType::Month, "2025-01"),
    );
    definition.comparison = Some(ComparisonKind::PreviousPeriod);

    let report = orchestrator()
        .custom(&definition, &CancellationToken::new())
        .await
        .unwrap();

    let comparison = report.comparison.unwrap();
    assert_eq!(comparison.totals[&Metric::Sum], Decimal::ZERO);
    assert_eq!(comparison.change[&Metric::Sum], dec!(5855.00));
    assert_eq!(comparison.change[&Metric::Count], dec!(2));
}

#[tokio::test]
async fn test_account_filter_narrows_every_aggregate() {
    let request = jan_request().with_filters(ReportFilters {
        account_ids: vec![EURO_SAVINGS],
        ..ReportFilters::default()
    });
    let report = orchestrator()
        .overview(&request, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.income.value, dec!(855.00));
    assert_eq!(report.expenses.value, Decimal::ZERO);
    assert_eq!(report.savings_rate.value, dec!(100.0));
}

#[tokio::test]
async fn test_cancelled_token_fails_report() {
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = orchestrator().overview(&jan_request(), &cancel).await.unwrap_err();
    assert!(matches!(err, ReportError::Cancelled));
}

#[tokio::test]
async fn test_missing_base_currency() {
    let mut data = january();
    for currency in &mut data.currencies {
        currency.is_base = false;
    }
    let (orchestrator, _) = orchestrator_with(data, ReportSettings::default());

    let err = orchestrator
        .overview(&jan_request(), &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "MissingBaseCurrency");
}

#[tokio::test]
async fn test_reports_carry_store_base_currency_symbol() {
    let mut data = january();
    data.currencies[0].symbol = "US$".into();
    let (orchestrator, _) = orchestrator_with(data, ReportSettings::default());

    let report = orchestrator
        .net_worth(&jan_request(), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(report.currency, "US$");
}

#[tokio::test]
async fn test_strict_mode_rejects_malformed_period() {
    let settings = ReportSettings {
        parse_mode: ParseMode::Strict,
        ..ReportSettings::default()
    };
    let (orchestrator, _) = orchestrator_with(january(), settings);
    let request = ReportRequest::for_period(PeriodSpec::named(PeriodType::Month, "2025-13"));

    let err = orchestrator
        .overview(&request, &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "InvalidPeriodSpecification");
}

#[tokio::test]
async fn test_cache_is_scoped_to_revision() {
    let settings = ReportSettings {
        cache_capacity: 16,
        ..ReportSettings::default()
    };
    let (orchestrator, ledger) = orchestrator_with(january(), settings);
    let cancel = CancellationToken::new();

    let first = orchestrator.overview(&jan_request(), &cancel).await.unwrap();
    let second = orchestrator.overview(&jan_request(), &cancel).await.unwrap();
    assert_eq!(first, second);

    let cache = orchestrator.cache().unwrap();
    cache.run_pending_tasks().await;
    assert_eq!(cache.entry_count(), 1);

    let mut data = january();
    data.transactions.clear();
    ledger.replace(data).await;

    let after = orchestrator.overview(&jan_request(), &cancel).await.unwrap();
    assert_eq!(after.income.value, Decimal::ZERO);
}
