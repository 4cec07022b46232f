//! Entry point for every report.
//!
//! The orchestrator takes one ledger snapshot per request, resolves the
//! period against its clock, and hands a [`ReportContext`] to the report
//! computation. Sub-aggregations fan out with a bounded worker limit and stop
//! as soon as the caller's cancellation token fires.

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use super::adhoc;
use super::cache::{CacheKey, ReportCache};
use super::context::{Clock, ReportContext, ReportSettings};
use super::error::ReportError;
use super::fanout::cancellable;
use super::named;
use super::request::{
    AdHocDefinition, DEFAULT_PACE_MONTHS, DEFAULT_TOP_LIMIT, MAX_LIMIT, ReportRequest,
    check_budget_comparison,
};
use super::types::{
    AdHocReport, CashFlowReport, CategoryBreakdownReport, DynamicsReport, ExpensePaceReport,
    HeatmapReport, NetWorthHistoryReport, NetWorthReport, OverviewReport, TopExpensesReport,
    TransactionSummaryReport,
};
use crate::ledger::{SnapshotSource, TransactionType};
use crate::period::{ComparisonKind, Granularity};

/// Runs reports against snapshots of a ledger.
#[derive(Clone)]
pub struct ReportOrchestrator {
    source: Arc<dyn SnapshotSource>,
    clock: Arc<dyn Clock>,
    settings: ReportSettings,
    cache: Option<ReportCache>,
}

impl ReportOrchestrator {
    /// Creates an orchestrator. Caching is enabled when the settings give it
    /// a non-zero capacity.
    #[must_use]
    pub fn new(
        source: Arc<dyn SnapshotSource>,
        clock: Arc<dyn Clock>,
        settings: ReportSettings,
    ) -> Self {
        let cache = ReportCache::with_config(settings.cache_capacity, settings.cache_ttl_secs);
        Self {
            source,
            clock,
            settings,
            cache,
        }
    }

    /// The active settings.
    #[must_use]
    pub const fn settings(&self) -> &ReportSettings {
        &self.settings
    }

    /// The result cache, if enabled.
    #[must_use]
    pub const fn cache(&self) -> Option<&ReportCache> {
        self.cache.as_ref()
    }

    /// Takes a snapshot and returns its revision. Backs the readiness check.
    pub async fn snapshot_revision(&self) -> Result<u64, ReportError> {
        let store = self.source.snapshot().await?;
        Ok(store.revision())
    }

    async fn context(
        &self,
        request: &ReportRequest,
        cancel: &CancellationToken,
    ) -> Result<ReportContext, ReportError> {
        let store = cancellable(
            async { self.source.snapshot().await.map_err(ReportError::from) },
            cancel,
        )
        .await?;
        let today = self.clock.today();
        let ctx = cancellable(
            ReportContext::build(
                store,
                &self.settings,
                today,
                &request.period,
                request.comparison,
                request.filters.clone(),
            ),
            cancel,
        )
        .await?;
        debug!(
            range = %ctx.range(),
            revision = ctx.store.revision(),
            "Report context ready"
        );
        Ok(ctx)
    }

    /// Serves `compute` from the cache when enabled.
    async fn cached<T, K, F>(
        &self,
        report: &'static str,
        key: &K,
        ctx: &ReportContext,
        cancel: &CancellationToken,
        compute: F,
    ) -> Result<T, ReportError>
    where
        T: Clone + Send + Sync + 'static,
        K: Serialize + ?Sized,
        F: Future<Output = Result<T, ReportError>>,
    {
        let compute = cancellable(compute, cancel);
        let result = match &self.cache {
            Some(cache) => {
                let request = serde_json::to_string(key)
                    .map_err(|e| ReportError::InvalidRequest(e.to_string()))?;
                let key = CacheKey {
                    report,
                    request,
                    today: ctx.today(),
                    revision: ctx.store.revision(),
                };
                cache.get_or_compute(key, compute).await
            }
            None => compute.await,
        };
        if result.is_ok() {
            info!(report, range = %ctx.range(), "Report generated");
        }
        result
    }

    /// Income, expenses, net cash flow and savings rate with comparison and
    /// sparkline values.
    #[instrument(skip_all, fields(report = "overview"))]
    pub async fn overview(
        &self,
        request: &ReportRequest,
        cancel: &CancellationToken,
    ) -> Result<OverviewReport, ReportError> {
        let ctx = self.context(request, cancel).await?;
        let compute = named::overview(
            &ctx,
            self.settings.sparkline_count,
            self.settings.worker_limit,
            cancel,
        );
        self.cached("overview", request, &ctx, cancel, compute).await
    }

    /// Income-to-expense flow graph.
    #[instrument(skip_all, fields(report = "cash_flow"))]
    pub async fn cash_flow(
        &self,
        request: &ReportRequest,
        cancel: &CancellationToken,
    ) -> Result<CashFlowReport, ReportError> {
        let ctx = self.context(request, cancel).await?;
        let compute = named::cash_flow(&ctx, self.settings.worker_limit, cancel);
        self.cached("cash_flow", request, &ctx, cancel, compute).await
    }

    /// Cumulative daily spend for the trailing `months`, ending with the
    /// month of the period end.
    #[instrument(skip_all, fields(report = "expense_pace"))]
    pub async fn expense_pace(
        &self,
        request: &ReportRequest,
        months: Option<usize>,
        cancel: &CancellationToken,
    ) -> Result<ExpensePaceReport, ReportError> {
        let months = check_limit("months", months, DEFAULT_PACE_MONTHS)?;
        let ctx = self.context(request, cancel).await?;
        let compute = named::expense_pace(&ctx, months, self.settings.worker_limit, cancel);
        self.cached("expense_pace", &(request, months), &ctx, cancel, compute)
            .await
    }

    /// Daily spend for every day of the period.
    #[instrument(skip_all, fields(report = "expense_heatmap"))]
    pub async fn expense_heatmap(
        &self,
        request: &ReportRequest,
        cancel: &CancellationToken,
    ) -> Result<HeatmapReport, ReportError> {
        let ctx = self.context(request, cancel).await?;
        self.cached("expense_heatmap", request, &ctx, cancel, named::heatmap(&ctx))
            .await
    }

    /// Totals per category with their share of the whole.
    #[instrument(skip_all, fields(report = "category_breakdown"))]
    pub async fn category_breakdown(
        &self,
        request: &ReportRequest,
        transaction_type: TransactionType,
        cancel: &CancellationToken,
    ) -> Result<CategoryBreakdownReport, ReportError> {
        check_flow_type(transaction_type)?;
        let ctx = self.context(request, cancel).await?;
        let compute = named::category_breakdown(&ctx, transaction_type);
        self.cached(
            "category_breakdown",
            &(request, transaction_type),
            &ctx,
            cancel,
            compute,
        )
        .await
    }

    /// One time series per category.
    #[instrument(skip_all, fields(report = "category_dynamics"))]
    pub async fn category_dynamics(
        &self,
        request: &ReportRequest,
        transaction_type: TransactionType,
        granularity: Granularity,
        limit: Option<usize>,
        cancel: &CancellationToken,
    ) -> Result<DynamicsReport, ReportError> {
        check_flow_type(transaction_type)?;
        let limit = limit
            .map(|l| check_limit("limit", Some(l), DEFAULT_TOP_LIMIT))
            .transpose()?;
        let ctx = self.context(request, cancel).await?;
        let compute = named::dynamics(
            &ctx,
            transaction_type,
            granularity,
            limit,
            self.settings.worker_limit,
            cancel,
        );
        self.cached(
            "category_dynamics",
            &(request, transaction_type, granularity, limit),
            &ctx,
            cancel,
            compute,
        )
        .await
    }

    /// The largest expenses of the period.
    #[instrument(skip_all, fields(report = "top_expenses"))]
    pub async fn top_expenses(
        &self,
        request: &ReportRequest,
        limit: Option<usize>,
        cancel: &CancellationToken,
    ) -> Result<TopExpensesReport, ReportError> {
        let limit = check_limit("limit", limit, DEFAULT_TOP_LIMIT)?;
        let ctx = self.context(request, cancel).await?;
        let compute = named::top_expenses(&ctx, limit);
        self.cached("top_expenses", &(request, limit), &ctx, cancel, compute)
            .await
    }

    /// Net worth at the end of the period (capped at today) against the end
    /// of the comparison period.
    #[instrument(skip_all, fields(report = "net_worth"))]
    pub async fn net_worth(
        &self,
        request: &ReportRequest,
        cancel: &CancellationToken,
    ) -> Result<NetWorthReport, ReportError> {
        let ctx = self.context(request, cancel).await?;
        self.cached("net_worth", request, &ctx, cancel, named::net_worth(&ctx))
            .await
    }

    /// Net worth at the end of each bucket of the period.
    #[instrument(skip_all, fields(report = "net_worth_history"))]
    pub async fn net_worth_history(
        &self,
        request: &ReportRequest,
        granularity: Granularity,
        cancel: &CancellationToken,
    ) -> Result<NetWorthHistoryReport, ReportError> {
        let ctx = self.context(request, cancel).await?;
        let compute = named::net_worth_history(&ctx, granularity);
        self.cached(
            "net_worth_history",
            &(request, granularity),
            &ctx,
            cancel,
            compute,
        )
        .await
    }

    /// Totals and daily/weekly averages against the comparison period.
    ///
    /// A budget comparison is only accepted for expenses.
    #[instrument(skip_all, fields(report = "transaction_summary"))]
    pub async fn transaction_summary(
        &self,
        request: &ReportRequest,
        transaction_type: TransactionType,
        cancel: &CancellationToken,
    ) -> Result<TransactionSummaryReport, ReportError> {
        check_budget_comparison(request.comparison, transaction_type)?;
        let ctx = self.context(request, cancel).await?;
        let compute = named::transaction_summary(&ctx, transaction_type);
        self.cached(
            "transaction_summary",
            &(request, transaction_type),
            &ctx,
            cancel,
            compute,
        )
        .await
    }

    /// Evaluates an ad-hoc report definition.
    #[instrument(skip_all, fields(report = "custom", group_by = definition.group_by.as_str()))]
    pub async fn custom(
        &self,
        definition: &AdHocDefinition,
        cancel: &CancellationToken,
    ) -> Result<AdHocReport, ReportError> {
        adhoc::validate(definition)?;
        let request = ReportRequest {
            period: definition.period.clone(),
            filters: definition.filters.clone(),
            comparison: definition.comparison.unwrap_or(ComparisonKind::PreviousPeriod),
        };
        let ctx = self.context(&request, cancel).await?;
        let compute = adhoc::run(&ctx, definition, cancel);
        self.cached("custom", definition, &ctx, cancel, compute).await
    }
}

fn check_limit(name: &str, value: Option<usize>, default: usize) -> Result<usize, ReportError> {
    match value {
        None => Ok(default),
        Some(v) if (1..=MAX_LIMIT).contains(&v) => Ok(v),
        Some(v) => Err(ReportError::InvalidRequest(format!(
            "{name} must be between 1 and {MAX_LIMIT}, got {v}"
        ))),
    }
}

fn check_flow_type(transaction_type: TransactionType) -> Result<(), ReportError> {
    match transaction_type {
        TransactionType::Income | TransactionType::Expense => Ok(()),
        other => Err(ReportError::InvalidRequest(format!(
            "category reports need income or expense, got {}",
            other.as_str()
        ))),
    }
}
