//! Report settings and the per-request context every report reads from.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tally_shared::config::ReportsConfig;

use super::error::ReportError;
use crate::aggregation::LedgerAggregator;
use crate::currency::{CurrencyConverter, CurrencyError};
use crate::ledger::{LedgerStore, ReportFilters};
use crate::period::{
    ComparisonKind, ParseMode, Period, PeriodBucketer, PeriodError, PeriodResolver, PeriodSpec,
    ResolvedPeriod, SparklineFallback, WeekStart,
};

/// Source of the reference date "today".
pub trait Clock: Send + Sync {
    /// The current local date.
    fn today(&self) -> NaiveDate;
}

/// Reads the local system date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always returns the same date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Parsed reporting options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSettings {
    /// How malformed named periods are treated.
    pub parse_mode: ParseMode,
    /// Maximum sub-aggregations in flight per report.
    pub worker_limit: usize,
    /// Number of sparkline points.
    pub sparkline_count: usize,
    /// First day of weekly buckets.
    pub week_start: WeekStart,
    /// Sparkline step for custom ranges.
    pub sparkline_fallback: SparklineFallback,
    /// Cached results, zero disables caching.
    pub cache_capacity: u64,
    /// Cache entry lifetime.
    pub cache_ttl_secs: u64,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            parse_mode: ParseMode::Lenient,
            worker_limit: 4,
            sparkline_count: 6,
            week_start: WeekStart::Sunday,
            sparkline_fallback: SparklineFallback::Duration,
            cache_capacity: 0,
            cache_ttl_secs: 60,
        }
    }
}

impl TryFrom<&ReportsConfig> for ReportSettings {
    type Error = PeriodError;

    fn try_from(config: &ReportsConfig) -> Result<Self, Self::Error> {
        Ok(Self {
            parse_mode: if config.strict_periods {
                ParseMode::Strict
            } else {
                ParseMode::Lenient
            },
            worker_limit: config.worker_limit.max(1),
            sparkline_count: config.sparkline_count,
            week_start: config.week_start.parse()?,
            sparkline_fallback: config.sparkline_fallback.parse()?,
            cache_capacity: config.cache_capacity,
            cache_ttl_secs: config.cache_ttl_secs,
        })
    }
}

/// Resolved time window of one request.
///
/// Everything here is derived once from the request and the reference date,
/// so each report sees one consistent set of ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    /// The resolved current period.
    pub current: ResolvedPeriod,
    /// How the current period is compared.
    pub comparison_kind: ComparisonKind,
    /// The comparison range, absent for budget comparisons.
    pub comparison: Option<Period>,
}

impl ReportWindow {
    /// Resolves `spec` and derives the comparison range.
    pub fn resolve(
        resolver: &PeriodResolver,
        spec: &PeriodSpec,
        comparison_kind: ComparisonKind,
    ) -> Result<Self, PeriodError> {
        let current = resolver.resolve(spec)?;
        let comparison = PeriodResolver::comparison_range(&current.range, comparison_kind)?;
        Ok(Self {
            current,
            comparison_kind,
            comparison,
        })
    }

    /// The current range.
    #[must_use]
    pub const fn range(&self) -> Period {
        self.current.range
    }

    /// The comparison range, or the block immediately before the current
    /// range when comparing against budgets.
    pub fn comparison_or_previous(&self) -> Result<Period, PeriodError> {
        match self.comparison {
            Some(range) => Ok(range),
            None => self.range().shifted_back(self.range().duration_days()),
        }
    }
}

/// Everything one report computation reads from.
///
/// Holds a single ledger snapshot, so every sub-aggregation of the report
/// sees the same state.
#[derive(Clone)]
pub struct ReportContext {
    /// The snapshot.
    pub store: Arc<dyn LedgerStore>,
    /// Converter built from the snapshot's currencies.
    pub converter: Arc<CurrencyConverter>,
    /// Aggregator over the snapshot.
    pub aggregator: LedgerAggregator,
    /// Resolver pinned to the request's reference date.
    pub resolver: PeriodResolver,
    /// The resolved window.
    pub window: ReportWindow,
    /// Report filters.
    pub filters: ReportFilters,
    /// Base currency symbol.
    pub currency: String,
}

impl ReportContext {
    /// Builds a context from a snapshot.
    ///
    /// # Errors
    ///
    /// Fails when the snapshot cannot be read, has no single base currency,
    /// or the period cannot be resolved.
    pub async fn build(
        store: Arc<dyn LedgerStore>,
        settings: &ReportSettings,
        today: NaiveDate,
        spec: &PeriodSpec,
        comparison: ComparisonKind,
        filters: ReportFilters,
    ) -> Result<Self, ReportError> {
        let converter = Arc::new(CurrencyConverter::new(store.list_currencies().await?)?);
        let resolver = PeriodResolver::new(settings.parse_mode, today)
            .with_sparkline_fallback(settings.sparkline_fallback);
        let window = ReportWindow::resolve(&resolver, spec, comparison)?;
        let aggregator = LedgerAggregator::new(
            Arc::clone(&store),
            Arc::clone(&converter),
            PeriodBucketer::new(settings.week_start),
        );
        let currency = store
            .get_base_currency()
            .await?
            .ok_or(CurrencyError::MissingBaseCurrency)?
            .symbol;

        Ok(Self {
            store,
            converter,
            aggregator,
            resolver,
            window,
            filters,
            currency,
        })
    }

    /// The current range.
    #[must_use]
    pub const fn range(&self) -> Period {
        self.window.current.range
    }

    /// The reference date.
    #[must_use]
    pub const fn today(&self) -> NaiveDate {
        self.resolver.today()
    }
}
