//! Report error types.

use tally_shared::AppError;
use thiserror::Error;

use crate::aggregation::AggregationError;
use crate::budget::BudgetError;
use crate::currency::CurrencyError;
use crate::ledger::StoreError;
use crate::period::PeriodError;

/// Errors that can occur during report generation.
///
/// Any error fails the whole report; partial figures are never returned.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Period input could not be resolved.
    #[error(transparent)]
    Period(#[from] PeriodError),

    /// Currency lookup or conversion failed.
    #[error(transparent)]
    Currency(#[from] CurrencyError),

    /// A sub-aggregation failed to read the ledger.
    #[error("Aggregation failed: {0}")]
    AggregationFailure(#[from] StoreError),

    /// The request was cancelled by the caller.
    #[error("Report cancelled")]
    Cancelled,

    /// The request itself is invalid (unknown dimension, bad limit, ...).
    #[error("Invalid report request: {0}")]
    InvalidRequest(String),
}

impl ReportError {
    /// Taxonomy name surfaced to callers.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Period(PeriodError::InvalidPeriodSpecification(_)) => "InvalidPeriodSpecification",
            Self::Period(PeriodError::InvalidDateRange { .. }) => "InvalidDateRange",
            Self::Period(PeriodError::OutOfRange(_)) => "DateOutOfRange",
            Self::Currency(CurrencyError::UnknownCurrency(_)) => "UnknownCurrency",
            Self::Currency(
                CurrencyError::MissingBaseCurrency | CurrencyError::AmbiguousBaseCurrency(..),
            ) => "MissingBaseCurrency",
            Self::Currency(CurrencyError::InvalidCurrencyRate { .. }) => "InvalidCurrencyRate",
            Self::AggregationFailure(_) => "AggregationFailure",
            Self::Cancelled => "Cancelled",
            Self::InvalidRequest(_) => "InvalidRequest",
        }
    }
}

impl From<AggregationError> for ReportError {
    fn from(err: AggregationError) -> Self {
        match err {
            AggregationError::Store(e) => Self::AggregationFailure(e),
            AggregationError::Currency(e) => Self::Currency(e),
            AggregationError::Period(e) => Self::Period(e),
        }
    }
}

impl From<BudgetError> for ReportError {
    fn from(err: BudgetError) -> Self {
        match err {
            BudgetError::Currency(e) => Self::Currency(e),
            BudgetError::Period(e) => Self::Period(e),
        }
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        let message = err.to_string();
        match err {
            ReportError::Period(_) | ReportError::InvalidRequest(_) => Self::Validation(message),
            ReportError::Currency(_) => Self::Configuration(message),
            ReportError::AggregationFailure(_) => Self::Store(message),
            ReportError::Cancelled => Self::Cancelled(message),
        }
    }
}
