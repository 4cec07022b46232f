//! Aggregation error types.

use thiserror::Error;

use crate::currency::CurrencyError;
use crate::ledger::StoreError;
use crate::period::PeriodError;

/// Errors raised while aggregating a ledger snapshot.
#[derive(Debug, Error)]
pub enum AggregationError {
    /// Reading the store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// An entry could not be converted into the base currency.
    #[error(transparent)]
    Currency(#[from] CurrencyError),

    /// The aggregated range could not be bucketed.
    #[error(transparent)]
    Period(#[from] PeriodError),
}
