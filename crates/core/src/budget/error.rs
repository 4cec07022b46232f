//! Budget error types.

use thiserror::Error;

use crate::currency::CurrencyError;
use crate::period::PeriodError;

/// Errors raised while computing budget targets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BudgetError {
    /// A budget amount could not be converted into the base currency.
    #[error(transparent)]
    Currency(#[from] CurrencyError),

    /// A budget period could not be laid over the range.
    #[error(transparent)]
    Period(#[from] PeriodError),
}
