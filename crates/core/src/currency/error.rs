//! Currency error types.

use rust_decimal::Decimal;
use tally_shared::types::CurrencyId;
use thiserror::Error;

/// Currency conversion errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurrencyError {
    /// Reference to a currency id that does not exist.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(CurrencyId),

    /// No currency is flagged as the base currency.
    #[error("No base currency configured")]
    MissingBaseCurrency,

    /// More than one currency is flagged as the base currency.
    #[error("Multiple base currencies configured: {0} and {1}")]
    AmbiguousBaseCurrency(String, String),

    /// A non-base currency has a rate that is zero or negative.
    #[error("Invalid rate {rate} for currency {code}")]
    InvalidCurrencyRate {
        /// Currency code.
        code: String,
        /// Offending rate.
        rate: Decimal,
    },
}
