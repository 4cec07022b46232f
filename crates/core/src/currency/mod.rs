//! Multi-currency normalization through a single base currency.
//!
//! Every currency carries a multiplicative rate into the base currency
//! (`amount * rate = base amount`). Cross-currency aggregates are always
//! expressed in the base currency.

pub mod converter;
pub mod error;
pub mod types;

#[cfg(test)]
mod converter_props;

pub use converter::CurrencyConverter;
pub use error::CurrencyError;
pub use types::Currency;
