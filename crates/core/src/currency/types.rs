//! Currency types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::CurrencyId;

use super::error::CurrencyError;

/// A currency and its rate into the base currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    /// Currency id.
    pub id: CurrencyId,
    /// ISO code, e.g. `EUR`.
    pub code: String,
    /// Display symbol, e.g. `€`.
    pub symbol: String,
    /// Minor unit digits.
    #[serde(default = "default_decimals")]
    pub decimals: u32,
    /// Whether this is the base currency.
    #[serde(default)]
    pub is_base: bool,
    /// Multiplier into the base currency. Ignored for the base currency.
    #[serde(default = "default_rate")]
    pub rate: Decimal,
}

const fn default_decimals() -> u32 {
    2
}

const fn default_rate() -> Decimal {
    Decimal::ONE
}

impl Currency {
    /// Returns the rate, rejecting zero or negative rates on non-base currencies.
    pub fn checked_rate(&self) -> Result<Decimal, CurrencyError> {
        if self.is_base {
            return Ok(Decimal::ONE);
        }
        if self.rate <= Decimal::ZERO {
            return Err(CurrencyError::InvalidCurrencyRate {
                code: self.code.clone(),
                rate: self.rate,
            });
        }
        Ok(self.rate)
    }
}
