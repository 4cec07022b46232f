//! Base-currency conversion.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tally_shared::types::CurrencyId;

use super::error::CurrencyError;
use super::types::Currency;

/// Converts amounts between the currencies of one ledger snapshot.
///
/// Results are kept at full precision. Callers round at the response boundary.
#[derive(Debug, Clone)]
pub struct CurrencyConverter {
    currencies: HashMap<CurrencyId, Currency>,
    base: CurrencyId,
}

impl CurrencyConverter {
    /// Builds a converter from the full currency table.
    ///
    /// # Errors
    ///
    /// Fails with `MissingBaseCurrency` when no currency is flagged base and
    /// with `AmbiguousBaseCurrency` when more than one is.
    pub fn new(currencies: impl IntoIterator<Item = Currency>) -> Result<Self, CurrencyError> {
        let mut base: Option<(CurrencyId, String)> = None;
        let mut table = HashMap::new();

        for currency in currencies {
            if currency.is_base {
                if let Some((_, code)) = &base {
                    return Err(CurrencyError::AmbiguousBaseCurrency(
                        code.clone(),
                        currency.code,
                    ));
                }
                base = Some((currency.id, currency.code.clone()));
            }
            table.insert(currency.id, currency);
        }

        let (base, _) = base.ok_or(CurrencyError::MissingBaseCurrency)?;
        Ok(Self {
            currencies: table,
            base,
        })
    }

    /// The base currency.
    #[must_use]
    pub fn base(&self) -> &Currency {
        // The base id was taken from the table in `new`.
        &self.currencies[&self.base]
    }

    /// Looks up a currency by id.
    pub fn get(&self, id: CurrencyId) -> Result<&Currency, CurrencyError> {
        self.currencies
            .get(&id)
            .ok_or(CurrencyError::UnknownCurrency(id))
    }

    /// Converts an amount in `currency` into the base currency.
    pub fn to_base(amount: Decimal, currency: &Currency) -> Result<Decimal, CurrencyError> {
        if currency.is_base {
            return Ok(amount);
        }
        Ok(amount * currency.checked_rate()?)
    }

    /// Converts a base-currency amount into `currency`.
    pub fn from_base(amount: Decimal, currency: &Currency) -> Result<Decimal, CurrencyError> {
        if currency.is_base {
            return Ok(amount);
        }
        Ok(amount / currency.checked_rate()?)
    }

    /// Converts an amount between two currencies via the base currency.
    pub fn convert(
        amount: Decimal,
        from: &Currency,
        to: &Currency,
    ) -> Result<Decimal, CurrencyError> {
        if from.id == to.id {
            return Ok(amount);
        }
        Self::from_base(Self::to_base(amount, from)?, to)
    }

    /// Converts an amount given in the currency with `id` into the base currency.
    pub fn to_base_by_id(&self, amount: Decimal, id: CurrencyId) -> Result<Decimal, CurrencyError> {
        Self::to_base(amount, self.get(id)?)
    }
}
