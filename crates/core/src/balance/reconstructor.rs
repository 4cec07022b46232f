//! Account balances and net worth as of arbitrary dates.
//!
//! A balance is the account's initial balance plus every signed effect dated
//! on or before the as-of date. Balances are kept in the account's own
//! currency; net worth converts each balance into the base currency.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tally_shared::types::AccountId;

use crate::currency::{CurrencyConverter, CurrencyError};
use crate::ledger::{Account, LedgerEntry};

/// Balance of one account at a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountBalance {
    /// The account ID.
    pub account_id: AccountId,
    /// Balance in the account's currency.
    pub balance: Decimal,
    /// Balance in the base currency.
    pub balance_base: Decimal,
}

/// Replays ledger effects into balances.
pub struct BalanceReconstructor;

impl BalanceReconstructor {
    /// Balance of `account` at the end of `date`.
    #[must_use]
    pub fn balance_at_date(account: &Account, entries: &[LedgerEntry], date: NaiveDate) -> Decimal {
        entries
            .iter()
            .filter(|entry| entry.date <= date)
            .flat_map(LedgerEntry::effects)
            .filter(|(id, _)| *id == account.id)
            .fold(account.initial_balance, |acc, (_, delta)| acc + delta)
    }

    /// Balances of every net-worth account at the end of `date`.
    ///
    /// `only` restricts the accounts considered; empty means all.
    ///
    /// # Errors
    ///
    /// Fails when an account's currency is unknown or has an invalid rate.
    pub fn balances_at_date(
        accounts: &[Account],
        entries: &[LedgerEntry],
        date: NaiveDate,
        only: &[AccountId],
        converter: &CurrencyConverter,
    ) -> Result<Vec<AccountBalance>, CurrencyError> {
        let deltas = Self::deltas_through(entries, date);
        Self::eligible(accounts, only)
            .map(|account| {
                let balance =
                    account.initial_balance + deltas.get(&account.id).copied().unwrap_or_default();
                Ok(AccountBalance {
                    account_id: account.id,
                    balance,
                    balance_base: converter.to_base_by_id(balance, account.currency_id)?,
                })
            })
            .collect()
    }

    /// Net worth in the base currency at the end of `date`.
    ///
    /// Sums active, non-debt accounts. An empty account list yields zero.
    ///
    /// # Errors
    ///
    /// Fails when an account's currency is unknown or has an invalid rate.
    pub fn net_worth_at_date(
        accounts: &[Account],
        entries: &[LedgerEntry],
        date: NaiveDate,
        only: &[AccountId],
        converter: &CurrencyConverter,
    ) -> Result<Decimal, CurrencyError> {
        Ok(Self::balances_at_date(accounts, entries, date, only, converter)?
            .iter()
            .map(|b| b.balance_base)
            .sum())
    }

    /// Net worth at each of `dates`, which must be ascending.
    ///
    /// Effects are sorted once and replayed with a running per-account
    /// balance, so the cost is linear in entries plus dates times accounts.
    /// The result equals calling `net_worth_at_date` for each date.
    ///
    /// # Errors
    ///
    /// Fails when an account's currency is unknown or has an invalid rate.
    pub fn history(
        accounts: &[Account],
        entries: &[LedgerEntry],
        dates: &[NaiveDate],
        only: &[AccountId],
        converter: &CurrencyConverter,
    ) -> Result<Vec<Decimal>, CurrencyError> {
        let eligible: Vec<&Account> = Self::eligible(accounts, only).collect();
        let mut running: HashMap<AccountId, Decimal> = eligible
            .iter()
            .map(|account| (account.id, account.initial_balance))
            .collect();

        let mut effects: Vec<(NaiveDate, AccountId, Decimal)> = entries
            .iter()
            .flat_map(|entry| {
                entry
                    .effects()
                    .into_iter()
                    .map(move |(id, delta)| (entry.date, id, delta))
            })
            .filter(|(_, id, _)| running.contains_key(id))
            .collect();
        effects.sort_by_key(|(date, _, _)| *date);

        let mut cursor = 0;
        let mut values = Vec::with_capacity(dates.len());
        for date in dates {
            while cursor < effects.len() && effects[cursor].0 <= *date {
                let (_, id, delta) = effects[cursor];
                if let Some(balance) = running.get_mut(&id) {
                    *balance += delta;
                }
                cursor += 1;
            }

            let mut total = Decimal::ZERO;
            for account in &eligible {
                let balance = running.get(&account.id).copied().unwrap_or_default();
                total += converter.to_base_by_id(balance, account.currency_id)?;
            }
            values.push(total);
        }

        Ok(values)
    }

    fn eligible<'a>(
        accounts: &'a [Account],
        only: &'a [AccountId],
    ) -> impl Iterator<Item = &'a Account> + 'a {
        accounts.iter().filter(move |account| {
            account.counts_towards_net_worth() && (only.is_empty() || only.contains(&account.id))
        })
    }

    fn deltas_through(entries: &[LedgerEntry], date: NaiveDate) -> HashMap<AccountId, Decimal> {
        let mut deltas = HashMap::new();
        for entry in entries.iter().filter(|entry| entry.date <= date) {
            for (id, delta) in entry.effects() {
                *deltas.entry(id).or_insert(Decimal::ZERO) += delta;
            }
        }
        deltas
    }
}
