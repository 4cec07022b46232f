//! Read contracts between the engine and the ledger store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tally_shared::types::CurrencyId;

use super::error::StoreError;
use super::filter::{AccountFilter, TransactionFilter};
use super::types::{Account, Category, LedgerEntry, Tag};
use crate::budget::Budget;
use crate::currency::Currency;

/// Read-only view of one consistent ledger state.
///
/// Every method must answer from the same state for the lifetime of the
/// value, so a report that holds one `LedgerStore` never sees a write halfway
/// through.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Entries matching the filter, in no particular order.
    async fn list_transactions(&self, filter: &TransactionFilter)
    -> Result<Vec<LedgerEntry>, StoreError>;

    /// Accounts matching the filter.
    async fn get_accounts(&self, filter: &AccountFilter) -> Result<Vec<Account>, StoreError>;

    /// A single currency, if it exists.
    ///
    /// Reports convert through the full currency table; this is the lookup
    /// offered to other readers of the store.
    async fn get_currency_by_id(&self, id: CurrencyId) -> Result<Option<Currency>, StoreError>;

    /// The base currency, if one is flagged.
    async fn get_base_currency(&self) -> Result<Option<Currency>, StoreError>;

    /// Every currency.
    async fn list_currencies(&self) -> Result<Vec<Currency>, StoreError>;

    /// Every category.
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;

    /// Every tag.
    async fn list_tags(&self) -> Result<Vec<Tag>, StoreError>;

    /// Budgets whose active window contains `date_within`.
    async fn get_active_budgets(&self, date_within: NaiveDate) -> Result<Vec<Budget>, StoreError>;

    /// Monotonic revision of the state this view reads.
    fn revision(&self) -> u64;
}

/// Hands out consistent read views of the ledger.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Takes a snapshot. All reads of one report go through a single snapshot.
    async fn snapshot(&self) -> Result<Arc<dyn LedgerStore>, StoreError>;
}
