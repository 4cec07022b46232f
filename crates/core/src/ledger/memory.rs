//! In-memory ledger store backed by a JSON snapshot.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tally_shared::types::CurrencyId;
use tokio::sync::RwLock;
use tracing::info;

use super::error::StoreError;
use super::filter::{AccountFilter, TransactionFilter};
use super::store::{LedgerStore, SnapshotSource};
use super::types::{Account, Category, LedgerEntry, Tag};
use crate::budget::Budget;
use crate::currency::Currency;

/// Complete ledger dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerData {
    /// Currencies, exactly one flagged base.
    #[serde(default)]
    pub currencies: Vec<Currency>,
    /// Accounts.
    #[serde(default)]
    pub accounts: Vec<Account>,
    /// Categories.
    #[serde(default)]
    pub categories: Vec<Category>,
    /// Tags.
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// Budgets.
    #[serde(default)]
    pub budgets: Vec<Budget>,
    /// Transactions.
    #[serde(default)]
    pub transactions: Vec<LedgerEntry>,
}

/// Immutable view over one revision of the dataset.
#[derive(Debug, Clone)]
pub struct LedgerSnapshot {
    data: Arc<LedgerData>,
    revision: u64,
}

impl LedgerSnapshot {
    /// Wraps a dataset at the given revision.
    #[must_use]
    pub fn new(data: Arc<LedgerData>, revision: u64) -> Self {
        Self { data, revision }
    }
}

#[async_trait]
impl LedgerStore for LedgerSnapshot {
    async fn list_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<LedgerEntry>, StoreError> {
        Ok(self
            .data
            .transactions
            .iter()
            .filter(|entry| filter.matches(entry))
            .cloned()
            .collect())
    }

    async fn get_accounts(&self, filter: &AccountFilter) -> Result<Vec<Account>, StoreError> {
        Ok(self
            .data
            .accounts
            .iter()
            .filter(|account| filter.matches(account))
            .cloned()
            .collect())
    }

    async fn get_currency_by_id(&self, id: CurrencyId) -> Result<Option<Currency>, StoreError> {
        Ok(self.data.currencies.iter().find(|c| c.id == id).cloned())
    }

    async fn get_base_currency(&self) -> Result<Option<Currency>, StoreError> {
        Ok(self.data.currencies.iter().find(|c| c.is_base).cloned())
    }

    async fn list_currencies(&self) -> Result<Vec<Currency>, StoreError> {
        Ok(self.data.currencies.clone())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        Ok(self.data.categories.clone())
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, StoreError> {
        Ok(self.data.tags.clone())
    }

    async fn get_active_budgets(&self, date_within: NaiveDate) -> Result<Vec<Budget>, StoreError> {
        Ok(self
            .data
            .budgets
            .iter()
            .filter(|budget| budget.is_active_on(date_within))
            .cloned()
            .collect())
    }

    fn revision(&self) -> u64 {
        self.revision
    }
}

/// Snapshot source holding the whole ledger in memory.
///
/// Readers clone an `Arc` to the current dataset; `replace` swaps the dataset
/// and bumps the revision without disturbing snapshots already handed out.
#[derive(Debug)]
pub struct InMemoryLedger {
    current: RwLock<LedgerSnapshot>,
}

impl InMemoryLedger {
    /// Creates a store at revision 1.
    #[must_use]
    pub fn new(data: LedgerData) -> Self {
        Self {
            current: RwLock::new(LedgerSnapshot::new(Arc::new(data), 1)),
        }
    }

    /// Loads a JSON snapshot file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not ledger JSON.
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let raw = tokio::fs::read(path).await?;
        let data: LedgerData = serde_json::from_slice(&raw)?;
        info!(
            path = %path.display(),
            accounts = data.accounts.len(),
            transactions = data.transactions.len(),
            "Loaded ledger snapshot"
        );
        Ok(Self::new(data))
    }

    /// Replaces the dataset, returning the new revision.
    pub async fn replace(&self, data: LedgerData) -> u64 {
        let mut current = self.current.write().await;
        let revision = current.revision + 1;
        *current = LedgerSnapshot::new(Arc::new(data), revision);
        revision
    }
}

#[async_trait]
impl SnapshotSource for InMemoryLedger {
    async fn snapshot(&self) -> Result<Arc<dyn LedgerStore>, StoreError> {
        let current = self.current.read().await.clone();
        Ok(Arc::new(current))
    }
}
