//! Read-only ledger model and the store contracts the engine reads through.
//!
//! - `types` - transactions, accounts, categories, tags
//! - `filter` - transaction and account filters
//! - `store` - `LedgerStore` and `SnapshotSource` contracts
//! - `memory` - the in-memory snapshot store

pub mod error;
pub mod filter;
pub mod memory;
pub mod store;
pub mod types;

pub use error::StoreError;
pub use filter::{AccountFilter, ReportFilters, TransactionFilter};
pub use memory::{InMemoryLedger, LedgerData};
pub use store::{LedgerStore, SnapshotSource};
pub use types::{Account, AccountType, Category, CategoryKind, LedgerEntry, Tag, TransactionType};
