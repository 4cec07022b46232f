//! Store error types.

use thiserror::Error;

/// Errors raised by a ledger store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Snapshot file could not be read.
    #[error("Failed to read ledger snapshot: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot file is not valid ledger JSON.
    #[error("Malformed ledger snapshot: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The store is unavailable.
    #[error("Ledger store unavailable: {0}")]
    Unavailable(String),
}
