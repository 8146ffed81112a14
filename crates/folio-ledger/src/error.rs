//! Error types for the commit engine.

use folio_remote::RemoteError;
use folio_store::StoreError;
use folio_types::ItemFailure;

/// Errors produced by commit operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("remote rejected commit: {0}")]
    Rejected(String),

    /// Every staged file was skipped; nothing reached the remote.
    #[error("no staged file could be committed ({} skipped)", skipped.len())]
    AllSkipped { skipped: Vec<ItemFailure> },

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Convenience alias for commit engine results.
pub type LedgerResult<T> = Result<T, LedgerError>;
