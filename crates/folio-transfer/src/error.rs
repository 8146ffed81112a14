//! Per-item transfer errors.

use folio_store::StoreError;
use folio_types::TypeError;

/// Why a single path could not be transferred.
///
/// Transfers are best-effort, so these end up as item failures in a
/// [`crate::TransferReport`] rather than aborting the batch.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("source not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    InvalidPath(#[from] TypeError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("unknown conflict strategy: {0}")]
    UnknownStrategy(String),
}

/// Convenience alias for transfer results.
pub type TransferResult<T> = Result<T, TransferError>;
