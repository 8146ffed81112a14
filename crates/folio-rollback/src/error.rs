//! Error types for the rollback engine.

use folio_remote::RemoteError;

/// Errors that abort a whole rollback call.
///
/// Per-file failures never show up here; they are collected in the
/// preview or outcome instead.
#[derive(Debug, thiserror::Error)]
pub enum RollbackError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("cannot read commit details for {revision_id}: {source}")]
    CommitDetails {
        revision_id: String,
        #[source]
        source: RemoteError,
    },

    /// The follow-up commit of an already applied rollback failed.
    #[error("rollback commit failed: {0}")]
    CommitFailed(String),
}

/// Convenience alias for rollback results.
pub type RollbackResult<T> = Result<T, RollbackError>;
