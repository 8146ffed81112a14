//! Error types for the diff crate.

use folio_remote::RemoteError;

/// Errors that can occur during diff operations.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// The remote root itself could not be listed; nothing can be compared.
    #[error("cannot list remote root {root:?}: {source}")]
    RemoteRoot {
        root: String,
        #[source]
        source: RemoteError,
    },
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
