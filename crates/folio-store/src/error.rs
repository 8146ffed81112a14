use folio_types::TypeError;

/// Errors from tree and key-value store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No entry exists at the path.
    #[error("not found: {0}")]
    NotFound(String),

    /// A folder was required but a file sits at the path.
    #[error("not a folder: {0}")]
    NotAFolder(String),

    /// A file was required but a folder sits at the path.
    #[error("not a file: {0}")]
    NotAFile(String),

    /// The path failed validation.
    #[error(transparent)]
    InvalidPath(#[from] TypeError),

    /// A stored document could not be encoded or decoded.
    #[error("serialization error for key {key}: {reason}")]
    Serialization { key: String, reason: String },

    /// I/O error from a file-backed store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A store lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    LockPoisoned,
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
