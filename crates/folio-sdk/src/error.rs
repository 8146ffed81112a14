use thiserror::Error;

use folio_ledger::LedgerError;
use folio_rollback::RollbackError;
use folio_store::StoreError;

/// Coarse error classes every facade error falls into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Remote,
    PartialFailure,
    Internal,
}

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("remote error: {0}")]
    Remote(#[from] folio_remote::RemoteError),

    #[error("diff error: {0}")]
    Diff(#[from] folio_diff::DiffError),

    #[error("commit error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("rollback error: {0}")]
    Rollback(#[from] RollbackError),
}

impl SdkError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SdkError::Validation(_) | SdkError::Config(_) => ErrorKind::Validation,
            SdkError::NotFound(_) => ErrorKind::NotFound,
            SdkError::Store(e) => store_kind(e),
            SdkError::Remote(_) | SdkError::Diff(_) => ErrorKind::Remote,
            SdkError::Ledger(e) => match e {
                LedgerError::Validation(_) => ErrorKind::Validation,
                LedgerError::NotFound(_) => ErrorKind::NotFound,
                LedgerError::Rejected(_) | LedgerError::Remote(_) => ErrorKind::Remote,
                LedgerError::AllSkipped { .. } => ErrorKind::PartialFailure,
                LedgerError::Store(e) => store_kind(e),
            },
            SdkError::Rollback(e) => match e {
                RollbackError::Validation(_) => ErrorKind::Validation,
                RollbackError::CommitDetails { .. } | RollbackError::CommitFailed(_) => {
                    ErrorKind::Remote
                }
            },
        }
    }
}

fn store_kind(e: &StoreError) -> ErrorKind {
    match e {
        StoreError::NotFound(_) => ErrorKind::NotFound,
        StoreError::NotAFolder(_) | StoreError::NotAFile(_) | StoreError::InvalidPath(_) => {
            ErrorKind::Validation
        }
        StoreError::Serialization { .. } | StoreError::Io(_) | StoreError::LockPoisoned => {
            ErrorKind::Internal
        }
    }
}

pub type SdkResult<T> = Result<T, SdkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        assert_eq!(SdkError::Validation("x".into()).kind(), ErrorKind::Validation);
        assert_eq!(
            SdkError::Store(StoreError::NotFound("a.md".into())).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            SdkError::Ledger(LedgerError::AllSkipped { skipped: vec![] }).kind(),
            ErrorKind::PartialFailure
        );
        assert_eq!(
            SdkError::Rollback(RollbackError::CommitFailed("x".into())).kind(),
            ErrorKind::Remote
        );
        assert_eq!(SdkError::Store(StoreError::LockPoisoned).kind(), ErrorKind::Internal);
    }
}
