use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteError {
    #[error("remote returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("remote path not found: {0}")]
    NotFound(String),

    #[error("unknown revision: {0}")]
    RevisionNotFound(String),

    #[error("transport error: {0}")]
    Transport(String),
}

impl RemoteError {
    /// Provider status code, if the service reported one.
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Status { status, .. } => Some(*status),
            RemoteError::NotFound(_) | RemoteError::RevisionNotFound(_) => Some(404),
            RemoteError::Transport(_) => None,
        }
    }
}

pub type RemoteResult<T> = Result<T, RemoteError>;
