//! Commit engine for Folio.
//!
//! Owns the git-like side of a repository: the working tree with its head
//! snapshot and staged set, the newest-first commit log, and commits pushed
//! to a remote repository service.
//!
//! # Key Types
//!
//! - [`WorkingTree`] -- Current contents, head snapshot and staged set
//! - [`RepositoryState`] -- Branch, ahead/behind counters and commit log
//! - [`Commit`] / [`CommitRequest`] / [`Author`] -- Local commit records
//! - [`RemoteCommitReport`] -- Result of a multi-file remote commit
//!
//! Engine calls take the state they mutate by reference; nothing here is
//! global.

pub mod commit;
pub mod engine;
pub mod error;
pub mod remote_commit;
pub mod state;
pub mod working;

pub use commit::{Author, Commit, CommitRequest};
pub use engine::commit;
pub use error::{LedgerError, LedgerResult};
pub use remote_commit::{commit_remote, RemoteCommitReport};
pub use state::{RepositoryState, DEFAULT_BRANCH};
pub use working::WorkingTree;
