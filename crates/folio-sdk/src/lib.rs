//! High-level SDK for Folio.
//!
//! [`Folio`] ties the Workspace, the version-controlled working tree, local
//! history, remote comparison, rollback, transfer and search into one
//! facade, persisted through a pluggable key-value store. This is the main
//! entry point for applications embedding Folio.
//!
//! # Key Types
//!
//! - [`Folio`] - The repository facade
//! - [`FolioConfig`] - TOML-loadable configuration
//! - [`Area`] - Workspace or working tree
//! - [`RepoEvent`] / [`EventFilter`] - Typed change notifications

pub mod area;
pub mod config;
pub mod error;
pub mod events;
pub mod repository;

pub use area::Area;
pub use config::{FolioConfig, SeedDocument};
pub use error::{ErrorKind, SdkError, SdkResult};
pub use events::{EventBus, EventFilter, EventKind, EventStream, RepoEvent};
pub use repository::Folio;

// Re-export key types
pub use folio_diff::{ChangeRecord, ChangeStatus, ContentDiff, Hunk, Line, RemoteComparison, RemoteStatus};
pub use folio_index::{StagedSet, WorkingStatus};
pub use folio_ledger::{Author, Commit, RemoteCommitReport};
pub use folio_remote::{InMemoryRemote, RemoteRepository};
pub use folio_rollback::{CommitPhase, RollbackOutcome, RollbackPreview, RollbackRequest};
pub use folio_search::{SearchMatch, SearchOptions, SearchResult, FILE_NAME_LINE};
pub use folio_store::{FileKvStore, InMemoryKvStore, KeyValueStore};
pub use folio_transfer::{ConflictStrategy, TransferReport};
pub use folio_types::{CommitId, FileEntry, FileKind};
