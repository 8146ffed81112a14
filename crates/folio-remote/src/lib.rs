//! Remote repository interface for Folio.
//!
//! The remote is an opaque versioned content store: Folio lists directories,
//! reads file content (current or at a revision), reads revision metadata and
//! submits atomic multi-file commits. Nothing is assumed about transport.
//!
//! - [`RemoteRepository`] -- the async service contract
//! - [`InMemoryRemote`] -- in-memory implementation with failure injection

pub mod error;
pub mod memory;
pub mod transport;
pub mod types;

pub use error::{RemoteError, RemoteResult};
pub use memory::{content_revision, InMemoryRemote};
pub use transport::RemoteRepository;
pub use types::{
    CommitDetails, CommitOutcome, FileChange, FileOperation, RemoteEntry, RemoteEntryKind,
};
