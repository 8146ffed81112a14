//! Foundation types for Folio.
//!
//! Every other Folio crate depends on `folio-types`. The types here carry no
//! behavior beyond validation and bookkeeping; trees, diffs and commits are
//! built on top of them in the higher crates.
//!
//! # Key Types
//!
//! - [`FileEntry`] / [`FileKind`] - A file or folder at a document path
//! - [`FileMap`] - Flat `path -> FileEntry` mapping (Workspace, working tree, head)
//! - [`CommitId`] - UUID v7 commit identifier
//! - [`BatchReport`] / [`ItemFailure`] - Typed best-effort batch results
//! - [`path`] - Document path validation and manipulation

pub mod commit_id;
pub mod entry;
pub mod error;
pub mod path;
pub mod report;

pub use commit_id::CommitId;
pub use entry::{FileEntry, FileKind, FileMap};
pub use error::TypeError;
pub use report::{BatchReport, ItemFailure};
