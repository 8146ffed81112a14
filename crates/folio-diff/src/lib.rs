//! Diff engine for Folio.
//!
//! Compares a working tree against its head snapshot, or a local tree
//! against a remote revision store, after content normalization. Also
//! renders line-level diffs of single documents.
//!
//! # Key Types
//!
//! - [`ChangeRecord`] / [`ChangeStatus`] - One local change
//! - [`ModifiedFile`] / [`RemoteStatus`] - One local vs. remote difference
//! - [`RemoteComparison`] - Remote differences plus unreadable remote paths
//! - [`ContentDiff`] - Hunks of a single-document line diff
//! - [`NormalizeOptions`] - Content normalization switches

pub mod change;
pub mod content_diff;
pub mod error;
pub mod local_diff;
pub mod normalize;
pub mod remote_diff;

pub use change::{ChangeRecord, ChangeStatus};
pub use content_diff::{diff_contents, diff_contents_with, ContentDiff, Hunk, Line};
pub use error::{DiffError, DiffResult};
pub use local_diff::{compare, compare_with};
pub use normalize::{normalize, normalize_with, same_content, NormalizeOptions};
pub use remote_diff::{compare_remote, ModifiedFile, RemoteComparison, RemoteStatus};
