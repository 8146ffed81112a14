//! Rollback engine for Folio.
//!
//! Restores documents in a local tree to their content at a remote revision
//! and can follow up with a commit of the restored files. The two steps are
//! separate: a commit that fails leaves the rollback applied and hands back
//! a [`PendingRollbackCommit`] to retry or drop.
//!
//! # Key Types
//!
//! - [`RollbackContext`] -- Remote service, remote root and normalization
//! - [`RollbackRequest`] -- Target revision, paths and commit switch
//! - [`RollbackPreview`] / [`RollbackFile`] -- Read-only comparison
//! - [`RollbackOutcome`] / [`CommitPhase`] -- What was applied and committed

pub mod commit;
pub mod engine;
pub mod error;
pub mod types;

pub use commit::retry_commit;
pub use engine::{preview, rollback, RollbackContext};
pub use error::{RollbackError, RollbackResult};
pub use types::{
    default_message, CommitPhase, PendingRollbackCommit, RollbackFile, RollbackOutcome,
    RollbackPath, RollbackPreview, RollbackRequest,
};
