//! Cross-area transfer for Folio.
//!
//! Copies documents and whole folders between the Workspace and the working
//! tree, resolving name collisions by strategy.
//!
//! # Key Types
//!
//! - [`ConflictStrategy`] -- keep-both, overwrite or skip on collision
//! - [`TransferReport`] -- Copied `{source, target}` pairs, skips and failures

pub mod error;
pub mod naming;
pub mod transfer;

pub use error::{TransferError, TransferResult};
pub use naming::{copy_name, unique_name};
pub use transfer::{
    move_to_working_tree, move_to_workspace, transfer, ConflictStrategy, Transfer, TransferReport,
};
