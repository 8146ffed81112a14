//! Copy files and folders between the Workspace and the working tree.
//!
//! Transfers are pure tree rewrites. The source is left in place, missing
//! parent folders are created at the destination, and each requested path
//! succeeds or fails on its own.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use folio_store::FileTree;
use folio_types::{path, ItemFailure};

use crate::error::{TransferError, TransferResult};
use crate::naming::unique_name;

/// What to do when the destination path already exists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictStrategy {
    /// Copy under a fresh `name (copy)` style name.
    #[default]
    KeepBoth,
    Overwrite,
    Skip,
}

impl fmt::Display for ConflictStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConflictStrategy::KeepBoth => "keep-both",
            ConflictStrategy::Overwrite => "overwrite",
            ConflictStrategy::Skip => "skip",
        })
    }
}

impl FromStr for ConflictStrategy {
    type Err = TransferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keep-both" => Ok(ConflictStrategy::KeepBoth),
            "overwrite" => Ok(ConflictStrategy::Overwrite),
            "skip" => Ok(ConflictStrategy::Skip),
            other => Err(TransferError::UnknownStrategy(other.to_string())),
        }
    }
}

/// A source path and where its copy landed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub source: String,
    pub target: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReport {
    pub transferred: Vec<Transfer>,
    /// Sources left alone because the target existed under [`ConflictStrategy::Skip`].
    pub skipped: Vec<String>,
    pub failures: Vec<ItemFailure>,
}

impl TransferReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

enum Placed {
    Copied(Transfer),
    Skipped(String),
}

fn transfer_one(
    from: &FileTree,
    to: &mut FileTree,
    raw: &str,
    strategy: ConflictStrategy,
) -> TransferResult<Placed> {
    let source = path::normalize(raw)?;
    let src_id = from
        .lookup(&source)
        .ok_or_else(|| TransferError::NotFound(source.clone()))?;
    let is_folder = from.node(src_id).is_some_and(|n| n.is_folder());

    let parent_path = path::parent(&source).unwrap_or("");
    let parent = to.ensure_folder(parent_path)?;
    let name = path::file_name(&source);
    let exists = |candidate: &str| {
        to.node(parent)
            .and_then(|n| n.child(candidate))
            .is_some()
    };

    let target_name = match (exists(name), strategy) {
        (false, _) | (true, ConflictStrategy::Overwrite) => name.to_string(),
        (true, ConflictStrategy::Skip) => return Ok(Placed::Skipped(source)),
        (true, ConflictStrategy::KeepBoth) => unique_name(name, is_folder, exists),
    };

    to.copy_subtree(from, src_id, parent, &target_name)?;
    let target = path::join(parent_path, &target_name);
    Ok(Placed::Copied(Transfer { source, target }))
}

/// Copy each of `paths` from `from` into `to` at the same location.
pub fn transfer(
    from: &FileTree,
    to: &mut FileTree,
    paths: &[String],
    strategy: ConflictStrategy,
) -> TransferReport {
    let mut report = TransferReport::default();
    for raw in paths {
        match transfer_one(from, to, raw, strategy) {
            Ok(Placed::Copied(t)) => {
                debug!(source = %t.source, target = %t.target, %strategy, "transferred");
                report.transferred.push(t);
            }
            Ok(Placed::Skipped(source)) => {
                debug!(%source, "target exists; skipped");
                report.skipped.push(source);
            }
            Err(e) => {
                warn!(path = %raw, error = %e, "transfer failed; skipping");
                report.failures.push(ItemFailure::new(raw.as_str(), e));
            }
        }
    }
    report
}

/// Copy Workspace entries into the working tree.
pub fn move_to_working_tree(
    workspace: &FileTree,
    working: &mut FileTree,
    paths: &[String],
    strategy: ConflictStrategy,
) -> TransferReport {
    transfer(workspace, working, paths, strategy)
}

/// Copy working tree entries back into the Workspace, never overwriting.
pub fn move_to_workspace(
    working: &FileTree,
    workspace: &mut FileTree,
    paths: &[String],
) -> TransferReport {
    transfer(working, workspace, paths, ConflictStrategy::KeepBoth)
}
