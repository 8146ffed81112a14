use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification of a working-tree path relative to head.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeStatus {
    /// New path, selected for the next commit.
    Added,
    /// Present in both, normalized content differs.
    Modified,
    /// Present in head, gone from the working tree.
    Deleted,
    /// New path, not staged.
    Untracked,
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChangeStatus::Added => "added",
            ChangeStatus::Modified => "modified",
            ChangeStatus::Deleted => "deleted",
            ChangeStatus::Untracked => "untracked",
        };
        f.write_str(s)
    }
}

/// A derived, never-persisted change of one path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub path: String,
    pub status: ChangeStatus,
    pub staged: bool,
}

impl ChangeRecord {
    pub fn new(path: impl Into<String>, status: ChangeStatus, staged: bool) -> Self {
        Self {
            path: path.into(),
            status,
            staged,
        }
    }
}
