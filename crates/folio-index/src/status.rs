//! Working tree status split by staging.

use serde::{Deserialize, Serialize};

use folio_diff::{ChangeRecord, ChangeStatus};

use crate::staged::StagedSet;

/// A change list split into what the next commit would take and the rest.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingStatus {
    pub staged: Vec<ChangeRecord>,
    pub unstaged: Vec<ChangeRecord>,
}

impl WorkingStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split `changes` by membership in `staged`, keeping input order.
    pub fn split(changes: Vec<ChangeRecord>, staged: &StagedSet) -> Self {
        let (staged_changes, unstaged): (Vec<_>, Vec<_>) =
            changes.into_iter().partition(|c| staged.contains(&c.path));
        Self {
            staged: staged_changes,
            unstaged,
        }
    }

    /// Returns `true` if nothing differs from head.
    pub fn is_clean(&self) -> bool {
        self.staged.is_empty() && self.unstaged.is_empty()
    }

    pub fn untracked(&self) -> impl Iterator<Item = &ChangeRecord> {
        self.unstaged
            .iter()
            .filter(|c| c.status == ChangeStatus::Untracked)
    }

    pub fn total_entries(&self) -> usize {
        self.staged.len() + self.unstaged.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_status_is_clean() {
        let status = WorkingStatus::new();
        assert!(status.is_clean());
        assert_eq!(status.total_entries(), 0);
    }

    #[test]
    fn split_by_membership() {
        let changes = vec![
            ChangeRecord::new("a.md", ChangeStatus::Added, true),
            ChangeRecord::new("b.md", ChangeStatus::Untracked, false),
            ChangeRecord::new("c.md", ChangeStatus::Modified, false),
        ];
        let staged: StagedSet = ["a.md"].into_iter().collect();
        let status = WorkingStatus::split(changes, &staged);

        assert!(!status.is_clean());
        assert_eq!(status.staged.len(), 1);
        assert_eq!(status.unstaged.len(), 2);
        assert_eq!(status.untracked().map(|c| c.path.as_str()).collect::<Vec<_>>(), vec!["b.md"]);
    }
}
