//! The working tree: current contents, head snapshot and staged set.

use folio_diff::{compare_with, ChangeRecord, NormalizeOptions};
use folio_index::{StagedSet, WorkingStatus};
use folio_store::FileTree;
use folio_types::FileMap;

/// Git-like staging area kept apart from the Workspace.
///
/// `head` only ever changes through a successful commit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkingTree {
    pub current: FileTree,
    pub head: FileMap,
    pub staged: StagedSet,
}

impl WorkingTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(current: FileTree, head: FileMap, staged: StagedSet) -> Self {
        Self {
            current,
            head,
            staged,
        }
    }

    /// Changes of the current contents against head, sorted by path.
    pub fn changes(&self, options: &NormalizeOptions) -> Vec<ChangeRecord> {
        compare_with(
            &self.head,
            &self.current.files(),
            |p| self.staged.contains(p),
            options,
        )
    }

    pub fn status(&self, options: &NormalizeOptions) -> WorkingStatus {
        WorkingStatus::split(self.changes(options), &self.staged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_diff::ChangeStatus;

    #[test]
    fn untracked_until_staged() {
        let mut working = WorkingTree::new();
        working.current.write_file("a.md", "# T").unwrap();

        let changes = working.changes(&NormalizeOptions::default());
        assert_eq!(changes, vec![ChangeRecord::new("a.md", ChangeStatus::Untracked, false)]);

        working.staged.stage("a.md");
        let status = working.status(&NormalizeOptions::default());
        assert_eq!(status.staged, vec![ChangeRecord::new("a.md", ChangeStatus::Added, true)]);
        assert!(status.unstaged.is_empty());
    }

    #[test]
    fn folders_do_not_show_up() {
        let mut working = WorkingTree::new();
        working.current.create_folder("empty").unwrap();
        assert!(working.status(&NormalizeOptions::default()).is_clean());
    }
}
