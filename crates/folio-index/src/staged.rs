//! The staged set.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use folio_diff::ChangeRecord;

/// Paths selected for the next commit, kept in path order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StagedSet {
    paths: BTreeSet<String>,
}

impl StagedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    /// Add `path`. Returns `true` if it was not staged before.
    pub fn stage(&mut self, path: impl Into<String>) -> bool {
        let path = path.into();
        debug!(path = %path, "stage");
        self.paths.insert(path)
    }

    /// Remove `path`. Returns `true` if it was staged.
    pub fn unstage(&mut self, path: &str) -> bool {
        debug!(path, "unstage");
        self.paths.remove(path)
    }

    /// Stage every path in `changes`.
    pub fn stage_all(&mut self, changes: &[ChangeRecord]) {
        for change in changes {
            self.paths.insert(change.path.clone());
        }
        debug!(count = changes.len(), staged = self.paths.len(), "stage all");
    }

    /// Clear the whole set, returning how many paths were dropped.
    pub fn unstage_all(&mut self) -> usize {
        let dropped = self.paths.len();
        self.paths.clear();
        dropped
    }

    /// Drop exactly `paths`, leaving any other staged path in place.
    pub fn remove_all<I, S>(&mut self, paths: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for path in paths {
            self.paths.remove(path.as_ref());
        }
    }

    /// The changes whose path is staged.
    pub fn filter_staged(&self, changes: &[ChangeRecord]) -> Vec<ChangeRecord> {
        changes
            .iter()
            .filter(|c| self.contains(&c.path))
            .cloned()
            .collect()
    }

    /// The changes whose path is not staged.
    pub fn filter_unstaged(&self, changes: &[ChangeRecord]) -> Vec<ChangeRecord> {
        changes
            .iter()
            .filter(|c| !self.contains(&c.path))
            .cloned()
            .collect()
    }
}

impl<S: Into<String>> FromIterator<S> for StagedSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_diff::ChangeStatus;

    fn changes() -> Vec<ChangeRecord> {
        vec![
            ChangeRecord::new("a.md", ChangeStatus::Modified, false),
            ChangeRecord::new("b.md", ChangeStatus::Untracked, false),
            ChangeRecord::new("c.md", ChangeStatus::Deleted, false),
        ]
    }

    #[test]
    fn stage_is_idempotent_and_permissive() {
        let mut staged = StagedSet::new();
        assert!(staged.stage("ghost.md"));
        assert!(!staged.stage("ghost.md"));
        assert_eq!(staged.len(), 1);

        assert!(staged.unstage("ghost.md"));
        assert!(!staged.unstage("ghost.md"));
        assert!(staged.is_empty());
    }

    #[test]
    fn stage_all_then_filter() {
        let mut staged = StagedSet::new();
        staged.stage_all(&changes()[..2]);

        let staged_paths: Vec<_> = staged.filter_staged(&changes()).into_iter().map(|c| c.path).collect();
        assert_eq!(staged_paths, vec!["a.md", "b.md"]);
        let unstaged: Vec<_> = staged.filter_unstaged(&changes()).into_iter().map(|c| c.path).collect();
        assert_eq!(unstaged, vec!["c.md"]);
    }

    #[test]
    fn unstage_all_is_unconditional() {
        let mut staged: StagedSet = ["x", "y"].into_iter().collect();
        staged.stage("not-a-change");
        assert_eq!(staged.unstage_all(), 3);
        assert!(staged.is_empty());
    }

    #[test]
    fn remove_all_keeps_the_rest() {
        let mut staged: StagedSet = ["a.md", "b.md", "c.md"].into_iter().collect();
        staged.remove_all(["a.md", "c.md", "missing.md"]);
        assert_eq!(staged.iter().collect::<Vec<_>>(), vec!["b.md"]);
    }

    #[test]
    fn serializes_as_sorted_array() {
        let staged: StagedSet = ["b.md", "a.md"].into_iter().collect();
        assert_eq!(serde_json::to_string(&staged).unwrap(), r#"["a.md","b.md"]"#);
    }
}
