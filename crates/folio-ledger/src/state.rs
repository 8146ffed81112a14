//! Repository state: branch, sync counters and the commit log.

use serde::{Deserialize, Serialize};

use crate::commit::Commit;

/// Default branch name for a fresh repository.
pub const DEFAULT_BRANCH: &str = "main";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryState {
    pub current_branch: String,
    pub ahead_count: u32,
    pub behind_count: u32,
    /// Newest first.
    pub commits: Vec<Commit>,
}

impl Default for RepositoryState {
    fn default() -> Self {
        Self::new(DEFAULT_BRANCH)
    }
}

impl RepositoryState {
    pub fn new(branch: impl Into<String>) -> Self {
        Self {
            current_branch: branch.into(),
            ahead_count: 0,
            behind_count: 0,
            commits: Vec::new(),
        }
    }

    /// The most recent commit.
    pub fn head_commit(&self) -> Option<&Commit> {
        self.commits.first()
    }

    /// Up to `limit` commits, newest first.
    pub fn log(&self, limit: usize) -> &[Commit] {
        &self.commits[..limit.min(self.commits.len())]
    }

    /// Prepend `commit` and count it as unpushed.
    pub(crate) fn record(&mut self, commit: Commit) {
        self.commits.insert(0, commit);
        self.ahead_count += 1;
    }
}
