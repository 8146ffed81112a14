//! Rollback requests, previews and outcomes.

use serde::{Deserialize, Serialize};

use folio_types::ItemFailure;

/// What to roll back and whether to commit afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollbackRequest {
    pub revision_id: String,
    /// Remote paths to restore. `None` takes the files changed by the
    /// revision.
    pub paths: Option<Vec<String>>,
    pub create_commit: bool,
    pub message: Option<String>,
}

impl RollbackRequest {
    pub fn new(revision_id: impl Into<String>) -> Self {
        Self {
            revision_id: revision_id.into(),
            paths: None,
            create_commit: false,
            message: None,
        }
    }

    pub fn with_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.paths = Some(paths.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_commit(mut self, message: Option<String>) -> Self {
        self.create_commit = true;
        self.message = message;
        self
    }

    /// The commit message to use, `Rollback to <short id>` by default.
    pub fn commit_message(&self) -> String {
        match self.message.as_deref().map(str::trim) {
            Some(m) if !m.is_empty() => m.to_string(),
            _ => default_message(&self.revision_id),
        }
    }
}

pub fn default_message(revision_id: &str) -> String {
    let short: String = revision_id.chars().take(7).collect();
    format!("Rollback to {short}")
}

/// A remote path and the local tree path it maps to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollbackPath {
    pub remote_path: String,
    pub local_path: String,
}

/// One file of a rollback preview.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollbackFile {
    #[serde(flatten)]
    pub path: RollbackPath,
    /// `None` when the local tree has no such file.
    pub current_content: Option<String>,
    pub rollback_content: String,
    pub has_changes: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollbackPreview {
    pub revision_id: String,
    pub files: Vec<RollbackFile>,
    pub failures: Vec<ItemFailure>,
}

impl RollbackPreview {
    /// Files that a rollback would actually change.
    pub fn changed(&self) -> impl Iterator<Item = &RollbackFile> {
        self.files.iter().filter(|f| f.has_changes)
    }
}

/// A rollback applied locally whose follow-up commit has not gone through.
///
/// Holds what is needed to try the commit again; content is read from the
/// tree at retry time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRollbackCommit {
    pub revision_id: String,
    pub message: String,
    pub paths: Vec<RollbackPath>,
}

/// What happened to the follow-up commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CommitPhase {
    NotRequested,
    /// Requested, but no file was rolled back.
    NothingRolledBack,
    Committed {
        revision_id: Option<String>,
    },
    /// The rollback stays applied; `pending` can be retried or aborted.
    Failed {
        error: String,
        pending: PendingRollbackCommit,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollbackOutcome {
    pub revision_id: String,
    /// Local paths whose content now matches the revision.
    pub rolled_back: Vec<String>,
    pub failures: Vec<ItemFailure>,
    pub commit: CommitPhase,
}

impl RollbackOutcome {
    pub fn pending_commit(&self) -> Option<&PendingRollbackCommit> {
        match &self.commit {
            CommitPhase::Failed { pending, .. } => Some(pending),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_message_uses_short_id() {
        let req = RollbackRequest::new("0123456789abcdef").with_commit(None);
        assert_eq!(req.commit_message(), "Rollback to 0123456");
        let req = RollbackRequest::new("abc").with_commit(Some("  ".into()));
        assert_eq!(req.commit_message(), "Rollback to abc");
        let req = RollbackRequest::new("abc").with_commit(Some("restore intro".into()));
        assert_eq!(req.commit_message(), "restore intro");
    }

    #[test]
    fn phase_serializes_tagged() {
        let json = serde_json::to_string(&CommitPhase::NotRequested).unwrap();
        assert_eq!(json, r#"{"state":"not_requested"}"#);
    }
}
