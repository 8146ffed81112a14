use serde::{Deserialize, Serialize};

/// Kind of an entry in a remote directory listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteEntryKind {
    File,
    Dir,
}

/// One entry of a remote directory listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEntry {
    pub path: String,
    pub kind: RemoteEntryKind,
    pub size: u64,
    /// Inline content, when the service includes it in listings.
    pub content: Option<String>,
    /// Revision of this file's content.
    pub revision_id: Option<String>,
}

/// Files touched by a remote revision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitDetails {
    pub revision_id: String,
    pub message: String,
    pub files_changed: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileOperation {
    Create,
    Update,
    Delete,
}

/// One file of a multi-file commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub path: String,
    /// New content; ignored for deletes.
    pub content: Option<String>,
    pub op: FileOperation,
    /// Revision the change was based on, for optimistic concurrency.
    pub base_revision_id: Option<String>,
}

impl FileChange {
    pub fn create(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: Some(content.into()),
            op: FileOperation::Create,
            base_revision_id: None,
        }
    }

    pub fn update(
        path: impl Into<String>,
        content: impl Into<String>,
        base_revision_id: Option<String>,
    ) -> Self {
        Self {
            path: path.into(),
            content: Some(content.into()),
            op: FileOperation::Update,
            base_revision_id,
        }
    }

    pub fn delete(path: impl Into<String>, base_revision_id: Option<String>) -> Self {
        Self {
            path: path.into(),
            content: None,
            op: FileOperation::Delete,
            base_revision_id,
        }
    }
}

/// Result of an atomic multi-file commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitOutcome {
    pub success: bool,
    pub new_revision_id: Option<String>,
    pub error: Option<String>,
}

impl CommitOutcome {
    pub fn accepted(revision_id: impl Into<String>) -> Self {
        Self {
            success: true,
            new_revision_id: Some(revision_id.into()),
            error: None,
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            success: false,
            new_revision_id: None,
            error: Some(error.into()),
        }
    }
}
