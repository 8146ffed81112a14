use async_trait::async_trait;

use crate::error::RemoteResult;
use crate::types::{CommitDetails, CommitOutcome, FileChange, RemoteEntry};

/// A remote, versioned content store.
///
/// Folio treats the service as opaque: no transport, authentication or
/// caching is assumed. Calls may be issued concurrently for sibling paths.
#[async_trait]
pub trait RemoteRepository: Send + Sync {
    /// Direct children of a directory (`""` is the repository root).
    async fn list_directory(&self, path: &str) -> RemoteResult<Vec<RemoteEntry>>;

    /// Current content of a file.
    async fn get_file_content(&self, path: &str) -> RemoteResult<String>;

    /// Content of a file as of `revision_id`.
    async fn get_file_at_revision(&self, path: &str, revision_id: &str) -> RemoteResult<String>;

    /// Metadata of a revision, including the files it changed.
    async fn get_commit_details(&self, revision_id: &str) -> RemoteResult<CommitDetails>;

    /// Apply all `files` atomically as one new revision.
    async fn commit_multiple_files(
        &self,
        files: &[FileChange],
        message: &str,
    ) -> RemoteResult<CommitOutcome>;
}
