//! In-memory remote repository for tests and embedding.
//!
//! [`InMemoryRemote`] keeps a linear revision history. Revision ids are the
//! BLAKE3 hash (hex) of the parent id, the message and the resulting file
//! set; per-file revision ids are the BLAKE3 hash of the content. Paths can
//! be marked as failing to simulate a flaky service.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::debug;

use folio_types::path;

use crate::error::{RemoteError, RemoteResult};
use crate::transport::RemoteRepository;
use crate::types::{
    CommitDetails, CommitOutcome, FileChange, FileOperation, RemoteEntry, RemoteEntryKind,
};

#[derive(Clone, Debug)]
struct Revision {
    id: String,
    message: String,
    files: BTreeMap<String, String>,
    changed: Vec<String>,
}

#[derive(Debug, Default)]
struct RemoteState {
    revisions: Vec<Revision>,
    failing: HashSet<String>,
    reject_next_commit: Option<String>,
    inline_content: bool,
}

impl RemoteState {
    fn head(&self) -> Option<&Revision> {
        self.revisions.last()
    }

    fn head_files(&self) -> BTreeMap<String, String> {
        self.head().map(|r| r.files.clone()).unwrap_or_default()
    }

    fn check(&self, path: &str) -> RemoteResult<()> {
        if self.failing.contains(path) {
            return Err(RemoteError::Status {
                status: 503,
                message: format!("injected failure for {path}"),
            });
        }
        Ok(())
    }

    fn push(&mut self, message: &str, files: BTreeMap<String, String>, changed: Vec<String>) -> String {
        let parent = self.head().map(|r| r.id.clone()).unwrap_or_default();
        let id = revision_hash(&parent, message, &files);
        self.revisions.push(Revision {
            id: id.clone(),
            message: message.to_string(),
            files,
            changed,
        });
        id
    }
}

fn revision_hash(parent: &str, message: &str, files: &BTreeMap<String, String>) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(parent.as_bytes());
    hasher.update(&[0]);
    hasher.update(message.as_bytes());
    for (path, content) in files {
        hasher.update(&[0]);
        hasher.update(path.as_bytes());
        hasher.update(&[0]);
        hasher.update(content.as_bytes());
    }
    hex::encode(hasher.finalize().as_bytes())
}

/// Revision id of a single file's content.
pub fn content_revision(content: &str) -> String {
    hex::encode(blake3::hash(content.as_bytes()).as_bytes())
}

/// An in-memory [`RemoteRepository`].
#[derive(Debug, Default)]
pub struct InMemoryRemote {
    state: RwLock<RemoteState>,
}

impl InMemoryRemote {
    /// Create an empty remote with no revisions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a remote whose first revision holds `files`.
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let remote = Self::new();
        remote.seed(files, "initial import");
        remote
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, RemoteState> {
        self.state.read().expect("remote lock poisoned")
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, RemoteState> {
        self.state.write().expect("remote lock poisoned")
    }

    /// Record a revision that sets `files` on top of the current head.
    pub fn seed(&self, files: &[(&str, &str)], message: &str) -> String {
        let mut state = self.write();
        let mut tree = state.head_files();
        let mut changed = Vec::new();
        for (p, content) in files {
            tree.insert(p.to_string(), content.to_string());
            changed.push(p.to_string());
        }
        state.push(message, tree, changed)
    }

    /// Record a revision deleting `paths`.
    pub fn remove(&self, paths: &[&str], message: &str) -> String {
        let mut state = self.write();
        let mut tree = state.head_files();
        for p in paths {
            tree.remove(*p);
        }
        state.push(message, tree, paths.iter().map(|p| p.to_string()).collect())
    }

    /// Make every read of `path` fail (listing or content).
    pub fn fail_path(&self, path: &str) {
        self.write().failing.insert(path.to_string());
    }

    /// Clear all injected failures.
    pub fn heal(&self) {
        self.write().failing.clear();
    }

    /// Reject the next multi-file commit with `reason`.
    pub fn reject_next_commit(&self, reason: &str) {
        self.write().reject_next_commit = Some(reason.to_string());
    }

    /// Include file content in directory listings.
    pub fn set_inline_content(&self, inline: bool) {
        self.write().inline_content = inline;
    }

    pub fn head_revision(&self) -> Option<String> {
        self.read().head().map(|r| r.id.clone())
    }

    pub fn revision_count(&self) -> usize {
        self.read().revisions.len()
    }

    /// Content of `path` at the head revision.
    pub fn file_at_head(&self, path: &str) -> Option<String> {
        self.read().head().and_then(|r| r.files.get(path).cloned())
    }

    /// Message of the head revision.
    pub fn head_message(&self) -> Option<String> {
        self.read().head().map(|r| r.message.clone())
    }
}

#[async_trait]
impl RemoteRepository for InMemoryRemote {
    async fn list_directory(&self, dir: &str) -> RemoteResult<Vec<RemoteEntry>> {
        let state = self.read();
        state.check(dir)?;
        let files = state.head_files();

        let mut dirs = BTreeSet::new();
        let mut entries = Vec::new();
        for (file_path, content) in &files {
            let Some(rest) = path::relative_to(file_path, dir) else {
                continue;
            };
            match rest.split_once('/') {
                Some((sub, _)) => {
                    dirs.insert(path::join(dir, sub));
                }
                None => entries.push(RemoteEntry {
                    path: file_path.clone(),
                    kind: RemoteEntryKind::File,
                    size: content.len() as u64,
                    content: state.inline_content.then(|| content.clone()),
                    revision_id: Some(content_revision(content)),
                }),
            }
        }

        if entries.is_empty() && dirs.is_empty() && !dir.is_empty() {
            return Err(RemoteError::NotFound(dir.to_string()));
        }

        entries.extend(dirs.into_iter().map(|d| RemoteEntry {
            path: d,
            kind: RemoteEntryKind::Dir,
            size: 0,
            content: None,
            revision_id: None,
        }));
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }

    async fn get_file_content(&self, file: &str) -> RemoteResult<String> {
        let state = self.read();
        state.check(file)?;
        state
            .head()
            .and_then(|r| r.files.get(file).cloned())
            .ok_or_else(|| RemoteError::NotFound(file.to_string()))
    }

    async fn get_file_at_revision(&self, file: &str, revision_id: &str) -> RemoteResult<String> {
        let state = self.read();
        state.check(file)?;
        let revision = state
            .revisions
            .iter()
            .find(|r| r.id == revision_id)
            .ok_or_else(|| RemoteError::RevisionNotFound(revision_id.to_string()))?;
        revision
            .files
            .get(file)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound(file.to_string()))
    }

    async fn get_commit_details(&self, revision_id: &str) -> RemoteResult<CommitDetails> {
        let state = self.read();
        let revision = state
            .revisions
            .iter()
            .find(|r| r.id == revision_id)
            .ok_or_else(|| RemoteError::RevisionNotFound(revision_id.to_string()))?;
        Ok(CommitDetails {
            revision_id: revision.id.clone(),
            message: revision.message.clone(),
            files_changed: revision.changed.clone(),
        })
    }

    async fn commit_multiple_files(
        &self,
        changes: &[FileChange],
        message: &str,
    ) -> RemoteResult<CommitOutcome> {
        let mut state = self.write();
        if let Some(reason) = state.reject_next_commit.take() {
            return Ok(CommitOutcome::rejected(reason));
        }

        let mut tree = state.head_files();
        for change in changes {
            let current = tree.get(&change.path).map(|c| content_revision(c));
            let stale = match (&change.base_revision_id, &current) {
                (Some(base), Some(current)) => base != current,
                (Some(_), None) => true,
                (None, _) => false,
            };
            if stale {
                return Ok(CommitOutcome::rejected(format!(
                    "{} changed since revision was read",
                    change.path
                )));
            }

            match change.op {
                FileOperation::Create if current.is_some() => {
                    return Ok(CommitOutcome::rejected(format!(
                        "{} already exists",
                        change.path
                    )));
                }
                FileOperation::Update | FileOperation::Delete if current.is_none() => {
                    return Ok(CommitOutcome::rejected(format!(
                        "{} does not exist",
                        change.path
                    )));
                }
                FileOperation::Create | FileOperation::Update => {
                    tree.insert(
                        change.path.clone(),
                        change.content.clone().unwrap_or_default(),
                    );
                }
                FileOperation::Delete => {
                    tree.remove(&change.path);
                }
            }
        }

        let changed = changes.iter().map(|c| c.path.clone()).collect();
        let id = state.push(message, tree, changed);
        debug!(revision = %id, files = changes.len(), "remote commit accepted");
        Ok(CommitOutcome::accepted(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote() -> InMemoryRemote {
        InMemoryRemote::with_files(&[
            ("docs/a.md", "A"),
            ("docs/deep/c.md", "C"),
            ("top.md", "T"),
        ])
    }

    #[tokio::test]
    async fn lists_direct_children() {
        let remote = remote();
        let root = remote.list_directory("").await.unwrap();
        let paths: Vec<_> = root.iter().map(|e| (e.path.as_str(), e.kind)).collect();
        assert_eq!(
            paths,
            vec![("docs", RemoteEntryKind::Dir), ("top.md", RemoteEntryKind::File)]
        );

        let docs = remote.list_directory("docs").await.unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].path, "docs/a.md");
        assert!(docs[0].content.is_none());
        assert_eq!(docs[0].revision_id.as_deref(), Some(content_revision("A").as_str()));
    }

    #[tokio::test]
    async fn inline_content_is_optional() {
        let remote = remote();
        remote.set_inline_content(true);
        let docs = remote.list_directory("docs").await.unwrap();
        assert_eq!(docs[0].content.as_deref(), Some("A"));
    }

    #[tokio::test]
    async fn missing_directory_is_not_found() {
        let remote = remote();
        let err = remote.list_directory("nope").await.unwrap_err();
        assert_eq!(err, RemoteError::NotFound("nope".into()));
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn injected_failures() {
        let remote = remote();
        remote.fail_path("docs");
        assert!(remote.list_directory("docs").await.is_err());
        assert_eq!(remote.get_file_content("top.md").await.unwrap(), "T");
        remote.heal();
        assert!(remote.list_directory("docs").await.is_ok());
    }

    #[tokio::test]
    async fn history_is_addressable() {
        let remote = remote();
        let first = remote.head_revision().unwrap();
        let second = remote.seed(&[("top.md", "T2")], "edit top");
        assert_ne!(first, second);

        assert_eq!(remote.get_file_at_revision("top.md", &first).await.unwrap(), "T");
        assert_eq!(remote.get_file_content("top.md").await.unwrap(), "T2");

        let details = remote.get_commit_details(&second).await.unwrap();
        assert_eq!(details.files_changed, vec!["top.md"]);
        assert!(matches!(
            remote.get_commit_details("bogus").await,
            Err(RemoteError::RevisionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn multi_file_commit_is_atomic() {
        let remote = remote();
        let before = remote.revision_count();
        let changes = vec![
            FileChange::create("new.md", "N"),
            FileChange::update("top.md", "T2", Some("stale".into())),
        ];
        let outcome = remote.commit_multiple_files(&changes, "mixed").await.unwrap();
        assert!(!outcome.success);
        assert_eq!(remote.revision_count(), before);
        assert_eq!(remote.file_at_head("new.md"), None);

        let changes = vec![
            FileChange::create("new.md", "N"),
            FileChange::update("top.md", "T2", Some(content_revision("T"))),
            FileChange::delete("docs/a.md", None),
        ];
        let outcome = remote.commit_multiple_files(&changes, "good").await.unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.new_revision_id, remote.head_revision());
        assert_eq!(remote.file_at_head("new.md").as_deref(), Some("N"));
        assert_eq!(remote.file_at_head("top.md").as_deref(), Some("T2"));
        assert_eq!(remote.file_at_head("docs/a.md"), None);
    }

    #[tokio::test]
    async fn rejection_is_one_shot() {
        let remote = remote();
        remote.reject_next_commit("maintenance");
        let changes = vec![FileChange::create("x.md", "x")];
        let outcome = remote.commit_multiple_files(&changes, "m").await.unwrap();
        assert_eq!(outcome.error.as_deref(), Some("maintenance"));
        let outcome = remote.commit_multiple_files(&changes, "m").await.unwrap();
        assert!(outcome.success);
    }
}
