//! Commits delegated to the remote repository service.
//!
//! The staged subset of a remote comparison becomes one atomic multi-file
//! commit. Files whose local content cannot be gathered are skipped and
//! reported; the rest still go out.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use folio_diff::{ModifiedFile, RemoteStatus};
use folio_index::StagedSet;
use folio_remote::{FileChange, RemoteRepository};
use folio_types::{FileMap, ItemFailure};

use crate::error::{LedgerError, LedgerResult};

/// Outcome of a successful remote commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteCommitReport {
    pub new_revision_id: Option<String>,
    /// Remote paths included in the commit, now cleared from the staged set.
    pub committed: Vec<String>,
    pub skipped: Vec<ItemFailure>,
}

/// Build the operation for one staged file, reading content from `local`
/// (keyed by relative path).
fn to_change(file: &ModifiedFile, local: &FileMap) -> Result<FileChange, String> {
    let content = || {
        local
            .content(&file.relative_path)
            .map(str::to_string)
            .ok_or_else(|| format!("local file {} is missing", file.relative_path))
    };
    Ok(match file.status {
        RemoteStatus::Added => FileChange::create(file.path.clone(), content()?),
        RemoteStatus::Modified => {
            FileChange::update(file.path.clone(), content()?, file.remote_revision_id.clone())
        }
        RemoteStatus::Deleted => {
            FileChange::delete(file.path.clone(), file.remote_revision_id.clone())
        }
    })
}

/// Commit every staged entry of `files` to `remote` in one request.
///
/// On success exactly the committed paths leave `staged`. A rejected commit
/// or a transport failure leaves `staged` untouched.
pub async fn commit_remote(
    remote: Option<&dyn RemoteRepository>,
    files: &[ModifiedFile],
    local: &FileMap,
    staged: &mut StagedSet,
    message: &str,
) -> LedgerResult<RemoteCommitReport> {
    let remote =
        remote.ok_or_else(|| LedgerError::Validation("missing repository context".into()))?;
    let message = message.trim();
    if message.is_empty() {
        return Err(LedgerError::Validation("commit message is empty".into()));
    }

    let candidates: Vec<&ModifiedFile> = files.iter().filter(|f| staged.contains(&f.path)).collect();
    if candidates.is_empty() {
        return Err(LedgerError::Validation("nothing staged to commit".into()));
    }

    let mut changes = Vec::new();
    let mut skipped = Vec::new();
    for file in candidates {
        match to_change(file, local) {
            Ok(change) => changes.push(change),
            Err(error) => {
                warn!(path = %file.path, %error, "skipping file in remote commit");
                skipped.push(ItemFailure::new(file.path.clone(), error));
            }
        }
    }
    if changes.is_empty() {
        return Err(LedgerError::AllSkipped { skipped });
    }

    let outcome = remote.commit_multiple_files(&changes, message).await?;
    if !outcome.success {
        let reason = outcome.error.unwrap_or_else(|| "unknown reason".into());
        warn!(%reason, files = changes.len(), "remote commit rejected");
        return Err(LedgerError::Rejected(reason));
    }

    let committed: Vec<String> = changes.into_iter().map(|c| c.path).collect();
    staged.remove_all(&committed);
    info!(
        revision = outcome.new_revision_id.as_deref().unwrap_or("-"),
        files = committed.len(),
        skipped = skipped.len(),
        "remote commit accepted"
    );
    Ok(RemoteCommitReport {
        new_revision_id: outcome.new_revision_id,
        committed,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_diff::{compare_remote, NormalizeOptions};
    use folio_remote::InMemoryRemote;
    use folio_types::FileEntry;

    fn local(files: &[(&str, &str)]) -> FileMap {
        files.iter().map(|(p, c)| FileEntry::file(*p, *c)).collect()
    }

    async fn diff(remote: &InMemoryRemote, local: &FileMap) -> Vec<ModifiedFile> {
        compare_remote(remote, "", local, |_| false, &NormalizeOptions::default())
            .await
            .unwrap()
            .files
    }

    #[tokio::test]
    async fn commits_only_the_staged_subset() {
        let remote = InMemoryRemote::with_files(&[("a.md", "A"), ("gone.md", "G")]);
        let local = local(&[("a.md", "A2"), ("new.md", "N")]);
        let files = diff(&remote, &local).await;
        assert_eq!(files.len(), 3);

        let mut staged: StagedSet = ["a.md", "gone.md", "unrelated.md"].into_iter().collect();
        let report = commit_remote(Some(&remote), &files, &local, &mut staged, "sync")
            .await
            .unwrap();

        assert_eq!(report.committed, vec!["a.md", "gone.md"]);
        assert_eq!(report.new_revision_id, remote.head_revision());
        assert_eq!(staged.iter().collect::<Vec<_>>(), vec!["unrelated.md"]);
        assert_eq!(remote.file_at_head("a.md").as_deref(), Some("A2"));
        assert_eq!(remote.file_at_head("gone.md"), None);
        assert_eq!(remote.file_at_head("new.md"), None);
    }

    #[tokio::test]
    async fn missing_remote_is_validation() {
        let mut staged: StagedSet = ["a.md"].into_iter().collect();
        let err = commit_remote(None, &[], &FileMap::new(), &mut staged, "m")
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation(ref m) if m == "missing repository context"));
    }

    #[tokio::test]
    async fn rejection_keeps_staged_set() {
        let remote = InMemoryRemote::with_files(&[("a.md", "A")]);
        let local = local(&[("a.md", "A2")]);
        let files = diff(&remote, &local).await;
        let mut staged: StagedSet = ["a.md"].into_iter().collect();

        remote.reject_next_commit("locked");
        let err = commit_remote(Some(&remote), &files, &local, &mut staged, "m")
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Rejected(ref r) if r == "locked"));
        assert!(staged.contains("a.md"));
    }

    #[tokio::test]
    async fn unreadable_local_file_is_skipped() {
        let remote = InMemoryRemote::with_files(&[("a.md", "A")]);
        let before = local(&[("a.md", "A2"), ("b.md", "B")]);
        let files = diff(&remote, &before).await;
        // b.md vanished locally between compare and commit.
        let after = local(&[("a.md", "A2")]);
        let mut staged: StagedSet = ["a.md", "b.md"].into_iter().collect();

        let report = commit_remote(Some(&remote), &files, &after, &mut staged, "m")
            .await
            .unwrap();
        assert_eq!(report.committed, vec!["a.md"]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].path, "b.md");
        assert!(staged.contains("b.md"));
    }

    #[tokio::test]
    async fn stale_base_revision_is_rejected() {
        let remote = InMemoryRemote::with_files(&[("a.md", "A")]);
        let local = local(&[("a.md", "mine")]);
        let files = diff(&remote, &local).await;
        remote.seed(&[("a.md", "theirs")], "concurrent edit");

        let mut staged: StagedSet = ["a.md"].into_iter().collect();
        let err = commit_remote(Some(&remote), &files, &local, &mut staged, "m")
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Rejected(_)));
        assert_eq!(remote.file_at_head("a.md").as_deref(), Some("theirs"));
    }
}
