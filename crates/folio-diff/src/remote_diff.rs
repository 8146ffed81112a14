//! Local tree vs. remote revision store comparison.
//!
//! The remote tree is listed recursively, one request per directory, with
//! sibling directories listed concurrently. File content missing from a
//! listing is fetched, again concurrently. A failed sub-listing or fetch is
//! recorded and skipped: local files underneath an unreadable remote path are
//! left out of the result instead of being reported as added.

use std::collections::BTreeMap;

use futures::future::{join_all, BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use folio_remote::{RemoteEntry, RemoteEntryKind, RemoteRepository};
use folio_types::{path, FileMap, ItemFailure};

use crate::error::{DiffError, DiffResult};
use crate::normalize::{same_content, NormalizeOptions};

/// How a path differs between the local tree and the remote.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteStatus {
    Modified,
    /// Local only.
    Added,
    /// Remote only.
    Deleted,
}

/// One path that differs between the local tree and the remote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifiedFile {
    /// Path in the remote repository.
    pub path: String,
    /// Path relative to the compared remote root (the local path).
    pub relative_path: String,
    pub status: RemoteStatus,
    pub local_content: Option<String>,
    pub remote_content: Option<String>,
    pub remote_revision_id: Option<String>,
    pub staged: bool,
}

/// Result of [`compare_remote`]: differing files plus the remote paths that
/// could not be read.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RemoteComparison {
    pub files: Vec<ModifiedFile>,
    pub failures: Vec<ItemFailure>,
}

impl RemoteComparison {
    /// Returns `true` if every remote path was read.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Clone, Debug)]
struct RemoteFile {
    content: String,
    revision_id: Option<String>,
}

#[derive(Default)]
struct Listing {
    files: Vec<RemoteEntry>,
    unreadable: Vec<String>,
    failures: Vec<ItemFailure>,
}

impl Listing {
    fn merge(&mut self, other: Listing) {
        self.files.extend(other.files);
        self.unreadable.extend(other.unreadable);
        self.failures.extend(other.failures);
    }

    fn fail(&mut self, remote_path: String, error: impl ToString) {
        let error = error.to_string();
        warn!(path = %remote_path, %error, "remote read failed; skipping");
        self.failures.push(ItemFailure::new(remote_path.clone(), error));
        self.unreadable.push(remote_path);
    }
}

/// Expand a directory listing into every file beneath it.
fn expand<'a>(remote: &'a dyn RemoteRepository, entries: Vec<RemoteEntry>) -> BoxFuture<'a, Listing> {
    async move {
        let mut listing = Listing::default();
        let mut dirs = Vec::new();
        for entry in entries {
            match entry.kind {
                RemoteEntryKind::File => listing.files.push(entry),
                RemoteEntryKind::Dir => dirs.push(entry.path),
            }
        }

        let results = join_all(dirs.iter().map(|d| remote.list_directory(d))).await;
        let mut nested = Vec::new();
        for (dir, result) in dirs.into_iter().zip(results) {
            match result {
                Ok(children) => nested.push(expand(remote, children)),
                Err(e) => listing.fail(dir, e),
            }
        }
        for sub in join_all(nested).await {
            listing.merge(sub);
        }
        listing
    }
    .boxed()
}

/// List every file under `root`, fetching content the listing left out.
async fn snapshot_remote(
    remote: &dyn RemoteRepository,
    root: &str,
) -> DiffResult<(BTreeMap<String, RemoteFile>, Listing)> {
    let entries = remote
        .list_directory(root)
        .await
        .map_err(|source| DiffError::RemoteRoot {
            root: root.to_string(),
            source,
        })?;
    let mut listing = expand(remote, entries).await;

    let (inline, missing): (Vec<RemoteEntry>, Vec<RemoteEntry>) = std::mem::take(&mut listing.files)
        .into_iter()
        .partition(|e| e.content.is_some());

    let fetched = join_all(missing.iter().map(|e| remote.get_file_content(&e.path))).await;

    let mut files = BTreeMap::new();
    for entry in inline {
        let content = entry.content.unwrap_or_default();
        files.insert(entry.path, RemoteFile {
            content,
            revision_id: entry.revision_id,
        });
    }
    for (entry, result) in missing.into_iter().zip(fetched) {
        match result {
            Ok(content) => {
                files.insert(entry.path, RemoteFile {
                    content,
                    revision_id: entry.revision_id,
                });
            }
            Err(e) => listing.fail(entry.path, e),
        }
    }

    debug!(root, files = files.len(), failures = listing.failures.len(), "listed remote tree");
    Ok((files, listing))
}

/// Compare the files of `local` (paths relative to `remote_root`) with the
/// remote tree under `remote_root`, staging keyed on the remote path.
pub async fn compare_remote<F>(
    remote: &dyn RemoteRepository,
    remote_root: &str,
    local: &FileMap,
    is_staged: F,
    options: &NormalizeOptions,
) -> DiffResult<RemoteComparison>
where
    F: Fn(&str) -> bool,
{
    let remote_root = remote_root.trim_matches(path::SEPARATOR);
    let (remote_files, listing) = snapshot_remote(remote, remote_root).await?;

    let relative = |remote_path: &str| {
        path::relative_to(remote_path, remote_root)
            .unwrap_or(remote_path)
            .to_string()
    };
    let blocked = |relative_path: &str| {
        listing
            .unreadable
            .iter()
            .any(|u| path::is_within(relative_path, &relative(u)))
    };

    let mut by_relative: BTreeMap<String, (String, RemoteFile)> = BTreeMap::new();
    for (remote_path, file) in remote_files {
        by_relative.insert(relative(&remote_path), (remote_path, file));
    }

    let mut files = Vec::new();
    for entry in local.files() {
        let relative_path = entry.path.as_str();
        let local_content = entry.content.clone().unwrap_or_default();
        match by_relative.remove(relative_path) {
            Some((remote_path, remote_file)) => {
                if same_content(&local_content, &remote_file.content, options) {
                    continue;
                }
                files.push(ModifiedFile {
                    staged: is_staged(&remote_path),
                    path: remote_path,
                    relative_path: relative_path.to_string(),
                    status: RemoteStatus::Modified,
                    local_content: Some(local_content),
                    remote_content: Some(remote_file.content),
                    remote_revision_id: remote_file.revision_id,
                });
            }
            None if blocked(relative_path) => {
                debug!(path = relative_path, "remote side unreadable; not classified");
            }
            None => {
                let remote_path = path::join(remote_root, relative_path);
                files.push(ModifiedFile {
                    staged: is_staged(&remote_path),
                    path: remote_path,
                    relative_path: relative_path.to_string(),
                    status: RemoteStatus::Added,
                    local_content: Some(local_content),
                    remote_content: None,
                    remote_revision_id: None,
                });
            }
        }
    }

    for (relative_path, (remote_path, remote_file)) in by_relative {
        files.push(ModifiedFile {
            staged: is_staged(&remote_path),
            path: remote_path,
            relative_path,
            status: RemoteStatus::Deleted,
            local_content: None,
            remote_content: Some(remote_file.content),
            remote_revision_id: remote_file.revision_id,
        });
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    let mut failures = listing.failures;
    failures.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(RemoteComparison { files, failures })
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_remote::{content_revision, InMemoryRemote};
    use folio_types::FileEntry;

    fn local(files: &[(&str, &str)]) -> FileMap {
        files.iter().map(|(p, c)| FileEntry::file(*p, *c)).collect()
    }

    async fn run(remote: &InMemoryRemote, root: &str, local: &FileMap) -> RemoteComparison {
        compare_remote(remote, root, local, |_| false, &NormalizeOptions::default())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn modified_and_deleted() {
        let remote = InMemoryRemote::with_files(&[("docs/a.md", "remote A"), ("docs/b.md", "B")]);
        let result = run(&remote, "", &local(&[("docs/a.md", "local A")])).await;

        assert!(result.is_complete());
        let summary: Vec<(&str, RemoteStatus)> =
            result.files.iter().map(|f| (f.path.as_str(), f.status)).collect();
        assert_eq!(
            summary,
            vec![
                ("docs/a.md", RemoteStatus::Modified),
                ("docs/b.md", RemoteStatus::Deleted),
            ]
        );
        let modified = &result.files[0];
        assert_eq!(modified.local_content.as_deref(), Some("local A"));
        assert_eq!(modified.remote_content.as_deref(), Some("remote A"));
        assert_eq!(
            modified.remote_revision_id.as_deref(),
            Some(content_revision("remote A").as_str())
        );
    }

    #[tokio::test]
    async fn local_only_is_added_and_matches_are_silent() {
        let remote = InMemoryRemote::with_files(&[("a.md", "same\n")]);
        let result = run(&remote, "", &local(&[("a.md", "same\r\n\n"), ("new.md", "N")])).await;
        assert_eq!(result.files.len(), 1);
        assert_eq!(result.files[0].path, "new.md");
        assert_eq!(result.files[0].status, RemoteStatus::Added);
    }

    #[tokio::test]
    async fn nested_root_maps_relative_paths() {
        let remote = InMemoryRemote::with_files(&[
            ("vault/notes/a.md", "A"),
            ("vault/b.md", "B"),
            ("outside.md", "O"),
        ]);
        let result = run(&remote, "vault", &local(&[("notes/a.md", "A2"), ("c.md", "C")])).await;

        let summary: Vec<(&str, &str, RemoteStatus)> = result
            .files
            .iter()
            .map(|f| (f.path.as_str(), f.relative_path.as_str(), f.status))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("vault/b.md", "b.md", RemoteStatus::Deleted),
                ("vault/c.md", "c.md", RemoteStatus::Added),
                ("vault/notes/a.md", "notes/a.md", RemoteStatus::Modified),
            ]
        );
    }

    #[tokio::test]
    async fn root_separators_are_ignored() {
        let remote = InMemoryRemote::with_files(&[("vault/a.md", "A")]);
        let result = run(&remote, "/vault/", &local(&[("a.md", "A2")])).await;
        assert_eq!(result.files.len(), 1);
        assert_eq!(result.files[0].path, "vault/a.md");
        assert_eq!(result.files[0].status, RemoteStatus::Modified);
    }

    #[tokio::test]
    async fn failed_subdirectory_is_skipped_not_fatal() {
        let remote = InMemoryRemote::with_files(&[
            ("broken/x.md", "X"),
            ("ok/y.md", "Y"),
            ("gone.md", "G"),
        ]);
        remote.fail_path("broken");

        let result = run(&remote, "", &local(&[("broken/x.md", "local X"), ("ok/y.md", "Y2")])).await;

        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].path, "broken");
        let paths: Vec<&str> = result.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["gone.md", "ok/y.md"]);
    }

    #[tokio::test]
    async fn failed_content_fetch_is_skipped() {
        let remote = InMemoryRemote::with_files(&[("a.md", "A"), ("b.md", "B")]);
        remote.fail_path("b.md");
        let result = run(&remote, "", &local(&[("a.md", "A"), ("b.md", "local")])).await;
        assert!(result.files.is_empty());
        assert_eq!(result.failures[0].path, "b.md");
    }

    #[tokio::test]
    async fn inline_content_avoids_fetches() {
        let remote = InMemoryRemote::with_files(&[("a.md", "A")]);
        remote.set_inline_content(true);
        // Reads of the file itself would fail; the listing carries content.
        remote.fail_path("a.md");
        let result = run(&remote, "", &local(&[("a.md", "A")])).await;
        assert!(result.is_complete());
        assert!(result.files.is_empty());
    }

    #[tokio::test]
    async fn unreadable_root_is_an_error() {
        let remote = InMemoryRemote::with_files(&[("a.md", "A")]);
        remote.fail_path("");
        let err = compare_remote(&remote, "", &FileMap::new(), |_| false, &NormalizeOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DiffError::RemoteRoot { .. }));
    }

    #[tokio::test]
    async fn staged_flag_follows_remote_path() {
        let remote = InMemoryRemote::with_files(&[("vault/a.md", "A")]);
        let result = compare_remote(
            &remote,
            "vault",
            &local(&[("a.md", "changed")]),
            |p| p == "vault/a.md",
            &NormalizeOptions::default(),
        )
        .await
        .unwrap();
        assert!(result.files[0].staged);
    }
}
