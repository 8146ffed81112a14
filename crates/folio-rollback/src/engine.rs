//! Preview and apply rollbacks.
//!
//! Content at the target revision is fetched for all candidates at once.
//! Writes happen afterwards, one by one in path order, so the tree is only
//! touched after every fetch has settled. A file that cannot be fetched or
//! written is reported and skipped.

use futures::future::join_all;
use tracing::{debug, info, warn};

use folio_diff::{same_content, NormalizeOptions};
use folio_remote::RemoteRepository;
use folio_store::FileTree;
use folio_types::{path, ItemFailure};

use crate::commit::submit;
use crate::error::{RollbackError, RollbackResult};
use crate::types::{
    CommitPhase, PendingRollbackCommit, RollbackFile, RollbackOutcome, RollbackPath,
    RollbackPreview, RollbackRequest,
};

/// The remote side of a rollback.
#[derive(Clone, Copy)]
pub struct RollbackContext<'a> {
    pub remote: &'a dyn RemoteRepository,
    /// Remote folder the local tree mirrors (`""` for the whole repository).
    pub remote_root: &'a str,
    pub normalize: &'a NormalizeOptions,
}

impl<'a> RollbackContext<'a> {
    pub fn new(remote: &'a dyn RemoteRepository, normalize: &'a NormalizeOptions) -> Self {
        Self {
            remote,
            remote_root: "",
            normalize,
        }
    }

    pub fn with_root(mut self, remote_root: &'a str) -> Self {
        self.remote_root = remote_root.trim_matches(path::SEPARATOR);
        self
    }

    fn map_path(&self, remote_path: &str) -> Option<RollbackPath> {
        let local = path::relative_to(remote_path, self.remote_root)?;
        let local_path = path::normalize(local).ok()?;
        Some(RollbackPath {
            remote_path: remote_path.to_string(),
            local_path,
        })
    }
}

/// Resolve and map the candidate paths, sorted and deduplicated.
async fn candidates(
    ctx: &RollbackContext<'_>,
    revision_id: &str,
    paths: Option<&[String]>,
) -> RollbackResult<(Vec<RollbackPath>, Vec<ItemFailure>)> {
    if revision_id.trim().is_empty() {
        return Err(RollbackError::Validation("revision id is empty".into()));
    }
    let mut remote_paths: Vec<String> = match paths {
        Some(paths) => paths.to_vec(),
        None => {
            ctx.remote
                .get_commit_details(revision_id)
                .await
                .map_err(|source| RollbackError::CommitDetails {
                    revision_id: revision_id.to_string(),
                    source,
                })?
                .files_changed
        }
    };
    remote_paths.sort();
    remote_paths.dedup();

    let mut mapped = Vec::new();
    let mut failures = Vec::new();
    for remote_path in remote_paths {
        match ctx.map_path(&remote_path) {
            Some(p) => mapped.push(p),
            None => {
                warn!(path = %remote_path, root = ctx.remote_root, "path outside remote root; skipping");
                failures.push(ItemFailure::new(remote_path, "path is outside the remote root"));
            }
        }
    }
    Ok((mapped, failures))
}

/// Fetch every candidate at `revision_id`, concurrently.
async fn fetch_all(
    ctx: &RollbackContext<'_>,
    revision_id: &str,
    paths: Vec<RollbackPath>,
    failures: &mut Vec<ItemFailure>,
) -> Vec<(RollbackPath, String)> {
    let results = join_all(
        paths
            .iter()
            .map(|p| ctx.remote.get_file_at_revision(&p.remote_path, revision_id)),
    )
    .await;

    let mut fetched = Vec::new();
    for (p, result) in paths.into_iter().zip(results) {
        match result {
            Ok(content) => fetched.push((p, content)),
            Err(e) => {
                warn!(path = %p.remote_path, revision = revision_id, error = %e, "fetch at revision failed; skipping");
                failures.push(ItemFailure::new(p.remote_path, e));
            }
        }
    }
    fetched
}

/// Show what a rollback to `revision_id` would change. Never mutates.
pub async fn preview(
    ctx: &RollbackContext<'_>,
    tree: &FileTree,
    revision_id: &str,
    paths: Option<&[String]>,
) -> RollbackResult<RollbackPreview> {
    let (paths, mut failures) = candidates(ctx, revision_id, paths).await?;
    let fetched = fetch_all(ctx, revision_id, paths, &mut failures).await;

    let files = fetched
        .into_iter()
        .map(|(p, rollback_content)| {
            let current_content = tree.content(&p.local_path).map(str::to_string);
            let has_changes = match &current_content {
                Some(current) => !same_content(current, &rollback_content, ctx.normalize),
                None => true,
            };
            RollbackFile {
                path: p,
                current_content,
                rollback_content,
                has_changes,
            }
        })
        .collect();

    Ok(RollbackPreview {
        revision_id: revision_id.to_string(),
        files,
        failures,
    })
}

/// Restore the candidates of `request` in `tree`, then optionally commit.
///
/// A failed follow-up commit does not undo the local writes; it is reported
/// as [`CommitPhase::Failed`] carrying a retryable
/// [`PendingRollbackCommit`].
pub async fn rollback(
    ctx: &RollbackContext<'_>,
    tree: &mut FileTree,
    request: &RollbackRequest,
) -> RollbackResult<RollbackOutcome> {
    let revision_id = request.revision_id.as_str();
    let (paths, mut failures) = candidates(ctx, revision_id, request.paths.as_deref()).await?;
    let fetched = fetch_all(ctx, revision_id, paths, &mut failures).await;

    let mut applied = Vec::new();
    for (p, content) in fetched {
        match tree.write_file(&p.local_path, &content) {
            Ok(id) => {
                // The content no longer matches the revision the node was synced at.
                tree.set_revision(id, None);
                debug!(path = %p.local_path, revision = revision_id, "rolled back");
                applied.push(p);
            }
            Err(e) => {
                warn!(path = %p.local_path, error = %e, "rollback write failed; skipping");
                failures.push(ItemFailure::new(p.local_path, e));
            }
        }
    }
    failures.sort_by(|a, b| a.path.cmp(&b.path));
    info!(
        revision = revision_id,
        rolled_back = applied.len(),
        failed = failures.len(),
        "rollback applied"
    );

    let commit = if !request.create_commit {
        CommitPhase::NotRequested
    } else if applied.is_empty() {
        CommitPhase::NothingRolledBack
    } else {
        let pending = PendingRollbackCommit {
            revision_id: revision_id.to_string(),
            message: request.commit_message(),
            paths: applied.clone(),
        };
        match submit(ctx, tree, &pending).await {
            Ok(revision_id) => CommitPhase::Committed { revision_id },
            Err(error) => {
                warn!(%error, "rollback commit failed; rollback stays applied");
                CommitPhase::Failed {
                    error: error.to_string(),
                    pending,
                }
            }
        }
    };

    Ok(RollbackOutcome {
        revision_id: revision_id.to_string(),
        rolled_back: applied.into_iter().map(|p| p.local_path).collect(),
        failures,
        commit,
    })
}
