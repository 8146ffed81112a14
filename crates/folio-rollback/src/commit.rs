//! The follow-up commit of a rollback.

use std::collections::{BTreeMap, BTreeSet};

use futures::future::join_all;
use tracing::{info, warn};

use folio_remote::{FileChange, RemoteEntryKind, RemoteRepository};
use folio_store::FileTree;
use folio_types::path;

use crate::engine::RollbackContext;
use crate::error::{RollbackError, RollbackResult};
use crate::types::PendingRollbackCommit;

/// Revision ids of the files currently at the remote head in `dirs`.
async fn head_revisions(
    remote: &dyn RemoteRepository,
    dirs: BTreeSet<String>,
) -> RollbackResult<BTreeMap<String, Option<String>>> {
    let results = join_all(dirs.iter().map(|d| remote.list_directory(d))).await;
    let mut revisions = BTreeMap::new();
    for (dir, result) in dirs.iter().zip(results) {
        match result {
            Ok(entries) => {
                for entry in entries.into_iter().filter(|e| e.kind == RemoteEntryKind::File) {
                    revisions.insert(entry.path, entry.revision_id);
                }
            }
            // A folder missing at head holds nothing to update.
            Err(e) if e.status() == Some(404) => {}
            Err(e) => {
                return Err(RollbackError::CommitFailed(format!("cannot list {dir:?}: {e}")));
            }
        }
    }
    Ok(revisions)
}

/// Commit the current content of every path in `pending`.
///
/// Returns the new remote revision id.
pub(crate) async fn submit(
    ctx: &RollbackContext<'_>,
    tree: &FileTree,
    pending: &PendingRollbackCommit,
) -> RollbackResult<Option<String>> {
    let dirs: BTreeSet<String> = pending
        .paths
        .iter()
        .map(|p| path::parent(&p.remote_path).unwrap_or("").to_string())
        .collect();
    let at_head = head_revisions(ctx.remote, dirs).await?;

    let mut changes = Vec::new();
    for p in &pending.paths {
        let Some(content) = tree.content(&p.local_path) else {
            warn!(path = %p.local_path, "rolled back file no longer exists locally; leaving it out");
            continue;
        };
        let change = match at_head.get(&p.remote_path) {
            Some(base) => FileChange::update(p.remote_path.clone(), content, base.clone()),
            None => FileChange::create(p.remote_path.clone(), content),
        };
        changes.push(change);
    }
    if changes.is_empty() {
        return Err(RollbackError::CommitFailed(
            "none of the rolled back files exist locally".into(),
        ));
    }

    let outcome = ctx
        .remote
        .commit_multiple_files(&changes, &pending.message)
        .await
        .map_err(|e| RollbackError::CommitFailed(e.to_string()))?;
    if !outcome.success {
        return Err(RollbackError::CommitFailed(
            outcome.error.unwrap_or_else(|| "rejected by remote".into()),
        ));
    }
    info!(
        target_revision = %pending.revision_id,
        new_revision = outcome.new_revision_id.as_deref().unwrap_or("-"),
        files = changes.len(),
        "rollback committed"
    );
    Ok(outcome.new_revision_id)
}

/// Retry the follow-up commit of an applied rollback.
///
/// Content and remote base revisions are read afresh, so local edits made
/// since the rollback are included.
pub async fn retry_commit(
    ctx: &RollbackContext<'_>,
    tree: &FileTree,
    pending: &PendingRollbackCommit,
) -> RollbackResult<Option<String>> {
    submit(ctx, tree, pending).await
}
