use std::sync::Arc;

use tracing::{info, warn};

use folio_diff::{compare_remote, diff_contents_with, ChangeRecord, ContentDiff, RemoteComparison};
use folio_index::{StagedSet, WorkingStatus};
use folio_ledger::{
    commit_remote, Commit, CommitRequest, RemoteCommitReport, RepositoryState, WorkingTree,
};
use folio_remote::RemoteRepository;
use folio_rollback::{
    CommitPhase, PendingRollbackCommit, RollbackContext, RollbackOutcome, RollbackPreview,
    RollbackRequest,
};
use folio_search::{SearchOptions, SearchResult};
use folio_store::{FileTree, InMemoryKvStore, KeyValueStore, StoreKey, TreeStore};
use folio_transfer::{ConflictStrategy, TransferReport};
use folio_types::{path, FileEntry, FileMap};

use crate::area::Area;
use crate::config::FolioConfig;
use crate::error::{SdkError, SdkResult};
use crate::events::{EventBus, EventFilter, EventStream, RepoEvent};

/// A Folio repository: the Workspace, the working tree with its history,
/// and an optional remote.
///
/// Local commits consume the working tree's staged set. Remote commits push
/// Workspace content and consume a separate remote staged set keyed by remote
/// path.
///
/// Every mutating call writes the documents it touched back to the store.
/// Mutators take `&mut self`; share a `Folio` across threads behind a lock.
pub struct Folio {
    store: TreeStore,
    config: FolioConfig,
    remote: Option<Arc<dyn RemoteRepository>>,
    events: EventBus,
    workspace: FileTree,
    working: WorkingTree,
    remote_staged: StagedSet,
    state: RepositoryState,
    pending_rollback: Option<PendingRollbackCommit>,
}

impl std::fmt::Debug for Folio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Folio")
            .field("branch", &self.state.current_branch)
            .field("commits", &self.state.commits.len())
            .field("staged", &self.working.staged.len())
            .field("remote_staged", &self.remote_staged.len())
            .field("remote", &self.remote.is_some())
            .finish()
    }
}

struct Loaded {
    workspace: FileTree,
    working: WorkingTree,
    remote_staged: StagedSet,
    state: RepositoryState,
    pending_rollback: Option<PendingRollbackCommit>,
}

fn load(store: &TreeStore, config: &FolioConfig) -> SdkResult<Loaded> {
    let workspace = store.load_or_seed(StoreKey::Workspace, || {
        let mut tree = FileTree::new();
        tree.write_file(&config.seed.path, &config.seed.content)?;
        Ok(tree)
    })?;
    let current = store.load_or_seed(StoreKey::WorkingTree, || Ok(FileTree::new()))?;
    let head = store.load_or_seed(StoreKey::WorkingHead, || Ok(FileMap::new()))?;
    let staged = store.load_or_seed(StoreKey::StagedSet, || Ok(StagedSet::new()))?;
    let remote_staged = store.load_or_seed(StoreKey::RemoteStaged, || Ok(StagedSet::new()))?;
    let state = store.load_or_seed(StoreKey::RepositoryState, || {
        Ok(RepositoryState::new(config.default_branch.clone()))
    })?;
    let pending_rollback = store.load(StoreKey::PendingRollback)?;
    Ok(Loaded {
        workspace,
        working: WorkingTree::from_parts(current, head, staged),
        remote_staged,
        state,
        pending_rollback,
    })
}

impl Folio {
    /// Open a repository over `kv`, seeding any missing document.
    pub fn open(kv: Arc<dyn KeyValueStore>, config: FolioConfig) -> SdkResult<Self> {
        let config = config.validated()?;
        let store = TreeStore::new(kv);
        let loaded = load(&store, &config)?;
        info!(
            branch = %loaded.state.current_branch,
            commits = loaded.state.commits.len(),
            "repository opened"
        );
        Ok(Self {
            events: EventBus::new(config.event_capacity),
            store,
            config,
            remote: None,
            workspace: loaded.workspace,
            working: loaded.working,
            remote_staged: loaded.remote_staged,
            state: loaded.state,
            pending_rollback: loaded.pending_rollback,
        })
    }

    /// Open a throwaway repository backed by memory.
    pub fn in_memory(config: FolioConfig) -> SdkResult<Self> {
        Self::open(Arc::new(InMemoryKvStore::new()), config)
    }

    pub fn with_remote(mut self, remote: Arc<dyn RemoteRepository>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn set_remote(&mut self, remote: Option<Arc<dyn RemoteRepository>>) {
        self.remote = remote;
    }

    pub fn config(&self) -> &FolioConfig {
        &self.config
    }

    pub fn subscribe(&self, filter: EventFilter) -> EventStream {
        self.events.subscribe(filter)
    }

    // ---- Areas ----

    pub fn tree(&self, area: Area) -> &FileTree {
        match area {
            Area::Workspace => &self.workspace,
            Area::WorkingTree => &self.working.current,
        }
    }

    fn tree_mut(&mut self, area: Area) -> &mut FileTree {
        match area {
            Area::Workspace => &mut self.workspace,
            Area::WorkingTree => &mut self.working.current,
        }
    }

    fn persist_area(&self, area: Area) -> SdkResult<()> {
        match area {
            Area::Workspace => self.store.save(StoreKey::Workspace, &self.workspace)?,
            Area::WorkingTree => self.store.save(StoreKey::WorkingTree, &self.working.current)?,
        }
        Ok(())
    }

    fn persist_staged(&self) -> SdkResult<()> {
        self.store.save(StoreKey::StagedSet, &self.working.staged)?;
        Ok(())
    }

    fn persist_remote_staged(&self) -> SdkResult<()> {
        self.store.save(StoreKey::RemoteStaged, &self.remote_staged)?;
        Ok(())
    }

    fn persist_pending(&self) -> SdkResult<()> {
        match &self.pending_rollback {
            Some(pending) => self.store.save(StoreKey::PendingRollback, pending)?,
            None => {
                self.store.clear(StoreKey::PendingRollback)?;
            }
        }
        Ok(())
    }

    pub fn workspace(&self) -> &FileTree {
        &self.workspace
    }

    pub fn working_tree(&self) -> &WorkingTree {
        &self.working
    }

    pub fn state(&self) -> &RepositoryState {
        &self.state
    }

    pub fn staged(&self) -> &StagedSet {
        &self.working.staged
    }

    pub fn read_file(&self, area: Area, file: &str) -> SdkResult<String> {
        let file = path::normalize(file).map_err(|e| SdkError::Validation(e.to_string()))?;
        self.tree(area)
            .content(&file)
            .map(str::to_string)
            .ok_or(SdkError::NotFound(file))
    }

    pub fn write_file(&mut self, area: Area, file: &str, content: &str) -> SdkResult<()> {
        self.tree_mut(area).write_file(file, content)?;
        self.persist_area(area)
    }

    pub fn create_folder(&mut self, area: Area, folder: &str) -> SdkResult<()> {
        self.tree_mut(area).create_folder(folder)?;
        self.persist_area(area)
    }

    /// Remove a file or a whole folder, returning how many entries went.
    pub fn remove(&mut self, area: Area, target: &str) -> SdkResult<usize> {
        let removed = self.tree_mut(area).remove(target)?;
        self.persist_area(area)?;
        Ok(removed)
    }

    /// Direct children of `dir` (`""` for the root), in name order.
    pub fn list(&self, area: Area, dir: &str) -> SdkResult<Vec<FileEntry>> {
        let dir = path::normalize_dir(dir).map_err(|e| SdkError::Validation(e.to_string()))?;
        let tree = self.tree(area);
        let node = tree
            .lookup(&dir)
            .and_then(|id| tree.node(id))
            .ok_or_else(|| SdkError::NotFound(dir.clone()))?;
        if node.is_file() {
            return Ok(tree.entry(&dir).into_iter().collect());
        }
        Ok(node
            .children()
            .filter_map(|(name, _)| tree.entry(&path::join(&dir, name)))
            .collect())
    }

    // ---- Status and staging ----

    pub fn changes(&self) -> Vec<ChangeRecord> {
        self.working.changes(&self.config.normalize)
    }

    pub fn status(&self) -> WorkingStatus {
        self.working.status(&self.config.normalize)
    }

    /// Stage `file`. Unknown paths are accepted.
    pub fn stage(&mut self, file: &str) -> SdkResult<bool> {
        let file = path::normalize(file).map_err(|e| SdkError::Validation(e.to_string()))?;
        let added = self.working.staged.stage(file.clone());
        self.persist_staged()?;
        self.events.emit(RepoEvent::Staged { paths: vec![file] });
        Ok(added)
    }

    pub fn unstage(&mut self, file: &str) -> SdkResult<bool> {
        let file = path::normalize(file).map_err(|e| SdkError::Validation(e.to_string()))?;
        let removed = self.working.staged.unstage(&file);
        self.persist_staged()?;
        self.events.emit(RepoEvent::Unstaged { paths: vec![file] });
        Ok(removed)
    }

    /// Stage every current change.
    pub fn stage_all(&mut self) -> SdkResult<usize> {
        let changes = self.changes();
        self.working.staged.stage_all(&changes);
        self.persist_staged()?;
        self.events.emit(RepoEvent::Staged {
            paths: changes.into_iter().map(|c| c.path).collect(),
        });
        Ok(self.working.staged.len())
    }

    pub fn unstage_all(&mut self) -> SdkResult<usize> {
        let paths: Vec<String> = self.working.staged.iter().map(str::to_string).collect();
        let dropped = self.working.staged.unstage_all();
        self.persist_staged()?;
        self.events.emit(RepoEvent::Unstaged { paths });
        Ok(dropped)
    }

    // ---- Commits ----

    pub fn commit(&mut self, message: &str, description: Option<&str>) -> SdkResult<Commit> {
        let mut request = CommitRequest::new(message).with_author(self.config.author.clone());
        if let Some(description) = description {
            request = request.with_description(description);
        }
        let commit = folio_ledger::commit(&mut self.state, &mut self.working, request)?;

        self.store.save(StoreKey::WorkingHead, &self.working.head)?;
        self.persist_staged()?;
        self.store.save(StoreKey::RepositoryState, &self.state)?;
        self.events.emit(RepoEvent::Committed {
            id: commit.id,
            message: commit.message.clone(),
            files: commit.changed.len(),
        });
        Ok(commit)
    }

    /// Up to `limit` commits, newest first.
    pub fn log(&self, limit: usize) -> &[Commit] {
        self.state.log(limit)
    }

    /// Line diff of `file` between head and the working tree.
    pub fn file_diff(&self, file: &str) -> SdkResult<ContentDiff> {
        let file = path::normalize(file).map_err(|e| SdkError::Validation(e.to_string()))?;
        let old = self.working.head.content(&file);
        let new = self.working.current.content(&file);
        if old.is_none() && new.is_none() {
            return Err(SdkError::NotFound(file));
        }
        Ok(diff_contents_with(
            old.unwrap_or(""),
            new.unwrap_or(""),
            &self.config.normalize,
        ))
    }

    // ---- Transfer and search ----

    pub fn move_to_working_tree(
        &mut self,
        paths: &[String],
        strategy: ConflictStrategy,
    ) -> SdkResult<TransferReport> {
        let report = folio_transfer::move_to_working_tree(
            &self.workspace,
            &mut self.working.current,
            paths,
            strategy,
        );
        self.persist_area(Area::WorkingTree)?;
        self.events.emit(RepoEvent::Transferred {
            from: Area::Workspace,
            to: Area::WorkingTree,
            count: report.transferred.len(),
        });
        Ok(report)
    }

    pub fn move_to_workspace(&mut self, paths: &[String]) -> SdkResult<TransferReport> {
        let report =
            folio_transfer::move_to_workspace(&self.working.current, &mut self.workspace, paths);
        self.persist_area(Area::Workspace)?;
        self.events.emit(RepoEvent::Transferred {
            from: Area::WorkingTree,
            to: Area::Workspace,
            count: report.transferred.len(),
        });
        Ok(report)
    }

    pub fn search(&self, area: Area, query: &str, options: &SearchOptions) -> Vec<SearchResult> {
        folio_search::search(self.tree(area), query, options)
    }

    // ---- Remote ----

    pub fn remote_staged(&self) -> &StagedSet {
        &self.remote_staged
    }

    /// Stage a remote path (remote root included) for the next remote commit.
    pub fn stage_remote(&mut self, remote_path: &str) -> SdkResult<bool> {
        let remote_path =
            path::normalize(remote_path).map_err(|e| SdkError::Validation(e.to_string()))?;
        let added = self.remote_staged.stage(remote_path.clone());
        self.persist_remote_staged()?;
        self.events.emit(RepoEvent::Staged {
            paths: vec![remote_path],
        });
        Ok(added)
    }

    pub fn unstage_remote(&mut self, remote_path: &str) -> SdkResult<bool> {
        let remote_path =
            path::normalize(remote_path).map_err(|e| SdkError::Validation(e.to_string()))?;
        let removed = self.remote_staged.unstage(&remote_path);
        self.persist_remote_staged()?;
        self.events.emit(RepoEvent::Unstaged {
            paths: vec![remote_path],
        });
        Ok(removed)
    }

    fn remote(&self) -> SdkResult<Arc<dyn RemoteRepository>> {
        self.remote
            .clone()
            .ok_or_else(|| SdkError::Validation("missing repository context".into()))
    }

    /// Compare the Workspace with the remote tree under the configured root.
    pub async fn compare_remote(&self) -> SdkResult<RemoteComparison> {
        let remote = self.remote()?;
        let comparison = compare_remote(
            remote.as_ref(),
            &self.config.remote_root,
            &self.workspace.files(),
            |p| self.remote_staged.contains(p),
            &self.config.normalize,
        )
        .await?;
        Ok(comparison)
    }

    /// Commit the staged remote differences of the Workspace.
    pub async fn commit_remote(&mut self, message: &str) -> SdkResult<RemoteCommitReport> {
        let remote = self.remote()?;
        let comparison = self.compare_remote().await?;
        if !comparison.is_complete() {
            warn!(
                unreadable = comparison.failures.len(),
                "remote comparison incomplete; committing what was readable"
            );
        }
        let report = commit_remote(
            Some(remote.as_ref()),
            &comparison.files,
            &self.workspace.files(),
            &mut self.remote_staged,
            message,
        )
        .await?;
        self.persist_remote_staged()?;
        self.events.emit(RepoEvent::RemoteCommitted {
            revision_id: report.new_revision_id.clone(),
            paths: report.committed.clone(),
        });
        Ok(report)
    }

    pub async fn preview_rollback(
        &self,
        revision_id: &str,
        paths: Option<&[String]>,
    ) -> SdkResult<RollbackPreview> {
        let remote = self.remote()?;
        let ctx = RollbackContext::new(remote.as_ref(), &self.config.normalize)
            .with_root(&self.config.remote_root);
        Ok(folio_rollback::preview(&ctx, &self.workspace, revision_id, paths).await?)
    }

    /// Roll the Workspace back to a remote revision.
    ///
    /// A failed follow-up commit is kept as the pending rollback commit and
    /// survives a reopen; see [`Folio::retry_rollback_commit`].
    pub async fn rollback(&mut self, request: &RollbackRequest) -> SdkResult<RollbackOutcome> {
        let remote = self.remote()?;
        let ctx = RollbackContext::new(remote.as_ref(), &self.config.normalize)
            .with_root(&self.config.remote_root);
        let outcome = folio_rollback::rollback(&ctx, &mut self.workspace, request).await?;

        self.persist_area(Area::Workspace)?;
        self.events.emit(RepoEvent::RolledBack {
            revision_id: outcome.revision_id.clone(),
            paths: outcome.rolled_back.clone(),
        });

        match &outcome.commit {
            CommitPhase::Failed { error, pending } => {
                self.pending_rollback = Some(pending.clone());
                self.events.emit(RepoEvent::RollbackCommitFailed {
                    revision_id: pending.revision_id.clone(),
                    error: error.clone(),
                });
            }
            CommitPhase::Committed { revision_id } => {
                self.pending_rollback = None;
                self.events.emit(RepoEvent::RemoteCommitted {
                    revision_id: revision_id.clone(),
                    paths: outcome.rolled_back.clone(),
                });
            }
            CommitPhase::NotRequested | CommitPhase::NothingRolledBack => {}
        }
        self.persist_pending()?;
        Ok(outcome)
    }

    pub fn pending_rollback_commit(&self) -> Option<&PendingRollbackCommit> {
        self.pending_rollback.as_ref()
    }

    /// Try the pending rollback commit again. On success it is cleared.
    pub async fn retry_rollback_commit(&mut self) -> SdkResult<Option<String>> {
        let pending = self
            .pending_rollback
            .clone()
            .ok_or_else(|| SdkError::NotFound("no pending rollback commit".into()))?;
        let remote = self.remote()?;
        let ctx = RollbackContext::new(remote.as_ref(), &self.config.normalize)
            .with_root(&self.config.remote_root);

        match folio_rollback::retry_commit(&ctx, &self.workspace, &pending).await {
            Ok(revision_id) => {
                self.pending_rollback = None;
                self.persist_pending()?;
                self.events.emit(RepoEvent::RemoteCommitted {
                    revision_id: revision_id.clone(),
                    paths: pending.paths.into_iter().map(|p| p.local_path).collect(),
                });
                Ok(revision_id)
            }
            Err(e) => {
                self.events.emit(RepoEvent::RollbackCommitFailed {
                    revision_id: pending.revision_id,
                    error: e.to_string(),
                });
                Err(e.into())
            }
        }
    }

    /// Drop the pending rollback commit; local content stays rolled back.
    pub fn abort_rollback_commit(&mut self) -> SdkResult<Option<PendingRollbackCommit>> {
        let dropped = self.pending_rollback.take();
        self.persist_pending()?;
        if let Some(pending) = &dropped {
            info!(revision = %pending.revision_id, "pending rollback commit aborted");
        }
        Ok(dropped)
    }

    /// Destroy every stored document and start over from the seeds.
    pub fn reset(&mut self) -> SdkResult<()> {
        self.store.reset()?;
        let loaded = load(&self.store, &self.config)?;
        self.workspace = loaded.workspace;
        self.working = loaded.working;
        self.remote_staged = loaded.remote_staged;
        self.state = loaded.state;
        self.pending_rollback = loaded.pending_rollback;
        self.events.emit(RepoEvent::Reset);
        Ok(())
    }
}
