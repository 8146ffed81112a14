//! Typed persistence of areas on top of a [`KeyValueStore`].
//!
//! Every document is stored whole under one key as JSON; loading and saving
//! is a whole-document read-modify-write performed by a single caller.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::kv::KeyValueStore;

/// The documents Folio persists, one key each.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StoreKey {
    /// The authoritative document tree.
    Workspace,
    /// Current contents of the working tree.
    WorkingTree,
    /// Last-committed snapshot of the working tree.
    WorkingHead,
    /// Paths selected for the next commit.
    StagedSet,
    /// Remote paths selected for the next remote commit.
    RemoteStaged,
    /// Branch, ahead/behind counters and the commit log.
    RepositoryState,
    /// A rollback that was applied but whose commit has not gone through.
    PendingRollback,
}

impl StoreKey {
    pub const ALL: [StoreKey; 7] = [
        StoreKey::Workspace,
        StoreKey::WorkingTree,
        StoreKey::WorkingHead,
        StoreKey::StagedSet,
        StoreKey::RemoteStaged,
        StoreKey::RepositoryState,
        StoreKey::PendingRollback,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::Workspace => "workspace",
            StoreKey::WorkingTree => "working_tree",
            StoreKey::WorkingHead => "working_head",
            StoreKey::StagedSet => "staged_set",
            StoreKey::RemoteStaged => "remote_staged",
            StoreKey::RepositoryState => "repository_state",
            StoreKey::PendingRollback => "pending_rollback",
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON document persistence for Folio's areas and bookkeeping.
#[derive(Clone)]
pub struct TreeStore {
    kv: Arc<dyn KeyValueStore>,
}

impl fmt::Debug for TreeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeStore").finish_non_exhaustive()
    }
}

impl TreeStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Load and decode the document under `key`.
    pub fn load<T: DeserializeOwned>(&self, key: StoreKey) -> StoreResult<Option<T>> {
        let Some(raw) = self.kv.get(key.as_str())? else {
            return Ok(None);
        };
        let value = serde_json::from_str(&raw).map_err(|e| StoreError::Serialization {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Some(value))
    }

    /// Encode and store `value` under `key`.
    pub fn save<T: Serialize>(&self, key: StoreKey, value: &T) -> StoreResult<()> {
        let raw = serde_json::to_string(value).map_err(|e| StoreError::Serialization {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        self.kv.set(key.as_str(), &raw)?;
        debug!(%key, bytes = raw.len(), "saved document");
        Ok(())
    }

    /// Load the document under `key`, creating and persisting it from
    /// `seed` on first use.
    pub fn load_or_seed<T, F>(&self, key: StoreKey, seed: F) -> StoreResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> StoreResult<T>,
    {
        if let Some(value) = self.load(key)? {
            return Ok(value);
        }
        let value = seed()?;
        self.save(key, &value)?;
        info!(%key, "seeded document");
        Ok(value)
    }

    /// Remove a single document.
    pub fn clear(&self, key: StoreKey) -> StoreResult<bool> {
        self.kv.delete(key.as_str())
    }

    /// Destroy every document. The next load re-seeds.
    pub fn reset(&self) -> StoreResult<()> {
        for key in StoreKey::ALL {
            self.kv.delete(key.as_str())?;
        }
        info!("store reset");
        Ok(())
    }
}
