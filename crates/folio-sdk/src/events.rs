//! Typed repository events.
//!
//! Every state-changing facade call emits a [`RepoEvent`]. Subscribers get a
//! broadcast receiver that only sees the kinds their [`EventFilter`] asks
//! for.

use std::fmt;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

use folio_types::CommitId;

use crate::area::Area;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Staged,
    Unstaged,
    Committed,
    RemoteCommitted,
    RolledBack,
    RollbackCommitFailed,
    Transferred,
    Reset,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EventKind::Staged => "staged",
            EventKind::Unstaged => "unstaged",
            EventKind::Committed => "committed",
            EventKind::RemoteCommitted => "remote_committed",
            EventKind::RolledBack => "rolled_back",
            EventKind::RollbackCommitFailed => "rollback_commit_failed",
            EventKind::Transferred => "transferred",
            EventKind::Reset => "reset",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepoEvent {
    Staged {
        paths: Vec<String>,
    },
    Unstaged {
        paths: Vec<String>,
    },
    Committed {
        id: CommitId,
        message: String,
        files: usize,
    },
    RemoteCommitted {
        revision_id: Option<String>,
        paths: Vec<String>,
    },
    RolledBack {
        revision_id: String,
        paths: Vec<String>,
    },
    RollbackCommitFailed {
        revision_id: String,
        error: String,
    },
    Transferred {
        from: Area,
        to: Area,
        count: usize,
    },
    Reset,
}

impl RepoEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            RepoEvent::Staged { .. } => EventKind::Staged,
            RepoEvent::Unstaged { .. } => EventKind::Unstaged,
            RepoEvent::Committed { .. } => EventKind::Committed,
            RepoEvent::RemoteCommitted { .. } => EventKind::RemoteCommitted,
            RepoEvent::RolledBack { .. } => EventKind::RolledBack,
            RepoEvent::RollbackCommitFailed { .. } => EventKind::RollbackCommitFailed,
            RepoEvent::Transferred { .. } => EventKind::Transferred,
            RepoEvent::Reset => EventKind::Reset,
        }
    }
}

/// Which events a subscriber receives. The default passes everything.
#[derive(Clone, Debug, Default)]
pub struct EventFilter {
    pub kinds: Option<Vec<EventKind>>,
}

impl EventFilter {
    pub fn kinds(kinds: impl IntoIterator<Item = EventKind>) -> Self {
        Self {
            kinds: Some(kinds.into_iter().collect()),
        }
    }

    pub fn matches(&self, event: &RepoEvent) -> bool {
        match &self.kinds {
            Some(kinds) => kinds.contains(&event.kind()),
            None => true,
        }
    }
}

pub type EventStream = broadcast::Receiver<RepoEvent>;

struct Subscriber {
    filter: EventFilter,
    sender: broadcast::Sender<RepoEvent>,
}

/// Fan-out of repository events to filtered subscribers.
pub struct EventBus {
    subscribers: RwLock<Vec<Subscriber>>,
    capacity: usize,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn subscribe(&self, filter: EventFilter) -> EventStream {
        let (tx, rx) = broadcast::channel(self.capacity);
        self.subscribers
            .write()
            .expect("event bus lock poisoned")
            .push(Subscriber { filter, sender: tx });
        rx
    }

    /// Deliver `event` to matching subscribers, dropping closed ones.
    pub fn emit(&self, event: RepoEvent) {
        let mut subs = self.subscribers.write().expect("event bus lock poisoned");
        subs.retain(|sub| {
            if sub.filter.matches(&event) {
                sub.sender.send(event.clone()).is_ok()
            } else {
                sub.sender.receiver_count() > 0
            }
        });
        debug!(kind = %event.kind(), subscribers = subs.len(), "event emitted");
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .expect("event bus lock poisoned")
            .len()
    }
}
