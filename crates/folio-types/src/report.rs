//! Typed results for best-effort batch operations.
//!
//! Batch operations (multi-file fetches, recursive listings, rollbacks,
//! transfers) never abort on a single bad item. Instead they collect the
//! items that worked and the items that did not, each with its reason.

use serde::{Deserialize, Serialize};

/// A single item that failed inside a batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFailure {
    pub path: String,
    pub error: String,
}

impl ItemFailure {
    pub fn new(path: impl Into<String>, error: impl ToString) -> Self {
        Self {
            path: path.into(),
            error: error.to_string(),
        }
    }
}

/// Successes and per-item failures of a batch operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport<T> {
    pub succeeded: Vec<T>,
    pub failed: Vec<ItemFailure>,
}

impl<T> Default for BatchReport<T> {
    fn default() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }
}

impl<T> BatchReport<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ok(&mut self, item: T) {
        self.succeeded.push(item);
    }

    pub fn push_err(&mut self, path: impl Into<String>, error: impl ToString) {
        self.failed.push(ItemFailure::new(path, error));
    }

    /// Returns `true` if nothing failed.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Returns `true` if some items succeeded and some failed.
    pub fn is_partial(&self) -> bool {
        !self.succeeded.is_empty() && !self.failed.is_empty()
    }
}
