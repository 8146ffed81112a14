//! Commit records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use folio_types::{CommitId, FileMap};

/// Who made a commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub email: String,
}

impl Author {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

impl Default for Author {
    fn default() -> Self {
        Self::new("Folio", "folio@localhost")
    }
}

impl std::fmt::Display for Author {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// An immutable entry in the local commit log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub id: CommitId,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub author: Author,
    /// Paths this commit consumed from the staged set.
    pub changed: Vec<String>,
    /// Head snapshot after the commit.
    pub files: FileMap,
}

/// Input to a local commit.
#[derive(Clone, Debug)]
pub struct CommitRequest {
    pub message: String,
    pub description: Option<String>,
    pub author: Author,
}

impl CommitRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            description: None,
            author: Author::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_author(mut self, author: Author) -> Self {
        self.author = author;
        self
    }
}
