//! Line-level diff of two document contents for display.
//!
//! Both sides are normalized first, so hunks never show line-ending or
//! trailing-whitespace noise that the change detection already ignores.

use serde::{Deserialize, Serialize};
use similar::{ChangeTag, TextDiff};

use crate::normalize::{normalize_with, NormalizeOptions};

/// Lines of unchanged context kept around each hunk.
pub const CONTEXT_LINES: usize = 3;

/// Line diff between two versions of a document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentDiff {
    pub hunks: Vec<Hunk>,
    pub old_lines: usize,
    pub new_lines: usize,
}

impl ContentDiff {
    /// Returns `true` if the normalized contents are identical.
    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    pub fn additions(&self) -> usize {
        self.count(|l| matches!(l, Line::Added(_)))
    }

    pub fn deletions(&self) -> usize {
        self.count(|l| matches!(l, Line::Removed(_)))
    }

    fn count(&self, pred: impl Fn(&Line) -> bool) -> usize {
        self.hunks.iter().flat_map(|h| &h.lines).filter(|l| pred(l)).count()
    }
}

/// A contiguous changed region with its context. Line numbers are 1-based.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hunk {
    pub old_start: usize,
    pub old_count: usize,
    pub new_start: usize,
    pub new_count: usize,
    pub lines: Vec<Line>,
}

impl Hunk {
    /// Unified-diff style header, e.g. `@@ -3,4 +3,5 @@`.
    pub fn header(&self) -> String {
        format!(
            "@@ -{},{} +{},{} @@",
            self.old_start, self.old_count, self.new_start, self.new_count
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum Line {
    Context(String),
    Added(String),
    Removed(String),
}

impl Line {
    pub fn text(&self) -> &str {
        match self {
            Line::Context(t) | Line::Added(t) | Line::Removed(t) => t,
        }
    }

    /// Unified-diff prefix character.
    pub fn marker(&self) -> char {
        match self {
            Line::Context(_) => ' ',
            Line::Added(_) => '+',
            Line::Removed(_) => '-',
        }
    }
}

/// Diff `old` against `new` with default normalization.
pub fn diff_contents(old: &str, new: &str) -> ContentDiff {
    diff_contents_with(old, new, &NormalizeOptions::default())
}

pub fn diff_contents_with(old: &str, new: &str, options: &NormalizeOptions) -> ContentDiff {
    let old = normalize_with(old, options);
    let new = normalize_with(new, options);
    let old_lines = old.lines().count();
    let new_lines = new.lines().count();

    if old == new {
        return ContentDiff {
            hunks: Vec::new(),
            old_lines,
            new_lines,
        };
    }

    let text_diff = TextDiff::from_lines(&old, &new);
    let mut hunks = Vec::new();

    for group in text_diff.grouped_ops(CONTEXT_LINES) {
        let Some(first) = group.first() else {
            continue;
        };
        let mut hunk = Hunk {
            old_start: first.old_range().start + 1,
            old_count: 0,
            new_start: first.new_range().start + 1,
            new_count: 0,
            lines: Vec::new(),
        };

        for op in &group {
            for change in text_diff.iter_changes(op) {
                let text = change.value().trim_end_matches('\n').to_string();
                match change.tag() {
                    ChangeTag::Equal => {
                        hunk.lines.push(Line::Context(text));
                        hunk.old_count += 1;
                        hunk.new_count += 1;
                    }
                    ChangeTag::Delete => {
                        hunk.lines.push(Line::Removed(text));
                        hunk.old_count += 1;
                    }
                    ChangeTag::Insert => {
                        hunk.lines.push(Line::Added(text));
                        hunk.new_count += 1;
                    }
                }
            }
        }
        hunks.push(hunk);
    }

    ContentDiff {
        hunks,
        old_lines,
        new_lines,
    }
}
