//! Content normalization applied before every equality check.
//!
//! Line endings are unified to `\n`, trailing whitespace is stripped from
//! each line, and (by default) trailing blank lines are dropped. Two
//! documents that differ only in those respects compare equal.

use serde::{Deserialize, Serialize};

/// Knobs for [`normalize_with`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeOptions {
    /// Drop blank lines at the end of the document. Turning this off makes
    /// a trailing-newline-only edit show up as a modification.
    pub strip_trailing_blank_lines: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            strip_trailing_blank_lines: true,
        }
    }
}

/// Normalize with the default options.
pub fn normalize(content: &str) -> String {
    normalize_with(content, &NormalizeOptions::default())
}

/// Normalize `content` according to `options`.
pub fn normalize_with(content: &str, options: &NormalizeOptions) -> String {
    let unified = content.replace("\r\n", "\n").replace('\r', "\n");
    let mut lines: Vec<&str> = unified.split('\n').map(str::trim_end).collect();
    if options.strip_trailing_blank_lines {
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
    }
    lines.join("\n")
}

/// Compare two documents after normalization.
pub fn same_content(a: &str, b: &str, options: &NormalizeOptions) -> bool {
    a == b || normalize_with(a, options) == normalize_with(b, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn unifies_line_endings_and_trailing_blank_lines() {
        assert_eq!(normalize("a\r\nb\n\n\n"), normalize("a\nb"));
        assert_eq!(normalize("a\rb"), "a\nb");
    }

    #[test]
    fn strips_trailing_whitespace_per_line() {
        assert_eq!(normalize("a  \nb\t\n"), "a\nb");
        // Leading whitespace is content.
        assert_ne!(normalize("  a"), normalize("a"));
    }

    #[test]
    fn blank_document() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("\n\n \n"), "");
    }

    #[test]
    fn keeping_trailing_blank_lines() {
        let keep = NormalizeOptions {
            strip_trailing_blank_lines: false,
        };
        assert!(!same_content("X", "X\n", &keep));
        assert!(same_content("X\r\n", "X\n", &keep));
        assert!(same_content("X", "X\n", &NormalizeOptions::default()));
    }

    #[test]
    fn interior_blank_lines_are_kept() {
        assert_eq!(normalize("a\n\n\nb"), "a\n\n\nb");
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(s in "[a-c \t\r\n]{0,40}") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once.clone());

            let keep = NormalizeOptions { strip_trailing_blank_lines: false };
            let once = normalize_with(&s, &keep);
            prop_assert_eq!(normalize_with(&once, &keep), once);
        }

        #[test]
        fn trailing_noise_never_matters(s in "[a-c\n]{0,20}", pad in "[ \t]{0,3}", blanks in 0usize..4) {
            let noisy = format!("{}{}{}", s.replace('\n', "\r\n"), pad, "\n".repeat(blanks));
            prop_assert!(same_content(&s, &noisy, &NormalizeOptions::default()));
        }
    }
}
