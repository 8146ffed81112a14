//! Comma-separated glob lists translated to anchored regular expressions.

use regex::Regex;
use tracing::warn;

/// Translate one glob to an anchored regex: `*` is any run, `?` any single
/// character, everything else literal.
pub fn glob_to_regex(glob: &str) -> String {
    let mut pattern = String::with_capacity(glob.len() + 2);
    pattern.push('^');
    for c in glob.chars() {
        match c {
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            other => pattern.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }
    pattern.push('$');
    pattern
}

/// A set of globs matched against a full path or its file name.
#[derive(Clone, Debug, Default)]
pub struct GlobSet {
    patterns: Vec<Regex>,
}

impl GlobSet {
    /// Parse a comma-separated list; blank entries are ignored.
    pub fn parse(list: &str) -> Self {
        let patterns = list
            .split(',')
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .filter_map(|g| match Regex::new(&glob_to_regex(g)) {
                Ok(re) => Some(re),
                Err(e) => {
                    warn!(glob = g, error = %e, "ignoring unusable glob");
                    None
                }
            })
            .collect();
        Self { patterns }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Returns `true` if any glob matches `path` or its last segment.
    pub fn matches(&self, path: &str, name: &str) -> bool {
        self.patterns
            .iter()
            .any(|re| re.is_match(path) || re.is_match(name))
    }
}
