//! Tree search.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use folio_store::{FileTree, NodeId};
use folio_types::path;

use crate::glob::GlobSet;

/// `line` of a match against the file name rather than its content.
pub const FILE_NAME_LINE: usize = 0;

/// Maximum preview length in characters.
pub const PREVIEW_LIMIT: usize = 200;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    pub case_sensitive: bool,
    pub whole_word: bool,
    pub use_regex: bool,
    /// Comma-separated globs; empty includes every file.
    pub include_pattern: String,
    /// Comma-separated globs; matching folders are pruned whole.
    pub exclude_pattern: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchMatch {
    /// 1-based line, or [`FILE_NAME_LINE`] for a file name hit.
    pub line: usize,
    /// 1-based character column.
    pub column: usize,
    /// The matched text.
    pub text: String,
    pub preview: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub file: String,
    pub matches: Vec<SearchMatch>,
}

fn build_matcher(query: &str, options: &SearchOptions) -> Option<Regex> {
    let build = |pattern: &str| {
        let pattern = if options.whole_word {
            format!(r"\b(?:{pattern})\b")
        } else {
            pattern.to_string()
        };
        RegexBuilder::new(&pattern)
            .case_insensitive(!options.case_sensitive)
            .build()
    };

    let literal = regex::escape(query);
    if options.use_regex {
        match build(query) {
            Ok(re) => return Some(re),
            Err(e) => warn!(query, error = %e, "invalid search regex; matching literally"),
        }
    }
    build(&literal).ok()
}

fn preview(line: &str) -> String {
    line.trim().chars().take(PREVIEW_LIMIT).collect()
}

/// Non-empty matches of `re` in `line` as `(column, text)`.
fn find_all(re: &Regex, line: &str) -> Vec<(usize, String)> {
    let mut found = Vec::new();
    let mut at = 0;
    while at <= line.len() {
        let Some(m) = re.find_at(line, at) else {
            break;
        };
        if m.start() == m.end() {
            // Step past the empty match by one whole character.
            at = m.end() + line[m.end()..].chars().next().map_or(1, char::len_utf8);
            continue;
        }
        let column = line[..m.start()].chars().count() + 1;
        found.push((column, m.as_str().to_string()));
        at = m.end();
    }
    found
}

fn search_file(re: &Regex, file_path: &str, name: &str, content: &str) -> Vec<SearchMatch> {
    let mut matches = Vec::new();
    if let Some((column, text)) = find_all(re, name).into_iter().next() {
        matches.push(SearchMatch {
            line: FILE_NAME_LINE,
            column,
            text,
            preview: preview(name),
        });
    }
    for (idx, raw) in content.split('\n').enumerate() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        for (column, text) in find_all(re, line) {
            matches.push(SearchMatch {
                line: idx + 1,
                column,
                text,
                preview: preview(line),
            });
        }
    }
    debug!(file = file_path, matches = matches.len(), "searched file");
    matches
}

struct Walk<'a> {
    tree: &'a FileTree,
    re: Regex,
    include: GlobSet,
    exclude: GlobSet,
    results: Vec<SearchResult>,
}

impl Walk<'_> {
    fn visit(&mut self, id: NodeId, node_path: &str) {
        let tree = self.tree;
        let Some(node) = tree.node(id) else {
            return;
        };
        if !node_path.is_empty() && self.exclude.matches(node_path, node.name()) {
            return;
        }
        if node.is_file() {
            if !self.include.is_empty() && !self.include.matches(node_path, node.name()) {
                return;
            }
            let matches = search_file(&self.re, node_path, node.name(), node.content().unwrap_or(""));
            if !matches.is_empty() {
                self.results.push(SearchResult {
                    file: node_path.to_string(),
                    matches,
                });
            }
            return;
        }
        let children: Vec<(String, NodeId)> =
            node.children().map(|(name, child)| (path::join(node_path, name), child)).collect();
        for (child_path, child) in children {
            self.visit(child, &child_path);
        }
    }
}

/// Search every file in `tree` for `query`, results in path order.
///
/// An empty query finds nothing. Never fails.
pub fn search(tree: &FileTree, query: &str, options: &SearchOptions) -> Vec<SearchResult> {
    if query.is_empty() {
        return Vec::new();
    }
    let Some(re) = build_matcher(query, options) else {
        return Vec::new();
    };
    let mut walk = Walk {
        tree,
        re,
        include: GlobSet::parse(&options.include_pattern),
        exclude: GlobSet::parse(&options.exclude_pattern),
        results: Vec::new(),
    };
    walk.visit(tree.root(), "");
    walk.results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> FileTree {
        let mut tree = FileTree::new();
        tree.write_file("docs/intro.md", "Hello world\nhello again\r\n  say HELLO  ").unwrap();
        tree.write_file("docs/hello.txt", "nothing here").unwrap();
        tree.write_file("drafts/wip.md", "hello draft").unwrap();
        tree
    }

    fn opts() -> SearchOptions {
        SearchOptions::default()
    }

    #[test]
    fn case_insensitive_by_default() {
        let results = search(&tree(), "hello", &opts());
        let files: Vec<&str> = results.iter().map(|r| r.file.as_str()).collect();
        assert_eq!(files, vec!["docs/hello.txt", "docs/intro.md", "drafts/wip.md"]);

        let intro = &results[1];
        assert_eq!(intro.matches.len(), 3);
        assert_eq!(intro.matches[2].line, 3);
        assert_eq!(intro.matches[2].column, 7);
        assert_eq!(intro.matches[2].text, "HELLO");
        assert_eq!(intro.matches[2].preview, "say HELLO");
    }

    #[test]
    fn file_name_hit_uses_line_zero() {
        let results = search(&tree(), "hello", &opts());
        let by_name = &results[0];
        assert_eq!(by_name.matches.len(), 1);
        assert_eq!(by_name.matches[0].line, FILE_NAME_LINE);
        assert_eq!(by_name.matches[0].text, "hello");
    }

    #[test]
    fn case_sensitive_and_whole_word() {
        let options = SearchOptions {
            case_sensitive: true,
            ..opts()
        };
        let results = search(&tree(), "HELLO", &options);
        assert_eq!(results.len(), 1);

        let mut tree = FileTree::new();
        tree.write_file("a.md", "cat catalog cat").unwrap();
        let options = SearchOptions {
            whole_word: true,
            ..opts()
        };
        let results = search(&tree, "cat", &options);
        let columns: Vec<usize> = results[0].matches.iter().map(|m| m.column).collect();
        assert_eq!(columns, vec![1, 13]);
    }

    #[test]
    fn invalid_regex_falls_back_to_literal() {
        let mut tree = FileTree::new();
        tree.write_file("a.md", "f(x) = (").unwrap();
        let options = SearchOptions {
            use_regex: true,
            ..opts()
        };
        let results = search(&tree, "(", &options);
        assert_eq!(results[0].matches.len(), 2);
    }

    #[test]
    fn zero_width_matches_terminate() {
        let options = SearchOptions {
            use_regex: true,
            ..opts()
        };
        assert!(search(&tree(), "^", &options).is_empty());
        assert!(search(&tree(), "q*", &options).is_empty());
        let results = search(&tree(), "l*o", &options);
        assert!(!results.is_empty());
    }

    #[test]
    fn include_and_exclude() {
        let options = SearchOptions {
            include_pattern: "*.md".into(),
            exclude_pattern: "drafts".into(),
            ..opts()
        };
        let results = search(&tree(), "hello", &options);
        let files: Vec<&str> = results.iter().map(|r| r.file.as_str()).collect();
        assert_eq!(files, vec!["docs/intro.md"]);
    }

    #[test]
    fn empty_query_finds_nothing() {
        assert!(search(&tree(), "", &opts()).is_empty());
    }

    #[test]
    fn preview_is_truncated() {
        let mut tree = FileTree::new();
        let long = format!("needle {}", "x".repeat(500));
        tree.write_file("long.md", &long).unwrap();
        let results = search(&tree, "needle", &opts());
        assert_eq!(results[0].matches[0].preview.chars().count(), PREVIEW_LIMIT);
    }

    mod props {
        use super::super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn regex_search_never_panics(query in ".{0,12}") {
                let mut tree = FileTree::new();
                tree.write_file("a.md", "some (text) [with] *symbols* ?").unwrap();
                let options = SearchOptions { use_regex: true, ..SearchOptions::default() };
                let _ = search(&tree, &query, &options);
            }
        }
    }
}
