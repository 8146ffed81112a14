//! Working tree vs. head comparison over flat file maps.
//!
//! Only file entries take part; folders carry no content and are ignored.
//! The comparison is a single pass over both maps and never touches either.

use folio_types::FileMap;

use crate::change::{ChangeRecord, ChangeStatus};
use crate::normalize::{same_content, NormalizeOptions};

/// Compare `current` against `head` with nothing staged.
pub fn compare(head: &FileMap, current: &FileMap) -> Vec<ChangeRecord> {
    compare_with(head, current, |_| false, &NormalizeOptions::default())
}

/// Compare `current` against `head`.
///
/// - only in `current`: `Added` when staged, `Untracked` otherwise
/// - only in `head`: `Deleted`
/// - in both with differing normalized content: `Modified`
///
/// Records are sorted by path and carry `staged` from `is_staged`.
pub fn compare_with<F>(
    head: &FileMap,
    current: &FileMap,
    is_staged: F,
    options: &NormalizeOptions,
) -> Vec<ChangeRecord>
where
    F: Fn(&str) -> bool,
{
    let mut changes = Vec::new();

    for entry in head.files() {
        let path = entry.path.as_str();
        let old = entry.content.as_deref().unwrap_or("");
        match current.content(path) {
            Some(new) if same_content(old, new, options) => {}
            Some(_) => changes.push(ChangeRecord::new(path, ChangeStatus::Modified, is_staged(path))),
            None => changes.push(ChangeRecord::new(path, ChangeStatus::Deleted, is_staged(path))),
        }
    }

    for entry in current.files() {
        let path = entry.path.as_str();
        if head.content(path).is_none() {
            let staged = is_staged(path);
            let status = if staged {
                ChangeStatus::Added
            } else {
                ChangeStatus::Untracked
            };
            changes.push(ChangeRecord::new(path, status, staged));
        }
    }

    changes.sort_by(|a, b| a.path.cmp(&b.path));
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_types::FileEntry;

    fn map(files: &[(&str, &str)]) -> FileMap {
        files.iter().map(|(p, c)| FileEntry::file(*p, *c)).collect()
    }

    #[test]
    fn new_file_is_untracked() {
        let changes = compare(&FileMap::new(), &map(&[("a.md", "# T")]));
        assert_eq!(
            changes,
            vec![ChangeRecord::new("a.md", ChangeStatus::Untracked, false)]
        );
    }

    #[test]
    fn staged_new_file_is_added() {
        let changes = compare_with(
            &FileMap::new(),
            &map(&[("a.md", "# T")]),
            |p| p == "a.md",
            &NormalizeOptions::default(),
        );
        assert_eq!(changes, vec![ChangeRecord::new("a.md", ChangeStatus::Added, true)]);
    }

    #[test]
    fn line_ending_only_change_is_masked() {
        let changes = compare(&map(&[("a.md", "X")]), &map(&[("a.md", "X\r\n")]));
        assert!(changes.is_empty());
    }

    #[test]
    fn trailing_newline_change_visible_when_configured() {
        let keep = NormalizeOptions {
            strip_trailing_blank_lines: false,
        };
        let changes = compare_with(&map(&[("a.md", "X")]), &map(&[("a.md", "X\n")]), |_| false, &keep);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].status, ChangeStatus::Modified);
    }

    #[test]
    fn mixed_changes_sorted_by_path() {
        let head = map(&[("keep.md", "k"), ("mod.md", "old"), ("gone.md", "g")]);
        let current = map(&[("keep.md", "k  \n"), ("mod.md", "new"), ("b/new.md", "n")]);

        let changes = compare(&head, &current);
        let summary: Vec<(&str, ChangeStatus)> =
            changes.iter().map(|c| (c.path.as_str(), c.status)).collect();
        assert_eq!(
            summary,
            vec![
                ("b/new.md", ChangeStatus::Untracked),
                ("gone.md", ChangeStatus::Deleted),
                ("mod.md", ChangeStatus::Modified),
            ]
        );
    }

    #[test]
    fn folders_are_ignored() {
        let mut current = map(&[("docs/a.md", "A")]);
        current.insert(FileEntry::folder("docs"));
        let mut head = map(&[("docs/a.md", "A")]);
        head.insert(FileEntry::folder("empty"));
        assert!(compare(&head, &current).is_empty());
    }

    #[test]
    fn identical_maps_have_no_changes() {
        let files = map(&[("a.md", "A"), ("b.md", "B")]);
        assert!(compare(&files, &files).is_empty());
    }
}
