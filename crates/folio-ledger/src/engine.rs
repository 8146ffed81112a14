//! Local commits against the working tree head.

use chrono::Utc;
use tracing::info;

use folio_types::CommitId;

use crate::commit::{Commit, CommitRequest};
use crate::error::{LedgerError, LedgerResult};
use crate::state::RepositoryState;
use crate::working::WorkingTree;

/// Commit the staged set.
///
/// Each staged path's current file is copied onto head; a staged path with no
/// current file is removed from head. The committed paths leave the staged
/// set, the commit is prepended to the log and the ahead counter grows by one.
/// On any validation failure nothing is touched.
pub fn commit(
    state: &mut RepositoryState,
    working: &mut WorkingTree,
    request: CommitRequest,
) -> LedgerResult<Commit> {
    let message = request.message.trim();
    if message.is_empty() {
        return Err(LedgerError::Validation("commit message is empty".into()));
    }
    if working.staged.is_empty() {
        return Err(LedgerError::Validation("nothing staged to commit".into()));
    }

    let changed: Vec<String> = working.staged.iter().map(str::to_string).collect();
    for path in &changed {
        match working.current.entry(path) {
            Some(entry) if entry.is_file() => {
                working.head.insert(entry);
            }
            _ => {
                working.head.remove(path);
            }
        }
    }
    working.staged.remove_all(&changed);

    let commit = Commit {
        id: CommitId::new(),
        message: message.to_string(),
        description: request
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
        timestamp: Utc::now(),
        author: request.author,
        changed,
        files: working.head.clone(),
    };
    info!(
        commit = %commit.id,
        files = commit.changed.len(),
        branch = %state.current_branch,
        "committed"
    );
    state.record(commit.clone());
    Ok(commit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_diff::NormalizeOptions;
    use folio_types::FileMap;

    fn working_with(files: &[(&str, &str)]) -> WorkingTree {
        let mut working = WorkingTree::new();
        for (p, c) in files {
            working.current.write_file(p, c).unwrap();
        }
        working
    }

    #[test]
    fn stage_then_commit() {
        let mut state = RepositoryState::default();
        let mut working = working_with(&[("a.md", "# T")]);
        working.staged.stage("a.md");

        let commit = commit(&mut state, &mut working, CommitRequest::new("init")).unwrap();

        assert!(working.staged.is_empty());
        assert_eq!(state.commits.len(), 1);
        assert_eq!(state.commits[0].message, "init");
        assert_eq!(state.ahead_count, 1);
        let mut expected = FileMap::new();
        expected.insert_file("a.md", "# T");
        assert_eq!(working.head, expected);
        assert_eq!(commit.files, expected);
        assert!(working.status(&NormalizeOptions::default()).is_clean());
    }

    #[test]
    fn empty_staged_set_changes_nothing() {
        let mut state = RepositoryState::default();
        let mut working = working_with(&[("a.md", "A")]);
        let err = commit(&mut state, &mut working, CommitRequest::new("msg")).unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
        assert!(state.commits.is_empty());
        assert!(working.head.is_empty());
        assert_eq!(state.ahead_count, 0);
    }

    #[test]
    fn blank_message_is_rejected() {
        let mut state = RepositoryState::default();
        let mut working = working_with(&[("a.md", "A")]);
        working.staged.stage("a.md");
        let err = commit(&mut state, &mut working, CommitRequest::new("   ")).unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
        assert!(working.staged.contains("a.md"));
    }

    #[test]
    fn staged_deletion_removes_from_head() {
        let mut state = RepositoryState::default();
        let mut working = working_with(&[("a.md", "A"), ("b.md", "B")]);
        working.staged.stage("a.md");
        working.staged.stage("b.md");
        commit(&mut state, &mut working, CommitRequest::new("both")).unwrap();

        working.current.remove("a.md").unwrap();
        working.current.write_file("b.md", "B2").unwrap();
        working.staged.stage("a.md");
        let second = commit(&mut state, &mut working, CommitRequest::new("drop a")).unwrap();

        assert!(!working.head.contains("a.md"));
        // b.md was not staged, so head keeps the committed version.
        assert_eq!(working.head.content("b.md"), Some("B"));
        assert_eq!(second.changed, vec!["a.md"]);
        assert_eq!(state.log(1)[0].message, "drop a");
        assert_eq!(state.ahead_count, 2);
    }

    #[test]
    fn message_and_description_are_trimmed() {
        let mut state = RepositoryState::default();
        let mut working = working_with(&[("a.md", "A")]);
        working.staged.stage("a.md");
        let commit = commit(
            &mut state,
            &mut working,
            CommitRequest::new("  msg \n").with_description("  "),
        )
        .unwrap();
        assert_eq!(commit.message, "msg");
        assert_eq!(commit.description, None);
    }
}
