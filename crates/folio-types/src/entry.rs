//! File entries and flat file maps.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Whether an entry is a document or a folder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    File,
    Folder,
}

/// A single entry at a document path.
///
/// Only files carry content. `revision_id` records the remote revision the
/// content was last synchronized with, if any.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: String,
    pub kind: FileKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision_id: Option<String>,
}

impl FileEntry {
    /// Create a file entry with content.
    pub fn file(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: FileKind::File,
            content: Some(content.into()),
            revision_id: None,
        }
    }

    /// Create a folder entry.
    pub fn folder(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: FileKind::Folder,
            content: None,
            revision_id: None,
        }
    }

    /// Attach a remote revision id.
    pub fn with_revision(mut self, revision_id: impl Into<String>) -> Self {
        self.revision_id = Some(revision_id.into());
        self
    }

    pub fn is_file(&self) -> bool {
        self.kind == FileKind::File
    }

    pub fn is_folder(&self) -> bool {
        self.kind == FileKind::Folder
    }

    /// The file content; an empty file reads as `""`.
    pub fn text(&self) -> Result<&str, TypeError> {
        match self.kind {
            FileKind::File => Ok(self.content.as_deref().unwrap_or("")),
            FileKind::Folder => Err(TypeError::FolderContent(self.path.clone())),
        }
    }
}

/// A flat `path -> FileEntry` mapping.
///
/// Keys are canonical paths (see [`crate::path`]) and iteration is in
/// lexicographic path order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileMap {
    entries: BTreeMap<String, FileEntry>,
}

impl FileMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries, files and folders alike.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, path: &str) -> Option<&FileEntry> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Insert an entry keyed by its own path, returning any replaced entry.
    pub fn insert(&mut self, entry: FileEntry) -> Option<FileEntry> {
        self.entries.insert(entry.path.clone(), entry)
    }

    /// Convenience for inserting a file entry.
    pub fn insert_file(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.insert(FileEntry::file(path, content));
    }

    pub fn remove(&mut self, path: &str) -> Option<FileEntry> {
        self.entries.remove(path)
    }

    /// All entries in path order.
    pub fn iter(&self) -> impl Iterator<Item = &FileEntry> {
        self.entries.values()
    }

    /// File entries only, in path order.
    pub fn files(&self) -> impl Iterator<Item = &FileEntry> {
        self.entries.values().filter(|e| e.is_file())
    }

    /// Content of the file at `path`, if it exists and is a file.
    pub fn content(&self, path: &str) -> Option<&str> {
        self.entries
            .get(path)
            .filter(|e| e.is_file())
            .map(|e| e.content.as_deref().unwrap_or(""))
    }
}

impl FromIterator<FileEntry> for FileMap {
    fn from_iter<I: IntoIterator<Item = FileEntry>>(iter: I) -> Self {
        let mut map = FileMap::new();
        for entry in iter {
            map.insert(entry);
        }
        map
    }
}

impl IntoIterator for FileMap {
    type Item = FileEntry;
    type IntoIter = std::collections::btree_map::IntoValues<String, FileEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_has_no_text() {
        let folder = FileEntry::folder("docs");
        assert!(matches!(folder.text(), Err(TypeError::FolderContent(_))));
        assert_eq!(FileEntry::file("a.md", "x").text().unwrap(), "x");
    }

    #[test]
    fn files_skips_folders() {
        let map: FileMap = vec![
            FileEntry::folder("docs"),
            FileEntry::file("docs/a.md", "a"),
            FileEntry::file("b.md", "b"),
        ]
        .into_iter()
        .collect();

        let paths: Vec<&str> = map.files().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["b.md", "docs/a.md"]);
        assert_eq!(map.len(), 3);
        assert_eq!(map.content("docs"), None);
        assert_eq!(map.content("b.md"), Some("b"));
    }

    #[test]
    fn serializes_as_plain_map() {
        let mut map = FileMap::new();
        map.insert_file("a.md", "# T");
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json["a.md"]["kind"], "file");
        assert_eq!(json["a.md"]["content"], "# T");
        assert!(json["a.md"].get("revision_id").is_none());

        let back: FileMap = serde_json::from_value(json).unwrap();
        assert_eq!(back, map);
    }
}
