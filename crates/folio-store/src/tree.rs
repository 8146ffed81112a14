//! Arena-backed document trees.
//!
//! A [`FileTree`] stores every file and folder as a [`Node`] in a slot
//! vector addressed by [`NodeId`]. Each node keeps a link to its parent and a
//! name-ordered index of its children, so lookups walk the path segment by
//! segment and subtree copies never deep-clone nested structures.
//!
//! # Invariants
//!
//! - Slot 0 is the root folder and is never removed.
//! - Only folders have children; only files have content.
//! - A node's key in its parent's child index equals its `name`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use folio_types::{path, FileEntry, FileKind, FileMap};

use crate::error::{StoreError, StoreResult};

/// Stable identifier of a node inside one [`FileTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A single file or folder.
#[derive(Clone, Debug)]
pub struct Node {
    name: String,
    kind: FileKind,
    content: Option<String>,
    revision_id: Option<String>,
    parent: Option<NodeId>,
    children: BTreeMap<String, NodeId>,
}

impl Node {
    fn new(name: &str, kind: FileKind, parent: Option<NodeId>) -> Self {
        Self {
            name: name.to_string(),
            kind,
            content: match kind {
                FileKind::File => Some(String::new()),
                FileKind::Folder => None,
            },
            revision_id: None,
            parent,
            children: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    pub fn is_file(&self) -> bool {
        self.kind == FileKind::File
    }

    pub fn is_folder(&self) -> bool {
        self.kind == FileKind::Folder
    }

    /// File content; `None` for folders.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn revision_id(&self) -> Option<&str> {
        self.revision_id.as_deref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in name order.
    pub fn children(&self) -> impl Iterator<Item = (&str, NodeId)> {
        self.children.iter().map(|(name, id)| (name.as_str(), *id))
    }

    pub fn child(&self, name: &str) -> Option<NodeId> {
        self.children.get(name).copied()
    }
}

/// An arena of file and folder nodes rooted at an unnamed folder.
///
/// Persisted as a flat [`FileMap`] (see the `serde` attributes).
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "FileMap", into = "FileMap")]
pub struct FileTree {
    slots: Vec<Option<Node>>,
    free: Vec<NodeId>,
}

impl fmt::Debug for FileTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileTree")
            .field("nodes", &self.len())
            .field("free_slots", &self.free.len())
            .finish()
    }
}

impl Default for FileTree {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for FileTree {
    fn eq(&self, other: &Self) -> bool {
        self.to_file_map() == other.to_file_map()
    }
}

impl Eq for FileTree {}

const ROOT: NodeId = NodeId(0);

impl FileTree {
    /// Create a tree holding only the root folder.
    pub fn new() -> Self {
        Self {
            slots: vec![Some(Node::new("", FileKind::Folder, None))],
            free: Vec::new(),
        }
    }

    /// Build a tree from a flat map, creating any folders the paths imply.
    pub fn from_file_map(map: &FileMap) -> StoreResult<Self> {
        let mut tree = Self::new();
        for entry in map.iter() {
            let id = match entry.kind {
                FileKind::Folder => tree.create_folder(&entry.path)?,
                FileKind::File => tree.write_file(&entry.path, entry.content.as_deref().unwrap_or(""))?,
            };
            tree.set_revision(id, entry.revision_id.clone());
        }
        Ok(tree)
    }

    pub fn root(&self) -> NodeId {
        ROOT
    }

    /// Number of nodes, excluding the root.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count() - 1
    }

    /// Returns `true` if the tree has nothing but its root.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.index()).and_then(|s| s.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots.get_mut(id.index()).and_then(|s| s.as_mut())
    }

    /// Find the node at a path by walking one segment at a time.
    ///
    /// The empty path resolves to the root.
    pub fn lookup(&self, path: &str) -> Option<NodeId> {
        let mut current = ROOT;
        for segment in path::segments(path) {
            current = self.node(current)?.child(segment)?;
        }
        Some(current)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.lookup(path).is_some()
    }

    /// Reconstruct the canonical path of a node.
    pub fn path_of(&self, id: NodeId) -> Option<String> {
        let mut names = Vec::new();
        let mut current = self.node(id)?;
        while let Some(parent) = current.parent {
            names.push(current.name.as_str());
            current = self.node(parent)?;
        }
        names.reverse();
        Some(names.join("/"))
    }

    /// Content of the file at `path`, if one exists.
    pub fn content(&self, path: &str) -> Option<&str> {
        self.lookup(path)
            .and_then(|id| self.node(id))
            .and_then(|n| n.content())
    }

    /// The entry at `path`, if any.
    pub fn entry(&self, path: &str) -> Option<FileEntry> {
        let id = self.lookup(path)?;
        if id == ROOT {
            return None;
        }
        let node = self.node(id)?;
        Some(FileEntry {
            path: path::normalize(path).ok()?,
            kind: node.kind,
            content: node.content.clone(),
            revision_id: node.revision_id.clone(),
        })
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.slots[id.index()] = Some(node);
                id
            }
            None => {
                self.slots.push(Some(node));
                NodeId((self.slots.len() - 1) as u32)
            }
        }
    }

    fn add_child(&mut self, parent: NodeId, name: &str, kind: FileKind) -> StoreResult<NodeId> {
        let id = self.alloc(Node::new(name, kind, Some(parent)));
        let parent_node = self
            .node_mut(parent)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        parent_node.children.insert(name.to_string(), id);
        Ok(id)
    }

    /// Create every missing folder along `dir`, returning the innermost one.
    ///
    /// Fails with [`StoreError::NotAFolder`] if a file blocks the chain.
    pub fn ensure_folder(&mut self, dir: &str) -> StoreResult<NodeId> {
        let dir = path::normalize_dir(dir)?;
        let mut current = ROOT;
        let mut walked = String::new();
        for segment in path::segments(&dir) {
            walked = path::join(&walked, segment);
            let existing = self.node(current).and_then(|n| n.child(segment));
            current = match existing {
                Some(id) if self.node(id).is_some_and(Node::is_folder) => id,
                Some(_) => return Err(StoreError::NotAFolder(walked)),
                None => self.add_child(current, segment, FileKind::Folder)?,
            };
        }
        Ok(current)
    }

    /// Create a folder (and its missing ancestors).
    pub fn create_folder(&mut self, folder: &str) -> StoreResult<NodeId> {
        let folder = path::normalize(folder)?;
        self.ensure_folder(&folder)
    }

    /// Overwrite the file at `path`, or create it along with its folder chain.
    ///
    /// The node's revision id is left untouched on overwrite.
    pub fn write_file(&mut self, file: &str, content: &str) -> StoreResult<NodeId> {
        let file = path::normalize(file)?;
        let parent = self.ensure_folder(path::parent(&file).unwrap_or(""))?;
        let name = path::file_name(&file);

        let id = match self.node(parent).and_then(|n| n.child(name)) {
            Some(id) => id,
            None => self.add_child(parent, name, FileKind::File)?,
        };
        let node = self
            .node_mut(id)
            .ok_or_else(|| StoreError::NotFound(file.clone()))?;
        if node.is_folder() {
            return Err(StoreError::NotAFile(file));
        }
        node.content = Some(content.to_string());
        Ok(id)
    }

    /// Record the remote revision a node was synchronized with.
    pub fn set_revision(&mut self, id: NodeId, revision_id: Option<String>) {
        if let Some(node) = self.node_mut(id) {
            if id != ROOT {
                node.revision_id = revision_id;
            }
        }
    }

    /// Remove the entry at `path` together with its whole subtree.
    ///
    /// Returns the number of nodes removed.
    pub fn remove(&mut self, target: &str) -> StoreResult<usize> {
        let target = path::normalize(target)?;
        let id = self
            .lookup(&target)
            .ok_or_else(|| StoreError::NotFound(target.clone()))?;
        Ok(self.detach(id))
    }

    fn detach(&mut self, id: NodeId) -> usize {
        if id == ROOT {
            return 0;
        }
        let link = self.node(id).map(|n| (n.parent, n.name.clone()));
        if let Some((Some(parent), name)) = link {
            if let Some(parent) = self.node_mut(parent) {
                parent.children.remove(&name);
            }
        }

        let mut removed = 0;
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.slots.get_mut(next.index()).and_then(Option::take) {
                stack.extend(node.children.values().copied());
                self.free.push(next);
                removed += 1;
            }
        }
        removed
    }

    /// Copy the subtree rooted at `src_id` in `src` under `dst_parent`,
    /// naming the copy `name`.
    ///
    /// An existing child with the same name is replaced. Revision ids travel
    /// with the copied nodes.
    pub fn copy_subtree(
        &mut self,
        src: &FileTree,
        src_id: NodeId,
        dst_parent: NodeId,
        name: &str,
    ) -> StoreResult<NodeId> {
        if !self.node(dst_parent).is_some_and(Node::is_folder) {
            return Err(StoreError::NotAFolder(
                self.path_of(dst_parent).unwrap_or_default(),
            ));
        }
        if let Some(existing) = self.node(dst_parent).and_then(|n| n.child(name)) {
            self.detach(existing);
        }

        let source = src
            .node(src_id)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        let top = self.add_child(dst_parent, name, source.kind)?;

        let mut pending = vec![(src_id, top)];
        while let Some((from, to)) = pending.pop() {
            let Some(source) = src.node(from) else {
                continue;
            };
            if let Some(node) = self.node_mut(to) {
                node.content = source.content.clone();
                node.revision_id = source.revision_id.clone();
            }
            for (child_name, child_id) in source.children() {
                let child_kind = match src.node(child_id) {
                    Some(child) => child.kind,
                    None => continue,
                };
                let copy = self.add_child(to, child_name, child_kind)?;
                pending.push((child_id, copy));
            }
        }
        Ok(top)
    }

    /// Paths of every file under `id` (inclusive), in path order.
    pub fn file_paths_under(&self, id: NodeId) -> Vec<String> {
        let mut out = Vec::new();
        let Some(base) = self.path_of(id) else {
            return out;
        };
        let mut stack = vec![(id, base)];
        while let Some((next, next_path)) = stack.pop() {
            let Some(node) = self.node(next) else {
                continue;
            };
            if node.is_file() {
                out.push(next_path);
                continue;
            }
            for (name, child) in node.children() {
                stack.push((child, path::join(&next_path, name)));
            }
        }
        out.sort();
        out
    }

    /// Flatten the tree into a [`FileMap`] containing files and folders.
    pub fn to_file_map(&self) -> FileMap {
        let mut map = FileMap::new();
        let mut stack: Vec<(NodeId, String)> = vec![(ROOT, String::new())];
        while let Some((id, node_path)) = stack.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };
            if id != ROOT {
                map.insert(FileEntry {
                    path: node_path.clone(),
                    kind: node.kind,
                    content: node.content.clone(),
                    revision_id: node.revision_id.clone(),
                });
            }
            for (name, child) in node.children() {
                stack.push((child, path::join(&node_path, name)));
            }
        }
        map
    }

    /// Flatten the tree into a [`FileMap`] holding only files.
    pub fn files(&self) -> FileMap {
        self.to_file_map().into_iter().filter(FileEntry::is_file).collect()
    }
}

impl TryFrom<FileMap> for FileTree {
    type Error = StoreError;

    fn try_from(map: FileMap) -> Result<Self, Self::Error> {
        FileTree::from_file_map(&map)
    }
}

impl From<FileTree> for FileMap {
    fn from(tree: FileTree) -> Self {
        tree.to_file_map()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FileTree {
        let mut tree = FileTree::new();
        tree.write_file("docs/guide/intro.md", "# Intro").unwrap();
        tree.write_file("docs/a.md", "A").unwrap();
        tree.write_file("top.md", "T").unwrap();
        tree
    }

    #[test]
    fn new_tree_is_empty() {
        let tree = FileTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.lookup(""), Some(tree.root()));
        assert!(tree.to_file_map().is_empty());
    }

    #[test]
    fn write_creates_folder_chain() {
        let tree = sample();
        assert_eq!(tree.len(), 5);
        let guide = tree.lookup("docs/guide").unwrap();
        assert!(tree.node(guide).unwrap().is_folder());
        assert_eq!(tree.content("docs/guide/intro.md"), Some("# Intro"));
        assert_eq!(tree.path_of(guide).unwrap(), "docs/guide");
    }

    #[test]
    fn write_overwrites_existing_file() {
        let mut tree = sample();
        let before = tree.lookup("docs/a.md").unwrap();
        let after = tree.write_file("docs/a.md", "changed").unwrap();
        assert_eq!(before, after);
        assert_eq!(tree.content("docs/a.md"), Some("changed"));
    }

    #[test]
    fn write_through_file_fails() {
        let mut tree = sample();
        let err = tree.write_file("top.md/nested.md", "x").unwrap_err();
        assert!(matches!(err, StoreError::NotAFolder(p) if p == "top.md"));
    }

    #[test]
    fn write_onto_folder_fails() {
        let mut tree = sample();
        let err = tree.write_file("docs", "x").unwrap_err();
        assert!(matches!(err, StoreError::NotAFile(_)));
    }

    #[test]
    fn remove_subtree_frees_slots() {
        let mut tree = sample();
        let removed = tree.remove("docs").unwrap();
        assert_eq!(removed, 4);
        assert!(!tree.contains("docs/a.md"));
        assert_eq!(tree.len(), 1);

        // Freed slots are reused.
        let slots = tree.slots.len();
        tree.write_file("new/b.md", "B").unwrap();
        assert_eq!(tree.slots.len(), slots);
    }

    #[test]
    fn remove_missing_is_not_found() {
        let mut tree = sample();
        assert!(matches!(tree.remove("nope.md"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn copy_subtree_between_trees() {
        let src = sample();
        let mut dst = FileTree::new();
        let docs = src.lookup("docs").unwrap();
        let root = dst.root();
        dst.copy_subtree(&src, docs, root, "docs (copy)").unwrap();

        assert_eq!(dst.content("docs (copy)/guide/intro.md"), Some("# Intro"));
        assert_eq!(dst.content("docs (copy)/a.md"), Some("A"));
        assert_eq!(
            dst.file_paths_under(dst.lookup("docs (copy)").unwrap()),
            vec!["docs (copy)/a.md", "docs (copy)/guide/intro.md"]
        );
    }

    #[test]
    fn copy_subtree_replaces_existing_child() {
        let src = sample();
        let mut dst = FileTree::new();
        dst.write_file("docs/old.md", "old").unwrap();
        let docs = src.lookup("docs").unwrap();
        let root = dst.root();
        dst.copy_subtree(&src, docs, root, "docs").unwrap();
        assert!(!dst.contains("docs/old.md"));
        assert!(dst.contains("docs/a.md"));
    }

    #[test]
    fn file_map_roundtrip_keeps_empty_folders_and_revisions() {
        let mut tree = sample();
        tree.create_folder("empty").unwrap();
        let id = tree.lookup("top.md").unwrap();
        tree.set_revision(id, Some("rev-1".into()));

        let map = tree.to_file_map();
        assert!(map.get("empty").unwrap().is_folder());
        assert_eq!(map.get("top.md").unwrap().revision_id.as_deref(), Some("rev-1"));

        let rebuilt = FileTree::from_file_map(&map).unwrap();
        assert_eq!(rebuilt, tree);
    }

    #[test]
    fn files_excludes_folders() {
        let tree = sample();
        let files = tree.files();
        assert_eq!(files.len(), 3);
        assert!(files.iter().all(FileEntry::is_file));
    }

    #[test]
    fn serde_uses_flat_map() {
        let tree = sample();
        let json = serde_json::to_string(&tree).unwrap();
        let back: FileTree = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tree);
    }
}
