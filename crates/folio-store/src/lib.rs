//! Tree store for Folio.
//!
//! Holds the document trees Folio works on and persists them through a
//! pluggable key-value backend.
//!
//! # Components
//!
//! - [`FileTree`] -- arena of file/folder nodes with parent links and a
//!   name-ordered child index; serializes as a flat [`folio_types::FileMap`]
//! - [`KeyValueStore`] -- the persistence collaborator (`get`/`set`/`delete`)
//! - [`InMemoryKvStore`] -- `HashMap` backend for tests and embedding
//! - [`FileKvStore`] -- one-file-per-key backend with atomic replace
//! - [`TreeStore`] -- typed JSON documents keyed by [`StoreKey`]
//!
//! # Design Rules
//!
//! 1. Single-key writes are atomic; there are no multi-key transactions.
//! 2. Documents are read and written whole.
//! 3. A missing document is seeded on first load and only destroyed by
//!    [`TreeStore::reset`].

pub mod error;
pub mod file;
pub mod kv;
pub mod memory;
pub mod tree;
pub mod tree_store;

pub use error::{StoreError, StoreResult};
pub use file::FileKvStore;
pub use kv::KeyValueStore;
pub use memory::InMemoryKvStore;
pub use tree::{FileTree, Node, NodeId};
pub use tree_store::{StoreKey, TreeStore};
