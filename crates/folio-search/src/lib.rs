//! Recursive search for Folio.
//!
//! Walks a document tree and reports content-line and file name matches.
//! Search never fails: malformed patterns fall back to literal matching.
//!
//! # Key Types
//!
//! - [`SearchOptions`] -- Case, whole word, regex and include/exclude globs
//! - [`SearchResult`] / [`SearchMatch`] -- Matches per file

pub mod glob;
pub mod search;

pub use glob::GlobSet;
pub use search::{search, SearchMatch, SearchOptions, SearchResult, FILE_NAME_LINE, PREVIEW_LIMIT};
