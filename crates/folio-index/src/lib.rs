//! Staging coordinator for Folio.
//!
//! Holds the set of paths selected for the next commit and splits change
//! lists by membership. Staging is permissive: any path may be staged,
//! whether or not it currently differs from head.
//!
//! # Key Types
//!
//! - [`StagedSet`] -- Ordered set of staged paths (persisted as a JSON array)
//! - [`WorkingStatus`] -- A change list split into staged and unstaged groups

pub mod staged;
pub mod status;

pub use staged::StagedSet;
pub use status::WorkingStatus;
