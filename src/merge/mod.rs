//! Merge module - Three-way merge sessions and conflict resolution.
//!
//! A [`MergeSession`] owns the ancestor, both edited documents and the merge
//! target, and walks each conflict through resolve and commit.

mod options;
mod session;

#[cfg(test)]
mod merge_test;

pub use options::*;
pub use session::*;
