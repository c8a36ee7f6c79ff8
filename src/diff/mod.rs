//! Diff module - Computes the patch set between two documents.

mod differ;
mod summary;

pub use differ::*;
pub use summary::*;
