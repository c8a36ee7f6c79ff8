//! # JSON Three-Way Merge
//!
//! Structural diff, patch application and three-way merge for JSON documents.
//!
//! Given an ancestor document and two documents edited independently from it,
//! this library computes an RFC 6902 patch set for each side, applies every edit
//! the two sides do not fight over, and hands back the remaining conflicts for
//! resolution one at a time.
//!
//! ## Modules
//!
//! - [`value`] - In-memory representation of JSON documents
//! - [`pointer`] - RFC 6901 JSON Pointers as token sequences
//! - [`patch`] - Patch operations and patch sets with their JSON wire form
//! - [`diff`] - Computing the patch set between two documents
//! - [`apply`] - Strict and best-effort application, plus non-mutating probes
//! - [`conflict`] - Detecting colliding edits between two patch sets
//! - [`merge`] - Merge sessions and per-conflict resolution
//!
//! ## Example
//!
//! ```
//! use json_three_way_merge::{from_json, three_way_merge};
//!
//! let ancestor = from_json(r#"{"a":0,"b":0}"#).unwrap();
//! let left = from_json(r#"{"a":-1,"b":0}"#).unwrap();
//! let right = from_json(r#"{"a":0,"b":1}"#).unwrap();
//!
//! let merged = three_way_merge(&ancestor, &left, &right);
//! assert!(merged.conflicts.is_empty());
//! assert_eq!(merged.result, from_json(r#"{"a":-1,"b":1}"#).unwrap());
//! ```

pub mod apply;
pub mod conflict;
pub mod diff;
pub mod error;
pub mod merge;
pub mod patch;
pub mod pointer;
pub mod value;

#[cfg(test)]
mod strategies;

pub use apply::{apply, can_apply, Applied, ApplyError, ApplyMode, PatchError};
pub use conflict::{detect, Conflict, ConflictRule, Conflicts, Detection, Detector};
pub use diff::{diff, DiffSummary};
pub use error::{Error, Result};
pub use merge::{
    three_way_merge, Choice, ConflictId, ConflictState, MergeOptions, MergeResult, MergeSession, MergeSessionBuilder,
    Strategy,
};
pub use patch::{PatchOp, PatchSet};
pub use pointer::Pointer;
pub use value::{from_json, to_json, to_json_pretty, Map, Value};
