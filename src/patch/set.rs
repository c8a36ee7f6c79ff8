//! Ordered patch sets.

use super::op::PatchOp;
use crate::error::Result;
use crate::pointer::Pointer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// PatchSet is an ordered sequence of operations.
///
/// Order is significant: each operation sees the effects of the ones before it,
/// and array insertions and removals shift the addresses of later siblings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatchSet {
    ops: Vec<PatchOp>,
}

impl PatchSet {
    /// Creates an empty patch set.
    pub fn new() -> Self {
        PatchSet { ops: Vec::new() }
    }

    pub fn push(&mut self, op: PatchOp) {
        self.ops.push(op);
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PatchOp> {
        self.ops.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PatchOp> {
        self.ops.iter()
    }

    pub fn as_slice(&self) -> &[PatchOp] {
        &self.ops
    }

    pub fn into_vec(self) -> Vec<PatchOp> {
        self.ops
    }

    /// Returns the operations whose target path is exactly `path`, in order.
    pub fn filter_by_path(&self, path: &Pointer) -> PatchSet {
        self.ops.iter().filter(|op| op.path() == path).cloned().collect()
    }

    /// Parses a patch set from its RFC 6902 JSON array form.
    pub fn from_json(json: &str) -> Result<PatchSet> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl From<Vec<PatchOp>> for PatchSet {
    fn from(ops: Vec<PatchOp>) -> Self {
        PatchSet { ops }
    }
}

impl FromIterator<PatchOp> for PatchSet {
    fn from_iter<T: IntoIterator<Item = PatchOp>>(iter: T) -> Self {
        PatchSet {
            ops: iter.into_iter().collect(),
        }
    }
}

impl Extend<PatchOp> for PatchSet {
    fn extend<T: IntoIterator<Item = PatchOp>>(&mut self, iter: T) {
        self.ops.extend(iter);
    }
}

impl IntoIterator for PatchSet {
    type Item = PatchOp;
    type IntoIter = std::vec::IntoIter<PatchOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

impl<'a> IntoIterator for &'a PatchSet {
    type Item = &'a PatchOp;
    type IntoIter = std::slice::Iter<'a, PatchOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

impl fmt::Display for PatchSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, op) in self.ops.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", op)?;
        }
        Ok(())
    }
}
