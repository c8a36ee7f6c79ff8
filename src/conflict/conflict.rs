//! Conflict types.

use crate::patch::PatchSet;
use crate::pointer::Pointer;
use serde::Serialize;
use std::fmt;

/// Conflict represents two competing edit groups touching the same location.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    /// The shallowest location shared by every operation in the conflict.
    pub path: Pointer,
    /// Operations from the first (left) side, in their original order.
    pub ops_a: PatchSet,
    /// Operations from the second (right) side, in their original order.
    pub ops_b: PatchSet,
}

impl Conflict {
    /// Creates a new conflict.
    pub fn new(path: Pointer, ops_a: PatchSet, ops_b: PatchSet) -> Self {
        Conflict { path, ops_a, ops_b }
    }

    /// Returns the total number of operations on both sides.
    pub fn op_count(&self) -> usize {
        self.ops_a.len() + self.ops_b.len()
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "conflict at '{}': {} left op(s), {} right op(s)",
            self.path,
            self.ops_a.len(),
            self.ops_b.len()
        )
    }
}

/// Conflicts is an ordered collection of conflicts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Conflicts {
    conflicts: Vec<Conflict>,
}

impl Conflicts {
    /// Creates a new empty Conflicts collection.
    pub fn new() -> Self {
        Conflicts {
            conflicts: Vec::new(),
        }
    }

    /// Adds a conflict.
    pub fn add(&mut self, conflict: Conflict) {
        self.conflicts.push(conflict);
    }

    /// Returns true if there are no conflicts.
    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Returns the number of conflicts.
    pub fn len(&self) -> usize {
        self.conflicts.len()
    }

    pub fn get(&self, index: usize) -> Option<&Conflict> {
        self.conflicts.get(index)
    }

    /// Returns an iterator over the conflicts.
    pub fn iter(&self) -> std::slice::Iter<'_, Conflict> {
        self.conflicts.iter()
    }

    /// Returns the location of each conflict.
    pub fn paths(&self) -> Vec<&Pointer> {
        self.conflicts.iter().map(|c| &c.path).collect()
    }
}

impl IntoIterator for Conflicts {
    type Item = Conflict;
    type IntoIter = std::vec::IntoIter<Conflict>;

    fn into_iter(self) -> Self::IntoIter {
        self.conflicts.into_iter()
    }
}

impl<'a> IntoIterator for &'a Conflicts {
    type Item = &'a Conflict;
    type IntoIter = std::slice::Iter<'a, Conflict>;

    fn into_iter(self) -> Self::IntoIter {
        self.conflicts.iter()
    }
}

impl FromIterator<Conflict> for Conflicts {
    fn from_iter<T: IntoIterator<Item = Conflict>>(iter: T) -> Self {
        Conflicts {
            conflicts: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Conflicts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, conflict) in self.conflicts.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", conflict)?;
        }
        Ok(())
    }
}
