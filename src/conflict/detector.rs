//! Conflict detection between two patch sets computed against the same ancestor.

use super::conflict::{Conflict, Conflicts};
use crate::patch::{PatchOp, PatchSet};
use crate::pointer::ArrayIndex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// ConflictRule decides when an operation from one side collides with one from the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictRule {
    /// Operations collide only when their target paths are identical.
    ExactPath,
    /// Operations collide when their paths are equal or nested, or when an array
    /// insertion/removal shifts an element the other side addresses.
    #[default]
    Overlap,
}

/// Detection is the partition of two patch sets into free operations and conflicts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    /// Operations no opposing operation collides with: side A's first, then side B's.
    pub non_conflicting: PatchSet,
    pub conflicts: Conflicts,
}

impl Detection {
    /// Returns true if nothing needs a decision.
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty()
    }
}

/// Detector partitions patch sets according to a [`ConflictRule`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Detector {
    rule: ConflictRule,
}

impl Detector {
    /// Creates a detector using the given rule.
    pub fn new(rule: ConflictRule) -> Self {
        Detector { rule }
    }

    pub fn rule(&self) -> ConflictRule {
        self.rule
    }

    /// Returns true if `a` and `b` cannot both be applied independently.
    pub fn collide(&self, a: &PatchOp, b: &PatchOp) -> bool {
        match self.rule {
            ConflictRule::ExactPath => a.path() == b.path(),
            ConflictRule::Overlap => {
                touches_same_subtree(a, b) || shifts_addressed_element(a, b) || shifts_addressed_element(b, a)
            }
        }
    }

    /// Splits `patches_a` and `patches_b` into free operations and conflicts.
    ///
    /// Colliding operations are grouped transitively: if a1 collides with b1 and
    /// b1 with a2, all three form one conflict. Every input operation ends up in
    /// exactly one place, and relative order within each side is kept.
    pub fn detect(&self, patches_a: &PatchSet, patches_b: &PatchSet) -> Detection {
        let ops: Vec<&PatchOp> = patches_a.iter().chain(patches_b.iter()).collect();
        let split = patches_a.len();
        let mut groups = DisjointSet::new(ops.len());

        for i in 0..split {
            for j in split..ops.len() {
                if self.collide(ops[i], ops[j]) {
                    groups.union(i, j);
                }
            }
        }

        let mut non_conflicting = PatchSet::new();
        let mut conflicts = Conflicts::new();
        let mut emitted = vec![false; ops.len()];

        for i in 0..ops.len() {
            let root = groups.find(i);
            if groups.size(root) == 1 {
                non_conflicting.push(ops[i].clone());
                continue;
            }
            if emitted[root] {
                continue;
            }
            emitted[root] = true;

            let members: Vec<usize> = (0..ops.len()).filter(|&k| groups.find(k) == root).collect();
            let path = members
                .iter()
                .map(|&k| ops[k].path().clone())
                .reduce(|acc, p| acc.common_prefix(&p))
                .unwrap_or_default();
            let ops_a = members.iter().filter(|&&k| k < split).map(|&k| ops[k].clone()).collect();
            let ops_b = members.iter().filter(|&&k| k >= split).map(|&k| ops[k].clone()).collect();
            conflicts.add(Conflict::new(path, ops_a, ops_b));
        }

        debug!(
            rule = ?self.rule,
            left = patches_a.len(),
            right = patches_b.len(),
            free = non_conflicting.len(),
            conflicts = conflicts.len(),
            "detected conflicts"
        );
        Detection {
            non_conflicting,
            conflicts,
        }
    }
}

/// Detects conflicts with the default [`ConflictRule::Overlap`] rule.
pub fn detect(patches_a: &PatchSet, patches_b: &PatchSet) -> Detection {
    Detector::default().detect(patches_a, patches_b)
}

fn touches_same_subtree(a: &PatchOp, b: &PatchOp) -> bool {
    a.touched_paths().any(|p| b.touched_paths().any(|q| p.overlaps(q)))
}

/// Returns true if a structural edit in `a` moves an array element that `b` addresses.
///
/// An insertion or removal at index i shifts every sibling at index >= i.
fn shifts_addressed_element(a: &PatchOp, b: &PatchOp) -> bool {
    if !a.is_structural() {
        return false;
    }
    a.touched_paths().any(|slot| {
        let (Some(parent), Some(index)) = (slot.parent(), slot.last().and_then(ArrayIndex::parse)) else {
            return false;
        };
        b.touched_paths()
            .filter_map(|q| q.element_index_under(&parent))
            .any(|j| j.ordinal() >= index.ordinal())
    })
}

/// Union-find over operation indices.
struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        DisjointSet {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        // smaller index stays root so output order follows the inputs
        let (root, child) = if ra < rb { (ra, rb) } else { (rb, ra) };
        self.parent[child] = root;
        self.size[root] += self.size[child];
    }

    fn size(&self, root: usize) -> usize {
        self.size[root]
    }
}
