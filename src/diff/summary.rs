//! Diff summary reports.

use crate::patch::{PatchOp, PatchSet};
use crate::pointer::Pointer;
use std::fmt;

/// DiffSummary groups the paths of a patch set by the kind of edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffSummary {
    /// Paths that gained a value.
    pub added: Vec<Pointer>,
    /// Paths whose value was taken away.
    pub removed: Vec<Pointer>,
    /// Paths whose value was substituted.
    pub replaced: Vec<Pointer>,
    /// Source and destination of moved values.
    pub moved: Vec<(Pointer, Pointer)>,
}

impl DiffSummary {
    /// Summarizes a patch set.
    pub fn of(patches: &PatchSet) -> Self {
        let mut summary = DiffSummary::default();
        for op in patches {
            match op {
                PatchOp::Add { path, .. } => summary.added.push(path.clone()),
                PatchOp::Remove { path } => summary.removed.push(path.clone()),
                PatchOp::Replace { path, .. } => summary.replaced.push(path.clone()),
                PatchOp::Move { from, path } => summary.moved.push((from.clone(), path.clone())),
            }
        }
        summary
    }

    /// Returns true if there are no changes.
    pub fn is_same(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.replaced.is_empty() && self.moved.is_empty()
    }

    pub fn has_added(&self) -> bool {
        !self.added.is_empty()
    }

    pub fn has_removed(&self) -> bool {
        !self.removed.is_empty()
    }

    pub fn has_replaced(&self) -> bool {
        !self.replaced.is_empty()
    }
}

impl fmt::Display for DiffSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        let mut section = |f: &mut fmt::Formatter<'_>, title: &str, paths: Vec<String>| -> fmt::Result {
            if paths.is_empty() {
                return Ok(());
            }
            if !first {
                writeln!(f)?;
            }
            first = false;
            write!(f, "- {}:", title)?;
            for p in paths {
                write!(f, "\n  {}", p)?;
            }
            Ok(())
        };

        let show = |paths: &[Pointer]| paths.iter().map(|p| p.to_string()).collect::<Vec<_>>();
        section(f, "Replaced Fields", show(&self.replaced))?;
        section(f, "Added Fields", show(&self.added))?;
        section(f, "Removed Fields", show(&self.removed))?;
        section(
            f,
            "Moved Fields",
            self.moved.iter().map(|(from, to)| format!("{} -> {}", from, to)).collect(),
        )
    }
}
