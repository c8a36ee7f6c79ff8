//! Patch operations.

use crate::pointer::Pointer;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// PatchOp is a single RFC 6902 edit.
///
/// Serialized as `{"op": "...", "path": "...", ...}`. Only `add`, `remove`,
/// `replace` and `move` exist; `copy` and `test` are rejected when parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOp {
    Add { path: Pointer, value: Value },
    Remove { path: Pointer },
    Replace { path: Pointer, value: Value },
    Move { from: Pointer, path: Pointer },
}

/// PatchKind names the operation of a [`PatchOp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchKind {
    Add,
    Remove,
    Replace,
    Move,
}

impl PatchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PatchKind::Add => "add",
            PatchKind::Remove => "remove",
            PatchKind::Replace => "replace",
            PatchKind::Move => "move",
        }
    }
}

impl fmt::Display for PatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PatchOp {
    /// Creates an add operation.
    pub fn add(path: Pointer, value: impl Into<Value>) -> Self {
        PatchOp::Add {
            path,
            value: value.into(),
        }
    }

    /// Creates a remove operation.
    pub fn remove(path: Pointer) -> Self {
        PatchOp::Remove { path }
    }

    /// Creates a replace operation.
    pub fn replace(path: Pointer, value: impl Into<Value>) -> Self {
        PatchOp::Replace {
            path,
            value: value.into(),
        }
    }

    /// Creates a move operation.
    pub fn move_to(from: Pointer, path: Pointer) -> Self {
        PatchOp::Move { from, path }
    }

    /// Returns the target path of the operation.
    pub fn path(&self) -> &Pointer {
        match self {
            PatchOp::Add { path, .. }
            | PatchOp::Remove { path }
            | PatchOp::Replace { path, .. }
            | PatchOp::Move { path, .. } => path,
        }
    }

    /// Returns the source path of a move.
    pub fn from(&self) -> Option<&Pointer> {
        match self {
            PatchOp::Move { from, .. } => Some(from),
            _ => None,
        }
    }

    /// Returns the value carried by an add or replace.
    pub fn value(&self) -> Option<&Value> {
        match self {
            PatchOp::Add { value, .. } | PatchOp::Replace { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn kind(&self) -> PatchKind {
        match self {
            PatchOp::Add { .. } => PatchKind::Add,
            PatchOp::Remove { .. } => PatchKind::Remove,
            PatchOp::Replace { .. } => PatchKind::Replace,
            PatchOp::Move { .. } => PatchKind::Move,
        }
    }

    /// Returns true if the operation inserts or deletes a slot, shifting array siblings.
    pub fn is_structural(&self) -> bool {
        !matches!(self, PatchOp::Replace { .. })
    }

    /// Returns every location the operation reads or writes.
    pub fn touched_paths(&self) -> impl Iterator<Item = &Pointer> {
        std::iter::once(self.path()).chain(self.from())
    }
}

impl fmt::Display for PatchOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchOp::Add { path, value } | PatchOp::Replace { path, value } => {
                write!(f, "{} {:?} = {}", self.kind(), path.to_string(), value)
            }
            PatchOp::Remove { path } => write!(f, "remove {:?}", path.to_string()),
            PatchOp::Move { from, path } => {
                write!(f, "move {:?} -> {:?}", from.to_string(), path.to_string())
            }
        }
    }
}
