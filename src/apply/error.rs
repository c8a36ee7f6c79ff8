//! Patch application errors.

use crate::patch::PatchOp;
use crate::pointer::Pointer;
use thiserror::Error;

/// PatchError is the reason a single operation could not be applied.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PatchError {
    #[error("path not found: '{path}'")]
    PathNotFound { path: Pointer },

    #[error("'{path}': type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        path: Pointer,
        expected: String,
        actual: String,
    },

    #[error("'{path}': invalid array index {token:?}")]
    InvalidIndex { path: Pointer, token: String },

    #[error("cannot move '{from}' into its own descendant '{path}'")]
    MoveIntoDescendant { from: Pointer, path: Pointer },

    #[error("cannot remove the document root")]
    RemoveRoot,
}

impl PatchError {
    /// Creates a path not found error.
    pub fn path_not_found(path: &Pointer) -> Self {
        PatchError::PathNotFound { path: path.clone() }
    }

    /// Creates a type mismatch error.
    pub fn type_mismatch(path: &Pointer, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        PatchError::TypeMismatch {
            path: path.clone(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Creates an invalid index error.
    pub fn invalid_index(path: &Pointer, token: impl Into<String>) -> Self {
        PatchError::InvalidIndex {
            path: path.clone(),
            token: token.into(),
        }
    }

    /// Returns true for errors caused by the addressed location not existing.
    pub fn is_path_not_found(&self) -> bool {
        matches!(self, PatchError::PathNotFound { .. })
    }
}

/// ApplyError identifies the operation that stopped a strict application.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("patch operation {index} ({op}) failed: {error}")]
pub struct ApplyError {
    /// Position of the operation in its patch set.
    pub index: usize,
    pub op: PatchOp,
    #[source]
    pub error: PatchError,
}

/// SkippedOp records an operation a best-effort application passed over.
pub type SkippedOp = ApplyError;
