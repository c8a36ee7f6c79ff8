//! Error types shared across the crate.

use crate::apply::{ApplyError, SkippedOp};
use crate::merge::{ConflictId, ConflictState};
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Error is the crate-wide error type.
///
/// The differ and the conflict detector are total functions over [`Value`](crate::Value)
/// and never produce one of these; they surface from parsing, patch application and
/// the merge session.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Malformed JSON, patch or configuration text.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// A pointer string that is not valid RFC 6901 syntax.
    #[error("invalid pointer {pointer:?}: {reason}")]
    InvalidPointer { pointer: String, reason: String },

    /// A strict patch application stopped at a failing operation.
    #[error(transparent)]
    Apply(#[from] ApplyError),

    /// No conflict with this id exists in the session.
    #[error("unknown conflict {0}")]
    UnknownConflict(ConflictId),

    /// The conflict is not in a state that allows the requested transition.
    #[error("conflict {id} is {state}, cannot {action}")]
    InvalidState {
        id: ConflictId,
        state: ConflictState,
        action: &'static str,
    },

    /// Committing a conflict's chosen patches left some operations unapplied.
    #[error("conflict {id}: {} operation(s) could not be applied", skipped.len())]
    CommitFailed { id: ConflictId, skipped: Vec<SkippedOp> },

    /// Invalid merge configuration.
    #[error("config error: {message}")]
    Config { message: String },
}

impl Error {
    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Error::Parse {
            message: message.into(),
        }
    }

    /// Creates an invalid pointer error.
    pub fn invalid_pointer(pointer: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidPointer {
            pointer: pointer.into(),
            reason: reason.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.line() > 0 {
            Error::parse(format!("{} (line {}, column {})", strip_position(&err), err.line(), err.column()))
        } else {
            Error::parse(err.to_string())
        }
    }
}

// serde_json appends " at line X column Y" to its messages.
fn strip_position(err: &serde_json::Error) -> String {
    let text = err.to_string();
    match text.rfind(" at line ") {
        Some(idx) => text[..idx].to_string(),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_reports_position() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{\n  \"a\": ,\n}")
            .unwrap_err()
            .into();
        let text = err.to_string();
        assert!(text.starts_with("parse error:"), "{}", text);
        assert!(text.contains("line 2"), "{}", text);
    }

    #[test]
    fn test_invalid_pointer_display() {
        let err = Error::invalid_pointer("a/b", "must start with '/'");
        assert_eq!(err.to_string(), "invalid pointer \"a/b\": must start with '/'");
    }
}
