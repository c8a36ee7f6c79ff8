//! Non-mutating dry runs.

use super::applier::{apply_op, existing_slot, insertion_slot, walk};
use super::error::PatchError;
use crate::patch::{PatchOp, PatchSet};
use crate::value::Value;
use std::borrow::Cow;

/// Reports whether `apply(doc, patches, strict)` would succeed, without side effects.
///
/// Each operation is checked with the same resolution rules the applier uses.
/// Only operations that are followed by further ones are played onto a private
/// copy. A trailing move is tried on a scratch copy, since its destination
/// depends on the removal; probing a single add, remove or replace never builds
/// a new document.
pub fn can_apply(doc: &Value, patches: &PatchSet) -> bool {
    check(doc, patches).is_ok()
}

/// Like [`can_apply`], but returns the first failure.
pub fn check(doc: &Value, patches: &PatchSet) -> Result<(), (usize, PatchError)> {
    let mut view = Cow::Borrowed(doc);
    let last = patches.len().saturating_sub(1);
    for (index, op) in patches.iter().enumerate() {
        let outcome = if index < last {
            apply_op(view.to_mut(), op)
        } else {
            check_op(&view, op)
        };
        outcome.map_err(|error| (index, error))?;
    }
    Ok(())
}

/// Checks a single operation against `doc`.
pub(crate) fn check_op(doc: &Value, op: &PatchOp) -> Result<(), PatchError> {
    if let PatchOp::Move { .. } = op {
        let mut scratch = doc.clone();
        return apply_op(&mut scratch, op);
    }
    let path = op.path();
    let Some((token, parent_tokens)) = path.tokens().split_last() else {
        return match op {
            PatchOp::Remove { .. } => Err(PatchError::RemoveRoot),
            _ => Ok(()),
        };
    };
    let parent = walk(doc, parent_tokens, path)?;
    match op {
        PatchOp::Add { .. } => insertion_slot(parent, token, path).map(|_| ()),
        _ => existing_slot(parent, token, path).map(|_| ()),
    }
}
