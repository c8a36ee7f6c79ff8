//! Applying patch sets to documents.

use super::error::{ApplyError, PatchError, SkippedOp};
use crate::patch::{PatchOp, PatchSet};
use crate::pointer::{step, step_mut, ArrayIndex, Pointer, Step};
use crate::value::Value;
use tracing::{debug, warn};

/// ApplyMode selects how a failing operation is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApplyMode {
    /// Stop at the first failing operation; nothing is returned but the error.
    #[default]
    Strict,
    /// Skip failing operations and keep going.
    BestEffort,
}

impl From<bool> for ApplyMode {
    /// `true` is strict.
    fn from(strict: bool) -> Self {
        if strict {
            ApplyMode::Strict
        } else {
            ApplyMode::BestEffort
        }
    }
}

/// Applied is the outcome of a successful (possibly partial) application.
#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    pub value: Value,
    /// Operations passed over in best-effort mode, in patch order.
    pub skipped: Vec<SkippedOp>,
}

impl Applied {
    /// Returns true if every operation took effect.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Applies `patches` in order to a copy of `doc`.
///
/// `doc` itself is never modified, so on a strict failure the caller still holds
/// the unchanged document. Each operation is atomic: one that fails leaves the
/// working copy exactly as it found it.
pub fn apply(doc: &Value, patches: &PatchSet, mode: impl Into<ApplyMode>) -> Result<Applied, ApplyError> {
    let mode = mode.into();
    let mut working = doc.clone();
    let mut skipped = Vec::new();

    for (index, op) in patches.iter().enumerate() {
        let Err(error) = apply_op(&mut working, op) else {
            continue;
        };
        match mode {
            ApplyMode::Strict => {
                debug!(index, op = %op, %error, "strict patch application failed");
                return Err(ApplyError {
                    index,
                    op: op.clone(),
                    error,
                });
            }
            ApplyMode::BestEffort => {
                warn!(index, op = %op, %error, "skipping patch operation");
                skipped.push(SkippedOp {
                    index,
                    op: op.clone(),
                    error,
                });
            }
        }
    }

    debug!(ops = patches.len(), skipped = skipped.len(), "applied patch set");
    Ok(Applied {
        value: working,
        skipped,
    })
}

/// Applies all operations or none of them.
pub fn apply_strict(doc: &Value, patches: &PatchSet) -> Result<Value, ApplyError> {
    apply(doc, patches, ApplyMode::Strict).map(|applied| applied.value)
}

/// Applies what can be applied, reporting the rest.
pub fn apply_lenient(doc: &Value, patches: &PatchSet) -> Applied {
    match apply(doc, patches, ApplyMode::BestEffort) {
        Ok(applied) => applied,
        // best-effort mode never returns an error
        Err(err) => Applied {
            value: doc.clone(),
            skipped: vec![err],
        },
    }
}

/// Where a token lands inside its parent container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot {
    Key,
    Index(usize),
}

/// Descends through `tokens`, reporting failures against the op's full `path`.
pub(crate) fn walk<'a>(doc: &'a Value, tokens: &[String], path: &Pointer) -> Result<&'a Value, PatchError> {
    let mut node = doc;
    for token in tokens {
        node = match step(node, token) {
            Step::Found(child) => child,
            Step::Missing => return Err(PatchError::path_not_found(path)),
            Step::Mismatch => return Err(step_error(node.type_name(), token, path)),
        };
    }
    Ok(node)
}

fn walk_mut<'a>(doc: &'a mut Value, tokens: &[String], path: &Pointer) -> Result<&'a mut Value, PatchError> {
    let mut node = doc;
    for token in tokens {
        let kind = node.type_name();
        node = match step_mut(node, token) {
            Step::Found(child) => child,
            Step::Missing => return Err(PatchError::path_not_found(path)),
            Step::Mismatch => return Err(step_error(kind, token, path)),
        };
    }
    Ok(node)
}

fn step_error(kind: &str, token: &str, path: &Pointer) -> PatchError {
    if kind == "array" {
        PatchError::invalid_index(path, token)
    } else {
        PatchError::type_mismatch(path, "object or array", kind)
    }
}

/// Splits a non-root path into its parent tokens and last token.
fn split(path: &Pointer) -> Option<(&[String], &str)> {
    let (last, parent) = path.tokens().split_last()?;
    Some((parent, last.as_str()))
}

/// Locates the slot an add would write into.
pub(crate) fn insertion_slot(parent: &Value, token: &str, path: &Pointer) -> Result<Slot, PatchError> {
    match parent {
        Value::Map(_) => Ok(Slot::Key),
        Value::List(items) => {
            let idx = ArrayIndex::parse(token).ok_or_else(|| PatchError::invalid_index(path, token))?;
            idx.insertion_point(items.len())
                .map(Slot::Index)
                .ok_or_else(|| PatchError::path_not_found(path))
        }
        other => Err(PatchError::type_mismatch(path, "object or array", other.type_name())),
    }
}

/// Locates an existing child slot, for remove and replace.
pub(crate) fn existing_slot(parent: &Value, token: &str, path: &Pointer) -> Result<Slot, PatchError> {
    match parent {
        Value::Map(map) if map.has(token) => Ok(Slot::Key),
        Value::Map(_) => Err(PatchError::path_not_found(path)),
        Value::List(items) => {
            let idx = ArrayIndex::parse(token).ok_or_else(|| PatchError::invalid_index(path, token))?;
            idx.element(items.len())
                .map(Slot::Index)
                .ok_or_else(|| PatchError::path_not_found(path))
        }
        other => Err(PatchError::type_mismatch(path, "object or array", other.type_name())),
    }
}

/// Applies a single operation in place.
pub(crate) fn apply_op(doc: &mut Value, op: &PatchOp) -> Result<(), PatchError> {
    match op {
        PatchOp::Add { path, value } => add(doc, path, value.clone()),
        PatchOp::Remove { path } => remove(doc, path).map(|_| ()),
        PatchOp::Replace { path, value } => replace(doc, path, value.clone()),
        PatchOp::Move { from, path } => move_value(doc, from, path),
    }
}

fn add(doc: &mut Value, path: &Pointer, value: Value) -> Result<(), PatchError> {
    let Some((parent_tokens, token)) = split(path) else {
        *doc = value;
        return Ok(());
    };
    let parent = walk_mut(doc, parent_tokens, path)?;
    match (insertion_slot(parent, token, path)?, parent) {
        (Slot::Key, Value::Map(map)) => {
            map.set(token, value);
        }
        (Slot::Index(i), Value::List(items)) => items.insert(i, value),
        (_, other) => return Err(PatchError::type_mismatch(path, "object or array", other.type_name())),
    }
    Ok(())
}

/// A removed value and where it used to live, so it can be put back.
struct Removed {
    value: Value,
    position: usize,
}

fn remove(doc: &mut Value, path: &Pointer) -> Result<Removed, PatchError> {
    let (parent_tokens, token) = split(path).ok_or(PatchError::RemoveRoot)?;
    let parent = walk_mut(doc, parent_tokens, path)?;
    match (existing_slot(parent, token, path)?, parent) {
        (Slot::Key, Value::Map(map)) => map
            .delete_full(token)
            .map(|(position, value)| Removed { value, position })
            .ok_or_else(|| PatchError::path_not_found(path)),
        (Slot::Index(i), Value::List(items)) => Ok(Removed {
            value: items.remove(i),
            position: i,
        }),
        (_, other) => Err(PatchError::type_mismatch(path, "object or array", other.type_name())),
    }
}

fn restore(doc: &mut Value, path: &Pointer, removed: Removed) -> Result<(), PatchError> {
    let (parent_tokens, token) = split(path).ok_or(PatchError::RemoveRoot)?;
    match walk_mut(doc, parent_tokens, path)? {
        Value::Map(map) => map.insert_at(removed.position, token, removed.value),
        Value::List(items) => items.insert(removed.position.min(items.len()), removed.value),
        other => return Err(PatchError::type_mismatch(path, "object or array", other.type_name())),
    }
    Ok(())
}

fn replace(doc: &mut Value, path: &Pointer, value: Value) -> Result<(), PatchError> {
    let Some((parent_tokens, token)) = split(path) else {
        *doc = value;
        return Ok(());
    };
    let parent = walk_mut(doc, parent_tokens, path)?;
    let slot = existing_slot(parent, token, path)?;
    let target = match (slot, parent) {
        (Slot::Key, Value::Map(map)) => map.get_mut(token),
        (Slot::Index(i), Value::List(items)) => items.get_mut(i),
        _ => None,
    };
    let target = target.ok_or_else(|| PatchError::path_not_found(path))?;
    *target = value;
    Ok(())
}

fn move_value(doc: &mut Value, from: &Pointer, path: &Pointer) -> Result<(), PatchError> {
    walk(doc, from.tokens(), from)?;
    if from == path {
        return Ok(());
    }
    if from.is_strict_prefix_of(path) {
        return Err(PatchError::MoveIntoDescendant {
            from: from.clone(),
            path: path.clone(),
        });
    }

    let removed = remove(doc, from)?;
    let destination = match split(path) {
        None => Ok(()),
        Some((parent_tokens, token)) => {
            walk(doc, parent_tokens, path).and_then(|parent| insertion_slot(parent, token, path).map(|_| ()))
        }
    };
    match destination {
        Ok(()) => add(doc, path, removed.value),
        Err(error) => {
            restore(doc, from, removed)?;
            Err(error)
        }
    }
}
