//! Walking a pointer through a document.

use super::pointer::{ArrayIndex, Pointer};
use crate::value::Value;

/// Step is the outcome of descending from one node into a child.
#[derive(Debug)]
pub(crate) enum Step<T> {
    Found(T),
    /// The container has no child under this token.
    Missing,
    /// The node is not a container the token can address.
    Mismatch,
}

pub(crate) fn step<'a>(node: &'a Value, token: &str) -> Step<&'a Value> {
    match node {
        Value::Map(map) => match map.get(token) {
            Some(child) => Step::Found(child),
            None => Step::Missing,
        },
        Value::List(items) => match ArrayIndex::parse(token) {
            Some(idx) => match idx.element(items.len()) {
                Some(i) => Step::Found(&items[i]),
                None => Step::Missing,
            },
            None => Step::Mismatch,
        },
        _ => Step::Mismatch,
    }
}

pub(crate) fn step_mut<'a>(node: &'a mut Value, token: &str) -> Step<&'a mut Value> {
    match node {
        Value::Map(map) => match map.get_mut(token) {
            Some(child) => Step::Found(child),
            None => Step::Missing,
        },
        Value::List(items) => match ArrayIndex::parse(token) {
            Some(idx) => match idx.element(items.len()) {
                Some(i) => Step::Found(&mut items[i]),
                None => Step::Missing,
            },
            None => Step::Mismatch,
        },
        _ => Step::Mismatch,
    }
}

/// Resolves a pointer against a document.
///
/// Returns `None` when a token names a missing key, an out-of-range or `-` index,
/// or descends into a scalar. This is an ordinary outcome, not an error.
pub fn resolve<'a>(root: &'a Value, pointer: &Pointer) -> Option<&'a Value> {
    let mut node = root;
    for token in pointer.iter() {
        match step(node, token) {
            Step::Found(child) => node = child,
            Step::Missing | Step::Mismatch => return None,
        }
    }
    Some(node)
}

/// Resolves a pointer, falling back to its deepest resolvable ancestor.
///
/// Presentation layers use this to locate a node that a removal has already taken away.
pub fn resolve_or_ancestor<'a>(root: &'a Value, pointer: &Pointer) -> (Pointer, &'a Value) {
    let mut node = root;
    let mut reached = Pointer::root();
    for token in pointer.iter() {
        match step(node, token) {
            Step::Found(child) => {
                node = child;
                reached.push(token);
            }
            Step::Missing | Step::Mismatch => break,
        }
    }
    (reached, node)
}

impl Value {
    /// Looks up the node addressed by `pointer`. See [`resolve`].
    pub fn pointer(&self, pointer: &Pointer) -> Option<&Value> {
        resolve(self, pointer)
    }
}
