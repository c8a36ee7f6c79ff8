//! Structural differ.

use crate::patch::{PatchOp, PatchSet};
use crate::pointer::Pointer;
use crate::value::{Map, Value};
use tracing::debug;

/// Computes the patch set that turns `from` into `to`.
///
/// The result is deterministic for equal inputs: objects are walked in key
/// order, arrays element by element. It is not guaranteed to be minimal.
/// Trailing array elements are added at increasing indices and removed from
/// the highest index down, so each removal leaves the addresses of the
/// following ones intact.
pub fn diff(from: &Value, to: &Value) -> PatchSet {
    let mut ops = Vec::new();
    let mut path = Pointer::root();
    diff_at(&mut ops, &mut path, from, to);
    let ops = coalesce(ops);
    debug!(ops = ops.len(), "computed structural diff");
    ops.into()
}

fn diff_at(ops: &mut Vec<PatchOp>, path: &mut Pointer, from: &Value, to: &Value) {
    if from == to {
        return;
    }
    match (from, to) {
        (Value::Map(a), Value::Map(b)) => diff_map(ops, path, a, b),
        (Value::List(a), Value::List(b)) => diff_list(ops, path, a, b),
        _ => ops.push(PatchOp::replace(path.clone(), to.clone())),
    }
}

fn diff_map(ops: &mut Vec<PatchOp>, path: &mut Pointer, from: &Map, to: &Map) {
    for (key, value) in to.iter() {
        if !from.has(key) {
            ops.push(PatchOp::add(path.child(key.as_str()), value.clone()));
        }
    }
    for key in from.keys() {
        if !to.has(key) {
            ops.push(PatchOp::remove(path.child(key.as_str())));
        }
    }
    for (key, a) in from.iter() {
        if let Some(b) = to.get(key) {
            path.push(key.as_str());
            diff_at(ops, path, a, b);
            path.pop();
        }
    }
}

fn diff_list(ops: &mut Vec<PatchOp>, path: &mut Pointer, from: &[Value], to: &[Value]) {
    let common = from.len().min(to.len());
    for i in 0..common {
        path.push(i.to_string());
        diff_at(ops, path, &from[i], &to[i]);
        path.pop();
    }
    for (i, value) in to.iter().enumerate().skip(common) {
        ops.push(PatchOp::add(path.child_index(i), value.clone()));
    }
    for i in (common..from.len()).rev() {
        ops.push(PatchOp::remove(path.child_index(i)));
    }
}

/// Folds a remove immediately followed by an add at the same path into a single replace.
fn coalesce(ops: Vec<PatchOp>) -> Vec<PatchOp> {
    let mut out = Vec::with_capacity(ops.len());
    let mut iter = ops.into_iter().peekable();
    while let Some(op) = iter.next() {
        if let PatchOp::Remove { path } = &op {
            let same_slot = matches!(iter.peek(), Some(PatchOp::Add { path: next, .. }) if next == path);
            if same_slot {
                if let Some(PatchOp::Add { path, value }) = iter.next() {
                    out.push(PatchOp::Replace { path, value });
                    continue;
                }
            }
        }
        out.push(op);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::from_json;
    use pretty_assertions::assert_eq;

    fn ptr(s: &str) -> Pointer {
        Pointer::parse(s).unwrap()
    }

    fn json(s: &str) -> Value {
        from_json(s).unwrap()
    }

    #[test]
    fn test_equal_values_produce_nothing() {
        let v = json(r#"{"a":[1,{"b":null}],"c":"x"}"#);
        assert!(diff(&v, &v).is_empty());
    }

    #[test]
    fn test_scalar_change_is_replace() {
        let ops = diff(&json(r#"{"a":0,"b":0}"#), &json(r#"{"a":-1,"b":0}"#));
        assert_eq!(ops.into_vec(), vec![PatchOp::replace(ptr("/a"), -1i64)]);
    }

    #[test]
    fn test_type_change_is_replace() {
        let ops = diff(&json(r#"{"a":{"x":1}}"#), &json(r#"{"a":[1]}"#));
        assert_eq!(ops.into_vec(), vec![PatchOp::replace(ptr("/a"), json("[1]"))]);
    }

    #[test]
    fn test_root_replace() {
        let ops = diff(&json("1"), &json(r#""one""#));
        assert_eq!(ops.into_vec(), vec![PatchOp::replace(Pointer::root(), "one")]);
    }

    #[test]
    fn test_object_keys() {
        let ops = diff(
            &json(r#"{"keep":{"n":1},"gone":true}"#),
            &json(r#"{"keep":{"n":2},"new":[]}"#),
        );
        assert_eq!(
            ops.into_vec(),
            vec![
                PatchOp::add(ptr("/new"), json("[]")),
                PatchOp::remove(ptr("/gone")),
                PatchOp::replace(ptr("/keep/n"), 2i64),
            ]
        );
    }

    #[test]
    fn test_array_append() {
        let ops = diff(&json(r#"["a","b","c"]"#), &json(r#"["a","b","c","1","2"]"#));
        assert_eq!(
            ops.into_vec(),
            vec![PatchOp::add(ptr("/3"), "1"), PatchOp::add(ptr("/4"), "2")]
        );
    }

    #[test]
    fn test_array_truncate_removes_high_to_low() {
        let ops = diff(&json("[0,1,2,3,4]"), &json("[0,1]"));
        assert_eq!(
            ops.into_vec(),
            vec![
                PatchOp::remove(ptr("/4")),
                PatchOp::remove(ptr("/3")),
                PatchOp::remove(ptr("/2")),
            ]
        );
    }

    #[test]
    fn test_array_elements_recurse() {
        let ops = diff(&json(r#"[{"a":1},2]"#), &json(r#"[{"a":2},2]"#));
        assert_eq!(ops.into_vec(), vec![PatchOp::replace(ptr("/0/a"), 2i64)]);
    }

    #[test]
    fn test_escaped_keys() {
        let ops = diff(&json(r#"{}"#), &json(r#"{"a/b":1}"#));
        assert_eq!(ops.iter().next().unwrap().path().to_string(), "/a~1b");
    }

    #[test]
    fn test_coalesce_remove_then_add() {
        let ops = coalesce(vec![
            PatchOp::remove(ptr("/x/1")),
            PatchOp::add(ptr("/x/1"), "new"),
            PatchOp::remove(ptr("/y")),
            PatchOp::add(ptr("/z"), 1i64),
        ]);
        assert_eq!(
            ops,
            vec![
                PatchOp::replace(ptr("/x/1"), "new"),
                PatchOp::remove(ptr("/y")),
                PatchOp::add(ptr("/z"), 1i64),
            ]
        );
    }

    #[test]
    fn test_deterministic() {
        let a = json(r#"{"z":1,"y":[1,2,3],"x":{"q":true}}"#);
        let b = json(r#"{"w":0,"y":[1],"x":{"q":false,"r":null}}"#);
        let first = diff(&a, &b).to_json().unwrap();
        for _ in 0..5 {
            assert_eq!(diff(&a, &b).to_json().unwrap(), first);
        }
    }
}
