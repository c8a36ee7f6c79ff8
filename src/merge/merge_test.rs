//! Tests for three-way merges and conflict resolution.

#[cfg(test)]
mod tests {
    use crate::apply::{apply, ApplyMode, PatchError};
    use crate::conflict::ConflictRule;
    use crate::error::Error;
    use crate::merge::{three_way_merge, Choice, ConflictId, ConflictState, MergeOptions, MergeSession, Strategy};
    use crate::patch::{PatchOp, PatchSet};
    use crate::pointer::Pointer;
    use crate::value::{from_json, Value};
    use pretty_assertions::assert_eq;

    fn json(s: &str) -> Value {
        from_json(s).unwrap()
    }

    fn ptr(s: &str) -> Pointer {
        Pointer::parse(s).unwrap()
    }

    fn session(ancestor: &str, left: &str, right: &str) -> MergeSession {
        MergeSession::new(json(ancestor), json(left), json(right))
    }

    const FIRST: ConflictId = ConflictId(0);

    #[test]
    fn test_independent_edits_merge() {
        let merged = three_way_merge(&json(r#"{"a":0,"b":0}"#), &json(r#"{"a":-1,"b":0}"#), &json(r#"{"a":0,"b":1}"#));
        assert_eq!(merged.result, json(r#"{"a":-1,"b":1}"#));
        assert!(merged.conflicts.is_empty());
    }

    #[test]
    fn test_large_integer_edit_survives() {
        let ancestor = json(r#"{"id":18446744073709551615}"#);
        let left = json(r#"{"id":18446744073709551614}"#);
        let merged = three_way_merge(&ancestor, &left, &ancestor);
        assert!(merged.conflicts.is_empty());
        assert_eq!(merged.result, left);
        assert_eq!(crate::value::to_json(&merged.result).unwrap(), r#"{"id":18446744073709551614}"#);
    }

    #[test]
    fn test_signed_zero_edit_survives() {
        let merged = three_way_merge(&json(r#"{"x":0.0}"#), &json(r#"{"x":0.0}"#), &json(r#"{"x":-0.0}"#));
        assert_eq!(crate::value::to_json(&merged.result).unwrap(), r#"{"x":-0.0}"#);
    }

    #[test]
    fn test_identical_documents() {
        let doc = json(r#"{"a":[1,2,{"b":null}],"c":"d"}"#);
        let s = MergeSession::new(doc.clone(), doc.clone(), doc.clone());
        assert!(s.left_patches().is_empty());
        assert!(s.right_patches().is_empty());
        assert!(s.conflicts().is_empty());
        assert!(s.is_fully_resolved());
        assert_eq!(s.target(), &doc);
    }

    #[test]
    fn test_one_sided_edit_wins() {
        let right = json(r#"{"a":0,"b":1}"#);
        let merged = three_way_merge(&json(r#"{"a":0,"b":0}"#), &json(r#"{"a":0,"b":0}"#), &right);
        assert_eq!(merged.result, right);
        assert!(merged.conflicts.is_empty());
    }

    #[test]
    fn test_concurrent_appends_conflict() {
        let s = session(r#"["a","b","c"]"#, r#"["a","b","c","1"]"#, r#"["a","b","c","2"]"#);
        assert_eq!(s.conflicts().len(), 1);

        let conflict = s.conflict(FIRST).unwrap();
        assert_eq!(conflict.path, ptr("/3"));
        assert_eq!(conflict.ops_a, PatchSet::from(vec![PatchOp::add(ptr("/3"), "1")]));
        assert_eq!(conflict.ops_b, PatchSet::from(vec![PatchOp::add(ptr("/3"), "2")]));

        assert_eq!(s.target(), &json(r#"["a","b","c"]"#));
        assert_eq!(s.state(FIRST).unwrap(), &ConflictState::Unresolved);
        assert_eq!(s.pending(), vec![FIRST]);
        assert!(!s.is_fully_resolved());
    }

    #[test]
    fn test_dismiss_then_take_left() {
        let mut s = session(r#"["a","b","c"]"#, r#"["a","b","c","1"]"#, r#"["a","b","c","2"]"#);

        s.dismiss(FIRST).unwrap();
        assert_eq!(s.target(), &json(r#"["a","b","c"]"#));
        assert_eq!(s.state(FIRST).unwrap(), &ConflictState::Applied(Choice::Skip));
        assert!(s.is_fully_resolved());

        s.resolve(FIRST, Choice::TakeA).unwrap();
        assert!(s.can_commit(FIRST).unwrap());
        s.commit(FIRST).unwrap();
        assert_eq!(s.target(), &json(r#"["a","b","c","1"]"#));
        assert_eq!(s.state(FIRST).unwrap(), &ConflictState::Applied(Choice::TakeA));
    }

    #[test]
    fn test_take_right() {
        let mut s = session(
            r#"{"name":"x","tags":[]}"#,
            r#"{"name":"left","tags":[]}"#,
            r#"{"name":"right","tags":["t"]}"#,
        );
        assert_eq!(s.conflicts().len(), 1);
        assert_eq!(s.target(), &json(r#"{"name":"x","tags":["t"]}"#));

        s.resolve(FIRST, Choice::TakeB).unwrap();
        // resolving alone leaves the target alone
        assert_eq!(s.target(), &json(r#"{"name":"x","tags":["t"]}"#));
        s.commit(FIRST).unwrap();
        assert_eq!(s.into_target(), json(r#"{"name":"right","tags":["t"]}"#));
    }

    #[test]
    fn test_parent_and_child_edits_conflict() {
        let ancestor = r#"{"user":{"name":"Ann","age":30}}"#;
        let left = r#"{}"#;
        let right = r#"{"user":{"name":"Bob","age":30}}"#;

        let s = session(ancestor, left, right);
        assert_eq!(s.conflicts().len(), 1);
        assert_eq!(s.conflict(FIRST).unwrap().path, ptr("/user"));

        let exact = MergeSession::builder()
            .rule(ConflictRule::ExactPath)
            .build(json(ancestor), json(left), json(right));
        assert!(exact.conflicts().is_empty());
        // the child edit lands on a removed parent and is passed over
        assert_eq!(exact.auto_skipped().len(), 1);
        assert!(exact.auto_skipped()[0].error.is_path_not_found());
        assert_eq!(exact.target(), &json("{}"));
    }

    #[test]
    fn test_commit_failure_leaves_target() {
        let mut s = session(r#"{"k":1}"#, r#"{"k":2}"#, r#"{"k":3}"#);
        let custom = PatchSet::from(vec![
            PatchOp::replace(ptr("/k"), 4i64),
            PatchOp::remove(ptr("/missing")),
        ]);
        s.resolve(FIRST, Choice::Custom(custom.clone())).unwrap();
        assert!(!s.can_commit(FIRST).unwrap());

        let err = s.commit(FIRST).unwrap_err();
        match err {
            Error::CommitFailed { id, skipped } => {
                assert_eq!(id, FIRST);
                assert_eq!(skipped.len(), 1);
                assert_eq!(skipped[0].index, 1);
                assert_eq!(skipped[0].error, PatchError::path_not_found(&ptr("/missing")));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(s.target(), &json(r#"{"k":1}"#));
        assert_eq!(s.state(FIRST).unwrap(), &ConflictState::Resolved(Choice::Custom(custom)));

        s.resolve(FIRST, Choice::Custom(vec![PatchOp::replace(ptr("/k"), 4i64)].into())).unwrap();
        s.commit(FIRST).unwrap();
        assert_eq!(s.target(), &json(r#"{"k":4}"#));
    }

    #[test]
    fn test_invalid_transitions() {
        let mut s = session(r#"{"k":1}"#, r#"{"k":2}"#, r#"{"k":3}"#);

        assert!(matches!(
            s.commit(FIRST),
            Err(Error::InvalidState { state: ConflictState::Unresolved, action: "commit", .. })
        ));

        s.resolve(FIRST, Choice::TakeA).unwrap();
        s.commit(FIRST).unwrap();
        assert!(matches!(s.resolve(FIRST, Choice::TakeB), Err(Error::InvalidState { action: "resolve", .. })));
        assert!(matches!(s.commit(FIRST), Err(Error::InvalidState { .. })));
        assert_eq!(s.target(), &json(r#"{"k":2}"#));

        let missing = ConflictId(7);
        assert!(matches!(s.resolve(missing, Choice::Skip), Err(Error::UnknownConflict(ConflictId(7)))));
        assert!(matches!(s.state(missing), Err(Error::UnknownConflict(_))));
    }

    #[test]
    fn test_reresolve_before_commit() {
        let mut s = session(r#"{"k":1}"#, r#"{"k":2}"#, r#"{"k":3}"#);
        s.resolve(FIRST, Choice::TakeA).unwrap();
        s.resolve(FIRST, Choice::TakeB).unwrap();
        s.commit(FIRST).unwrap();
        assert_eq!(s.target(), &json(r#"{"k":3}"#));
    }

    #[test]
    fn test_can_take_does_not_mutate() {
        let s = session(r#"{"k":1}"#, r#"{"k":2}"#, r#"{"k":3}"#);
        assert!(s.can_take(FIRST, &Choice::TakeA).unwrap());
        assert!(s.can_take(FIRST, &Choice::Skip).unwrap());
        assert!(!s.can_take(FIRST, &Choice::Custom(vec![PatchOp::remove(ptr("/nope"))].into())).unwrap());
        assert!(!s.can_commit(FIRST).unwrap());
        assert_eq!(s.target(), &json(r#"{"k":1}"#));
    }

    #[test]
    fn test_resolve_all() {
        let ancestor = r#"{"a":1,"b":1,"c":1}"#;
        let left = r#"{"a":2,"b":2,"c":1}"#;
        let right = r#"{"a":3,"b":3,"c":3}"#;

        let mut s = session(ancestor, left, right);
        assert_eq!(s.conflicts().len(), 2);
        assert_eq!(s.target(), &json(r#"{"a":1,"b":1,"c":3}"#));

        s.resolve(ConflictId(1), Choice::TakeB).unwrap();
        s.resolve_all(Strategy::PreferLeft).unwrap();
        assert!(s.is_fully_resolved());
        assert_eq!(s.target(), &json(r#"{"a":2,"b":3,"c":3}"#));
    }

    #[test]
    fn test_auto_resolve_from_options() {
        let options = MergeOptions::from_yaml("strategy: prefer-right").unwrap();
        let mut s = MergeSession::builder()
            .options(options)
            .build(json(r#"{"k":1}"#), json(r#"{"k":2}"#), json(r#"{"k":3}"#));
        s.auto_resolve().unwrap();
        assert_eq!(s.target(), &json(r#"{"k":3}"#));

        let mut untouched = session(r#"{"k":1}"#, r#"{"k":2}"#, r#"{"k":3}"#);
        untouched.auto_resolve().unwrap();
        assert_eq!(untouched.pending(), vec![FIRST]);
    }

    #[test]
    fn test_reset() {
        let mut s = MergeSession::builder()
            .rule(ConflictRule::ExactPath)
            .build(json(r#"{"k":1}"#), json(r#"{"k":2}"#), json(r#"{"k":3}"#));
        s.dismiss(FIRST).unwrap();

        s.reset(json(r#"{"a":0,"b":0}"#), json(r#"{"a":-1,"b":0}"#), json(r#"{"a":0,"b":1}"#));
        assert!(s.conflicts().is_empty());
        assert_eq!(s.options().rule, ConflictRule::ExactPath);
        assert_eq!(s.target(), &json(r#"{"a":-1,"b":1}"#));
    }

    #[test]
    fn test_patches_are_exposed() {
        let s = session(r#"{"a":0,"b":0}"#, r#"{"a":-1,"b":0}"#, r#"{"a":0,"b":1}"#);
        assert_eq!(s.left_patches(), &PatchSet::from(vec![PatchOp::replace(ptr("/a"), -1i64)]));
        assert_eq!(s.right_patches(), &PatchSet::from(vec![PatchOp::replace(ptr("/b"), 1i64)]));
        assert_eq!(s.non_conflicting().len(), 2);
        assert_eq!(
            apply(s.ancestor(), s.left_patches(), ApplyMode::Strict).unwrap().value,
            s.left().clone()
        );
        assert_eq!(s.right(), &json(r#"{"a":0,"b":1}"#));
    }

    #[test]
    fn test_merge_result_json() {
        let merged = three_way_merge(&json(r#"{"k":1}"#), &json(r#"{"k":2}"#), &json(r#"{"k":3}"#));
        let out = serde_json::to_value(&merged).unwrap();
        assert_eq!(
            out,
            serde_json::json!({
                "result": {"k": 1},
                "conflicts": [{
                    "path": "/k",
                    "opsA": [{"op": "replace", "path": "/k", "value": 2}],
                    "opsB": [{"op": "replace", "path": "/k", "value": 3}]
                }]
            })
        );
    }
}

#[cfg(test)]
mod properties {
    use crate::apply::{apply, ApplyMode};
    use crate::diff::diff;
    use crate::merge::three_way_merge;
    use crate::patch::PatchOp;
    use crate::pointer::ArrayIndex;
    use crate::strategies::arb_value;
    use crate::value::{Map, Value};
    use proptest::prelude::*;

    fn pair(left: Value, right: Value) -> Value {
        let mut map = Map::new();
        map.set("left", left);
        map.set("right", right);
        Value::Map(map)
    }

    proptest! {
        #[test]
        fn diff_then_apply_round_trips(a in arb_value(), b in arb_value()) {
            let patches = diff(&a, &b);
            let applied = apply(&a, &patches, ApplyMode::Strict).unwrap();
            prop_assert_eq!(applied.value, b);
        }

        #[test]
        fn diff_of_equal_documents_is_empty(a in arb_value()) {
            prop_assert!(diff(&a, &a.clone()).is_empty());
        }

        #[test]
        fn array_removals_run_high_to_low(a in arb_value(), b in arb_value()) {
            let removals: Vec<_> = diff(&a, &b)
                .into_iter()
                .filter_map(|op| match op {
                    PatchOp::Remove { path } => {
                        let index = path.last().and_then(ArrayIndex::parse)?;
                        Some((path.parent()?, index.ordinal()))
                    }
                    _ => None,
                })
                .collect();
            for pair in removals.windows(2) {
                if pair[0].0 == pair[1].0 {
                    prop_assert!(pair[0].1 > pair[1].1);
                }
            }
        }

        #[test]
        fn untouched_side_takes_the_other(base in arb_value(), edited in arb_value()) {
            let merged = three_way_merge(&base, &base, &edited);
            prop_assert!(merged.conflicts.is_empty());
            prop_assert_eq!(&merged.result, &edited);

            let merged = three_way_merge(&base, &edited, &base);
            prop_assert!(merged.conflicts.is_empty());
            prop_assert_eq!(merged.result, edited);
        }

        #[test]
        fn edits_under_separate_keys_combine(
            l0 in arb_value(), l1 in arb_value(), r0 in arb_value(), r1 in arb_value()
        ) {
            let merged = three_way_merge(&pair(l0.clone(), r0.clone()), &pair(l1.clone(), r0), &pair(l0, r1.clone()));
            prop_assert!(merged.conflicts.is_empty());
            prop_assert_eq!(merged.result, pair(l1, r1));
        }
    }
}
