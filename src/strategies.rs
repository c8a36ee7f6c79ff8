//! Proptest strategies shared by the property suites.

use crate::patch::{PatchOp, PatchSet};
use crate::pointer::Pointer;
use crate::value::{Map, Value};
use proptest::prelude::*;

/// Arbitrary JSON documents of modest depth and width.
pub(crate) fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-50i64..50).prop_map(Value::Int),
        (u64::MAX - 3..=u64::MAX).prop_map(Value::UInt),
        (-4i32..4).prop_map(|n| Value::Float(n as f64 + 0.5)),
        Just(Value::Float(-0.0)),
        "[a-c]{0,3}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(Value::List),
            prop::collection::vec(("[a-d]{1,2}", inner), 0..5)
                .prop_map(|entries| Value::Map(entries.into_iter().collect::<Map>())),
        ]
    })
}

/// Pointers drawn from a small token vocabulary so that paths collide often.
pub(crate) fn arb_pointer(prefix: &'static str) -> impl Strategy<Value = Pointer> {
    prop::collection::vec(prop_oneof![Just("a"), Just("b"), Just("0"), Just("1"), Just("-")], 0..3)
        .prop_map(move |tokens| {
            let mut p = Pointer::root();
            if !prefix.is_empty() {
                p.push(prefix);
            }
            for t in tokens {
                p.push(t);
            }
            p
        })
}

pub(crate) fn arb_op(prefix: &'static str) -> impl Strategy<Value = PatchOp> {
    prop_oneof![
        (arb_pointer(prefix), any::<i8>()).prop_map(|(p, n)| PatchOp::add(p, n as i64)),
        arb_pointer(prefix).prop_map(PatchOp::remove),
        (arb_pointer(prefix), any::<bool>()).prop_map(|(p, b)| PatchOp::replace(p, b)),
        (arb_pointer(prefix), arb_pointer(prefix)).prop_map(|(from, to)| PatchOp::move_to(from, to)),
    ]
}

pub(crate) fn arb_patch_set(prefix: &'static str) -> impl Strategy<Value = PatchSet> {
    prop::collection::vec(arb_op(prefix), 0..6).prop_map(PatchSet::from)
}
