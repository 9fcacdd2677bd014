//! Property-based tests for the locked-field flattener and the dotted-path
//! tree conversion.

use proptest::prelude::*;
use quayside_settings::accessor;
use quayside_settings::lock::LockedFields;
use quayside_settings::tree;
use serde_json::{json, Map, Value};

fn object_of(inner: impl Strategy<Value = Value>) -> impl Strategy<Value = Value> {
    proptest::collection::btree_map("[a-z]{1,6}", inner, 1..4).prop_map(|entries| {
        let mut map = Map::new();
        for (key, value) in entries {
            map.insert(key, value);
        }
        Value::Object(map)
    })
}

/// Strategy for partial settings-shaped trees: nested objects with scalar
/// or string-array leaves. The root is always an object.
fn partial_tree() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z]{0,8}".prop_map(Value::from),
        proptest::collection::vec("[a-z]{1,5}", 0..3)
            .prop_map(|items| json!(items)),
    ];
    object_of(leaf.prop_recursive(3, 24, 4, object_of))
}

/// Collect every leaf path present in a tree.
fn leaf_paths(tree: &Value) -> Vec<Vec<String>> {
    fn walk(value: &Value, prefix: &mut Vec<String>, out: &mut Vec<Vec<String>>) {
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    prefix.push(key.clone());
                    walk(child, prefix, out);
                    prefix.pop();
                }
            }
            _ => out.push(prefix.clone()),
        }
    }
    let mut out = Vec::new();
    walk(tree, &mut Vec::new(), &mut out);
    out
}

#[test]
fn test_mark_locked_marks_exactly_the_present_leaves() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&partial_tree(), |source| {
            let mut locked = LockedFields::new();
            locked.mark_locked(&source);

            // Every leaf path present in the source reads locked, whatever
            // value it carried.
            for path in leaf_paths(&source) {
                prop_assert_eq!(
                    tree::get_at(locked.as_value(), &path),
                    Some(&Value::Bool(true))
                );
            }

            // The locked tree introduces no leaves of its own.
            for path in leaf_paths(locked.as_value()) {
                prop_assert!(tree::get_at(&source, &path).is_some());
            }
            Ok(())
        })
        .unwrap();
}

#[test]
fn test_mark_locked_is_idempotent() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&partial_tree(), |source| {
            let mut once = LockedFields::new();
            once.mark_locked(&source);
            let mut twice = once.clone();
            twice.mark_locked(&source);
            prop_assert_eq!(once, twice);
            Ok(())
        })
        .unwrap();
}

#[test]
fn test_to_tree_then_resolve_round_trips() {
    let mut runner = proptest::test_runner::TestRunner::default();

    let segments = proptest::collection::vec("[a-z][a-zA-Z0-9]{0,7}", 1..5);
    runner
        .run(&(segments, any::<i64>()), |(segments, leaf)| {
            let path = segments.join(".");
            let built = accessor::to_tree(&path, json!(leaf)).unwrap();

            // The built tree has exactly one branch ending in the leaf.
            prop_assert_eq!(tree::get_at(&built, &segments), Some(&json!(leaf)));

            // Resolution against the built tree finds the same location.
            let resolved = accessor::resolve(&built, &path).unwrap();
            prop_assert_eq!(resolved.key.as_str(), segments.last().unwrap().as_str());
            prop_assert_eq!(&resolved.parent_path, &segments[..segments.len() - 1]);
            Ok(())
        })
        .unwrap();
}
