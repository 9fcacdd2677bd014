//! Settings-tree operations: deep merge, schema-filtered overlay, and
//! path-based reads and writes.
//!
//! All trees here are `serde_json::Value` objects shaped like (subsets of)
//! the canonical settings document.

use crate::schema::SchemaNode;
use serde_json::{Map, Value};
use tracing::debug;

/// Recursively merge `overlay` into `base`. Objects merge key by key; any
/// other value in the overlay replaces the base value outright.
pub fn deep_merge(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, overlay) => *base = overlay.clone(),
    }
}

/// Merge `overlay` into `base`, keeping only keys the schema knows about and
/// only leaves whose value matches the declared kind. Unknown keys and
/// kind-mismatched leaves contribute nothing; profile documents routinely
/// carry foreign bookkeeping keys.
pub fn merge_filtered(base: &mut Value, overlay: &Value, schema: &SchemaNode) {
    let (Value::Object(base_map), Value::Object(overlay_map)) = (base, overlay) else {
        return;
    };
    let SchemaNode::Branch(children) = schema else {
        return;
    };

    for (key, value) in overlay_map {
        let Some(child_schema) = children.get(key) else {
            debug!(key = %key, "ignoring unknown key in settings overlay");
            continue;
        };
        match child_schema {
            SchemaNode::Branch(_) => {
                if value.is_object() {
                    if let Some(existing) = base_map.get_mut(key) {
                        merge_filtered(existing, value, child_schema);
                    }
                } else {
                    debug!(key = %key, "ignoring scalar overlay for nested settings group");
                }
            }
            SchemaNode::Leaf(kind) => {
                if kind.matches(value) {
                    base_map.insert(key.clone(), value.clone());
                } else {
                    debug!(
                        key = %key,
                        expected = kind.name(),
                        "ignoring overlay leaf with mismatched kind"
                    );
                }
            }
        }
    }
}

/// Read the value at `path`, if every segment resolves.
pub fn get_at<'a>(tree: &'a Value, path: &[String]) -> Option<&'a Value> {
    let mut current = tree;
    for segment in path {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Write `value` at the location identified by `parent_path` + `key`.
/// Returns false if the parent no longer resolves to an object.
pub fn set_at(tree: &mut Value, parent_path: &[String], key: &str, value: Value) -> bool {
    let mut current = tree;
    for segment in parent_path {
        let Some(next) = current.as_object_mut().and_then(|m| m.get_mut(segment)) else {
            return false;
        };
        current = next;
    }
    match current.as_object_mut() {
        Some(map) => {
            map.insert(key.to_string(), value);
            true
        }
        None => false,
    }
}

/// Remove the leaf at `path`, pruning any parent objects left empty.
/// Returns the removed value, if the path resolved.
pub fn remove_at(tree: &mut Value, path: &[String]) -> Option<Value> {
    let (key, parents) = path.split_last()?;
    let removed = {
        let mut current = &mut *tree;
        for segment in parents {
            current = current.as_object_mut()?.get_mut(segment)?;
        }
        current.as_object_mut()?.remove(key)
    }?;
    // Prune now-empty ancestors, outermost last.
    for depth in (0..parents.len()).rev() {
        let mut current = &mut *tree;
        for segment in &parents[..depth] {
            match current.as_object_mut().and_then(|m| m.get_mut(segment)) {
                Some(next) => current = next,
                None => return Some(removed),
            }
        }
        let empty_child = current
            .as_object()
            .and_then(|m| m.get(&parents[depth]))
            .and_then(Value::as_object)
            .map(Map::is_empty)
            .unwrap_or(false);
        if empty_child {
            if let Some(map) = current.as_object_mut() {
                map.remove(&parents[depth]);
            }
        }
    }
    Some(removed)
}

/// An empty JSON object, the starting point for change sets and locked trees.
pub fn empty() -> Value {
    Value::Object(Map::new())
}

/// Whether a change-set tree contains any leaves at all.
pub fn is_empty(tree: &Value) -> bool {
    match tree {
        Value::Object(map) => map.values().all(is_empty),
        _ => false,
    }
}
