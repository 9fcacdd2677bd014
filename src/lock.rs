//! Locked-field tracking.
//!
//! Deployment profiles mark individual settings leaves as immutable. The
//! locked-field tree mirrors the shape of the profile's locked document with
//! a boolean `true` at every leaf path present in it. Lock state is about
//! key presence, not value truthiness: a leaf carrying `false` or an empty
//! sequence still locks its path.

use crate::tree;
use serde_json::Value;

/// Boolean tree mirroring (a subset of) the settings shape. Absence of a
/// path means unlocked. Rebuilt from deployment profiles on every settings
/// load and owned by the store for the rest of the load cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct LockedFields(Value);

impl Default for LockedFields {
    fn default() -> Self {
        LockedFields(tree::empty())
    }
}

impl LockedFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark every leaf path present in `source` as locked. Locking is
    /// monotonic: paths already locked stay locked, and applying the same
    /// source twice is the same as applying it once.
    pub fn mark_locked(&mut self, source: &Value) {
        mark_into(&mut self.0, source);
    }

    /// Whether the given dotted path is locked.
    pub fn is_locked(&self, raw_path: &str) -> bool {
        let path: Vec<String> = raw_path.split('.').map(str::to_string).collect();
        matches!(tree::get_at(&self.0, &path), Some(Value::Bool(true)))
    }

    /// The underlying boolean tree, for handing to the validator.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        tree::is_empty(&self.0)
    }
}

fn mark_into(target: &mut Value, source: &Value) {
    let (Some(target_map), Some(source_map)) = (target.as_object_mut(), source.as_object()) else {
        return;
    };
    for (key, value) in source_map {
        if value.is_object() {
            let child = target_map
                .entry(key.clone())
                .or_insert_with(tree::empty);
            // A prior tier may have locked this whole subtree's leaf; leave
            // the boolean in place rather than descending into it.
            if child.is_object() {
                mark_into(child, value);
            }
        } else {
            target_map.insert(key.clone(), Value::Bool(true));
        }
    }
}
