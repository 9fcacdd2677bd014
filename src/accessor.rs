//! Dotted-path accessors over the settings tree.
//!
//! An accessor like `kubernetes.options.flannel` names one leaf or internal
//! node. Resolution walks the tree and yields the path of the containing
//! node plus the final key; callers read or write through `tree::get_at` /
//! `tree::set_at` with that path rather than holding a reference into the
//! live tree.

use crate::error::SettingsError;
use crate::tree;
use serde_json::{Map, Value};
use std::fmt;

/// Accessor path separator.
pub const SEPARATOR: char = '.';

/// A validated dotted path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessor {
    segments: Vec<String>,
}

impl Accessor {
    /// Parse a dotted path. Rejects the empty string and paths ending with
    /// the separator; those are caller-input bugs, not lookup misses.
    pub fn parse(raw: &str) -> Result<Accessor, SettingsError> {
        if raw.is_empty() {
            return Err(SettingsError::MalformedAccessor(
                "can't be the empty string".to_string(),
            ));
        }
        if raw.ends_with(SEPARATOR) {
            return Err(SettingsError::MalformedAccessor(format!(
                "'{raw}' ends with a dot ('.')"
            )));
        }
        Ok(Accessor {
            segments: raw.split(SEPARATOR).map(str::to_string).collect(),
        })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// All segments but the last.
    pub fn parent(&self) -> &[String] {
        &self.segments[..self.segments.len() - 1]
    }

    /// The final segment.
    pub fn key(&self) -> &str {
        self.segments.last().expect("accessor is never empty")
    }
}

impl fmt::Display for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

/// Location of a resolved field: path of the containing node plus the final
/// key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedField {
    pub parent_path: Vec<String>,
    pub key: String,
}

impl ResolvedField {
    /// Parent path with the final key appended.
    pub fn full_path(&self) -> Vec<String> {
        let mut path = self.parent_path.clone();
        path.push(self.key.clone());
        path
    }
}

/// Resolve a raw dotted path against a settings tree.
///
/// Every segment but the last must name an existing nested object, and the
/// final key must exist in its containing node. Returns `None` for anything
/// that does not resolve, including malformed input; callers decide whether
/// that is fatal.
pub fn resolve(tree: &Value, raw_path: &str) -> Option<ResolvedField> {
    let segments: Vec<&str> = raw_path.split(SEPARATOR).collect();
    let (key, parents) = segments.split_last()?;

    let mut current = tree.as_object()?;
    for segment in parents {
        current = current.get(*segment)?.as_object()?;
    }
    if !current.contains_key(*key) {
        return None;
    }
    Some(ResolvedField {
        parent_path: parents.iter().map(|s| s.to_string()).collect(),
        key: key.to_string(),
    })
}

/// Build a single-branch tree from a dotted path and a leaf value:
/// `to_tree("a.b.c", 3)` yields `{"a":{"b":{"c":3}}}`.
pub fn to_tree(raw_path: &str, value: Value) -> Result<Value, SettingsError> {
    let accessor = Accessor::parse(raw_path)?;
    let mut current = value;
    for segment in accessor.segments().iter().rev() {
        let mut map = Map::new();
        map.insert(segment.clone(), current);
        current = Value::Object(map);
    }
    Ok(current)
}

/// Convenience wrapper: resolve and read the current value, if any.
pub fn get_current<'a>(settings: &'a Value, resolved: &ResolvedField) -> Option<&'a Value> {
    let full = resolved.full_path();
    tree::get_at(settings, &full)
}
