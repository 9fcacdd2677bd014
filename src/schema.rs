//! Declared leaf kinds for the settings document.
//!
//! Each leaf's scalar kind is recorded explicitly, derived once from the
//! compiled-in defaults. Command-line coercion dispatches on the declared
//! kind rather than inspecting whatever value currently sits in the tree.

use serde_json::Value;
use std::collections::BTreeMap;

/// Scalar kind a settings leaf may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafKind {
    Bool,
    Number,
    String,
    /// Ordered sequence of strings.
    StringSequence,
}

impl LeafKind {
    /// Human-readable kind name, used in type-mismatch errors.
    pub fn name(&self) -> &'static str {
        match self {
            LeafKind::Bool => "boolean",
            LeafKind::Number => "number",
            LeafKind::String => "string",
            LeafKind::StringSequence => "string sequence",
        }
    }

    /// Whether a JSON value conforms to this kind.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            LeafKind::Bool => value.is_boolean(),
            LeafKind::Number => value.is_number(),
            LeafKind::String => value.is_string(),
            LeafKind::StringSequence => match value {
                Value::Array(items) => items.iter().all(Value::is_string),
                _ => false,
            },
        }
    }
}

/// One node of the settings schema: either a leaf with a declared kind or a
/// branch with named children.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Leaf(LeafKind),
    Branch(BTreeMap<String, SchemaNode>),
}

impl SchemaNode {
    /// Derive the schema from a fully-populated defaults tree.
    pub fn from_defaults(defaults: &Value) -> SchemaNode {
        match defaults {
            Value::Object(map) => SchemaNode::Branch(
                map.iter()
                    .map(|(key, value)| (key.clone(), SchemaNode::from_defaults(value)))
                    .collect(),
            ),
            Value::Bool(_) => SchemaNode::Leaf(LeafKind::Bool),
            Value::Number(_) => SchemaNode::Leaf(LeafKind::Number),
            Value::String(_) => SchemaNode::Leaf(LeafKind::String),
            Value::Array(_) => SchemaNode::Leaf(LeafKind::StringSequence),
            // Null never appears in the canonical defaults; treat it as an
            // unaddressable empty branch if it ever does.
            Value::Null => SchemaNode::Branch(BTreeMap::new()),
        }
    }

    /// Walk down a segment path. Returns None as soon as a segment is
    /// unknown or descends through a leaf.
    pub fn lookup(&self, segments: &[String]) -> Option<&SchemaNode> {
        let mut current = self;
        for segment in segments {
            match current {
                SchemaNode::Branch(children) => current = children.get(segment)?,
                SchemaNode::Leaf(_) => return None,
            }
        }
        Some(current)
    }

    /// Declared kind if this node is a leaf.
    pub fn leaf_kind(&self) -> Option<LeafKind> {
        match self {
            SchemaNode::Leaf(kind) => Some(*kind),
            SchemaNode::Branch(_) => None,
        }
    }
}
