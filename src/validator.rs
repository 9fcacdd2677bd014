//! Settings validation seam.
//!
//! Full semantic validation of individual settings (engine names, version
//! catalogs, port reachability) lives outside this crate. The engine only
//! needs the narrow contract below, plus the ability to tell a locked-field
//! rejection apart from any other rejection by its message.

use crate::lock::LockedFields;
use crate::schema::SchemaNode;
use serde_json::Value;

/// Outcome of validating a proposed change set: whether anything would
/// actually change, and the list of rejection reasons (empty when clean).
pub type ValidationOutcome = (bool, Vec<String>);

/// Decides whether a sparse change set is acceptable against the current
/// settings and the locked-field tree.
pub trait SettingsValidator {
    fn validate(
        &self,
        current: &Value,
        changes: &Value,
        locked: &LockedFields,
    ) -> ValidationOutcome;
}

/// Rejection message for a locked field. Validators must use this exact
/// shape so callers can distinguish locked-field rejections.
pub fn locked_field_message(path: &str) -> String {
    format!("field '{path}' is locked")
}

/// Whether a validator rejection names a locked field.
pub fn is_locked_field_message(message: &str) -> bool {
    // Mirrors the recognized pattern `field '<path>' is locked`.
    match message.find("field '") {
        Some(start) => message[start + "field '".len()..].contains("' is locked"),
        None => false,
    }
}

/// Minimal validator covering what the engine itself must observe: change
/// detection, schema existence, declared-kind agreement, and locked-field
/// rejection.
pub struct LockCheckValidator {
    schema: SchemaNode,
}

impl LockCheckValidator {
    pub fn new(schema: SchemaNode) -> Self {
        Self { schema }
    }
}

impl SettingsValidator for LockCheckValidator {
    fn validate(
        &self,
        current: &Value,
        changes: &Value,
        locked: &LockedFields,
    ) -> ValidationOutcome {
        let mut changed = false;
        let mut errors = Vec::new();
        walk_changes(
            current,
            changes,
            locked,
            &self.schema,
            &mut Vec::new(),
            &mut changed,
            &mut errors,
        );
        (changed, errors)
    }
}

fn walk_changes(
    current: &Value,
    changes: &Value,
    locked: &LockedFields,
    schema: &SchemaNode,
    path: &mut Vec<String>,
    changed: &mut bool,
    errors: &mut Vec<String>,
) {
    let Some(change_map) = changes.as_object() else {
        return;
    };
    for (key, proposed) in change_map {
        path.push(key.clone());
        let dotted = path.join(".");
        let child_schema = match schema {
            SchemaNode::Branch(children) => children.get(key),
            SchemaNode::Leaf(_) => None,
        };
        match child_schema {
            None => errors.push(format!("changing field '{dotted}' is not supported")),
            Some(branch @ SchemaNode::Branch(_)) => {
                if proposed.is_object() {
                    let child_current = current
                        .as_object()
                        .and_then(|m| m.get(key))
                        .cloned()
                        .unwrap_or(Value::Null);
                    walk_changes(
                        &child_current, proposed, locked, branch, path, changed, errors,
                    );
                } else {
                    errors.push(format!(
                        "setting '{dotted}' can't be changed to a single value"
                    ));
                }
            }
            Some(SchemaNode::Leaf(kind)) => {
                if locked.is_locked(&dotted) {
                    errors.push(locked_field_message(&dotted));
                } else if !kind.matches(proposed) {
                    errors.push(format!(
                        "invalid value for '{dotted}': expected a {}",
                        kind.name()
                    ));
                } else {
                    let existing = current.as_object().and_then(|m| m.get(key));
                    if existing != Some(proposed) {
                        *changed = true;
                    }
                }
            }
        }
        path.pop();
    }
}
