//! Command-line override merging.
//!
//! Takes the raw argument vector the host runtime hands us, maps recognized
//! `--field.path` options onto settings leaves, coerces values against the
//! declared leaf kinds, and persists the merged result after validation.
//! The command line is assumed to place all recognized options contiguously
//! after any foreign host-runtime arguments.

use crate::accessor::{self, SEPARATOR};
use crate::error::SettingsError;
use crate::schema::LeafKind;
use crate::store::{SettingsSink, SettingsStore};
use crate::transient::TransientSettingsPatch;
use crate::tree;
use crate::validator::{is_locked_field_message, SettingsValidator};
use serde_json::Value;
use tracing::{debug, info};

/// Prefix of every option this engine recognizes.
const OPTION_PREFIX: &str = "--";

/// Transient runtime flag; never part of persisted settings.
const NO_MODAL_DIALOGS: &str = "no-modal-dialogs";

/// Deferred at validation time: the acceptable version set is not known yet
/// when the command line is processed, so the value is persisted unverified
/// and reconciled later by the version manager.
const DEFERRED_VERSION_SEGMENTS: [&str; 2] = ["kubernetes", "version"];

/// Apply command-line overrides to the store's settings.
///
/// On success the merged settings are committed through `sink` (when there
/// was anything to persist). On any fatal error the store's settings are
/// left untouched; only transient flags already processed remain updated.
pub fn apply(
    store: &mut SettingsStore,
    validator: &dyn SettingsValidator,
    sink: &mut dyn SettingsSink,
    tokens: &[String],
) -> Result<(), SettingsError> {
    let mut working = store.settings().clone();
    let mut changes = tree::empty();
    // Leading arguments belong to the host runtime until we see an option
    // that is ours; after that, anything unrecognized is fatal.
    let mut skipping_foreign = true;

    let mut i = 0;
    while i < tokens.len() {
        let arg = &tokens[i];
        i += 1;

        if !arg.starts_with(OPTION_PREFIX) {
            if skipping_foreign {
                debug!(argument = %arg, "skipping foreign command-line argument");
                continue;
            }
            return Err(SettingsError::UnexpectedArgument {
                argument: arg.clone(),
                command_line: tokens.join(" "),
            });
        }

        let body = &arg[OPTION_PREFIX.len()..];
        let (field_path, assigned) = match body.find('=') {
            Some(pos) => (&body[..pos], Some(&body[pos + 1..])),
            None => (body, None),
        };

        if field_path == NO_MODAL_DIALOGS {
            let flag = match assigned {
                None | Some("") | Some("true") => true,
                Some("false") => false,
                Some(other) => {
                    return Err(SettingsError::Validation(format!(
                        "invalid associated value '{other}' for {arg}: \
                         must be unspecified (set to true), true or false"
                    )))
                }
            };
            store.update_transient(TransientSettingsPatch {
                no_modal_dialogs: Some(flag),
            });
            skipping_foreign = false;
            continue;
        }

        // Malformed paths can't belong to us; while foreign arguments are
        // still allowed they are treated as such.
        if field_path.is_empty() || field_path.ends_with(SEPARATOR) {
            if skipping_foreign {
                continue;
            }
            return Err(SettingsError::MalformedAccessor(format!(
                "'{field_path}' in argument {arg}"
            )));
        }

        let Some(resolved) = accessor::resolve(&working, field_path) else {
            if skipping_foreign {
                debug!(argument = %arg, "ignoring unresolvable foreign argument");
                continue;
            }
            return Err(SettingsError::NotFound(arg.clone()));
        };
        skipping_foreign = false;

        let kind = match store.schema().lookup(&resolved.full_path()) {
            Some(node) => match node.leaf_kind() {
                Some(kind) => kind,
                None => return Err(SettingsError::NonLeafOverwrite(field_path.to_string())),
            },
            None => return Err(SettingsError::NotFound(arg.clone())),
        };

        // Determine the raw literal: inline `=value`, boolean shorthand, or
        // the next token.
        let raw_value: String = match assigned {
            Some(value) => value.to_string(),
            None if kind == LeafKind::Bool => "true".to_string(),
            None => {
                if i == tokens.len() {
                    return Err(SettingsError::MissingValue(field_path.to_string()));
                }
                let value = tokens[i].clone();
                i += 1;
                value
            }
        };

        let final_value = coerce(kind, field_path, &raw_value)?;

        tree::set_at(
            &mut working,
            &resolved.parent_path,
            &resolved.key,
            final_value.clone(),
        );
        let fragment = accessor::to_tree(field_path, final_value)?;
        tree::deep_merge(&mut changes, &fragment);
    }

    if tree::is_empty(&changes) {
        debug!("no settings changes recorded from the command line");
        return Ok(());
    }

    let deferred_version = tree::remove_at(
        &mut changes,
        &DEFERRED_VERSION_SEGMENTS.map(str::to_string),
    );

    let (need_update, errors) = validator.validate(store.settings(), &changes, store.locked());

    if !errors.is_empty() {
        let message = errors.join("\n");
        if errors.iter().any(|e| is_locked_field_message(e)) {
            return Err(SettingsError::LockedField(message));
        }
        return Err(SettingsError::Validation(message));
    }

    // Any command line that passes validation ends the first run, even when
    // every proposed value already matched.
    store.turn_first_run_off();

    if need_update || deferred_version.is_some() {
        if let Some(version) = deferred_version {
            let fragment = accessor::to_tree("kubernetes.version", version)?;
            tree::deep_merge(&mut changes, &fragment);
        }
        let mut updated = store.settings().clone();
        tree::deep_merge(&mut updated, &changes);
        store.commit(updated, sink)?;
        info!("settings updated from command-line options");
    } else {
        debug!("no need to update preferences based on command-line options");
    }

    Ok(())
}

/// Parse a raw literal for the declared leaf kind. Bool and number accept
/// JSON literals only; strings are taken verbatim; sequences accept a JSON
/// array of strings.
fn coerce(kind: LeafKind, field_path: &str, raw: &str) -> Result<Value, SettingsError> {
    let mismatch = || SettingsError::TypeMismatch {
        accessor: field_path.to_string(),
        value: raw.to_string(),
        expected: kind.name(),
    };
    match kind {
        LeafKind::String => Ok(Value::String(raw.to_string())),
        LeafKind::Bool | LeafKind::Number | LeafKind::StringSequence => {
            let parsed: Value = serde_json::from_str(raw).map_err(|_| mismatch())?;
            if kind.matches(&parsed) {
                Ok(parsed)
            } else {
                Err(mismatch())
            }
        }
    }
}
