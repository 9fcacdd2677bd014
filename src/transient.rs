//! Transient runtime flags.
//!
//! These live for the process lifetime only and are never persisted with
//! the settings document.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransientSettings {
    /// Suppress modal dialogs, for unattended invocations.
    pub no_modal_dialogs: bool,
}

impl TransientSettings {
    pub fn update(&mut self, partial: TransientSettingsPatch) {
        if let Some(no_modal_dialogs) = partial.no_modal_dialogs {
            self.no_modal_dialogs = no_modal_dialogs;
        }
    }
}

/// Partial update for [`TransientSettings`]; `None` fields are untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransientSettingsPatch {
    pub no_modal_dialogs: Option<bool>,
}
