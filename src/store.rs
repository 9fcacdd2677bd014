//! Process-wide settings state for one load cycle.
//!
//! The store owns the effective settings tree, the locked-field tree derived
//! from deployment profiles, the declared schema, and the transient runtime
//! flags. It is rebuilt by `SettingsStore::load` whenever settings are
//! (re)loaded; nothing here is ambient global state.

use crate::error::SettingsError;
use crate::lock::LockedFields;
use crate::profiles::{self, ProfileReader};
use crate::schema::SchemaNode;
use crate::settings::Settings;
use crate::transient::{TransientSettings, TransientSettingsPatch};
use crate::tree;
use parking_lot::RwLock;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Durable destination for the full settings tree. Assumed atomic from the
/// engine's point of view.
pub trait SettingsSink {
    fn save(&mut self, settings: &Value) -> Result<(), SettingsError>;
}

/// Writes the settings document as pretty JSON, via a temp file and rename.
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SettingsSink for JsonFileSink {
    fn save(&mut self, settings: &Value) -> Result<(), SettingsError> {
        if let Some(dir) = self.path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        let text = serde_json::to_string_pretty(settings)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Records every save in memory. For tests and dry runs.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub saved: Vec<Value>,
}

impl SettingsSink for MemorySink {
    fn save(&mut self, settings: &Value) -> Result<(), SettingsError> {
        self.saved.push(settings.clone());
        Ok(())
    }
}

/// Read a persisted settings document. Absent is a soft outcome (first
/// run); a document that exists but fails to parse is fatal.
pub fn read_settings_file(path: &Path) -> Result<Option<Value>, SettingsError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(serde_json::from_str(&text)?)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Settings state for the current load cycle.
#[derive(Debug)]
pub struct SettingsStore {
    settings: Value,
    schema: SchemaNode,
    locked: LockedFields,
    transient: TransientSettings,
    first_run: bool,
}

impl SettingsStore {
    /// Run one load cycle: compiled-in defaults, then the deployment-profile
    /// defaults overlay, then the persisted user document, each filtered
    /// against the canonical schema. The locked-field tree is rebuilt from
    /// the profiles as part of the same cycle.
    pub fn load(
        reader: &dyn ProfileReader,
        persisted: Option<Value>,
    ) -> Result<SettingsStore, SettingsError> {
        let defaults = Settings::default_tree();
        let schema = SchemaNode::from_defaults(&defaults);
        let overlay = profiles::load(reader)?;

        let mut settings = defaults;
        tree::merge_filtered(&mut settings, &overlay.defaults, &schema);

        let first_run = persisted.is_none();
        if let Some(saved) = persisted {
            tree::merge_filtered(&mut settings, &saved, &schema);
        } else {
            debug!("no persisted settings document; treating this as a first run");
        }

        if !overlay.locked.is_empty() {
            info!("deployment profiles locked one or more settings fields");
        }

        Ok(SettingsStore {
            settings,
            schema,
            locked: overlay.locked,
            transient: TransientSettings::default(),
            first_run,
        })
    }

    pub fn settings(&self) -> &Value {
        &self.settings
    }

    pub fn schema(&self) -> &SchemaNode {
        &self.schema
    }

    pub fn locked(&self) -> &LockedFields {
        &self.locked
    }

    pub fn transient(&self) -> &TransientSettings {
        &self.transient
    }

    pub fn update_transient(&mut self, patch: TransientSettingsPatch) {
        self.transient.update(patch);
    }

    /// Whether no persisted settings document existed at load time and no
    /// validated command-line pass or successful update has happened since.
    pub fn is_first_run(&self) -> bool {
        self.first_run
    }

    /// Clear the first-run marker without persisting anything. Used when a
    /// command line passed validation but nothing needed saving.
    pub fn turn_first_run_off(&mut self) {
        self.first_run = false;
    }

    /// Replace the effective settings with an updated tree and persist it.
    /// Clears the first-run marker; any successful command-line-driven
    /// update counts, even one that only touched the deferred version field.
    pub fn commit(
        &mut self,
        updated: Value,
        sink: &mut dyn SettingsSink,
    ) -> Result<(), SettingsError> {
        sink.save(&updated)?;
        self.settings = updated;
        self.first_run = false;
        Ok(())
    }

    /// Typed view of the current settings.
    pub fn as_settings(&self) -> Result<Settings, SettingsError> {
        Ok(serde_json::from_value(self.settings.clone())?)
    }
}

/// Shared handle for hosts that read settings from several places. The
/// engine itself is synchronous; concurrent loads must be serialized by the
/// caller.
#[derive(Clone)]
pub struct SettingsManager {
    inner: Arc<RwLock<SettingsStore>>,
}

impl SettingsManager {
    pub fn new(store: SettingsStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    pub fn with<R>(&self, f: impl FnOnce(&SettingsStore) -> R) -> R {
        f(&self.inner.read())
    }

    pub fn with_mut<R>(&self, f: impl FnOnce(&mut SettingsStore) -> R) -> R {
        f(&mut self.inner.write())
    }
}
