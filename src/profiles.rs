//! Deployment-profile loading and merging.
//!
//! A deployment profile is a pair of documents per tier: `defaults`, applied
//! on top of the compiled-in default settings, and `locked`, whose leaf
//! paths become immutable for the rest of the load cycle. Two tiers exist:
//! system-wide (provisioned by an administrator) and per-user. Either tier,
//! and either document within a tier, may be absent.

use crate::error::SettingsError;
use crate::lock::LockedFields;
use crate::tree;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Origin of a deployment profile. For default values the user tier wins on
/// conflicting leaves; locking is a monotonic OR across tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    System,
    User,
}

impl Tier {
    /// Load order: system first, user second, so user defaults override.
    pub const ALL: [Tier; 2] = [Tier::System, Tier::User];

    pub fn name(&self) -> &'static str {
        match self {
            Tier::System => "system",
            Tier::User => "user",
        }
    }
}

/// Which half of a tier's profile a read targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileRole {
    Defaults,
    Locked,
}

impl ProfileRole {
    pub fn file_name(&self) -> &'static str {
        match self {
            ProfileRole::Defaults => "defaults.json",
            ProfileRole::Locked => "locked.json",
        }
    }
}

/// Source of deployment-profile documents. The serialization format lives
/// behind this seam: the engine only ever sees parsed partial settings
/// trees. `Ok(None)` means the document is absent, which is never an error.
pub trait ProfileReader {
    fn read(&self, tier: Tier, role: ProfileRole) -> Result<Option<Value>, SettingsError>;
}

/// Reads JSON profile documents from one directory per tier.
pub struct JsonProfileReader {
    system_dir: PathBuf,
    user_dir: PathBuf,
}

impl JsonProfileReader {
    pub fn new(system_dir: impl Into<PathBuf>, user_dir: impl Into<PathBuf>) -> Self {
        Self {
            system_dir: system_dir.into(),
            user_dir: user_dir.into(),
        }
    }

    fn dir(&self, tier: Tier) -> &Path {
        match tier {
            Tier::System => &self.system_dir,
            Tier::User => &self.user_dir,
        }
    }
}

impl ProfileReader for JsonProfileReader {
    fn read(&self, tier: Tier, role: ProfileRole) -> Result<Option<Value>, SettingsError> {
        let path = self.dir(tier).join(role.file_name());
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(SettingsError::ProfileRead {
                    path: path.display().to_string(),
                    reason: err.to_string(),
                })
            }
        };
        let value: Value =
            serde_json::from_str(&text).map_err(|err| SettingsError::ProfileRead {
                path: path.display().to_string(),
                reason: err.to_string(),
            })?;
        Ok(Some(value))
    }
}

/// Effective result of reading both tiers: one defaults overlay (user wins
/// over system) and one accumulated locked-field tree (either tier locks).
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileOverlay {
    pub defaults: Value,
    pub locked: LockedFields,
}

impl Default for ProfileOverlay {
    fn default() -> Self {
        Self {
            defaults: tree::empty(),
            locked: LockedFields::new(),
        }
    }
}

/// Read both tiers and combine them. Absent documents contribute nothing;
/// any other read or parse failure aborts the load.
pub fn load(reader: &dyn ProfileReader) -> Result<ProfileOverlay, SettingsError> {
    let mut overlay = ProfileOverlay::default();

    for tier in Tier::ALL {
        match reader.read(tier, ProfileRole::Defaults)? {
            Some(defaults) => {
                tree::deep_merge(&mut overlay.defaults, &defaults);
            }
            None => debug!(tier = tier.name(), "no defaults document for tier"),
        }
        match reader.read(tier, ProfileRole::Locked)? {
            Some(locked) => {
                overlay.locked.mark_locked(&locked);
            }
            None => debug!(tier = tier.name(), "no locked document for tier"),
        }
    }

    Ok(overlay)
}
