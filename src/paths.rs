//! Platform locations for the settings document and deployment profiles.
//!
//! The user tier lives under the per-user configuration directory; the
//! system tier under a machine-wide directory an administrator provisions.
//! `QUAYSIDE_CONFIG_HOME` overrides the user location, mainly for tests.

use directories::ProjectDirs;
use std::path::PathBuf;

pub const APP_NAME: &str = "quayside";

/// Per-user configuration directory.
pub fn user_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("QUAYSIDE_CONFIG_HOME") {
        return Some(PathBuf::from(dir));
    }
    ProjectDirs::from("io", "Quayside", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Persisted settings document.
pub fn settings_file() -> Option<PathBuf> {
    user_config_dir().map(|dir| dir.join("settings.json"))
}

/// Per-user deployment-profile directory (`defaults.json` / `locked.json`).
pub fn user_profile_dir() -> Option<PathBuf> {
    user_config_dir().map(|dir| dir.join("profile"))
}

/// Machine-wide deployment-profile directory.
pub fn system_profile_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("QUAYSIDE_SYSTEM_PROFILE_DIR") {
        return PathBuf::from(dir);
    }
    #[cfg(windows)]
    {
        let program_data =
            std::env::var("ProgramData").unwrap_or_else(|_| r"C:\ProgramData".to_string());
        PathBuf::from(program_data).join(APP_NAME).join("profile")
    }
    #[cfg(not(windows))]
    {
        PathBuf::from("/etc").join(APP_NAME).join("profile")
    }
}
