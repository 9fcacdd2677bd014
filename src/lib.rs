//! Quayside Settings Engine
//!
//! Hierarchical application settings for the Quayside container-management
//! desktop application: a nested settings document loaded from disk,
//! administrator deployment profiles that can lock individual leaf fields,
//! and command-line overrides merged with strict type-preservation and
//! locking semantics.

pub mod accessor;
pub mod cmdline;
pub mod error;
pub mod lock;
pub mod logging;
pub mod paths;
pub mod profiles;
pub mod schema;
pub mod settings;
pub mod store;
pub mod transient;
pub mod tree;
pub mod validator;

pub use error::SettingsError;
pub use settings::Settings;
pub use store::{SettingsManager, SettingsStore};
