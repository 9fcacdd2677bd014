//! Error types for the Quayside settings engine.

use thiserror::Error;

/// Errors raised while loading settings, merging deployment profiles, or
/// applying command-line overrides.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// An accessor did not resolve to an existing location in the settings
    /// tree. Soft while skipping foreign command-line arguments, fatal
    /// everywhere else.
    #[error("no such setting '{0}' in current settings")]
    NotFound(String),

    /// Empty accessor, or an accessor ending with the separator.
    #[error("invalid settings accessor: {0}")]
    MalformedAccessor(String),

    /// Attempt to assign a scalar to a path that holds a nested object.
    #[error("can't overwrite existing setting '{0}': not a leaf field")]
    NonLeafOverwrite(String),

    /// A non-option token appeared after the first recognized option.
    #[error("unexpected argument '{argument}' in command-line [{command_line}]")]
    UnexpectedArgument {
        argument: String,
        command_line: String,
    },

    /// A non-boolean option was given without `=` and no following token.
    #[error("no value provided for option --{0}")]
    MissingValue(String),

    /// A coerced literal's type disagrees with the field's declared kind.
    #[error("can't evaluate --{accessor}={value} as {expected}")]
    TypeMismatch {
        accessor: String,
        value: String,
        expected: &'static str,
    },

    /// The validator rejected a change because the field is locked. Kept as
    /// its own variant so callers can react differently from a generic
    /// validation failure; never wrapped in another variant.
    #[error("error in command-line options:\n{0}")]
    LockedField(String),

    /// A deployment-profile document failed to read or parse for any reason
    /// other than being absent.
    #[error("failed to read deployment profile {path}: {reason}")]
    ProfileRead { path: String, reason: String },

    /// Generic rejection from the settings validator.
    #[error("error in command-line options:\n{0}")]
    Validation(String),

    /// The persisted settings document exists but cannot be parsed.
    #[error("failed to parse settings document: {0}")]
    Parse(#[from] serde_json::Error),

    /// I/O failure outside the soft-absent cases.
    #[error("settings I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SettingsError {
    /// Whether this error names a locked field, as opposed to any other
    /// validation or merge failure.
    pub fn is_locked_field(&self) -> bool {
        matches!(self, SettingsError::LockedField(_))
    }
}
