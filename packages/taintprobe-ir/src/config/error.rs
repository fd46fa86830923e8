//! Configuration error types

use thiserror::Error;

/// Configuration error type
///
/// Every variant is fatal: the analysis does not start with a catalog or
/// settings that failed to load.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Range validation error
    #[error("Invalid range for field '{field}': {value} not in {min}..={max}. {hint}")]
    Range {
        field: String,
        value: String,
        min: String,
        max: String,
        hint: String,
    },

    /// Missing version field in YAML
    #[error("Missing 'version' field in catalog file. Add 'version: 1' to the top of your YAML file.")]
    MissingVersion,

    /// Unsupported version
    #[error("Unsupported catalog version {found}. Supported versions: {}", supported.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", "))]
    UnsupportedVersion { found: u32, supported: Vec<u32> },

    /// Unknown preset name
    #[error("Unknown preset '{0}'. Valid presets: fast, balanced, thorough")]
    UnknownPreset(String),

    /// Malformed qualified name in a catalog entry
    #[error("Invalid {role} entry name: {reason}")]
    InvalidName { role: String, reason: String },

    /// Malformed argument position
    #[error("Invalid argument position '{value}' in {role} entry '{name}'. Expected N, N.., return or receiver")]
    InvalidPosition {
        role: String,
        name: String,
        value: String,
    },

    /// Same name declared twice for one role
    #[error("Duplicate {role} entry '{name}'")]
    DuplicateEntry { role: String, name: String },

    /// Same name declared with contradicting roles
    #[error("Conflicting catalog entries for '{name}': declared as both {first} and {second}")]
    ConflictingEntry {
        name: String,
        first: String,
        second: String,
    },

    /// Rule with nothing to do
    #[error("{role} entry '{name}' has an empty '{field}' list")]
    EmptyRule {
        role: String,
        name: String,
        field: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    /// Create a range error with a hint
    pub fn range_with_hint(
        field: impl Into<String>,
        value: impl ToString,
        min: impl ToString,
        max: impl ToString,
        hint: impl Into<String>,
    ) -> Self {
        Self::Range {
            field: field.into(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
            hint: hint.into(),
        }
    }
}
