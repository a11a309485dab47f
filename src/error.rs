// Error types for tooolbar
//
// Every failure is raised synchronously at the point of misuse and returned
// to the caller. The library never logs or swallows these.

use thiserror::Error;

/// Main error type for toolbar operations
#[derive(Error, Debug)]
pub enum ToolbarError {
    #[error("{kind} must have property \"{property}\"")]
    MissingProperty { kind: String, property: String },

    #[error("Malformed configuration for {kind}: {source}")]
    MalformedConfig {
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unknown bar item type \"{0}\"")]
    UnknownType(String),

    #[error("Type \"{alias}\" does not match: expected {expected}, got {found}")]
    TypeMismatch {
        alias: String,
        expected: String,
        found: String,
    },

    #[error("Invalid {kind} configuration: {reason}")]
    InvalidConfig { kind: String, reason: String },

    #[error("Invalid range: min {min} is greater than max {max}")]
    InvalidRange { min: i64, max: i64 },

    #[error("Container \"{0}\" does not resolve to a mount point")]
    InvalidContainer(String),

    #[error("Unknown theme \"{0}\"")]
    UnknownTheme(String),

    #[error("Unknown theme token \"{0}\"")]
    UnknownThemeToken(String),

    #[error("No tool with id \"{0}\"")]
    ToolNotFound(String),

    #[error("Invalid value for tool \"{id}\": {reason}")]
    InvalidValue { id: String, reason: String },
}

impl ToolbarError {
    pub(crate) fn invalid_config(kind: &str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            kind: kind.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(kind: &str, property: &str) -> Self {
        Self::MissingProperty {
            kind: kind.to_string(),
            property: property.to_string(),
        }
    }
}

/// Toolbar file errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Failed to convert item configuration: {0}")]
    ItemError(#[from] serde_json::Error),

    #[error("Config directory not found")]
    NoConfigDir,

    #[error("Toolbar error: {0}")]
    Toolbar(#[from] ToolbarError),
}

// Convenience type aliases for common Result types
pub type Result<T> = std::result::Result<T, ToolbarError>;
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
