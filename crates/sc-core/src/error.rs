//! Error types for sc-core

use thiserror::Error;

/// Core error type for Schemacheck
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config: {message}")]
    ConfigParseError { message: String },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: Nothing to select objects from
    #[error("[E004] No object selector for {kind}: provide a database connection, explicit objects, or a schema/name filter")]
    MissingSelector { kind: String },

    /// E005: Unknown object kind or phase name
    #[error("[E005] Unknown {what} '{value}'. Valid values: {valid}")]
    UnknownName {
        what: &'static str,
        value: String,
        valid: String,
    },

    /// E006: IO error
    #[error("[E006] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// E007: IO error with file path context
    #[error("[E007] IO error at {path}: {source}")]
    IoWithPath {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<serde_yaml::Error> for CoreError {
    fn from(err: serde_yaml::Error) -> Self {
        CoreError::ConfigParseError {
            message: err.to_string(),
        }
    }
}
