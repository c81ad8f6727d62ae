//! Configuration error types.

use thiserror::Error;

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found.
    #[error("configuration file not found: {0}")]
    NotFound(std::path::PathBuf),

    /// Invalid TOML syntax.
    #[error("invalid TOML: {0}")]
    InvalidToml(#[from] toml::de::Error),

    /// Invalid families file.
    #[error("invalid families file {path}: {source}")]
    InvalidFamilies {
        path: std::path::PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The requested family is not configured.
    #[error(
        "the family {0} is not in the families file. Please choose another family or add the family to the file"
    )]
    UnknownFamily(String),

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
