//! Error types for declaration loading.
//!
//! Covers reading the file, decoding it, and validating the option tables
//! it declares.

use optcommand_core::ValidationError;
use thiserror::Error;

/// Errors that can occur while loading a command declaration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// File extension is neither YAML nor JSON.
    #[error("unsupported declaration file: {0}")]
    UnsupportedFormat(String),

    /// An option table in the declaration failed validation.
    #[error("invalid options for `{command}`: {source}")]
    InvalidOptions {
        /// Command path, e.g. `tool build`
        command: String,
        #[source]
        source: ValidationError,
    },
}

/// Convenience alias for results with [`ConfigError`].
pub type Result<T> = std::result::Result<T, ConfigError>;
