//! Error types for configuration loading and validation

use std::path::PathBuf;
use thiserror::Error;

/// Result type for config operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur during configuration loading and validation
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Unknown configuration format
    #[error("Unknown configuration format for file: {path}\nSupported formats: .yml, .yaml, .toml, .json")]
    UnknownFormat { path: PathBuf },

    /// Parse error for any supported format
    #[error("Failed to parse {format} configuration{location}: {message}")]
    ParseError {
        format: &'static str,
        location: String,
        message: String,
    },

    /// IO error
    #[error("Failed to read configuration file: {path}\n{source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Value out of valid range
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Invalid integer value
    #[error("{field} must be > {min}, got {value}")]
    InvalidInteger {
        field: String,
        value: usize,
        min: usize,
    },

    /// Environment variable parsing error
    #[error("Failed to parse environment variable {var}: {message}")]
    EnvVarError { var: String, message: String },

    /// Generic validation error
    #[error("Validation error: {field}: {message}")]
    ValidationError { field: String, message: String },
}

impl ConfigError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}
