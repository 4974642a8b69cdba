//! # Keystone Configuration Errors
//!
//! Errors raised while declaring component directories or loading container
//! settings from a file.
use std::path::PathBuf;

use thiserror::Error;

use crate::kernel::error::BoxError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Component directory '{path}' already added")]
    DuplicateComponentDir { path: String },

    #[error("Unknown or unsupported config format for path: {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("I/O error during '{operation}' on path '{}': {source}", path.display())]
    Io {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to deserialize settings from {format}: {source}")]
    Deserialization {
        format: String,
        #[source]
        source: BoxError,
    },

    #[error("Invalid setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },
}
