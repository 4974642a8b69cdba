//! # Keystone Auto-Registration Errors
use std::path::PathBuf;

use thiserror::Error;

use crate::registry::error::RegistryError;

#[derive(Debug, Error)]
pub enum RegistrarError {
    #[error("Components dir '{}' not found", path.display())]
    ComponentsDirMissing { path: PathBuf },

    #[error("I/O error while scanning '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
