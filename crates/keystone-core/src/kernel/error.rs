//! # Keystone Kernel Errors
//!
//! Defines the top-level error type of `keystone-core`.
//!
//! [`Error`] wraps the typed error of each subsystem (component loading,
//! configuration, registry, auto-registration, booter) so container-level
//! operations can use a single [`Result`] alias while callers can still match
//! on the subsystem variant.
use std::result::Result as StdResult;

use thiserror::Error as ThisError;

use crate::auto_registrar::error::RegistrarError;
use crate::booter::error::BooterError;
use crate::component::error::LoadError;
use crate::config::error::ConfigError;
use crate::registry::error::RegistryError;

/// Boxed error returned by user-supplied hooks, factories and constructors
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("Component load error: {0}")]
    Load(#[from] LoadError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Auto-registration error: {0}")]
    Registrar(#[from] RegistrarError),

    #[error("Booter error: {0}")]
    Booter(#[from] BooterError),

    #[error("Container has already been shut down")]
    AlreadyShutDown,

    /// Generic error with message
    #[error("Error: {0}")]
    Other(String),
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}
