//! # Keystone Registry Errors
//!
//! Errors raised by the registration table: conflicting registrations,
//! unknown identifiers, and failures of a registration's factory at
//! resolution time.
use thiserror::Error;

use crate::kernel::error::BoxError;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Component '{identifier}' is already registered")]
    AlreadyRegistered { identifier: String },

    #[error("Nothing registered under '{identifier}'")]
    NotRegistered { identifier: String },

    #[error("Resolving '{identifier}' failed: {source}")]
    ResolutionFailed {
        identifier: String,
        #[source]
        source: BoxError,
    },

    #[error("Component '{identifier}' is not a {expected}")]
    TypeMismatch {
        identifier: String,
        expected: &'static str,
    },
}
