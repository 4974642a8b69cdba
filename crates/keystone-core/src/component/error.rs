//! # Keystone Component Load Errors
//!
//! Errors raised by a [`Loader`](crate::component::loader::Loader) while making a
//! component's definition available or while constructing its instance.
//! These surface only to the caller that resolves the component; discovery
//! never triggers them.
use thiserror::Error;

use crate::kernel::error::BoxError;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("No definition available for component path '{path}'")]
    DefinitionNotFound { path: String },

    #[error("Constructing component '{identifier}' (path '{path}') failed: {source}")]
    ConstructorFailed {
        identifier: String,
        path: String,
        #[source]
        source: BoxError,
    },
}
