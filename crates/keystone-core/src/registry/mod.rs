//! # Keystone Registry
//!
//! The registration table components and boot hooks register into. Writes go
//! through [`ComponentRegistry`]; reads through [`ComponentResolver`]. Once a
//! container is finalized only the read surface is reachable.
pub mod error;
pub mod registrations;

use std::any::Any;
use std::path::Path;
use std::sync::Arc;

use crate::kernel::error::BoxError;

pub use error::RegistryError;
pub use registrations::{Registration, Registrations};

/// A resolved component value
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Produces a component value on resolution
pub type Factory = Arc<dyn Fn() -> Result<Instance, BoxError> + Send + Sync>;

/// Read access to registered components
pub trait ComponentResolver {
    fn resolve(&self, identifier: &str) -> Result<Instance, RegistryError>;
    fn is_registered(&self, identifier: &str) -> bool;
    /// Registered identifiers in registration order
    fn keys(&self) -> Vec<String>;
    fn root(&self) -> &Path;
}

/// Write access, available only while the container is being built
pub trait ComponentRegistry: ComponentResolver {
    fn register(&mut self, identifier: &str, memoize: bool, factory: Factory) -> Result<(), RegistryError>;
}
