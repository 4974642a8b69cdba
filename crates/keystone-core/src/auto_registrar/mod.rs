//! # Keystone Auto-Registration
//!
//! Walks declared component directories, maps each source file to a
//! [`Component`](crate::component::Component) identity, and registers it in the
//! container under a lazy factory. Files are visited in lexicographic order and
//! directories in declaration order, so registration order is deterministic.
pub mod error;
pub mod registrar;

pub use error::RegistrarError;
pub use registrar::{AutoRegistrar, ExcludeFn, InstanceFn, RegistrationConfig, register_lazily};
