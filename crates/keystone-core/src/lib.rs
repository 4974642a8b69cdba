pub mod auto_registrar;
pub mod booter;
pub mod component;
pub mod config;
pub mod kernel;
pub mod registry;
pub mod utils;

// Re-export key public types for the binary and for embedding applications
pub use auto_registrar::{AutoRegistrar, RegistrationConfig};
pub use booter::{BootDependency, BootManifest, Bootable, Booter, BooterBuilder};
pub use component::{Component, ComponentOptions, Loader, Manifest, ManifestLoader};
pub use config::{ComponentDir, ComponentDirs, ContainerConfig, ContainerSettings};
pub use kernel::error::Error as KernelError;
pub use kernel::{BoxError, Container, ContainerBuilder, Result};
pub use registry::{ComponentRegistry, ComponentResolver, Factory, Instance, Registrations};

#[cfg(test)]
mod tests;
