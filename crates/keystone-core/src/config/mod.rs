//! # Keystone Configuration
//!
//! Container-wide configuration: the root directory, declared component
//! directories with their per-directory policy, boot paths, and the identifier
//! separator and source extension. Settings can be loaded from JSON, TOML or
//! YAML files.
pub mod component_dir;
pub mod component_dirs;
pub mod error;
pub mod settings;

pub use component_dir::ComponentDir;
pub use component_dirs::ComponentDirs;
pub use error::ConfigError;
pub use settings::{ConfigFormat, ContainerConfig, ContainerSettings};
