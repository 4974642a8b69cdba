//! # Keystone Components
//!
//! Identity model for components: how a raw name or file path turns into a
//! stable identifier and logical path, how a component is located on disk,
//! and how its instance is produced through a [`Loader`].
//!
//! - [`Component`] / [`ComponentOptions`] in `identity`
//! - [`Loader`], [`Manifest`] and the default [`ManifestLoader`] in `loader`
//! - per-file option overrides in `magic_comments`
pub mod error;
pub mod identity;
pub mod loader;
pub mod magic_comments;

pub use error::LoadError;
pub use identity::{Component, ComponentOptions, extract_identifier};
pub use loader::{Constructor, Loader, Manifest, ManifestLoader};
pub use magic_comments::FileOptions;

#[cfg(test)]
mod tests;
