//! # Keystone Booter
//!
//! Lifecycle registry for bootable components. Each bootable moves through
//! `Registered -> Initialized -> Started -> Stopped`; starting one first
//! starts its dependencies in a deterministic topological order.
//!
//! - [`BooterBuilder`] is the mutable boot-phase registry.
//! - [`Booter`] is what remains after [`BooterBuilder::finalize`]: it can only
//!   stop and shut down components.
//! - Boot files under the configured boot paths name the bootables; their
//!   hooks come from a [`BootManifest`].
pub mod bootable;
pub mod lifecycle;
pub mod dependency;
pub mod error;
pub mod manifest;

pub use bootable::{BootKey, Bootable, LifecycleHook, LifecyclePhase, LifecycleState, StopHook};
pub use lifecycle::{Booter, BooterBuilder};
pub use dependency::{BootDependency, resolve_order};
pub use error::BooterError;
pub use manifest::{BootDefinition, BootManifest};
