//! # Keystone Core Kernel
//!
//! The `kernel` module ties the subsystems together into a container.
//!
//! ## Key Responsibilities & Components:
//!
//! - **Container Bootstrapping**: [`ContainerBuilder`](bootstrap::ContainerBuilder)
//!   collects registrations, resolves components on demand, drives boot
//!   lifecycles, and on `finalize` produces a read-only
//!   [`Container`](bootstrap::Container).
//! - **Core Constants**: separators, default extension and boot path in the
//!   `constants` submodule.
//! - **Error Handling**: the crate-wide [`Error`](error::Error) wrapping every
//!   subsystem error, and a `Result` alias, in the `error` submodule.
pub mod bootstrap;
pub mod constants;
pub mod error;

pub use bootstrap::{Container, ContainerBuilder};
pub use error::{BoxError, Error, Result};
