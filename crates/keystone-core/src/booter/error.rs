//! # Keystone Booter Errors
//!
//! Errors raised by the lifecycle registry. All of them signal misuse or a
//! broken boot definition; none are retried.
use std::path::PathBuf;

use thiserror::Error;

use crate::booter::bootable::LifecyclePhase;
use crate::kernel::error::BoxError;

#[derive(Debug, Error)]
pub enum BooterError {
    #[error("Invalid boot component '{key}': {reason}")]
    InvalidComponent { key: String, reason: String },

    #[error("Boot component '{key}' is already registered from {}, cannot register it from {}", display_file(existing), display_file(incoming))]
    ComponentFileMismatch {
        key: String,
        existing: Option<PathBuf>,
        incoming: Option<PathBuf>,
    },

    #[error("Boot component '{key}' has not been started")]
    ComponentNotStarted { key: String },

    #[error("Boot component '{key}' was stopped and cannot be started again")]
    ComponentAlreadyStopped { key: String },

    #[error("Boot component '{component}' requires '{dependency}', which is not defined")]
    MissingDependency { component: String, dependency: String },

    #[error("Circular boot dependency detected: {}", .0.join(" -> "))]
    CyclicDependency(Vec<String>),

    #[error("{phase} hook of boot component '{key}' failed: {source}")]
    HookFailed {
        key: String,
        phase: LifecyclePhase,
        #[source]
        source: BoxError,
    },

    #[error("I/O error while listing boot files in '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn display_file(file: &Option<PathBuf>) -> String {
    match file {
        Some(path) => format!("'{}'", path.display()),
        None => "an explicit registration".to_string(),
    }
}
