use std::fmt;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::booter::dependency::BootDependency;
use crate::booter::error::BooterError;
use crate::kernel::error::BoxError;
use crate::registry::{ComponentRegistry, ComponentResolver};

static TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("boot key pattern is valid"));

/// Init and start hooks may register components
pub type LifecycleHook = Box<dyn FnMut(&mut dyn ComponentRegistry) -> Result<(), BoxError> + Send + Sync>;

/// Stop hooks only see the read surface
pub type StopHook = Box<dyn FnMut(&dyn ComponentResolver) -> Result<(), BoxError> + Send + Sync>;

/// Identifier of a bootable component: a single token such as `db` or `cache`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BootKey(String);

impl BootKey {
    pub fn new(key: &str) -> Result<Self, BooterError> {
        if Self::is_valid(key) {
            Ok(Self(key.to_string()))
        } else {
            Err(BooterError::InvalidComponent {
                key: key.to_string(),
                reason: "boot keys must be a single identifier token".to_string(),
            })
        }
    }

    pub fn is_valid(key: &str) -> bool {
        TOKEN.is_match(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BootKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BootKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Lifecycle state. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LifecycleState {
    Registered,
    Initialized,
    Started,
    Stopped,
}

/// The hook a failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    Init,
    Start,
    Stop,
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecyclePhase::Init => "init",
            LifecyclePhase::Start => "start",
            LifecyclePhase::Stop => "stop",
        };
        f.write_str(name)
    }
}

/// A component with an explicit init -> start -> stop lifecycle.
///
/// ```
/// use keystone_core::booter::{BootDependency, Bootable};
///
/// let cache = Bootable::new("cache")
///     .unwrap()
///     .depends_on(BootDependency::required("db"))
///     .on_start(|_container| Ok(()));
/// assert_eq!(cache.dependencies().len(), 1);
/// ```
pub struct Bootable {
    key: BootKey,
    boot_file: Option<PathBuf>,
    dependencies: Vec<BootDependency>,
    init: Option<LifecycleHook>,
    start: Option<LifecycleHook>,
    stop: Option<StopHook>,
    state: LifecycleState,
}

impl Bootable {
    pub fn new(key: &str) -> Result<Self, BooterError> {
        Ok(Self::with_key(BootKey::new(key)?))
    }

    pub fn with_key(key: BootKey) -> Self {
        Self {
            key,
            boot_file: None,
            dependencies: Vec::new(),
            init: None,
            start: None,
            stop: None,
            state: LifecycleState::Registered,
        }
    }

    pub fn key(&self) -> &BootKey {
        &self.key
    }

    pub fn boot_file(&self) -> Option<&Path> {
        self.boot_file.as_deref()
    }

    pub fn dependencies(&self) -> &[BootDependency] {
        &self.dependencies
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn is_started(&self) -> bool {
        self.state == LifecycleState::Started
    }

    pub fn with_boot_file(mut self, boot_file: impl Into<PathBuf>) -> Self {
        self.boot_file = Some(boot_file.into());
        self
    }

    pub fn depends_on(mut self, dependency: BootDependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    pub fn on_init<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut dyn ComponentRegistry) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.init = Some(Box::new(hook));
        self
    }

    pub fn on_start<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut dyn ComponentRegistry) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.start = Some(Box::new(hook));
        self
    }

    pub fn on_stop<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&dyn ComponentResolver) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.stop = Some(Box::new(hook));
        self
    }

    /// Runs the init hook unless already past `Registered`.
    pub(crate) fn init(&mut self, container: &mut dyn ComponentRegistry) -> Result<(), BooterError> {
        if self.state != LifecycleState::Registered {
            return Ok(());
        }
        if let Some(hook) = self.init.as_mut() {
            hook(container).map_err(|source| BooterError::HookFailed {
                key: self.key.to_string(),
                phase: LifecyclePhase::Init,
                source,
            })?;
        }
        self.state = LifecycleState::Initialized;
        Ok(())
    }

    /// Runs init if needed, then the start hook. Callers check for `Stopped`.
    pub(crate) fn start(&mut self, container: &mut dyn ComponentRegistry) -> Result<(), BooterError> {
        self.init(container)?;
        if self.state == LifecycleState::Started {
            return Ok(());
        }
        if let Some(hook) = self.start.as_mut() {
            hook(container).map_err(|source| BooterError::HookFailed {
                key: self.key.to_string(),
                phase: LifecyclePhase::Start,
                source,
            })?;
        }
        self.state = LifecycleState::Started;
        Ok(())
    }

    pub(crate) fn stop(&mut self, container: &dyn ComponentResolver) -> Result<(), BooterError> {
        if self.state != LifecycleState::Started {
            return Err(BooterError::ComponentNotStarted {
                key: self.key.to_string(),
            });
        }
        // Stopped before the hook runs; a failing hook still leaves the component stopped.
        self.state = LifecycleState::Stopped;
        if let Some(hook) = self.stop.as_mut() {
            hook(container).map_err(|source| BooterError::HookFailed {
                key: self.key.to_string(),
                phase: LifecyclePhase::Stop,
                source,
            })?;
        }
        Ok(())
    }
}

impl fmt::Debug for Bootable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bootable")
            .field("key", &self.key)
            .field("boot_file", &self.boot_file)
            .field("dependencies", &self.dependencies)
            .field("state", &self.state)
            .finish()
    }
}
