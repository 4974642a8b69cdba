use std::collections::HashSet;
use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;

use crate::booter::bootable::{BootKey, Bootable, LifecycleState};
use crate::booter::dependency::resolve_order;
use crate::booter::error::BooterError;
use crate::booter::manifest::BootManifest;
use crate::component::Component;
use crate::config::ContainerConfig;
use crate::registry::{ComponentRegistry, ComponentResolver};
use crate::utils::fs::{file_stem, list_files_with_extension};

/// Registered bootables plus the ordered list of started keys. Shared by the
/// building and the frozen booter.
#[derive(Debug, Default)]
struct Lifecycle {
    components: Vec<Bootable>,
    started: Vec<String>,
}

impl Lifecycle {
    fn index_of(&self, key: &str) -> Option<usize> {
        self.components.iter().position(|component| component.key().as_str() == key)
    }

    fn get(&self, key: &str) -> Option<&Bootable> {
        self.index_of(key).map(|index| &self.components[index])
    }

    fn register(&mut self, bootable: Bootable) -> Result<(), BooterError> {
        if let Some(existing) = self.get(bootable.key().as_str()) {
            if existing.boot_file() != bootable.boot_file() {
                return Err(BooterError::ComponentFileMismatch {
                    key: bootable.key().to_string(),
                    existing: existing.boot_file().map(Path::to_path_buf),
                    incoming: bootable.boot_file().map(Path::to_path_buf),
                });
            }
            log::debug!("Boot component '{}' already registered", bootable.key());
            return Ok(());
        }

        log::debug!("Registered boot component '{}'", bootable.key());
        self.components.push(bootable);
        Ok(())
    }

    fn init(&mut self, key: &str, container: &mut dyn ComponentRegistry) -> Result<(), BooterError> {
        let index = self.index_of(key).ok_or_else(|| not_registered(key))?;
        self.components[index].init(container)
    }

    /// Starts each planned key that is not started yet, in plan order.
    fn start_planned(&mut self, plan: &[String], container: &mut dyn ComponentRegistry) -> Result<(), BooterError> {
        for key in plan {
            let index = self.index_of(key).ok_or_else(|| not_registered(key))?;
            let bootable = &mut self.components[index];

            match bootable.state() {
                LifecycleState::Started => continue,
                LifecycleState::Stopped => {
                    return Err(BooterError::ComponentAlreadyStopped { key: key.clone() });
                }
                LifecycleState::Registered | LifecycleState::Initialized => {}
            }

            log::info!("Starting boot component: {}", key);
            bootable.start(container)?;
            self.started.push(key.clone());
        }
        Ok(())
    }

    fn stop(&mut self, key: &str, container: &dyn ComponentResolver) -> Result<(), BooterError> {
        let index = self.index_of(key).ok_or_else(|| not_registered(key))?;
        let bootable = &mut self.components[index];

        log::info!("Stopping boot component: {}", key);
        let result = bootable.stop(container);
        if bootable.state() == LifecycleState::Stopped {
            self.started.retain(|started| started != key);
        }
        result
    }

    /// Stops started components in reverse start order. Never-started ones are
    /// left alone.
    fn shutdown(&mut self, container: &dyn ComponentResolver) -> Result<(), BooterError> {
        log::info!("Shutting down {} boot component(s)...", self.started.len());
        let started: Vec<String> = self.started.iter().rev().cloned().collect();
        for key in started {
            if let Err(e) = self.stop(&key, container) {
                log::error!("Error stopping boot component {}: {}", key, e);
                return Err(e);
            }
        }
        log::info!("Boot component shutdown complete.");
        Ok(())
    }

    fn state(&self, key: &str) -> Option<LifecycleState> {
        self.get(key).map(Bootable::state)
    }

    fn is_started(&self, key: &str) -> bool {
        self.started.iter().any(|started| started == key)
    }

    fn keys(&self) -> Vec<String> {
        self.components.iter().map(|component| component.key().to_string()).collect()
    }
}

fn not_registered(key: &str) -> BooterError {
    BooterError::InvalidComponent {
        key: key.to_string(),
        reason: "no boot component registered under this key".to_string(),
    }
}

/// Lifecycle registry during the boot phase.
///
/// Boot files are discovered under the configured boot paths and loaded on
/// demand: the first time a key is looked up, its boot file's definition is
/// taken from the [`BootManifest`] and registered.
#[derive(Debug)]
pub struct BooterBuilder {
    boot_dirs: Vec<PathBuf>,
    extension: String,
    manifest: BootManifest,
    lifecycle: Lifecycle,
    loaded: HashSet<PathBuf>,
    boot_files: OnceCell<Vec<PathBuf>>,
}

impl BooterBuilder {
    pub fn new(boot_dirs: Vec<PathBuf>, extension: &str, manifest: BootManifest) -> Self {
        Self {
            boot_dirs,
            extension: extension.to_string(),
            manifest,
            lifecycle: Lifecycle::default(),
            loaded: HashSet::new(),
            boot_files: OnceCell::new(),
        }
    }

    pub fn from_config(config: &ContainerConfig, manifest: BootManifest) -> Self {
        Self::new(config.boot_dirs(), &config.source_extension, manifest)
    }

    /// Register a bootable. Registering the same key again is a no-op when it
    /// comes from the same boot file, and an error otherwise.
    pub fn register(&mut self, bootable: Bootable) -> Result<(), BooterError> {
        self.lifecycle.register(bootable)
    }

    /// Boot files across all boot paths, in path order then name order. When
    /// two paths hold the same basename, the first one wins.
    pub fn boot_files(&self) -> Result<&[PathBuf], BooterError> {
        self.boot_files
            .get_or_try_init(|| collect_boot_files(&self.boot_dirs, &self.extension))
            .map(Vec::as_slice)
    }

    /// The effective boot file for `key`, if any
    pub fn boot_file(&self, key: &str) -> Result<Option<PathBuf>, BooterError> {
        Ok(self
            .boot_files()?
            .iter()
            .find(|file| file_stem(file) == Some(key))
            .cloned())
    }

    pub fn is_bootable(&self, key: &str) -> Result<bool, BooterError> {
        Ok(self.lifecycle.index_of(key).is_some() || self.boot_file(key)?.is_some())
    }

    /// Look up a bootable, loading its boot file on first use. Identifiers
    /// that are not a single token (`"billing.invoice"`) are never bootable.
    pub fn find(&mut self, key: &str) -> Result<Option<&Bootable>, BooterError> {
        Ok(self.locate(key)?.map(|index| &self.lifecycle.components[index]))
    }

    fn locate(&mut self, key: &str) -> Result<Option<usize>, BooterError> {
        if !BootKey::is_valid(key) {
            return Ok(None);
        }
        if let Some(index) = self.lifecycle.index_of(key) {
            return Ok(Some(index));
        }
        let Some(file) = self.boot_file(key)? else {
            return Ok(None);
        };

        if !self.require(&file)? {
            return Err(BooterError::InvalidComponent {
                key: key.to_string(),
                reason: format!("boot file '{}' has no definition", file.display()),
            });
        }
        Ok(self.lifecycle.index_of(key))
    }

    /// Load a boot file: register the definition its basename maps to.
    /// Returns false when the manifest has no definition for it.
    fn require(&mut self, file: &Path) -> Result<bool, BooterError> {
        if self.loaded.contains(file) {
            return Ok(true);
        }
        let Some(key) = file_stem(file) else {
            return Ok(false);
        };
        let Some(definition) = self.manifest.definition(key).cloned() else {
            return Ok(false);
        };

        log::debug!("Loading boot file {}", file.display());
        let bootable = definition(Bootable::new(key)?.with_boot_file(file));
        self.lifecycle.register(bootable)?;
        self.loaded.insert(file.to_path_buf());
        Ok(true)
    }

    /// Load every boot file whose key is not registered yet.
    pub fn load_all(&mut self) -> Result<(), BooterError> {
        let files = self.boot_files()?.to_vec();
        for file in files {
            let Some(key) = file_stem(&file).map(str::to_string) else {
                continue;
            };
            if !BootKey::is_valid(&key) {
                log::warn!("Ignoring boot file {}: name is not a valid key", file.display());
                continue;
            }
            if self.lifecycle.index_of(&key).is_some() {
                continue;
            }
            if !self.require(&file)? {
                log::warn!("Ignoring boot file {}: no definition for '{}'", file.display(), key);
            }
        }
        Ok(())
    }

    fn expect_component(&mut self, key: &str) -> Result<usize, BooterError> {
        self.locate(key)?.ok_or_else(|| not_registered(key))
    }

    /// Run the init hook of `key` once.
    pub fn init(&mut self, key: &str, container: &mut dyn ComponentRegistry) -> Result<(), BooterError> {
        self.expect_component(key)?;
        self.lifecycle.init(key, container)
    }

    /// Start `key` and, first, everything it depends on.
    pub fn start(&mut self, key: &str, container: &mut dyn ComponentRegistry) -> Result<(), BooterError> {
        let index = self.expect_component(key)?;
        match self.lifecycle.components[index].state() {
            LifecycleState::Started => return Ok(()),
            LifecycleState::Stopped => {
                return Err(BooterError::ComponentAlreadyStopped { key: key.to_string() });
            }
            LifecycleState::Registered | LifecycleState::Initialized => {}
        }

        let plan = resolve_order(key, |dependency| {
            Ok(self
                .locate(dependency)?
                .map(|index| self.lifecycle.components[index].dependencies().to_vec()))
        })?;
        log::debug!("Start plan for '{}': {:?}", key, plan);

        self.lifecycle.start_planned(&plan, container)
    }

    pub fn stop(&mut self, key: &str, container: &dyn ComponentResolver) -> Result<(), BooterError> {
        self.expect_component(key)?;
        self.lifecycle.stop(key, container)
    }

    pub fn shutdown(&mut self, container: &dyn ComponentResolver) -> Result<(), BooterError> {
        self.lifecycle.shutdown(container)
    }

    /// Start the boot component a regular component hangs off, if there is
    /// one: the bootable keyed by the component's root key.
    pub fn boot_dependency(
        &mut self,
        component: &Component,
        container: &mut dyn ComponentRegistry,
    ) -> Result<(), BooterError> {
        let key = component.root_key();
        if self.locate(key)?.is_some() {
            log::debug!("Booting '{}' for component '{}'", key, component.identifier());
            self.start(key, container)?;
        }
        Ok(())
    }

    /// Load all boot files, start every component in registration order, and
    /// freeze.
    pub fn finalize(mut self, container: &mut dyn ComponentRegistry) -> Result<Booter, BooterError> {
        log::info!("Finalizing booter...");
        self.load_all()?;
        for key in self.lifecycle.keys() {
            if self.lifecycle.state(&key) == Some(LifecycleState::Stopped) {
                continue;
            }
            self.start(&key, container)?;
        }
        log::info!("Booter finalized: {} component(s) started", self.lifecycle.started.len());

        let boot_files = self.boot_files()?.to_vec();
        Ok(Booter {
            lifecycle: self.lifecycle,
            boot_files,
        })
    }

    pub fn state(&self, key: &str) -> Option<LifecycleState> {
        self.lifecycle.state(key)
    }

    pub fn is_started(&self, key: &str) -> bool {
        self.lifecycle.is_started(key)
    }

    /// Started keys, in start order
    pub fn started(&self) -> &[String] {
        &self.lifecycle.started
    }

    /// Registered keys, in registration order
    pub fn keys(&self) -> Vec<String> {
        self.lifecycle.keys()
    }

    pub fn manifest(&self) -> &BootManifest {
        &self.manifest
    }
}

/// Frozen lifecycle registry. Nothing can be registered or started; started
/// components can still be stopped.
#[derive(Debug)]
pub struct Booter {
    lifecycle: Lifecycle,
    boot_files: Vec<PathBuf>,
}

impl Booter {
    pub fn stop(&mut self, key: &str, container: &dyn ComponentResolver) -> Result<(), BooterError> {
        if !BootKey::is_valid(key) {
            return Err(BooterError::InvalidComponent {
                key: key.to_string(),
                reason: "boot keys must be a single identifier token".to_string(),
            });
        }
        self.lifecycle.stop(key, container)
    }

    pub fn shutdown(&mut self, container: &dyn ComponentResolver) -> Result<(), BooterError> {
        self.lifecycle.shutdown(container)
    }

    pub fn get(&self, key: &str) -> Option<&Bootable> {
        self.lifecycle.get(key)
    }

    pub fn state(&self, key: &str) -> Option<LifecycleState> {
        self.lifecycle.state(key)
    }

    pub fn is_started(&self, key: &str) -> bool {
        self.lifecycle.is_started(key)
    }

    pub fn started(&self) -> &[String] {
        &self.lifecycle.started
    }

    pub fn keys(&self) -> Vec<String> {
        self.lifecycle.keys()
    }

    pub fn boot_files(&self) -> &[PathBuf] {
        &self.boot_files
    }
}

fn collect_boot_files(boot_dirs: &[PathBuf], extension: &str) -> Result<Vec<PathBuf>, BooterError> {
    let mut seen = HashSet::new();
    let mut boot_files = Vec::new();

    for dir in boot_dirs {
        let files = list_files_with_extension(dir, extension).map_err(|source| BooterError::Io {
            path: dir.clone(),
            source,
        })?;
        for file in files {
            let Some(key) = file_stem(&file) else {
                continue;
            };
            if seen.insert(key.to_string()) {
                boot_files.push(file);
            } else {
                log::debug!("Boot file {} shadowed by an earlier boot path", file.display());
            }
        }
    }

    Ok(boot_files)
}
