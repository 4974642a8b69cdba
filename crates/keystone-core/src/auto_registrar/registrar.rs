use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::auto_registrar::error::RegistrarError;
use crate::component::{Component, ComponentOptions, magic_comments};
use crate::config::{ComponentDir, ContainerConfig};
use crate::kernel::constants::PATH_SEPARATOR;
use crate::kernel::error::BoxError;
use crate::registry::{ComponentRegistry, Factory, Instance, RegistryError};
use crate::utils::fs::find_files_with_extension;

/// Predicate deciding whether a discovered component is skipped
pub type ExcludeFn = Arc<dyn Fn(&Component) -> bool + Send + Sync>;

/// Produces the registered value for a discovered component
pub type InstanceFn = Arc<dyn Fn(&Component) -> Result<Instance, BoxError> + Send + Sync>;

/// Per-call registration policy.
#[derive(Clone)]
pub struct RegistrationConfig {
    memoize: bool,
    exclude: ExcludeFn,
    instance: Option<InstanceFn>,
}

impl RegistrationConfig {
    pub fn new() -> Self {
        Self {
            memoize: false,
            exclude: Arc::new(|_: &Component| false),
            instance: None,
        }
    }

    /// Memoization for components without their own `memoize` option
    pub fn memoize(mut self, memoize: bool) -> Self {
        self.memoize = memoize;
        self
    }

    pub fn exclude<F>(mut self, exclude: F) -> Self
    where
        F: Fn(&Component) -> bool + Send + Sync + 'static,
    {
        self.exclude = Arc::new(exclude);
        self
    }

    /// Build instances with `instance` instead of the component's loader.
    /// The loader is then never consulted, not even to require the file.
    pub fn instance<F>(mut self, instance: F) -> Self
    where
        F: Fn(&Component) -> Result<Instance, BoxError> + Send + Sync + 'static,
    {
        self.instance = Some(Arc::new(instance));
        self
    }

    pub fn is_memoized(&self) -> bool {
        self.memoize
    }

    pub fn excludes(&self, component: &Component) -> bool {
        (self.exclude)(component)
    }
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Scans component directories and registers what it finds under lazy
/// factories. Nothing is instantiated during a scan.
pub struct AutoRegistrar<'a> {
    config: &'a ContainerConfig,
    options: ComponentOptions,
}

impl<'a> AutoRegistrar<'a> {
    /// `options` supplies the separator, extension and loader for every
    /// discovered identity.
    pub fn new(config: &'a ContainerConfig, options: ComponentOptions) -> Self {
        Self { config, options }
    }

    /// Register every auto-register directory, in declaration order, with the
    /// default policy.
    pub fn finalize(&self, registry: &mut dyn ComponentRegistry) -> Result<Vec<Component>, RegistrarError> {
        let registration = RegistrationConfig::default();
        let mut registered = Vec::new();

        for dir in self.config.component_dirs.iter().filter(|dir| dir.auto_register) {
            registered.extend(self.call(registry, dir, &registration)?);
        }

        log::info!("Auto-registered {} component(s)", registered.len());
        Ok(registered)
    }

    /// Register the components of one directory. Returns the identities that
    /// were registered, in registration order.
    pub fn call(
        &self,
        registry: &mut dyn ComponentRegistry,
        dir: &ComponentDir,
        registration: &RegistrationConfig,
    ) -> Result<Vec<Component>, RegistrarError> {
        let mut registered = Vec::new();

        for component in self.discover(dir)? {
            if registry.is_registered(component.identifier()) {
                log::debug!("Skipping '{}': already registered", component.identifier());
                continue;
            }
            if !component.auto_register() || registration.excludes(&component) {
                log::debug!("Skipping '{}': excluded from auto-registration", component.identifier());
                continue;
            }

            register_lazily(registry, &component, registration)?;
            registered.push(component);
        }

        Ok(registered)
    }

    /// Every component in `dir`, in lexicographic file order, with per-file
    /// overrides applied.
    pub fn discover(&self, dir: &ComponentDir) -> Result<Vec<Component>, RegistrarError> {
        let dir_root = self.config.dir_path(dir);
        let namespace = self.config.namespace_for(dir);
        let mut components = Vec::new();

        for file in self.files(dir)? {
            let file_options = magic_comments::parse_file(&file).map_err(|source| RegistrarError::Io {
                path: file.clone(),
                source,
            })?;

            let options = file_options.apply(self.options.clone().namespace(namespace));
            let raw_name = relative_name(&dir_root, &file);
            components.push(Component::new(&raw_name, options).with_file_path(file));
        }

        Ok(components)
    }

    /// Component files of `dir`, sorted by full path.
    pub fn files(&self, dir: &ComponentDir) -> Result<Vec<PathBuf>, RegistrarError> {
        let dir_root = self.config.dir_path(dir);
        if !dir_root.is_dir() {
            return Err(RegistrarError::ComponentsDirMissing { path: dir_root });
        }

        find_files_with_extension(&dir_root, &self.config.source_extension)
            .map_err(|source| RegistrarError::Io { path: dir_root, source })
    }
}

/// The file's path below `dir_root`, without extension, `/`-separated.
fn relative_name(dir_root: &Path, file: &Path) -> String {
    let relative = file.strip_prefix(dir_root).unwrap_or(file).with_extension("");
    relative
        .components()
        .map(|part| part.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join(PATH_SEPARATOR)
}

/// Register `component` under a lazy factory. The component's own `memoize`
/// option wins over the registration policy.
pub fn register_lazily(
    registry: &mut dyn ComponentRegistry,
    component: &Component,
    registration: &RegistrationConfig,
) -> Result<(), RegistryError> {
    let memoize = component.memoize().unwrap_or(registration.memoize);
    registry.register(
        component.identifier(),
        memoize,
        lazy_factory(component.clone(), registration.instance.clone()),
    )
}

// Loader-backed factories require the component at most once, on first
// resolution. A custom instance function bypasses the loader.
fn lazy_factory(component: Component, instance: Option<InstanceFn>) -> Factory {
    if let Some(instance) = instance {
        return Arc::new(move || -> Result<Instance, BoxError> { instance(&component) });
    }

    let required = OnceCell::new();
    Arc::new(move || -> Result<Instance, BoxError> {
        required.get_or_try_init(|| component.require())?;
        Ok(component.instance()?)
    })
}
