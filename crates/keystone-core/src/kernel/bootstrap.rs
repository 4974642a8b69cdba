use std::any::Any;
use std::path::Path;
use std::sync::Arc;

use crate::auto_registrar::{AutoRegistrar, RegistrarError, RegistrationConfig, register_lazily};
use crate::booter::{BootManifest, Bootable, Booter, BooterBuilder};
use crate::component::{Component, ComponentOptions, Loader, Manifest, ManifestLoader, magic_comments};
use crate::config::ContainerConfig;
use crate::kernel::constants;
use crate::kernel::error::{Error, Result};
use crate::registry::{ComponentRegistry, ComponentResolver, Factory, Instance, RegistryError, Registrations};

/// Container during the boot phase.
///
/// Everything that mutates the registration table lives here: explicit
/// registration, on-demand loading of unregistered identifiers, boot
/// lifecycle calls and auto-registration. [`ContainerBuilder::finalize`]
/// consumes the builder and returns a read-only [`Container`].
#[derive(Debug)]
pub struct ContainerBuilder {
    config: ContainerConfig,
    loader: Arc<dyn Loader>,
    registrations: Registrations,
    booter: BooterBuilder,
}

impl ContainerBuilder {
    /// Builder with empty component and boot manifests.
    pub fn new(config: ContainerConfig) -> Self {
        Self::with_manifests(config, Manifest::new(), BootManifest::new())
    }

    pub fn with_manifests(config: ContainerConfig, manifest: Manifest, boot_manifest: BootManifest) -> Self {
        log::info!("Configuring {} v{} container at {}", constants::APP_NAME, constants::APP_VERSION, config.root().display());
        let booter = BooterBuilder::from_config(&config, boot_manifest);
        let registrations = Registrations::new(config.root());

        Self {
            config,
            loader: Arc::new(ManifestLoader::new(manifest)),
            registrations,
            booter,
        }
    }

    /// Load container settings from a file and build on them.
    pub fn from_settings_file(path: &Path, manifest: Manifest, boot_manifest: BootManifest) -> Result<Self> {
        let config = ContainerConfig::from_file(path)?;
        Ok(Self::with_manifests(config, manifest, boot_manifest))
    }

    /// Replace the loader used for discovered and located components.
    pub fn with_loader(mut self, loader: Arc<dyn Loader>) -> Self {
        self.loader = loader;
        self
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    pub fn booter(&self) -> &BooterBuilder {
        &self.booter
    }

    /// Identity options for this container: its separator, extension and loader.
    pub fn component_options(&self) -> ComponentOptions {
        self.config.component_options().loader(self.loader.clone())
    }

    /// Identity for a raw name under this container's options (no namespace).
    pub fn component(&self, raw_name: &str) -> Component {
        Component::new(raw_name, self.component_options())
    }

    pub fn register(&mut self, identifier: &str, memoize: bool, factory: Factory) -> Result<()> {
        self.registrations.register(identifier, memoize, factory)?;
        Ok(())
    }

    pub fn register_instance<T>(&mut self, identifier: &str, value: T) -> Result<()>
    where
        T: Any + Send + Sync,
    {
        self.registrations.register_instance(identifier, value)?;
        Ok(())
    }

    pub fn register_bootable(&mut self, bootable: Bootable) -> Result<()> {
        self.booter.register(bootable)?;
        Ok(())
    }

    pub fn is_registered(&self, identifier: &str) -> bool {
        self.registrations.is_registered(identifier)
    }

    pub fn keys(&self) -> Vec<String> {
        self.registrations.keys()
    }

    /// Resolve `identifier`, loading it on demand when it is not registered yet.
    pub fn resolve(&mut self, identifier: &str) -> Result<Instance> {
        if !self.registrations.is_registered(identifier) {
            self.load_component(identifier)?;
        }
        Ok(self.registrations.resolve(identifier)?)
    }

    pub fn resolve_as<T>(&mut self, identifier: &str) -> Result<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        if !self.registrations.is_registered(identifier) {
            self.load_component(identifier)?;
        }
        Ok(self.registrations.resolve_as::<T>(identifier)?)
    }

    /// Make an unregistered identifier resolvable.
    ///
    /// The bootable named by the identifier's root key is started first
    /// (`db` for `db.connection`); its hooks may register the identifier. A
    /// component file on the load path is then registered lazily; an
    /// unreadable component file is an error, as it is during discovery.
    /// Returns whether the identifier is registered afterwards.
    pub fn load_component(&mut self, identifier: &str) -> Result<bool> {
        if self.registrations.is_registered(identifier) {
            return Ok(true);
        }

        let options = self.component_options();
        if let Some(located) = Component::locate(identifier, &self.config, &options) {
            let component = match located.file_path() {
                Some(file) => {
                    let file_options = magic_comments::parse_file(file).map_err(|source| RegistrarError::Io {
                        path: file.to_path_buf(),
                        source,
                    })?;
                    located.with_options(file_options.apply(located.options().clone()))
                }
                None => located,
            };

            self.booter.boot_dependency(&component, &mut self.registrations)?;
            if !self.registrations.is_registered(component.identifier()) {
                register_lazily(&mut self.registrations, &component, &RegistrationConfig::default())?;
            }
        } else {
            let component = self.component(identifier);
            self.booter.boot_dependency(&component, &mut self.registrations)?;
        }

        Ok(self.registrations.is_registered(identifier))
    }

    /// Auto-register a single declared component directory.
    pub fn auto_register(&mut self, dir_path: &str, registration: RegistrationConfig) -> Result<Vec<Component>> {
        let dir = self
            .config
            .component_dirs
            .get(dir_path)
            .cloned()
            .ok_or_else(|| Error::Other(format!("Component dir '{}' is not declared", dir_path)))?;

        let options = self.component_options();
        let registrar = AutoRegistrar::new(&self.config, options);
        Ok(registrar.call(&mut self.registrations, &dir, &registration)?)
    }

    pub fn init(&mut self, key: &str) -> Result<()> {
        self.booter.init(key, &mut self.registrations)?;
        Ok(())
    }

    pub fn start(&mut self, key: &str) -> Result<()> {
        self.booter.start(key, &mut self.registrations)?;
        Ok(())
    }

    pub fn stop(&mut self, key: &str) -> Result<()> {
        self.booter.stop(key, &self.registrations)?;
        Ok(())
    }

    /// Start every bootable, auto-register every component directory, and
    /// freeze the registration table.
    pub fn finalize(self) -> Result<Container> {
        log::info!("Finalizing container...");
        let ContainerBuilder {
            config,
            loader,
            mut registrations,
            booter,
        } = self;

        let booter = booter.finalize(&mut registrations)?;

        let options = config.component_options().loader(loader);
        AutoRegistrar::new(&config, options).finalize(&mut registrations)?;

        log::info!("Container finalized with {} registration(s).", registrations.len());
        Ok(Container {
            config,
            registrations: Arc::new(registrations),
            booter,
            shut_down: false,
        })
    }
}

/// Finalized, read-only container.
///
/// Resolution is safe from any thread: the registration table sits behind an
/// `Arc` and memoized instances are produced at most once.
#[derive(Debug)]
pub struct Container {
    config: ContainerConfig,
    registrations: Arc<Registrations>,
    booter: Booter,
    shut_down: bool,
}

impl Container {
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    pub fn booter(&self) -> &Booter {
        &self.booter
    }

    /// Shared handle on the registration table, for use from other threads.
    pub fn registrations(&self) -> Arc<Registrations> {
        Arc::clone(&self.registrations)
    }

    pub fn resolve(&self, identifier: &str) -> Result<Instance> {
        Ok(self.registrations.resolve(identifier)?)
    }

    pub fn resolve_as<T>(&self, identifier: &str) -> Result<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        Ok(self.registrations.resolve_as::<T>(identifier)?)
    }

    pub fn is_registered(&self, identifier: &str) -> bool {
        self.registrations.is_registered(identifier)
    }

    /// Registered identifiers in registration order
    pub fn keys(&self) -> Vec<String> {
        self.registrations.keys()
    }

    pub fn stop(&mut self, key: &str) -> Result<()> {
        self.booter.stop(key, self.registrations.as_ref())?;
        Ok(())
    }

    /// Stop every started bootable. A container shuts down once.
    pub fn shutdown(&mut self) -> Result<()> {
        if self.shut_down {
            return Err(Error::AlreadyShutDown);
        }
        log::info!("Shutting down container...");
        self.booter.shutdown(self.registrations.as_ref())?;
        self.shut_down = true;
        log::info!("Container shutdown complete.");
        Ok(())
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }
}

impl ComponentResolver for Container {
    fn resolve(&self, identifier: &str) -> std::result::Result<Instance, RegistryError> {
        self.registrations.resolve(identifier)
    }

    fn is_registered(&self, identifier: &str) -> bool {
        self.registrations.is_registered(identifier)
    }

    fn keys(&self) -> Vec<String> {
        self.registrations.keys()
    }

    fn root(&self) -> &Path {
        self.config.root()
    }
}
