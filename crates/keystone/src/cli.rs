use keystone_core::auto_registrar::AutoRegistrar;
use keystone_core::booter::{BootManifest, BooterBuilder};
use keystone_core::{Component, ContainerConfig, Registrations, Result};

/// One `<identifier>\t<path>` line per component auto-registration would
/// register, in registration order. Nothing is loaded or instantiated.
pub fn scan(config: &ContainerConfig) -> Result<Vec<String>> {
    let mut registry = Registrations::new(config.root());
    let registrar = AutoRegistrar::new(config, config.component_options());
    let components = registrar.finalize(&mut registry)?;

    Ok(components
        .iter()
        .map(|component| format!("{}\t{}", component.identifier(), component.path()))
        .collect())
}

/// Effective boot files, in boot path order
pub fn boot_files(config: &ContainerConfig) -> Result<Vec<String>> {
    let booter = BooterBuilder::from_config(config, BootManifest::new());
    Ok(booter
        .boot_files()?
        .iter()
        .map(|file| file.display().to_string())
        .collect())
}

/// The file backing `identifier` on the load path, if any
pub fn locate(config: &ContainerConfig, identifier: &str) -> Option<String> {
    Component::locate(identifier, config, &config.component_options())
        .and_then(|component| component.file_path().map(|file| file.display().to_string()))
}
