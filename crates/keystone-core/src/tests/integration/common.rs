#![cfg(test)]

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use tempfile::{TempDir, tempdir};

use crate::booter::{BootDependency, BootManifest};
use crate::component::Manifest;
use crate::kernel::bootstrap::ContainerBuilder;
use crate::kernel::error::BoxError;
use crate::registry::{ComponentRegistry, Factory, Instance};

/// Ordered record of lifecycle hook calls
pub type Events = Arc<Mutex<Vec<String>>>;

#[derive(Debug, PartialEq)]
pub struct OrderRepository {
    pub table: &'static str,
}

#[derive(Debug)]
pub struct OrderService;

#[derive(Debug)]
pub struct Handler {
    pub route: String,
}

pub fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn shared(value: &'static str) -> Factory {
    Arc::new(move || -> Result<Instance, BoxError> { Ok(Arc::new(value)) })
}

/// Records `start:<key>` / `stop:<key>` and registers `registers` on start.
fn define_recorded(
    boot_manifest: &mut BootManifest,
    key: &'static str,
    dependencies: Vec<BootDependency>,
    registers: Option<(&'static str, &'static str)>,
    events: &Events,
) {
    let events = events.clone();
    boot_manifest.define(key, move |mut bootable| {
        for dependency in &dependencies {
            bootable = bootable.depends_on(dependency.clone());
        }
        let (start, stop) = (events.clone(), events.clone());
        bootable
            .on_start(move |container: &mut dyn ComponentRegistry| {
                start.lock().unwrap().push(format!("start:{}", key));
                if let Some((identifier, value)) = registers {
                    container.register(identifier, true, shared(value))?;
                }
                Ok(())
            })
            .on_stop(move |_| {
                stop.lock().unwrap().push(format!("stop:{}", key));
                Ok(())
            })
    });
}

/// A small shop application on disk:
///
/// - `lib/` (namespace `shop`): `orders/repository`, `orders/service` (memoized)
/// - `app/`: `web/handler`, `web/legacy` (opted out of auto-registration)
/// - `system/boot`: `orders` (needs `persistence`), `persistence`
/// - `vendor/boot`: `persistence` (shadowed), `telemetry`
pub fn setup_application() -> (TempDir, Events, ContainerBuilder) {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();

    write(
        root,
        "keystone.json",
        r#"{
            "root": ".",
            "component_dirs": [
                { "path": "lib", "default_namespace": "shop" },
                { "path": "app" }
            ],
            "boot_paths": ["system/boot", "vendor/boot"]
        }"#,
    );
    write(root, "lib/shop/orders/repository.rs", "pub struct OrderRepository;\n");
    write(root, "lib/shop/orders/service.rs", "// memoize: true\npub struct OrderService;\n");
    write(root, "app/web/handler.rs", "pub fn handle() {}\n");
    write(root, "app/web/legacy.rs", "// auto_register: false\npub fn handle() {}\n");
    write(root, "system/boot/orders.rs", "");
    write(root, "system/boot/persistence.rs", "");
    write(root, "vendor/boot/persistence.rs", "");
    write(root, "vendor/boot/telemetry.rs", "");

    let mut manifest = Manifest::new();
    manifest
        .define_value("shop/orders/repository", || OrderRepository { table: "orders" })
        .define_value("shop/orders/service", || OrderService)
        .define("web/handler", |component| {
            Ok(Arc::new(Handler {
                route: format!("/{}", component.path()),
            }) as Instance)
        })
        .define("web/legacy", |component| {
            Ok(Arc::new(Handler {
                route: format!("/{}", component.path()),
            }) as Instance)
        });

    let events = Events::default();
    let mut boot_manifest = BootManifest::new();
    define_recorded(
        &mut boot_manifest,
        "persistence",
        vec![],
        Some(("persistence.pool", "pool:8")),
        &events,
    );
    define_recorded(
        &mut boot_manifest,
        "orders",
        vec![BootDependency::required("persistence")],
        Some(("orders.config", "currency=EUR")),
        &events,
    );
    define_recorded(
        &mut boot_manifest,
        "telemetry",
        vec![BootDependency::optional("tracing")],
        Some(("telemetry.sink", "stdout")),
        &events,
    );

    let builder = ContainerBuilder::from_settings_file(&root.join("keystone.json"), manifest, boot_manifest)
        .expect("settings file loads");
    (temp_dir, events, builder)
}
