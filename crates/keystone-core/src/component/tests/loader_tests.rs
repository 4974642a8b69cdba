use std::sync::Arc;

use crate::component::{Component, ComponentOptions, LoadError, Loader, Manifest, ManifestLoader};
use crate::registry::Instance;

#[derive(Debug, PartialEq)]
struct Invoice {
    number: u32,
}

fn manifest() -> Manifest {
    let mut manifest = Manifest::new();
    manifest
        .define_value("billing/invoice", || Invoice { number: 7 })
        .define("billing/broken", |_| Err("database unavailable".into()))
        .define("billing/named", |component| Ok(Arc::new(component.identifier().to_string()) as Instance));
    manifest
}

fn component(raw: &str, loader: &Arc<ManifestLoader>) -> Component {
    Component::new(raw, ComponentOptions::new().loader(loader.clone()))
}

#[test]
fn test_require_known_path() {
    let loader = Arc::new(ManifestLoader::new(manifest()));
    assert!(component("billing/invoice", &loader).require().is_ok());
}

#[test]
fn test_require_unknown_path_fails() {
    let loader = Arc::new(ManifestLoader::new(manifest()));
    let result = component("billing/refund", &loader).require();

    match result {
        Err(LoadError::DefinitionNotFound { path }) => assert_eq!(path, "billing/refund"),
        other => panic!("Expected DefinitionNotFound, got {:?}", other),
    }
}

#[test]
fn test_instance_constructs_value() {
    let loader = Arc::new(ManifestLoader::new(manifest()));
    let instance = component("billing/invoice", &loader).instance().unwrap();

    let invoice = instance.downcast_ref::<Invoice>().expect("an Invoice");
    assert_eq!(invoice, &Invoice { number: 7 });
}

#[test]
fn test_constructor_receives_component() {
    let loader = Arc::new(ManifestLoader::new(manifest()));
    let instance = component("billing/named", &loader).instance().unwrap();

    assert_eq!(instance.downcast_ref::<String>().map(String::as_str), Some("billing.named"));
}

#[test]
fn test_constructor_failure_is_wrapped() {
    let loader = Arc::new(ManifestLoader::new(manifest()));
    let error = component("billing/broken", &loader).instance().unwrap_err();

    assert!(matches!(error, LoadError::ConstructorFailed { ref identifier, .. } if identifier == "billing.broken"));
    assert!(error.to_string().contains("database unavailable"));
}

#[test]
fn test_default_loader_has_no_definitions() {
    let component = Component::new("billing/invoice", ComponentOptions::new());
    assert!(matches!(component.instance(), Err(LoadError::DefinitionNotFound { .. })));
}

#[test]
fn test_manifest_paths_sorted() {
    let manifest = manifest();
    assert_eq!(manifest.len(), 3);
    assert_eq!(manifest.paths(), vec!["billing/broken", "billing/invoice", "billing/named"]);

    let loader = ManifestLoader::new(manifest);
    assert!(loader.manifest().contains("billing/invoice"));
    assert!(!format!("{:?}", loader).is_empty());
}

#[test]
fn test_loader_trait_object() {
    let loader: Arc<dyn Loader> = Arc::new(ManifestLoader::new(manifest()));
    let component = Component::new("billing/invoice", ComponentOptions::new().loader(loader.clone()));

    assert!(loader.require(&component).is_ok());
    assert!(loader.call(&component).is_ok());
}
