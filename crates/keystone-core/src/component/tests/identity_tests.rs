use std::collections::HashSet;
use std::fs;

use tempfile::tempdir;

use crate::component::{Component, ComponentOptions, extract_identifier};
use crate::config::ContainerConfig;

fn options() -> ComponentOptions {
    ComponentOptions::new()
}

#[test]
fn test_identifier_from_path_segments() {
    let component = Component::new("billing/invoice", options());

    assert_eq!(component.identifier(), "billing.invoice");
    assert_eq!(component.path(), "billing/invoice");
    assert_eq!(component.file(), "billing/invoice.rs");
    assert_eq!(component.namespace(), None);
}

#[test]
fn test_identifier_derivation_is_deterministic() {
    let first = extract_identifier("billing/invoice_item", None, ".");
    let second = extract_identifier("billing/invoice_item", None, ".");
    assert_eq!(first, second);
    assert_eq!(first, "billing.invoice_item");
}

#[test]
fn test_namespace_is_stripped_from_identifier_but_kept_in_path() {
    let component = Component::new("test/example_with_dep", options().namespace(Some("test")));

    assert_eq!(component.identifier(), "example_with_dep");
    assert_eq!(component.path(), "test/example_with_dep");
    assert_eq!(component.file(), "test/example_with_dep.rs");
    assert_eq!(component.namespace(), Some("test"));
}

#[test]
fn test_namespace_without_remainder_is_not_stripped() {
    assert_eq!(extract_identifier("billing", Some("billing"), "."), "billing");
    assert_eq!(extract_identifier("billing.", Some("billing"), "."), "billing");
}

#[test]
fn test_namespace_must_be_followed_by_non_word_char() {
    // `billing_report` merely starts with the namespace text
    assert_eq!(
        extract_identifier("billing_report/summary", Some("billing"), "."),
        "billing_report.summary"
    );
}

#[test]
fn test_multi_part_namespace_matches_any_separator() {
    assert_eq!(extract_identifier("my_app/models/user", Some("my_app.models"), "."), "user");
    assert_eq!(extract_identifier("my_app.models.user", Some("my_app.models"), "."), "user");

    let component = Component::new("my_app/models/user", options().namespace(Some("my_app.models")));
    assert_eq!(component.path(), "my_app/models/user");
}

#[test]
fn test_custom_separator() {
    let component = Component::new("billing/invoice", options().separator("__"));

    assert_eq!(component.identifier(), "billing__invoice");
    assert_eq!(component.path(), "billing/invoice");
    assert_eq!(component.root_key(), "billing");
}

#[test]
fn test_non_word_characters_split_tokens() {
    assert_eq!(extract_identifier("billing-api/v2 client", None, "."), "billing.api.v2.client");
}

#[test]
fn test_root_key_is_first_token() {
    assert_eq!(Component::new("cache.redis.client", options()).root_key(), "cache");
    assert_eq!(Component::new("db", options()).root_key(), "db");
}

#[test]
fn test_equality_uses_identifier_and_path_only() {
    let plain = Component::new("billing/invoice", options());
    let with_options = Component::new("billing.invoice", options().memoize(true).auto_register(false));
    let namespaced = Component::new("billing/invoice", options().namespace(Some("app")));

    assert_eq!(plain, with_options);
    assert_ne!(plain, namespaced);

    let set: HashSet<Component> = [plain, with_options, namespaced].into_iter().collect();
    assert_eq!(set.len(), 2);
}

#[test]
fn test_prepend_changes_identifier_only() {
    let component = Component::new("invoice", options());
    let prepended = component.prepend("billing");

    assert_eq!(prepended.identifier(), "billing.invoice");
    assert_eq!(prepended.path(), "invoice");
    assert_eq!(prepended.file(), "invoice.rs");
}

#[test]
fn test_namespaced_rederives_identity() {
    let component = Component::new("app/invoice", options());
    assert_eq!(component.identifier(), "app.invoice");

    let namespaced = component.namespaced("app");
    assert_eq!(namespaced.identifier(), "invoice");
    assert_eq!(namespaced.path(), "app/invoice");
}

#[test]
fn test_option_defaults() {
    let component = Component::new("billing/invoice", options());
    assert!(component.auto_register());
    assert_eq!(component.memoize(), None);

    let opted_out = Component::new("billing/invoice", options().auto_register(false).memoize(true));
    assert!(!opted_out.auto_register());
    assert_eq!(opted_out.memoize(), Some(true));
}

#[test]
fn test_new_does_not_touch_filesystem() {
    let component = Component::new("does/not/exist", options());
    assert_eq!(component.file_path(), None);
    assert!(!component.file_exists());
}

#[test]
fn test_locate_first_existing_dir_wins() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("lib/billing")).unwrap();
    fs::create_dir_all(root.join("app/billing")).unwrap();
    fs::write(root.join("lib/billing/invoice.rs"), "").unwrap();
    fs::write(root.join("app/billing/invoice.rs"), "").unwrap();

    let mut config = ContainerConfig::new(root);
    config.component_dirs.add("app", |_| {}).unwrap();
    config.component_dirs.add("lib", |_| {}).unwrap();

    let located = Component::locate("billing.invoice", &config, &config.component_options()).unwrap();
    assert_eq!(located.identifier(), "billing.invoice");
    assert_eq!(located.file_path(), Some(root.join("app/billing/invoice.rs").as_path()));
    assert!(located.file_exists());
}

#[test]
fn test_locate_uses_dir_namespace() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("lib/test")).unwrap();
    fs::write(root.join("lib/test/example_with_dep.rs"), "").unwrap();

    let mut config = ContainerConfig::new(root);
    config.component_dirs.add("lib", |_| {}).unwrap();
    config.default_namespace = Some("test".to_string());

    let located = Component::locate("example_with_dep", &config, &config.component_options()).unwrap();
    assert_eq!(located.identifier(), "example_with_dep");
    assert_eq!(located.path(), "test/example_with_dep");
    assert_eq!(located.namespace(), Some("test"));
}

#[test]
fn test_locate_skips_dirs_outside_load_path() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("lib")).unwrap();
    fs::write(root.join("lib/mailer.rs"), "").unwrap();

    let mut config = ContainerConfig::new(root);
    config.component_dirs.add("lib", |dir| dir.add_to_load_path = false).unwrap();

    assert!(Component::locate("mailer", &config, &config.component_options()).is_none());
}

#[test]
fn test_locate_missing_returns_none() {
    let temp_dir = tempdir().unwrap();
    let mut config = ContainerConfig::new(temp_dir.path());
    config.component_dirs.add("lib", |_| {}).unwrap();

    assert!(Component::locate("nothing.here", &config, &config.component_options()).is_none());
}

#[test]
fn test_locate_rejects_namespace_qualified_identifier() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("lib/test")).unwrap();
    fs::write(root.join("lib/test/mailer.rs"), "").unwrap();

    let mut config = ContainerConfig::new(root);
    config.component_dirs.add("lib", |dir| dir.default_namespace = Some("test".to_string())).unwrap();

    assert!(Component::locate("test.mailer", &config, &config.component_options()).is_none());
    assert!(Component::locate("mailer", &config, &config.component_options()).is_some());
}

#[test]
fn test_namespace_separator_may_be_any_non_word_char() {
    assert_eq!(extract_identifier("test→mailers/welcome", Some("test"), "."), "mailers.welcome");
    assert_eq!(extract_identifier("test mailer", Some("test"), "."), "mailer");
    // Prefix match must end on a token boundary
    assert_eq!(extract_identifier("tests/mailer", Some("test"), "."), "tests.mailer");
    assert_eq!(extract_identifier("other/mailer", Some("test"), "."), "other.mailer");
}
