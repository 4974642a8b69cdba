#![cfg(test)]

use std::sync::Arc;

use crate::booter::LifecycleState;
use crate::kernel::error::{Error, Result};
use crate::registry::RegistryError;

use super::common::{Handler, OrderRepository, OrderService, setup_application};

#[test]
fn test_finalize_from_settings_file() -> Result<()> {
    let (temp_dir, events, builder) = setup_application();
    let container = builder.finalize()?;

    assert_eq!(
        container.keys(),
        vec![
            "persistence.pool",
            "orders.config",
            "telemetry.sink",
            "orders.repository",
            "orders.service",
            "web.handler",
        ]
    );
    assert!(!container.is_registered("web.legacy"));

    // The vendor copy of persistence is shadowed by the application's
    let boot_files = container.booter().boot_files();
    assert!(boot_files.contains(&temp_dir.path().join("system/boot/persistence.rs")));
    assert!(!boot_files.contains(&temp_dir.path().join("vendor/boot/persistence.rs")));
    assert_eq!(boot_files.len(), 3);

    assert_eq!(
        *events.lock().unwrap(),
        vec!["start:persistence", "start:orders", "start:telemetry"]
    );

    let repository = container.resolve_as::<OrderRepository>("orders.repository")?;
    assert_eq!(*repository, OrderRepository { table: "orders" });
    let handler = container.resolve_as::<Handler>("web.handler")?;
    assert_eq!(handler.route, "/web/handler");
    Ok(())
}

#[test]
fn test_on_demand_then_finalize_starts_each_component_once() -> Result<()> {
    let (_temp_dir, events, mut builder) = setup_application();

    let repository = builder.resolve_as::<OrderRepository>("orders.repository")?;
    assert_eq!(repository.table, "orders");
    assert_eq!(*events.lock().unwrap(), vec!["start:persistence", "start:orders"]);
    assert_eq!(builder.booter().state("telemetry"), None);

    let container = builder.finalize()?;
    assert_eq!(
        *events.lock().unwrap(),
        vec!["start:persistence", "start:orders", "start:telemetry"]
    );
    assert_eq!(
        container.booter().started(),
        &["persistence".to_string(), "orders".to_string(), "telemetry".to_string()]
    );
    Ok(())
}

#[test]
fn test_opted_out_component_still_resolves_on_demand() -> Result<()> {
    let (_temp_dir, _events, mut builder) = setup_application();

    let legacy = builder.resolve_as::<Handler>("web.legacy")?;
    assert_eq!(legacy.route, "/web/legacy");

    let container = builder.finalize()?;
    assert!(container.is_registered("web.legacy"));
    Ok(())
}

#[test]
fn test_memoized_component_shared_across_threads() -> Result<()> {
    let (_temp_dir, _events, builder) = setup_application();
    let container = builder.finalize()?;
    let registrations = container.registrations();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let registrations = Arc::clone(&registrations);
            std::thread::spawn(move || registrations.resolve_as::<OrderService>("orders.service"))
        })
        .collect();

    let first = container.resolve_as::<OrderService>("orders.service")?;
    for handle in handles {
        let service = handle.join().expect("resolver thread panicked")?;
        assert!(Arc::ptr_eq(&first, &service));
    }
    Ok(())
}

#[test]
fn test_shutdown_in_reverse_start_order() -> Result<()> {
    let (_temp_dir, events, builder) = setup_application();
    let mut container = builder.finalize()?;

    container.shutdown()?;

    assert_eq!(
        events.lock().unwrap()[3..],
        ["stop:telemetry", "stop:orders", "stop:persistence"]
    );
    for key in ["persistence", "orders", "telemetry"] {
        assert_eq!(container.booter().state(key), Some(LifecycleState::Stopped));
    }

    assert!(matches!(container.shutdown(), Err(Error::AlreadyShutDown)));
    // Registrations stay resolvable after shutdown
    assert!(container.resolve("orders.config").is_ok());
    Ok(())
}

#[test]
fn test_frozen_container_rejects_unknown_identifiers() -> Result<()> {
    let (_temp_dir, _events, builder) = setup_application();
    let container = builder.finalize()?;

    assert!(matches!(
        container.resolve("orders.unknown"),
        Err(Error::Registry(RegistryError::NotRegistered { .. }))
    ));
    Ok(())
}
