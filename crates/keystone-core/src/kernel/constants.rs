/// Library name
pub const APP_NAME: &str = "Keystone";

/// Library version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Separator joining identifier tokens (`billing.invoice`)
pub const DEFAULT_SEPARATOR: &str = ".";

/// Separator used in logical component paths (`billing/invoice`)
pub const PATH_SEPARATOR: &str = "/";

/// Extension of component and boot files
pub const DEFAULT_SOURCE_EXTENSION: &str = "rs";

/// Default boot files directory, relative to the container root
pub const DEFAULT_BOOT_PATH: &str = "system/boot";
