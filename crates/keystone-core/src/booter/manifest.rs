use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::booter::bootable::Bootable;

/// Describes a boot component: receives the bare [`Bootable`] for the key and
/// returns it with hooks and dependencies attached.
pub type BootDefinition = Arc<dyn Fn(Bootable) -> Bootable + Send + Sync>;

/// Boot definitions keyed by boot file basename (`db` for `system/boot/db.rs`).
///
/// A boot file on disk marks a component as bootable and fixes which file it
/// comes from; its behavior comes from the definition registered here.
#[derive(Clone, Default)]
pub struct BootManifest {
    definitions: HashMap<String, BootDefinition>,
}

impl BootManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define<F>(&mut self, key: &str, definition: F) -> &mut Self
    where
        F: Fn(Bootable) -> Bootable + Send + Sync + 'static,
    {
        self.definitions.insert(key.to_string(), Arc::new(definition));
        self
    }

    pub fn definition(&self, key: &str) -> Option<&BootDefinition> {
        self.definitions.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.definitions.contains_key(key)
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.definitions.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl fmt::Debug for BootManifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootManifest").field("keys", &self.keys()).finish()
    }
}
