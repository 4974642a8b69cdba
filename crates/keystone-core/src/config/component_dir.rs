use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A directory scanned for components, with its own registration policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDir {
    /// Path relative to the container root
    pub path: String,
    /// Register every component found here during finalization
    #[serde(default = "enabled")]
    pub auto_register: bool,
    /// Search this directory when resolving unregistered identifiers on demand
    #[serde(default = "enabled")]
    pub add_to_load_path: bool,
    /// Namespace stripped from identifiers of components found here
    #[serde(default)]
    pub default_namespace: Option<String>,
}

fn enabled() -> bool {
    true
}

impl ComponentDir {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            auto_register: true,
            add_to_load_path: true,
            default_namespace: None,
        }
    }

    /// Canonical spelling of a dir path: `./lib/` and `lib` are the same dir.
    pub fn normalize_path(path: &str) -> String {
        let mut parts = Vec::new();
        let mut absolute = false;
        for component in Path::new(path).components() {
            match component {
                Component::CurDir => {}
                Component::RootDir => absolute = true,
                other => parts.push(other.as_os_str().to_string_lossy().into_owned()),
            }
        }

        let joined = parts.join("/");
        if absolute { format!("/{}", joined) } else { joined }
    }

    /// Absolute location of this directory under `root`
    pub fn full_path(&self, root: &Path) -> PathBuf {
        root.join(&self.path)
    }
}
