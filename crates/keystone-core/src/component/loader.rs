use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::component::error::LoadError;
use crate::component::identity::Component;
use crate::kernel::error::BoxError;
use crate::registry::Instance;

/// Instantiation strategy for components.
///
/// `require` makes a component's definition available; `call` produces an
/// instance. The auto-registrar invokes `require` at most once per
/// registration, right before the first `call`.
pub trait Loader: Send + Sync + fmt::Debug {
    fn require(&self, component: &Component) -> Result<(), LoadError>;
    fn call(&self, component: &Component) -> Result<Instance, LoadError>;
}

/// Constructor stored in a [`Manifest`]
pub type Constructor = Arc<dyn Fn(&Component) -> Result<Instance, BoxError> + Send + Sync>;

/// Static table of component definitions keyed by logical path
/// (`"billing/invoice"`, `"test/example_with_dep"`).
#[derive(Clone, Default)]
pub struct Manifest {
    constructors: HashMap<String, Constructor>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define the constructor for a logical path, replacing any earlier one.
    pub fn define<F>(&mut self, path: &str, constructor: F) -> &mut Self
    where
        F: Fn(&Component) -> Result<Instance, BoxError> + Send + Sync + 'static,
    {
        self.constructors.insert(path.to_string(), Arc::new(constructor));
        self
    }

    /// Define a constructor that builds a fresh `T` from a plain closure.
    pub fn define_value<T, F>(&mut self, path: &str, build: F) -> &mut Self
    where
        T: Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.define(path, move |_| Ok(Arc::new(build()) as Instance))
    }

    pub fn contains(&self, path: &str) -> bool {
        self.constructors.contains_key(path)
    }

    pub fn constructor(&self, path: &str) -> Option<&Constructor> {
        self.constructors.get(path)
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }

    /// Defined paths, sorted
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.constructors.keys().cloned().collect();
        paths.sort();
        paths
    }
}

impl fmt::Debug for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manifest").field("paths", &self.paths()).finish()
    }
}

/// Default loader: resolves components against a [`Manifest`].
#[derive(Debug, Clone, Default)]
pub struct ManifestLoader {
    manifest: Arc<Manifest>,
}

impl ManifestLoader {
    pub fn new(manifest: Manifest) -> Self {
        Self {
            manifest: Arc::new(manifest),
        }
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }
}

impl Loader for ManifestLoader {
    fn require(&self, component: &Component) -> Result<(), LoadError> {
        if self.manifest.contains(component.path()) {
            Ok(())
        } else {
            Err(LoadError::DefinitionNotFound {
                path: component.path().to_string(),
            })
        }
    }

    fn call(&self, component: &Component) -> Result<Instance, LoadError> {
        let constructor = self
            .manifest
            .constructor(component.path())
            .ok_or_else(|| LoadError::DefinitionNotFound {
                path: component.path().to_string(),
            })?;

        constructor(component).map_err(|source| LoadError::ConstructorFailed {
            identifier: component.identifier().to_string(),
            path: component.path().to_string(),
            source,
        })
    }
}
