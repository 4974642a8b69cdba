use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::kernel::error::BoxError;
use crate::registry::error::RegistryError;
use crate::registry::{ComponentRegistry, ComponentResolver, Factory, Instance};

/// One entry of the registration table.
pub struct Registration {
    identifier: String,
    memoize: bool,
    factory: Factory,
    instance: OnceCell<Instance>,
}

impl Registration {
    pub fn new(identifier: &str, memoize: bool, factory: Factory) -> Self {
        Self {
            identifier: identifier.to_string(),
            memoize,
            factory,
            instance: OnceCell::new(),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn is_memoized(&self) -> bool {
        self.memoize
    }

    /// Whether a memoized instance has been produced yet
    pub fn is_resolved(&self) -> bool {
        self.instance.get().is_some()
    }

    /// Produce the instance. Memoized entries keep their first successful
    /// result; a failure is never cached, so the next call retries the factory.
    pub fn resolve(&self) -> Result<Instance, RegistryError> {
        let produce = || {
            (self.factory)().map_err(|source| RegistryError::ResolutionFailed {
                identifier: self.identifier.clone(),
                source,
            })
        };

        if self.memoize {
            self.instance.get_or_try_init(produce).cloned()
        } else {
            produce()
        }
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("identifier", &self.identifier)
            .field("memoize", &self.memoize)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

/// The registration table: identifier -> factory, in registration order.
#[derive(Debug)]
pub struct Registrations {
    root: PathBuf,
    entries: HashMap<String, Registration>,
    order: Vec<String>,
}

impl Registrations {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entries: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register an already-built value, memoized.
    pub fn register_instance<T>(&mut self, identifier: &str, value: T) -> Result<(), RegistryError>
    where
        T: Any + Send + Sync,
    {
        let instance: Instance = Arc::new(value);
        let factory: Factory = Arc::new(move || -> Result<Instance, BoxError> { Ok(instance.clone()) });
        self.register(identifier, true, factory)
    }

    pub fn get(&self, identifier: &str) -> Option<&Registration> {
        self.entries.get(identifier)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Resolve and downcast to a concrete type.
    pub fn resolve_as<T>(&self, identifier: &str) -> Result<Arc<T>, RegistryError>
    where
        T: Any + Send + Sync,
    {
        let instance = self.resolve(identifier)?;
        Arc::downcast::<T>(instance).map_err(|_| RegistryError::TypeMismatch {
            identifier: identifier.to_string(),
            expected: std::any::type_name::<T>(),
        })
    }
}

impl ComponentRegistry for Registrations {
    fn register(&mut self, identifier: &str, memoize: bool, factory: Factory) -> Result<(), RegistryError> {
        if self.entries.contains_key(identifier) {
            return Err(RegistryError::AlreadyRegistered {
                identifier: identifier.to_string(),
            });
        }

        log::debug!("Registered '{}' (memoize: {})", identifier, memoize);
        self.entries
            .insert(identifier.to_string(), Registration::new(identifier, memoize, factory));
        self.order.push(identifier.to_string());
        Ok(())
    }
}

impl ComponentResolver for Registrations {
    fn resolve(&self, identifier: &str) -> Result<Instance, RegistryError> {
        self.entries
            .get(identifier)
            .ok_or_else(|| RegistryError::NotRegistered {
                identifier: identifier.to_string(),
            })?
            .resolve()
    }

    fn is_registered(&self, identifier: &str) -> bool {
        self.entries.contains_key(identifier)
    }

    fn keys(&self) -> Vec<String> {
        self.order.clone()
    }

    fn root(&self) -> &Path {
        &self.root
    }
}
