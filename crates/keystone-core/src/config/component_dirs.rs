use crate::config::component_dir::ComponentDir;
use crate::config::error::ConfigError;

/// Ordered collection of component directories, unique by path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentDirs {
    dirs: Vec<ComponentDir>,
}

impl ComponentDirs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a directory and configure it in place.
    ///
    /// ```
    /// use keystone_core::config::ComponentDirs;
    ///
    /// let mut dirs = ComponentDirs::new();
    /// dirs.add("lib", |dir| dir.auto_register = false).unwrap();
    /// assert!(!dirs.get("lib").unwrap().auto_register);
    /// ```
    pub fn add<F>(&mut self, path: &str, configure: F) -> Result<&ComponentDir, ConfigError>
    where
        F: FnOnce(&mut ComponentDir),
    {
        let mut dir = ComponentDir::new(path);
        configure(&mut dir);
        self.add_dir(dir)
    }

    /// Add an already-built descriptor. Paths may be declared only once;
    /// spellings of the same directory (`lib`, `lib/`, `./lib`) count as one.
    pub fn add_dir(&mut self, mut dir: ComponentDir) -> Result<&ComponentDir, ConfigError> {
        dir.path = ComponentDir::normalize_path(&dir.path);
        if self.contains(&dir.path) {
            return Err(ConfigError::DuplicateComponentDir { path: dir.path });
        }

        log::debug!("Added component dir '{}'", dir.path);
        let index = self.dirs.len();
        self.dirs.push(dir);
        Ok(&self.dirs[index])
    }

    pub fn get(&self, path: &str) -> Option<&ComponentDir> {
        let path = ComponentDir::normalize_path(path);
        self.dirs.iter().find(|dir| dir.path == path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ComponentDir> {
        self.dirs.iter()
    }

    pub fn paths(&self) -> Vec<&str> {
        self.dirs.iter().map(|dir| dir.path.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }
}

impl<'a> IntoIterator for &'a ComponentDirs {
    type Item = &'a ComponentDir;
    type IntoIter = std::slice::Iter<'a, ComponentDir>;

    fn into_iter(self) -> Self::IntoIter {
        self.dirs.iter()
    }
}
