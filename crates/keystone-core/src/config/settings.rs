use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::component::ComponentOptions;
use crate::config::component_dir::ComponentDir;
use crate::config::component_dirs::ComponentDirs;
use crate::config::error::ConfigError;
use crate::kernel::constants::{DEFAULT_BOOT_PATH, DEFAULT_SEPARATOR, DEFAULT_SOURCE_EXTENSION};

/// Supported settings file formats
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "toml",
        }
    }

    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                #[cfg(feature = "yaml-config")]
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                #[cfg(feature = "toml-config")]
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }
}

/// Serialized form of a container configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerSettings {
    /// Container root; relative roots are resolved against the settings file
    #[serde(default = "current_dir")]
    pub root: PathBuf,
    #[serde(default)]
    pub component_dirs: Vec<ComponentDir>,
    #[serde(default = "default_boot_paths")]
    pub boot_paths: Vec<PathBuf>,
    #[serde(default)]
    pub default_namespace: Option<String>,
    #[serde(default = "default_separator")]
    pub separator: String,
    #[serde(default = "default_source_extension")]
    pub source_extension: String,
}

fn current_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_boot_paths() -> Vec<PathBuf> {
    vec![PathBuf::from(DEFAULT_BOOT_PATH)]
}

fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_string()
}

fn default_source_extension() -> String {
    DEFAULT_SOURCE_EXTENSION.to_string()
}

impl ContainerSettings {
    /// Deserialize settings from a string in the given format
    pub fn deserialize(data: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        match format {
            ConfigFormat::Json => serde_json::from_str(data).map_err(|e| ConfigError::Deserialization {
                format: "JSON".to_string(),
                source: Box::new(e),
            }),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::from_str(data).map_err(|e| ConfigError::Deserialization {
                format: "YAML".to_string(),
                source: Box::new(e),
            }),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(data).map_err(|e| ConfigError::Deserialization {
                format: "TOML".to_string(),
                source: Box::new(e),
            }),
        }
    }

    /// Load settings from a file, picking the format from its extension.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let format = ConfigFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            operation: "read_settings".to_string(),
            path: path.to_path_buf(),
            source,
        })?;

        let mut settings = Self::deserialize(&data, format)?;
        if settings.root.is_relative() {
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            let relative: PathBuf = settings
                .root
                .components()
                .filter(|part| !matches!(part, Component::CurDir))
                .collect();
            settings.root = if relative.as_os_str().is_empty() {
                base.to_path_buf()
            } else {
                base.join(relative)
            };
        }
        Ok(settings)
    }

    /// Validate and convert into a runtime configuration.
    pub fn into_config(self) -> Result<ContainerConfig, ConfigError> {
        let mut config = ContainerConfig::new(self.root);
        config.boot_paths = self.boot_paths;
        config.default_namespace = self.default_namespace;
        config.separator = self.separator;
        config.source_extension = self.source_extension;
        for dir in self.component_dirs {
            config.component_dirs.add_dir(dir)?;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Runtime configuration of a container.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerConfig {
    root: PathBuf,
    pub component_dirs: ComponentDirs,
    /// Boot file directories, searched in order; relative paths hang off the root
    pub boot_paths: Vec<PathBuf>,
    /// Namespace for component dirs that do not declare their own
    pub default_namespace: Option<String>,
    pub separator: String,
    pub source_extension: String,
}

impl ContainerConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            component_dirs: ComponentDirs::new(),
            boot_paths: default_boot_paths(),
            default_namespace: None,
            separator: default_separator(),
            source_extension: default_source_extension(),
        }
    }

    /// Load a settings file (json, or toml/yaml when enabled).
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        ContainerSettings::load(path)?.into_config()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.separator.is_empty() {
            return Err(ConfigError::InvalidSetting {
                key: "separator".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.source_extension.is_empty() || self.source_extension.starts_with('.') {
            return Err(ConfigError::InvalidSetting {
                key: "source_extension".to_string(),
                reason: format!("expected a bare extension, got '{}'", self.source_extension),
            });
        }
        Ok(())
    }

    pub fn dir_path(&self, dir: &ComponentDir) -> PathBuf {
        dir.full_path(&self.root)
    }

    /// The directory's own namespace, else the container-wide default.
    pub fn namespace_for<'a>(&'a self, dir: &'a ComponentDir) -> Option<&'a str> {
        dir.default_namespace
            .as_deref()
            .or(self.default_namespace.as_deref())
    }

    /// Directories searched for on-demand resolution
    pub fn load_path_dirs(&self) -> impl Iterator<Item = &ComponentDir> {
        self.component_dirs.iter().filter(|dir| dir.add_to_load_path)
    }

    /// Boot directories resolved against the root, in declaration order
    pub fn boot_dirs(&self) -> Vec<PathBuf> {
        self.boot_paths.iter().map(|path| self.root.join(path)).collect()
    }

    /// Identity options derived from this configuration, using the default loader.
    pub fn component_options(&self) -> ComponentOptions {
        ComponentOptions::new()
            .separator(self.separator.clone())
            .extension(self.source_extension.clone())
    }

    pub fn to_settings(&self) -> ContainerSettings {
        ContainerSettings {
            root: self.root.clone(),
            component_dirs: self.component_dirs.iter().cloned().collect(),
            boot_paths: self.boot_paths.clone(),
            default_namespace: self.default_namespace.clone(),
            separator: self.separator.clone(),
            source_extension: self.source_extension.clone(),
        }
    }
}
