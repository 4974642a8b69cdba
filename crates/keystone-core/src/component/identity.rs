use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::component::error::LoadError;
use crate::component::loader::{Loader, ManifestLoader};
use crate::config::ContainerConfig;
use crate::kernel::constants::{DEFAULT_SEPARATOR, DEFAULT_SOURCE_EXTENSION, PATH_SEPARATOR};
use crate::registry::Instance;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("word pattern is valid"));

/// Options carried by a component identity.
///
/// `auto_register` and `memoize` stay `None` unless set explicitly (usually
/// through magic comments), so callers can tell an override from a default.
#[derive(Clone)]
pub struct ComponentOptions {
    pub separator: String,
    pub extension: String,
    pub namespace: Option<String>,
    pub auto_register: Option<bool>,
    pub memoize: Option<bool>,
    pub loader: Arc<dyn Loader>,
}

impl ComponentOptions {
    pub fn new() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            extension: DEFAULT_SOURCE_EXTENSION.to_string(),
            namespace: None,
            auto_register: None,
            memoize: None,
            loader: Arc::new(ManifestLoader::default()),
        }
    }

    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn namespace(mut self, namespace: Option<&str>) -> Self {
        self.namespace = namespace.map(str::to_string);
        self
    }

    pub fn auto_register(mut self, auto_register: bool) -> Self {
        self.auto_register = Some(auto_register);
        self
    }

    pub fn memoize(mut self, memoize: bool) -> Self {
        self.memoize = Some(memoize);
        self
    }

    pub fn loader(mut self, loader: Arc<dyn Loader>) -> Self {
        self.loader = loader;
        self
    }
}

impl Default for ComponentOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ComponentOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentOptions")
            .field("separator", &self.separator)
            .field("extension", &self.extension)
            .field("namespace", &self.namespace)
            .field("auto_register", &self.auto_register)
            .field("memoize", &self.memoize)
            .field("loader", &self.loader)
            .finish()
    }
}

/// Immutable identity of one discovered or registered component.
///
/// Two components are equal when their identifier and logical path match;
/// options, backing file and loader do not take part in equality.
#[derive(Debug, Clone)]
pub struct Component {
    identifier: String,
    path: String,
    file: String,
    file_path: Option<PathBuf>,
    options: ComponentOptions,
}

impl Component {
    /// Builds an identity from a raw name such as `"billing/invoice"` or
    /// `"test.billing.invoice"`. Pure: the filesystem is never consulted.
    pub fn new(raw_name: &str, options: ComponentOptions) -> Self {
        let identifier = extract_identifier(raw_name, options.namespace.as_deref(), &options.separator);
        let path = logical_path(&identifier, options.namespace.as_deref(), &options.separator);
        let file = format!("{}.{}", path, options.extension);

        Self {
            identifier,
            path,
            file,
            file_path: None,
            options,
        }
    }

    /// Finds the backing file for `identifier` across the configured load-path
    /// directories, in declaration order. The first existing file wins and the
    /// returned identity carries that directory's namespace and `identifier`
    /// unchanged.
    pub fn locate(identifier: &str, config: &ContainerConfig, options: &ComponentOptions) -> Option<Self> {
        for dir in config.load_path_dirs() {
            let namespace = config.namespace_for(dir);
            let candidate = Component::new(identifier, options.clone().namespace(namespace));
            // `test.mailer` under namespace `test` names `mailer`, not the identifier asked for
            if candidate.identifier != identifier {
                continue;
            }
            let file_path = config.dir_path(dir).join(&candidate.file);

            if file_path.is_file() {
                log::debug!(
                    "Located component '{}' at {}",
                    candidate.identifier,
                    file_path.display()
                );
                return Some(candidate.with_file_path(file_path));
            }
        }
        None
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Namespace-qualified logical path, `/`-separated
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Logical path plus source extension
    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn file_exists(&self) -> bool {
        self.file_path.as_deref().is_some_and(Path::is_file)
    }

    pub fn namespace(&self) -> Option<&str> {
        self.options.namespace.as_deref()
    }

    pub fn separator(&self) -> &str {
        &self.options.separator
    }

    pub fn options(&self) -> &ComponentOptions {
        &self.options
    }

    /// Components auto-register unless explicitly opted out.
    pub fn auto_register(&self) -> bool {
        self.options.auto_register.unwrap_or(true)
    }

    pub fn memoize(&self) -> Option<bool> {
        self.options.memoize
    }

    pub fn loader(&self) -> &Arc<dyn Loader> {
        &self.options.loader
    }

    /// First identifier token, used to find the boot component that must be
    /// started before this one can be used.
    pub fn root_key(&self) -> &str {
        self.identifier
            .split(self.options.separator.as_str())
            .next()
            .unwrap_or(&self.identifier)
    }

    /// Makes the component's definition available without constructing it.
    pub fn require(&self) -> Result<(), LoadError> {
        self.options.loader.require(self)
    }

    /// Constructs an instance through the component's loader.
    pub fn instance(&self) -> Result<Instance, LoadError> {
        self.options.loader.call(self)
    }

    /// New identity with `name` prepended to the identifier. The logical path
    /// and backing file are unchanged.
    pub fn prepend(&self, name: &str) -> Self {
        let mut prepended = self.clone();
        prepended.identifier = format!("{}{}{}", name, self.options.separator, self.identifier);
        prepended
    }

    /// New identity re-derived under `namespace`.
    pub fn namespaced(&self, namespace: &str) -> Self {
        let options = self.options.clone().namespace(Some(namespace));
        let mut component = Component::new(&self.identifier, options);
        component.file_path = self.file_path.clone();
        component
    }

    pub fn with_file_path(mut self, file_path: PathBuf) -> Self {
        self.file_path = Some(file_path);
        self
    }

    pub fn with_options(&self, options: ComponentOptions) -> Self {
        let mut component = Component::new(&self.identifier, options);
        component.file_path = self.file_path.clone();
        component
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier && self.path == other.path
    }
}

impl Eq for Component {}

impl Hash for Component {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identifier.hash(state);
        self.path.hash(state);
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier)
    }
}

/// Derives an identifier from a raw name.
///
/// A leading namespace is stripped only when it is followed by a non-word
/// character and a non-empty remainder; the rest is split into word tokens and
/// joined with `separator`.
pub fn extract_identifier(raw_name: &str, namespace: Option<&str>, separator: &str) -> String {
    let name = match namespace {
        Some(ns) => strip_namespace(raw_name, ns).unwrap_or(raw_name),
        None => raw_name,
    };

    WORD.find_iter(name)
        .map(|token| token.as_str())
        .collect::<Vec<_>>()
        .join(separator)
}

fn strip_namespace<'a>(raw_name: &'a str, namespace: &str) -> Option<&'a str> {
    let mut tokens = WORD.find_iter(namespace).peekable();
    tokens.peek()?;

    // Each namespace token must be followed by one non-word character;
    // multi-part namespaces match whatever separator the raw name uses.
    let mut rest = raw_name;
    for token in tokens {
        rest = rest.strip_prefix(token.as_str())?;
        let separator = rest.chars().next()?;
        if is_word_char(separator) {
            return None;
        }
        rest = &rest[separator.len_utf8()..];
    }

    if rest.is_empty() { None } else { Some(rest) }
}

fn is_word_char(c: char) -> bool {
    let mut buf = [0u8; 4];
    WORD.is_match(c.encode_utf8(&mut buf))
}

fn logical_path(identifier: &str, namespace: Option<&str>, separator: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    if let Some(ns) = namespace {
        segments.extend(WORD.find_iter(ns).map(|token| token.as_str()));
    }
    segments.extend(identifier.split(separator).filter(|token| !token.is_empty()));
    segments.join(PATH_SEPARATOR)
}
