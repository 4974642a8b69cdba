//! Per-file option overrides read from a component file's leading comments.
//!
//! ```text
//! // auto_register: false
//! // memoize: true
//! ```
//!
//! Only the leading block counts: lines starting with `//` or `#`, plus blank
//! lines. Parsing stops at the first line of code.
use std::fs;
use std::io;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::component::identity::ComponentOptions;

static COMMENT_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?://+|#+)\s*(?P<key>[A-Za-z][A-Za-z0-9_]*)\s*:\s*(?P<value>.+?)\s*$")
        .expect("magic comment pattern is valid")
});

/// Options recognised in magic comments
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileOptions {
    pub auto_register: Option<bool>,
    pub memoize: Option<bool>,
}

impl FileOptions {
    pub fn is_empty(&self) -> bool {
        self.auto_register.is_none() && self.memoize.is_none()
    }

    /// Overlay these overrides on `options`.
    pub fn apply(&self, mut options: ComponentOptions) -> ComponentOptions {
        if let Some(auto_register) = self.auto_register {
            options = options.auto_register(auto_register);
        }
        if let Some(memoize) = self.memoize {
            options = options.memoize(memoize);
        }
        options
    }
}

/// Read and parse the magic comments of the file at `path`.
pub fn parse_file(path: &Path) -> io::Result<FileOptions> {
    let source = fs::read_to_string(path)?;
    Ok(parse(&source))
}

/// Parse magic comments from source text.
pub fn parse(source: &str) -> FileOptions {
    let mut options = FileOptions::default();

    for line in source.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !(trimmed.starts_with("//") || trimmed.starts_with('#')) {
            break;
        }

        let Some(captures) = COMMENT_LINE.captures(line) else {
            continue;
        };
        let value = coerce_bool(&captures["value"]);
        match &captures["key"] {
            "auto_register" => options.auto_register = value,
            "memoize" => options.memoize = value,
            other => log::trace!("Ignoring unknown magic comment '{}'", other),
        }
    }

    options
}

fn coerce_bool(value: &str) -> Option<bool> {
    match value {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}
