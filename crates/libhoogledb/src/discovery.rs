//! Sources of the qualified module names to document.
//!
//! Frege modules compile to top-level JVM classes, so a module list can come from a compiled
//! jar as well as from a plain manifest.

use std::{
    collections::BTreeSet,
    fs::{self, File},
    io::{Read, Seek},
    path::PathBuf,
};

use tracing::debug;
use zip::ZipArchive;

use crate::error::{HoogleError, Result};

/// Something that can enumerate the qualified names under a root namespace.
pub trait SymbolDiscovery {
    /// Every qualified name reachable under `root`, in a stable order.
    fn list_qualified_names(&self, root: &str) -> Result<Vec<String>>;
}

/// Whether `name` is `root` itself or lies below it.
fn in_namespace(name: &str, root: &str) -> bool {
    root.is_empty()
        || name == root
        || name
            .strip_prefix(root)
            .is_some_and(|rest| rest.starts_with('.'))
}

/// A fixed, in-memory list of names.
#[derive(Debug, Clone, Default)]
pub struct StaticDiscovery {
    names: Vec<String>,
}

impl StaticDiscovery {
    /// Create a discovery over `names`, kept in the given order.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl SymbolDiscovery for StaticDiscovery {
    fn list_qualified_names(&self, root: &str) -> Result<Vec<String>> {
        Ok(self
            .names
            .iter()
            .filter(|name| in_namespace(name, root))
            .cloned()
            .collect())
    }
}

/// Names read from a text file, one per line.
///
/// Blank lines and lines starting with `#` are ignored; surrounding whitespace is trimmed.
#[derive(Debug, Clone)]
pub struct ManifestDiscovery {
    path: PathBuf,
}

impl ManifestDiscovery {
    /// Read names from the manifest at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SymbolDiscovery for ManifestDiscovery {
    fn list_qualified_names(&self, root: &str) -> Result<Vec<String>> {
        let content = fs::read_to_string(&self.path).map_err(|e| HoogleError::Discovery {
            root: root.to_string(),
            reason: format!("{}: {e}", self.path.display()),
        })?;
        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter(|name| in_namespace(name, root))
            .map(String::from)
            .collect())
    }
}

/// Top-level classes found in a compiled jar.
///
/// Nested, anonymous, local and synthetic classes all carry a `$` in their binary name and are
/// skipped, as is `package-info` and `module-info`.
#[derive(Debug, Clone)]
pub struct JarDiscovery {
    path: PathBuf,
}

impl JarDiscovery {
    /// Scan the jar at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SymbolDiscovery for JarDiscovery {
    fn list_qualified_names(&self, root: &str) -> Result<Vec<String>> {
        let discovery_error = |reason: String| HoogleError::Discovery {
            root: root.to_string(),
            reason: format!("{}: {reason}", self.path.display()),
        };
        let file = File::open(&self.path).map_err(|e| discovery_error(e.to_string()))?;
        let names = top_level_classes(file, root).map_err(|e| discovery_error(e.to_string()))?;
        debug!(jar = %self.path.display(), count = names.len(), "scanned jar");
        Ok(names)
    }
}

/// Qualified names of the top-level classes under `root` in a zip archive, sorted.
pub fn top_level_classes<R: Read + Seek>(reader: R, root: &str) -> Result<Vec<String>> {
    let archive = ZipArchive::new(reader)?;
    let names: BTreeSet<String> = archive
        .file_names()
        .filter_map(|entry| entry.strip_suffix(".class"))
        .filter(|class| {
            let simple = class.rsplit('/').next().unwrap_or(class);
            !simple.contains('$') && !simple.contains('-')
        })
        .map(|class| class.replace('/', "."))
        .filter(|name| in_namespace(name, root))
        .collect();
    Ok(names.into_iter().collect())
}
