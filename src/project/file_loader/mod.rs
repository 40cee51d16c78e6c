//! Go source discovery and loading.
//!
//! A package is the set of non-test `.go` files directly inside one
//! directory. [`SourceLoader`] is the seam the reference resolver goes
//! through, so embedders (and tests) can supply sources from somewhere other
//! than the filesystem.

use crate::base::constants::{GO_FILE_EXT, GO_TEST_FILE_SUFFIX};
use crate::base::Config;
use crate::parser::{self, Parse};
use indexmap::IndexMap;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

/// One source file of a package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub text: String,
}

impl SourceUnit {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    pub fn parse(&self) -> Parse {
        parser::parse(&self.text)
    }
}

/// Locates the source files of a Go package by import path.
pub trait SourceLoader {
    /// Load every source unit of the package at `import_path`.
    ///
    /// Returns `Ok(None)` when the package cannot be located at all.
    fn load_package(&self, import_path: &str) -> io::Result<Option<Vec<SourceUnit>>>;
}

impl<L: SourceLoader + ?Sized> SourceLoader for &L {
    fn load_package(&self, import_path: &str) -> io::Result<Option<Vec<SourceUnit>>> {
        (**self).load_package(import_path)
    }
}

impl<L: SourceLoader + ?Sized> SourceLoader for Box<L> {
    fn load_package(&self, import_path: &str) -> io::Result<Option<Vec<SourceUnit>>> {
        (**self).load_package(import_path)
    }
}

/// Filesystem loader: `<root>/<import path>` for each search root, first hit wins
#[derive(Debug, Clone, Default)]
pub struct FsLoader {
    roots: Vec<PathBuf>,
}

impl FsLoader {
    pub fn new(roots: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            roots: roots.into_iter().collect(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.search_roots.iter().cloned())
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

impl SourceLoader for FsLoader {
    fn load_package(&self, import_path: &str) -> io::Result<Option<Vec<SourceUnit>>> {
        for root in &self.roots {
            let dir = root.join(import_path);
            if !dir.is_dir() {
                trace!(dir = %dir.display(), "package directory not found");
                continue;
            }
            let paths = collect_file_paths(&dir)?;
            debug!(
                import_path,
                dir = %dir.display(),
                files = paths.len(),
                "loading package sources"
            );
            let units = paths
                .into_iter()
                .map(|path| load_file(&path).map(|text| SourceUnit::new(path, text)))
                .collect::<io::Result<Vec<_>>>()?;
            return Ok(Some(units));
        }
        Ok(None)
    }
}

/// In-memory loader keyed by import path
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    packages: IndexMap<String, Vec<SourceUnit>>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(
        &mut self,
        import_path: impl Into<String>,
        file_name: impl Into<PathBuf>,
        text: impl Into<String>,
    ) -> &mut Self {
        self.packages
            .entry(import_path.into())
            .or_default()
            .push(SourceUnit::new(file_name, text));
        self
    }

    pub fn with_file(
        mut self,
        import_path: impl Into<String>,
        file_name: impl Into<PathBuf>,
        text: impl Into<String>,
    ) -> Self {
        self.add_file(import_path, file_name, text);
        self
    }
}

impl SourceLoader for MemoryLoader {
    fn load_package(&self, import_path: &str) -> io::Result<Option<Vec<SourceUnit>>> {
        Ok(self.packages.get(import_path).cloned())
    }
}

/// Whether `path` is a Go source file that belongs to the package API
pub fn is_package_source(path: &Path) -> bool {
    let is_go = path.extension().and_then(|e| e.to_str()) == Some(GO_FILE_EXT);
    let is_test = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(GO_TEST_FILE_SUFFIX));
    is_go && !is_test
}

/// List the package source files directly inside `dir`, sorted by path.
pub fn collect_file_paths(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    let walker = WalkDir::new(dir)
        .follow_links(true)
        .min_depth(1)
        .max_depth(1);
    for entry in walker {
        let entry = entry.map_err(io::Error::other)?;
        if entry.file_type().is_file() && is_package_source(entry.path()) {
            paths.push(entry.into_path());
        }
    }
    paths.sort();
    Ok(paths)
}

pub fn load_file(path: &Path) -> io::Result<String> {
    std::fs::read_to_string(path)
}

/// Read and parse a single Go file.
pub fn load_and_parse(path: &Path) -> io::Result<Parse> {
    let text = load_file(path)?;
    Ok(parser::parse(&text))
}

#[cfg(test)]
mod tests;
