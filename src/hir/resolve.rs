//! Cross-package reference resolution.
//!
//! When a request or response struct refers to `pkg.Name`, the resolver finds
//! the import that provides `pkg`, loads every source unit of that package,
//! extracts each one, and merges the resulting structs into the caller's
//! table. Each import path is scanned at most once per resolver; later
//! references merge the structs remembered from that scan.

use std::cell::RefCell;

use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use super::error::ExtractError;
use super::extract::TypeModelExtractor;
use super::model::StructTable;
use super::types::Import;
use crate::base::Config;
use crate::project::{FsLoader, SourceLoader};

/// Scan state of one import path
#[derive(Clone, Debug)]
enum PackageState {
    /// Being extracted; a reference back to it comes from an import cycle
    Scanning,
    /// No search root holds the package
    Missing,
    /// Every struct declared by the package (and by what it resolved)
    Loaded(StructTable),
}

/// Loads and extracts the packages behind qualified type references.
pub struct ReferenceResolver<'l> {
    loader: Box<dyn SourceLoader + 'l>,
    config: Config,
    packages: RefCell<FxHashMap<String, PackageState>>,
}

impl<'l> ReferenceResolver<'l> {
    pub fn new(config: &Config, loader: impl SourceLoader + 'l) -> Self {
        // Resolved packages report their own name, never the override
        let config = Config {
            package_name: None,
            ..config.clone()
        };
        Self {
            loader: Box::new(loader),
            config,
            packages: RefCell::new(FxHashMap::default()),
        }
    }

    /// Resolver over the filesystem search roots of `config`
    pub fn from_config(config: &Config) -> Self {
        Self::new(config, FsLoader::from_config(config))
    }

    /// Whether the package at `import_path` has already been scanned
    pub fn is_visited(&self, import_path: &str) -> bool {
        self.packages.borrow().contains_key(import_path)
    }

    /// Make the package named `qualifier` available in `table`.
    ///
    /// `name` is the referenced type, used for diagnostics and for the strict
    /// mode check. Each package is scanned once; later calls merge the
    /// structs remembered from that scan.
    pub fn resolve(
        &self,
        qualifier: &str,
        name: &str,
        imports: &[Import],
        table: &mut StructTable,
    ) -> Result<(), ExtractError> {
        let Some(import) = imports.iter().find(|i| i.package_name() == qualifier) else {
            return self.missing(qualifier, name, "no import provides the package");
        };

        let known = self.packages.borrow().get(&import.path).cloned();
        let package = match known {
            Some(PackageState::Scanning) => {
                debug!(package = %import.path, "import cycle, package still being scanned");
                return Ok(());
            }
            Some(PackageState::Missing) => {
                return self.missing(qualifier, name, "package sources not found");
            }
            Some(PackageState::Loaded(package)) => {
                debug!(package = %import.path, "package already resolved");
                package
            }
            None => {
                self.packages
                    .borrow_mut()
                    .insert(import.path.clone(), PackageState::Scanning);
                let scanned = match self.scan(&import.path) {
                    Ok(scanned) => scanned,
                    Err(err) => {
                        self.packages.borrow_mut().remove(&import.path);
                        return Err(err);
                    }
                };
                let state = match &scanned {
                    Some(package) => PackageState::Loaded(package.clone()),
                    None => PackageState::Missing,
                };
                self.packages.borrow_mut().insert(import.path.clone(), state);
                match scanned {
                    Some(package) => package,
                    None => return self.missing(qualifier, name, "package sources not found"),
                }
            }
        };

        let found = package.find_by_name(name).next().is_some();
        table.merge(package);
        if self.config.strict_resolution && !found {
            return Err(ExtractError::unresolved(qualifier, name));
        }
        Ok(())
    }

    /// Extract every source unit of the package at `import_path`.
    fn scan(&self, import_path: &str) -> Result<Option<StructTable>, ExtractError> {
        let Some(units) = self.loader.load_package(import_path)? else {
            return Ok(None);
        };

        let mut package = StructTable::new();
        for unit in &units {
            let parse = unit.parse();
            let model = TypeModelExtractor::new(&self.config, Some(self))
                .with_source_file(&unit.path)
                .parse(&parse)
                .map_err(|err| match err {
                    ExtractError::Parse { message, position } => ExtractError::Parse {
                        message: format!("{}: {}", unit.path.display(), message),
                        position,
                    },
                    other => other,
                })?;
            package.merge(model.into_struct_table());
        }
        info!(
            package = import_path,
            files = units.len(),
            structs = package.len(),
            "resolved package"
        );
        Ok(Some(package))
    }

    fn missing(&self, qualifier: &str, name: &str, reason: &str) -> Result<(), ExtractError> {
        if self.config.strict_resolution {
            return Err(ExtractError::unresolved(qualifier, name));
        }
        warn!(package = qualifier, name, reason, "leaving reference unresolved");
        Ok(())
    }
}

impl std::fmt::Debug for ReferenceResolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceResolver")
            .field("packages", &self.packages.borrow().len())
            .field("strict", &self.config.strict_resolution)
            .finish()
    }
}
