//! Extraction helpers and an instrumented source loader.

use std::cell::Cell;
use std::io;

use gokit_model::base::Config;
use gokit_model::hir::{ExtractError, ReferenceResolver, TypeModel, TypeModelExtractor};
use gokit_model::parser::parse;
use gokit_model::project::{MemoryLoader, SourceLoader, SourceUnit};

use super::source_fixtures::{PB_EXTRA_SOURCE, PB_IMPORT_PATH, PB_SOURCE};

/// Extract a model without cross-package resolution.
pub fn extract(source: &str) -> TypeModel {
    extract_with(&Config::default(), source)
}

pub fn extract_with(config: &Config, source: &str) -> TypeModel {
    TypeModelExtractor::new(config, None)
        .parse(&parse(source))
        .expect("extraction should succeed")
}

/// Extract a model, resolving qualified references through `resolver`.
pub fn extract_resolving(
    config: &Config,
    resolver: &ReferenceResolver<'_>,
    source: &str,
) -> Result<TypeModel, ExtractError> {
    TypeModelExtractor::new(config, Some(resolver)).parse(&parse(source))
}

/// In-memory loader serving the wire-schema package.
pub fn pb_loader() -> MemoryLoader {
    MemoryLoader::new()
        .with_file(PB_IMPORT_PATH, "pb/service.pb.go", PB_SOURCE)
        .with_file(PB_IMPORT_PATH, "pb/page.pb.go", PB_EXTRA_SOURCE)
}

/// Loader wrapper counting package loads.
pub struct CountingLoader<L> {
    inner: L,
    calls: Cell<usize>,
}

impl<L: SourceLoader> CountingLoader<L> {
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl<L: SourceLoader> SourceLoader for CountingLoader<L> {
    fn load_package(&self, import_path: &str) -> io::Result<Option<Vec<SourceUnit>>> {
        self.calls.set(self.calls.get() + 1);
        self.inner.load_package(import_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counting_loader_counts_every_call() {
        let loader = CountingLoader::new(pb_loader());
        assert_eq!(loader.load_package(PB_IMPORT_PATH).unwrap().unwrap().len(), 2);
        assert!(loader.load_package("example.com/missing").unwrap().is_none());
        assert_eq!(loader.calls(), 2);
    }
}
