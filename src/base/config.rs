//! Explicit configuration threaded through the extractor, resolver and
//! synthesizer.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use super::constants::{DEFAULT_FILTERED_PREFIX, DEFAULT_REQUEST_SUFFIX, DEFAULT_RESPONSE_SUFFIX};

/// Decides which field names are dropped during extraction.
///
/// Returns `true` for names that must be skipped.
#[derive(Clone)]
pub struct FieldNameFilter(Arc<dyn Fn(&str) -> bool + Send + Sync>);

impl FieldNameFilter {
    pub fn new(filter: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(filter))
    }

    /// Skip every field whose name starts with one of `prefixes`.
    pub fn prefixes<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let prefixes: Vec<String> = prefixes.into_iter().map(Into::into).collect();
        Self::new(move |name| prefixes.iter().any(|p| name.starts_with(p.as_str())))
    }

    /// Keep every field.
    pub fn keep_all() -> Self {
        Self::new(|_| false)
    }

    pub fn should_skip(&self, name: &str) -> bool {
        (self.0)(name)
    }
}

impl Default for FieldNameFilter {
    fn default() -> Self {
        Self::prefixes([DEFAULT_FILTERED_PREFIX])
    }
}

impl fmt::Debug for FieldNameFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FieldNameFilter(..)")
    }
}

/// Generation settings shared by every stage of one invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Suffix marking request structs (`DoRequest`)
    pub request_suffix: String,
    /// Suffix marking response structs (`DoResponse`)
    pub response_suffix: String,
    /// Field-name filter applied before classification
    pub field_filter: FieldNameFilter,
    /// Overrides the package name reported by the extracted model
    pub package_name: Option<String>,
    /// Directories searched for imported packages, in order (`$GOPATH/src`, ...)
    pub search_roots: Vec<PathBuf>,
    /// Fail when a required cross-package reference cannot be located
    pub strict_resolution: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            request_suffix: DEFAULT_REQUEST_SUFFIX.to_string(),
            response_suffix: DEFAULT_RESPONSE_SUFFIX.to_string(),
            field_filter: FieldNameFilter::default(),
            package_name: None,
            search_roots: Vec::new(),
            strict_resolution: false,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default configuration with `$GOPATH/src` and `$GOROOT/src` as search roots.
    pub fn from_env() -> Self {
        let search_roots = ["GOPATH", "GOROOT"]
            .iter()
            .filter_map(|var| std::env::var_os(var))
            .flat_map(|value| std::env::split_paths(&value).collect::<Vec<_>>())
            .filter(|path| !path.as_os_str().is_empty())
            .map(|path| path.join("src"))
            .collect();
        Self {
            search_roots,
            ..Self::default()
        }
    }

    pub fn with_request_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.request_suffix = suffix.into();
        self
    }

    pub fn with_response_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.response_suffix = suffix.into();
        self
    }

    pub fn with_field_filter(mut self, filter: FieldNameFilter) -> Self {
        self.field_filter = filter;
        self
    }

    pub fn with_package_name(mut self, name: impl Into<String>) -> Self {
        self.package_name = Some(name.into());
        self
    }

    pub fn with_search_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.search_roots.push(root.into());
        self
    }

    pub fn with_strict_resolution(mut self, strict: bool) -> Self {
        self.strict_resolution = strict;
        self
    }

    /// Whether `name` follows the request or response naming convention.
    pub fn is_request_or_response(&self, name: &str) -> bool {
        name.ends_with(&self.request_suffix) || name.ends_with(&self.response_suffix)
    }
}
