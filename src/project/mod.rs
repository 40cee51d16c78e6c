//! Project loading: locating and reading the Go packages a model depends on.

pub mod file_loader;

pub use file_loader::{
    FsLoader, MemoryLoader, SourceLoader, SourceUnit, collect_file_paths, load_and_parse,
};
