//! Foundation types for the generator.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`Position`], [`Span`], [`LineIndex`] - Source positions
//! - [`Config`], [`FieldNameFilter`] - Explicit generation settings
//! - Go constants (predeclared types, file extensions, default suffixes)
//!
//! This module has NO dependencies on other crate modules.

mod config;
pub mod constants;
mod position;

pub use config::{Config, FieldNameFilter};
pub use position::{LineIndex, Position, Span};

// Re-export text-size types for convenience
pub use text_size;
