//! # gokit-model
//!
//! Type-model extraction from Go service definitions and structural
//! conversion synthesis between a domain model and its wire-schema model.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! codegen   → Request/response pairing, nil-guarded conversion synthesis
//!   ↓
//! hir       → Type model extraction, cross-package resolution, wire plans
//!   ↓
//! project   → Package source loading
//!   ↓
//! parser    → Logos lexer, rowan green tree, typed AST
//!   ↓
//! base      → Config, positions, Go constants
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → project → hir → codegen)
// ============================================================================

/// Foundation types: Config, Position, LineIndex
pub mod base;

/// Parser: Logos lexer, recursive-descent parser, typed AST
pub mod parser;

/// Project: package source loading
pub mod project;

/// High-level IR: type model, struct table, resolution
pub mod hir;

/// Conversion synthesis between struct shapes
pub mod codegen;

// Re-export foundation types
pub use base::{Config, FieldNameFilter, LineIndex, Position, Span};

// Re-export the main entry points
pub use codegen::{ConversionSynthesizer, FlatAlias, ShapeAlias, request_response_pairs};
pub use hir::{ExtractError, ReferenceResolver, StructTable, TypeModel, TypeModelExtractor};
