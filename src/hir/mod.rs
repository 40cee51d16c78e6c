//! High-level IR (HIR): the type model extracted from Go sources.
//!
//! This layer turns parsed files into a [`TypeModel`] and keeps the shared
//! [`StructTable`] that cross-package resolution fills in.
//!
//! ## Key Types
//!
//! - [`TypeModelExtractor`] — one-shot walk of a parsed file
//! - [`ReferenceResolver`] — loads the packages behind `pkg.Name` references
//! - [`TypeModel`] — read-only result of an extraction
//! - [`StructTable`] — first-wins table of structs by package and name
//! - [`TypeRef`] — classified type expression
//!
//! ## Flow
//!
//! ```text
//! parser::Parse
//!     │
//!     ▼
//! TypeModelExtractor::parse ──► ReferenceResolver::resolve
//!     │                              │ (SourceLoader, one scan per path)
//!     ▼                              ▼
//! TypeModel ◄──────────────── StructTable::merge
//!     │
//!     ├──► wire::plan_message   (pb tag directives)
//!     └──► render::render_struct
//! ```

mod error;
mod extract;
mod model;
mod resolve;
pub mod render;
pub mod tags;
mod types;
pub mod wire;

pub use error::{ConflictError, ExtractError};
pub use extract::TypeModelExtractor;
pub use model::{StructTable, TypeModel};
pub use render::{render_struct, render_type};
pub use resolve::ReferenceResolver;
pub use types::{
    Field, Import, Interface, Method, Signature, Struct, StructBody, TypeKind, TypeRef, Value,
};
pub use wire::{WireField, WireMessage, plan_message};

/// Whether the methods bound to `strc` implement `iface`.
///
/// Every interface method needs a struct method of the same name whose
/// parameter and result types match position by position.
pub fn implements(iface: &Interface, strc: &Struct) -> bool {
    iface.methods.iter().all(|wanted| {
        strc.methods
            .iter()
            .any(|m| m.name == wanted.name && m.signature.matches(&wanted.signature))
    })
}
