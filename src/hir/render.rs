//! Go source rendering of model entries.
//!
//! The output is gofmt-shaped but not gofmt-exact; it is used for
//! diagnostics, for type names inside synthesized conversions, and to check
//! that extraction is stable across a render/re-extract cycle.

use std::fmt::Write;

use super::types::{Field, Signature, Struct, StructBody, TypeKind, TypeRef};

/// Render a type reference in Go syntax, e.g. `*pb.User` or `map[string][]int`.
pub fn render_type(ty: &TypeRef) -> String {
    let mut out = String::new();
    if ty.pointer {
        out.push('*');
    }
    match &ty.kind {
        TypeKind::Basic { name } => out.push_str(name),
        TypeKind::Struct { name } => {
            if let Some(qualifier) = &ty.qualifier {
                out.push_str(qualifier);
                out.push('.');
            }
            out.push_str(name);
        }
        TypeKind::Array { elem, len } => {
            let _ = write!(out, "[{}]{}", len.as_deref().unwrap_or(""), render_type(elem));
        }
        TypeKind::Map { key, value } => {
            let _ = write!(out, "map[{}]{}", render_type(key), render_type(value));
        }
        TypeKind::Func { signature } => {
            out.push_str("func");
            out.push_str(&render_signature(signature));
        }
        TypeKind::Ellipsis { elem } => {
            out.push_str("...");
            out.push_str(&render_type(elem));
        }
        TypeKind::Interface => out.push_str("interface{}"),
        TypeKind::Chan { elem } => {
            out.push_str("chan ");
            out.push_str(&render_type(elem));
        }
        TypeKind::Unsupported { shape } => out.push_str(shape),
    }
    out
}

/// `(a int, b string) (T, error)`
pub fn render_signature(signature: &Signature) -> String {
    let params = render_fields(&signature.params);
    match signature.results.as_slice() {
        [] => format!("({})", params),
        [single] if single.name.is_none() => format!("({}) {}", params, render_type(&single.ty)),
        results => format!("({}) ({})", params, render_fields(results)),
    }
}

fn render_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|f| match &f.name {
            Some(name) => format!("{} {}", name, render_type(&f.ty)),
            None => render_type(&f.ty),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render a struct declaration.
///
/// Records render one field per line with their tags in backquotes;
/// enum-like aliases render as `type Name basic`.
pub fn render_struct(strc: &Struct) -> String {
    match &strc.body {
        StructBody::Alias(ty) => format!("type {} {}\n", strc.name, render_type(ty)),
        StructBody::Record(fields) => {
            let mut out = format!("type {} struct {{\n", strc.name);
            for field in fields {
                out.push('\t');
                if let Some(name) = &field.name {
                    out.push_str(name);
                    out.push(' ');
                }
                out.push_str(&render_type(&field.ty));
                if let Some(tag) = &field.tag {
                    let _ = write!(out, " `{}`", tag);
                }
                out.push('\n');
            }
            out.push_str("}\n");
            out
        }
    }
}
