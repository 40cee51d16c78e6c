//! Field-by-field conversion between two struct shapes.
//!
//! The output is the body of a Go composite literal: one `Name: expr,` line
//! per field present on both structs, in destination field order. Every
//! expression reads the source through an [`AccessPath`] and wraps itself in
//! a closure returning the zero value when a pointer on the way is nil.

use std::cell::RefCell;
use std::fmt::Write;

use tracing::{debug, trace};

use super::alias::{AccessPath, FlatAlias, NilGuard, ShapeAlias};
use super::error::SynthesisError;
use super::index::StructIndex;
use super::pairing::RequestResponse;
use crate::hir::{Struct, StructTable, TypeKind, TypeRef, render_type};

/// A type together with the package its unqualified names belong to
#[derive(Clone, Copy)]
struct Operand<'t> {
    ty: &'t TypeRef,
    package: &'t str,
}

/// Scalar view of a type: a builtin, or an enum-like alias printed
/// package-qualified
#[derive(Clone, Debug, PartialEq, Eq)]
struct Scalar {
    name: String,
    pointer: bool,
}

impl Scalar {
    fn type_text(&self) -> String {
        if self.pointer {
            format!("*{}", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// Closure yielding `v` of type `ty`, running `body` only when `guard` holds.
fn closure(ty: &str, guard: &NilGuard, body: &str) -> String {
    if guard.is_empty() {
        format!("func() (v {}) {{ {}; return v }}()", ty, body)
    } else {
        format!("func() (v {}) {{ if {} {{ {} }}; return v }}()", ty, guard, body)
    }
}

/// Generates conversions between structs of the domain and wire-schema
/// models.
pub struct ConversionSynthesizer<'a> {
    index: StructIndex<'a>,
    /// Struct pairs being converted, to reject recursive shapes
    active: RefCell<Vec<(String, String)>>,
}

impl<'a> ConversionSynthesizer<'a> {
    /// Synthesizer over the given struct tables, searched in order
    pub fn new(tables: impl IntoIterator<Item = &'a StructTable>) -> Self {
        Self {
            index: StructIndex::new(tables),
            active: RefCell::new(Vec::new()),
        }
    }

    pub fn index(&self) -> &StructIndex<'a> {
        &self.index
    }

    /// Convert into `dest` from the candidate request or response with the
    /// same name, read through `alias`.
    pub fn generate<A: AccessPath>(
        &self,
        dest: &Struct,
        candidates: &[RequestResponse<'_>],
        alias: &A,
    ) -> Result<String, SynthesisError> {
        let src = candidates
            .iter()
            .flat_map(RequestResponse::structs)
            .find(|candidate| candidate.name == dest.name)
            .ok_or_else(|| SynthesisError::unresolved(&dest.package, &dest.name))?;
        self.convert(dest, src, alias)
    }

    /// Convert into `dest` from `src`, read through `alias`.
    pub fn convert<A: AccessPath>(
        &self,
        dest: &Struct,
        src: &Struct,
        alias: &A,
    ) -> Result<String, SynthesisError> {
        debug!(
            dest = %dest.name,
            dest_package = %dest.package,
            src = %src.name,
            src_package = %src.package,
            alias = alias.path(),
            "synthesizing conversion"
        );
        let mut out = String::new();
        for dst_field in dest.fields() {
            let Some(name) = dst_field.name.as_deref() else {
                continue;
            };
            let Some(src_field) = src.field(name) else {
                trace!(field = name, "no source field");
                continue;
            };
            let target = Operand {
                ty: &dst_field.ty,
                package: &dest.package,
            };
            let source = Operand {
                ty: &src_field.ty,
                package: &src.package,
            };
            let expr = self.value(target, source, &alias.with_segment(name))?;
            let _ = writeln!(out, "{}: {},", name, expr);
        }
        Ok(out)
    }

    // ========================================================================
    // Rules
    // ========================================================================

    fn value<A: AccessPath>(
        &self,
        dst: Operand<'_>,
        src: Operand<'_>,
        alias: &A,
    ) -> Result<String, SynthesisError> {
        if let Some(dst_scalar) = self.scalar(dst) {
            let Some(src_scalar) = self.scalar(src) else {
                return Err(self.mismatch(dst, src, alias));
            };
            return self.basic(&dst_scalar, &src_scalar, alias);
        }
        match (&dst.ty.kind, &src.ty.kind) {
            (TypeKind::Struct { .. }, TypeKind::Struct { .. }) => self.structure(dst, src, alias),
            (TypeKind::Array { .. }, TypeKind::Array { .. }) => self.array(dst, src, alias),
            (TypeKind::Map { .. }, TypeKind::Map { .. }) => self.map(dst, src, alias),
            (TypeKind::Struct { .. } | TypeKind::Array { .. } | TypeKind::Map { .. }, _) => {
                Err(self.mismatch(dst, src, alias))
            }
            (kind, _) => Err(SynthesisError::unsupported(alias.path(), kind.label())),
        }
    }

    fn basic<A: AccessPath>(
        &self,
        dst: &Scalar,
        src: &Scalar,
        alias: &A,
    ) -> Result<String, SynthesisError> {
        let p = alias.path();
        let guard = alias.check_nil(&self.index)?;
        let d = &dst.name;
        let same = dst.name == src.name;

        let (guard, direct, body) = match (src.pointer, dst.pointer) {
            (false, false) => {
                let expr = if same {
                    p.to_string()
                } else {
                    format!("{}({})", d, p)
                };
                let body = format!("v = {}", expr);
                (guard, Some(expr), body)
            }
            (true, true) if same => (guard, Some(p.to_string()), format!("v = {}", p)),
            (true, true) => (guard.and(p), None, format!("k := {}(*{}); v = &k", d, p)),
            (true, false) => {
                let body = if same {
                    format!("v = *{}", p)
                } else {
                    format!("v = {}(*{})", d, p)
                };
                (guard.and(p), None, body)
            }
            (false, true) if same => (guard, Some(format!("&{}", p)), format!("v = &{}", p)),
            (false, true) => (guard, None, format!("k := {}({}); v = &k", d, p)),
        };

        Ok(match direct {
            Some(expr) if guard.is_empty() => expr,
            _ => closure(&dst.type_text(), &guard, &body),
        })
    }

    fn structure<A: AccessPath>(
        &self,
        dst: Operand<'_>,
        src: Operand<'_>,
        alias: &A,
    ) -> Result<String, SynthesisError> {
        let dst_struct = self.resolve(dst)?;
        let src_struct = self.resolve(src)?;
        let key = (
            format!("{}.{}", dst_struct.package, dst_struct.name),
            format!("{}.{}", src_struct.package, src_struct.name),
        );
        if self.active.borrow().contains(&key) {
            return Err(SynthesisError::unsupported(
                alias.path(),
                format!("recursive struct {} from {}", key.0, key.1),
            ));
        }

        // The body runs under `src != nil`, so the inner root is unguarded
        self.active.borrow_mut().push(key.clone());
        let body = self.convert(
            dst_struct,
            src_struct,
            &ShapeAlias::for_struct("src", src_struct, false),
        );
        self.active.borrow_mut().pop();
        let body = body?;

        let dst_type = self.type_text(dst);
        let src_type = self.type_text(src);
        let amp = if dst.ty.pointer { "&" } else { "" };

        let mut text = format!("func(src {}) (dst {}) {{\n", src_type, dst_type);
        if src.ty.pointer {
            text.push_str("if src != nil {\n");
        }
        let _ = write!(text, "dst = {}{}{{\n{}}}\n", amp, key.0, body);
        if src.ty.pointer {
            text.push_str("}\n");
        }
        let _ = write!(text, "return dst\n}}({})", alias.path());
        self.guarded(&dst_type, alias, text)
    }

    fn array<A: AccessPath>(
        &self,
        dst: Operand<'_>,
        src: Operand<'_>,
        alias: &A,
    ) -> Result<String, SynthesisError> {
        let (
            TypeKind::Array {
                elem: dst_elem,
                len: dst_len,
            },
            TypeKind::Array {
                elem: src_elem,
                len: src_len,
            },
        ) = (&dst.ty.kind, &src.ty.kind)
        else {
            return Err(self.mismatch(dst, src, alias));
        };
        if dst.ty.pointer || src.ty.pointer {
            return Err(SynthesisError::unsupported(alias.path(), "pointer to array"));
        }
        let dst_elem = Operand {
            ty: dst_elem,
            package: dst.package,
        };
        let src_elem = Operand {
            ty: src_elem,
            package: src.package,
        };
        let dst_type = self.type_text(dst);

        if dst_len == src_len && self.same_scalar(dst_elem, src_elem) {
            return self.guarded(&dst_type, alias, alias.path().to_string());
        }

        let elem = self.value(dst_elem, src_elem, &FlatAlias::new("temp"))?;
        let mut text = format!("func(src {}) (dst {}) {{\n", self.type_text(src), dst_type);
        if dst_len.is_none() {
            let _ = writeln!(text, "dst = make({}, len(src))", dst_type);
        }
        text.push_str("for i := range src {\n");
        if dst_len.is_some() && dst_len != src_len {
            // Elements past the destination's fixed length are dropped
            text.push_str("if i >= len(dst) {\nbreak\n}\n");
        }
        let _ = write!(
            text,
            "temp := src[i]\ndst[i] = {}\n}}\nreturn\n}}({})",
            elem,
            alias.path()
        );
        self.guarded(&dst_type, alias, text)
    }

    fn map<A: AccessPath>(
        &self,
        dst: Operand<'_>,
        src: Operand<'_>,
        alias: &A,
    ) -> Result<String, SynthesisError> {
        let (
            TypeKind::Map {
                key: dst_key,
                value: dst_value,
            },
            TypeKind::Map {
                key: src_key,
                value: src_value,
            },
        ) = (&dst.ty.kind, &src.ty.kind)
        else {
            return Err(self.mismatch(dst, src, alias));
        };
        if dst.ty.pointer || src.ty.pointer {
            return Err(SynthesisError::unsupported(alias.path(), "pointer to map"));
        }
        let dst_key = Operand {
            ty: dst_key,
            package: dst.package,
        };
        let src_key = Operand {
            ty: src_key,
            package: src.package,
        };
        let dst_value = Operand {
            ty: dst_value,
            package: dst.package,
        };
        let src_value = Operand {
            ty: src_value,
            package: src.package,
        };
        let dst_type = self.type_text(dst);

        let (Some(dst_key_scalar), Some(src_key_scalar)) = (self.scalar(dst_key), self.scalar(src_key))
        else {
            return Err(SynthesisError::unsupported(alias.path(), "non-scalar map key"));
        };
        if dst_key_scalar == src_key_scalar && self.same_scalar(dst_value, src_value) {
            return self.guarded(&dst_type, alias, alias.path().to_string());
        }

        let key = self.basic(&dst_key_scalar, &src_key_scalar, &FlatAlias::new("k"))?;
        let value = self.value(dst_value, src_value, &FlatAlias::new("temp"))?;
        let text = format!(
            "func(src {}) (dst {}) {{\ndst = make({}, len(src))\nfor k, temp := range src {{\ndst[{}] = {}\n}}\nreturn\n}}({})",
            self.type_text(src),
            dst_type,
            dst_type,
            key,
            value,
            alias.path()
        );
        self.guarded(&dst_type, alias, text)
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// `expr` evaluated only when the path's intermediate pointers are set
    fn guarded<A: AccessPath>(
        &self,
        ty: &str,
        alias: &A,
        expr: String,
    ) -> Result<String, SynthesisError> {
        let guard = alias.check_nil(&self.index)?;
        if guard.is_empty() {
            return Ok(expr);
        }
        Ok(closure(ty, &guard, &format!("v = {}", expr)))
    }

    fn scalar(&self, operand: Operand<'_>) -> Option<Scalar> {
        let name = match &operand.ty.kind {
            TypeKind::Basic { name } => name.clone(),
            TypeKind::Struct { .. } => {
                let strc = self.index.lookup(operand.ty, operand.package)?;
                strc.aliased_type()?;
                format!("{}.{}", strc.package, strc.name)
            }
            _ => return None,
        };
        Some(Scalar {
            name,
            pointer: operand.ty.pointer,
        })
    }

    fn same_scalar(&self, a: Operand<'_>, b: Operand<'_>) -> bool {
        match (self.scalar(a), self.scalar(b)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    fn resolve(&self, operand: Operand<'_>) -> Result<&'a Struct, SynthesisError> {
        self.index
            .lookup(operand.ty, operand.package)
            .ok_or_else(|| {
                SynthesisError::unresolved(
                    operand.ty.qualifier.as_deref().unwrap_or(operand.package),
                    operand.ty.name().unwrap_or_default(),
                )
            })
    }

    /// Go type text with every struct name package-qualified
    fn type_text(&self, operand: Operand<'_>) -> String {
        let mut ty = operand.ty.clone();
        self.qualify(&mut ty, operand.package);
        render_type(&ty)
    }

    fn qualify(&self, ty: &mut TypeRef, package: &str) {
        if ty.is_struct() {
            let qualifier = match self.index.lookup(ty, package) {
                Some(strc) => strc.package.clone(),
                None => ty.qualifier.clone().unwrap_or_else(|| package.to_string()),
            };
            ty.qualifier = Some(qualifier);
            return;
        }
        match &mut ty.kind {
            TypeKind::Array { elem, .. }
            | TypeKind::Ellipsis { elem }
            | TypeKind::Chan { elem } => self.qualify(elem, package),
            TypeKind::Map { key, value } => {
                self.qualify(key, package);
                self.qualify(value, package);
            }
            _ => {}
        }
    }

    fn mismatch<A: AccessPath>(&self, dst: Operand<'_>, src: Operand<'_>, alias: &A) -> SynthesisError {
        SynthesisError::unsupported(
            alias.path(),
            format!("{} from {}", dst.ty.kind.label(), src.ty.kind.label()),
        )
    }
}

impl std::fmt::Debug for ConversionSynthesizer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversionSynthesizer")
            .field("index", &self.index)
            .finish()
    }
}
