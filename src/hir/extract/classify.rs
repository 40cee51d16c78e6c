//! Type expression classification.

use tracing::trace;

use super::TypeModelExtractor;
use crate::base::constants::is_builtin_scalar;
use crate::base::Position;
use crate::hir::error::ExtractError;
use crate::hir::types::{Field, Signature, TypeKind, TypeRef};
use crate::parser::{AstNode, FieldDecl, FuncResult, ParamList, Type};

fn required<T>(node: Option<T>, position: Position) -> Result<T, ExtractError> {
    node.ok_or_else(|| ExtractError::parse("incomplete type expression", position))
}

impl TypeModelExtractor<'_> {
    /// Map a type expression onto the closed taxonomy.
    ///
    /// Naming a struct declared in this file defines it first. Qualified
    /// references inside request/response structs are handed to the
    /// resolver.
    pub(super) fn classify(&mut self, ty: &Type) -> Result<TypeRef, ExtractError> {
        let position = self.position(ty.syntax());
        let classified = match ty {
            Type::Named(named) => {
                let name = required(named.name(), position)?;
                if is_builtin_scalar(&name) {
                    TypeRef::basic(name)
                } else {
                    self.define(&name)?;
                    TypeRef::named(name)
                }
            }
            Type::Qualified(qualified) => {
                let qualifier = required(qualified.qualifier(), position)?;
                let name = required(qualified.name(), position)?;
                if qualifier == self.package {
                    // `pkg.T` inside package pkg names a local struct
                    self.define(&name)?;
                    TypeRef::named(name)
                } else {
                    if self.expanding_request_or_response() {
                        if let Some(resolver) = self.resolver {
                            resolver.resolve(&qualifier, &name, &self.imports, &mut self.structs)?;
                        }
                    }
                    TypeRef::named(name).with_qualifier(qualifier)
                }
            }
            Type::Pointer(pointer) => self.classify(&required(pointer.elem(), position)?)?.pointer_to(),
            Type::Slice(slice) => TypeRef::slice(self.classify(&required(slice.elem(), position)?)?),
            Type::Array(array) => {
                let elem = self.classify(&required(array.elem(), position)?)?;
                TypeRef::array(elem, array.len_text().unwrap_or_default())
            }
            Type::Map(map) => {
                let key = self.classify(&required(map.key(), position)?)?;
                let value = self.classify(&required(map.value(), position)?)?;
                TypeRef::map(key, value)
            }
            Type::Chan(chan) => {
                let elem = self.classify(&required(chan.elem(), position)?)?;
                TypeRef::new(TypeKind::Chan {
                    elem: Box::new(elem),
                })
            }
            Type::Func(func) => {
                let signature = self.signature(func.params(), func.result())?;
                TypeRef::new(TypeKind::Func {
                    signature: Box::new(signature),
                })
            }
            Type::Ellipsis(ellipsis) => {
                let elem = self.classify(&required(ellipsis.elem(), position)?)?;
                TypeRef::new(TypeKind::Ellipsis {
                    elem: Box::new(elem),
                })
            }
            Type::Interface(_) => TypeRef::new(TypeKind::Interface),
            Type::Struct(_) => {
                return Err(ExtractError::unsupported("inline struct", position));
            }
            Type::Paren(_) | Type::Generic(_) => {
                let shape = ty.syntax().text().to_string();
                return Err(ExtractError::unsupported(shape.trim(), position));
            }
        };
        trace!(ty = %classified, %position, "classified type");
        Ok(classified)
    }

    /// Expand struct fields. Names rejected by the configured filter are
    /// dropped before their type is classified; embedded fields keep only
    /// their type.
    pub(super) fn fields(
        &mut self,
        decls: impl Iterator<Item = FieldDecl>,
    ) -> Result<Vec<Field>, ExtractError> {
        let mut fields = Vec::new();
        for decl in decls {
            let position = self.position(decl.syntax());
            let ty = required(decl.ty(), position)?;
            let tag = decl.tag().map(|tag| tag.value());

            if decl.is_embedded() {
                fields.push(Field {
                    name: None,
                    ty: self.classify(&ty)?,
                    tag,
                    position,
                });
                continue;
            }

            let names: Vec<_> = decl
                .names()
                .filter(|name| !self.config.field_filter.should_skip(&name.text()))
                .collect();
            if names.is_empty() {
                continue;
            }
            let ty = self.classify(&ty)?;
            for name in names {
                fields.push(Field {
                    name: Some(name.text()),
                    ty: ty.clone(),
                    tag: tag.clone(),
                    position: self.position(name.syntax()),
                });
            }
        }
        Ok(fields)
    }

    /// Expand a parameter list; unnamed parameters keep only their type.
    pub(super) fn params(&mut self, list: Option<ParamList>) -> Result<Vec<Field>, ExtractError> {
        let Some(list) = list else {
            return Ok(Vec::new());
        };
        let mut fields = Vec::new();
        for param in list.params() {
            let position = self.position(param.syntax());
            let ty = required(param.ty(), position)?;
            let names: Vec<_> = param.names().collect();
            if names.is_empty() {
                fields.push(Field::unnamed(self.classify(&ty)?).with_position(position));
                continue;
            }
            let names: Vec<_> = names
                .into_iter()
                .filter(|name| !self.config.field_filter.should_skip(&name.text()))
                .collect();
            if names.is_empty() {
                continue;
            }
            let ty = self.classify(&ty)?;
            for name in names {
                let position = self.position(name.syntax());
                fields.push(Field::new(name.text(), ty.clone()).with_position(position));
            }
        }
        Ok(fields)
    }

    pub(super) fn signature(
        &mut self,
        params: Option<ParamList>,
        result: Option<FuncResult>,
    ) -> Result<Signature, ExtractError> {
        let params = self.params(params)?;
        let results = match result {
            Some(result) => match (result.params(), result.ty()) {
                (Some(list), _) => self.params(Some(list))?,
                (None, Some(ty)) => {
                    let position = self.position(ty.syntax());
                    vec![Field::unnamed(self.classify(&ty)?).with_position(position)]
                }
                (None, None) => Vec::new(),
            },
            None => Vec::new(),
        };
        Ok(Signature { params, results })
    }
}
