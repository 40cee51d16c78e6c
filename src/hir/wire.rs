//! Wire-schema message planning.
//!
//! A struct's wire message lists its named fields with a wire name, a
//! sequence number and a wire type. By default fields are numbered from 1 in
//! declaration order and keep their Go name; `pb:"..."` tag directives
//! override any of the three. Tagging is all or nothing: once one field of a
//! struct carries a `pb` tag, every named field must.

use indexmap::IndexMap;
use tracing::trace;

use super::error::{ConflictError, ExtractError};
use super::model::StructTable;
use super::tags::WireDirectives;
use super::types::{Field, Struct, TypeKind, TypeRef};

/// One field of a planned wire message
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WireField {
    pub name: String,
    pub seq: u32,
    pub wire_type: String,
}

/// Planned wire message for one struct
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WireMessage {
    pub name: String,
    pub fields: Vec<WireField>,
}

impl WireMessage {
    pub fn field(&self, name: &str) -> Option<&WireField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Wire scalar for a Go builtin
pub fn wire_scalar(name: &str) -> Option<&'static str> {
    let scalar = match name {
        "float64" => "double",
        "float32" => "float",
        "int8" | "int16" | "int32" | "rune" => "int32",
        "int" | "int64" => "int64",
        "uint8" | "uint16" | "uint32" | "byte" => "uint32",
        "uint" | "uint64" | "uintptr" => "uint64",
        "bool" => "bool",
        "string" => "string",
        _ => return None,
    };
    Some(scalar)
}

/// Plan the wire message of a record struct.
///
/// Enum-like aliases have no message of their own; fields referring to them
/// use the wire scalar of the aliased type. Anonymous fields are not part of
/// the message.
pub fn plan_message(strc: &Struct, table: &StructTable) -> Result<WireMessage, ExtractError> {
    if strc.is_alias() {
        return Err(ExtractError::unsupported(
            format!("message over enum-like type {}", strc.name),
            strc.position,
        ));
    }

    let named: Vec<&Field> = strc.fields().iter().filter(|f| f.name.is_some()).collect();
    let mut directives = Vec::with_capacity(named.len());
    for field in &named {
        let parsed = match &field.tag {
            Some(tag) => WireDirectives::from_tag(&strc.name, field.name(), tag)?,
            None => None,
        };
        directives.push(parsed);
    }

    let tagged = directives.iter().filter(|d| d.is_some()).count();
    if tagged > 0 && tagged < named.len() {
        return Err(ConflictError::PartialTagging {
            strc: strc.name.clone(),
            tagged,
            total: named.len(),
        }
        .into());
    }

    let mut names: IndexMap<String, &str> = IndexMap::new();
    let mut seqs: IndexMap<u32, &str> = IndexMap::new();
    let mut fields = Vec::with_capacity(named.len());

    for (index, (field, directive)) in named.iter().zip(directives).enumerate() {
        let directive = directive.unwrap_or_default();
        let go_name = field.name();
        let name = directive.name.unwrap_or_else(|| go_name.to_string());
        let seq = directive.seq.unwrap_or(index as u32 + 1);
        let wire_type = match directive.wire_type {
            Some(wire_type) => wire_type,
            None => field_wire_type(&field.ty, strc, table, field)?,
        };

        if let Some(first) = seqs.insert(seq, go_name) {
            return Err(ConflictError::DuplicateSequence {
                strc: strc.name.clone(),
                first: first.to_string(),
                second: go_name.to_string(),
                seq,
            }
            .into());
        }
        if let Some(first) = names.insert(name.clone(), go_name) {
            return Err(ConflictError::DuplicateName {
                strc: strc.name.clone(),
                first: first.to_string(),
                second: go_name.to_string(),
                name,
            }
            .into());
        }

        trace!(message = %strc.name, field = %name, seq, wire_type = %wire_type, "planned field");
        fields.push(WireField {
            name,
            seq,
            wire_type,
        });
    }

    Ok(WireMessage {
        name: strc.name.clone(),
        fields,
    })
}

fn field_wire_type(
    ty: &TypeRef,
    owner: &Struct,
    table: &StructTable,
    field: &Field,
) -> Result<String, ExtractError> {
    let unsupported = || ExtractError::unsupported(ty.to_string(), field.position);
    match &ty.kind {
        TypeKind::Basic { name } => wire_scalar(name).map(str::to_string).ok_or_else(unsupported),
        TypeKind::Struct { name } => {
            let package = ty.qualifier.as_deref().unwrap_or(&owner.package);
            let target = table
                .get(package, name)
                .or_else(|| table.find_by_name(name).next());
            match target.and_then(Struct::aliased_type) {
                Some(aliased) => field_wire_type(aliased, owner, table, field),
                None => Ok(name.clone()),
            }
        }
        TypeKind::Array { elem, .. } => {
            if matches!(&elem.kind, TypeKind::Basic { name } if name == "byte" || name == "uint8")
            {
                return Ok("bytes".to_string());
            }
            if matches!(elem.kind, TypeKind::Array { .. } | TypeKind::Map { .. }) {
                return Err(unsupported());
            }
            Ok(format!("repeated {}", field_wire_type(elem, owner, table, field)?))
        }
        TypeKind::Map { key, value } => {
            let key = match &key.kind {
                TypeKind::Basic { .. } => field_wire_type(key, owner, table, field)?,
                _ => return Err(unsupported()),
            };
            if matches!(value.kind, TypeKind::Array { .. } | TypeKind::Map { .. }) {
                return Err(unsupported());
            }
            Ok(format!("map<{}, {}>", key, field_wire_type(value, owner, table, field)?))
        }
        TypeKind::Func { .. }
        | TypeKind::Ellipsis { .. }
        | TypeKind::Interface
        | TypeKind::Chan { .. }
        | TypeKind::Unsupported { .. } => Err(unsupported()),
    }
}
