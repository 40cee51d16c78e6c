//! Struct tag parsing and `pb:"..."` wire directives.
//!
//! Tags follow Go's `key:"value" key2:"value2"` convention. The `pb` key
//! carries comma separated directives overriding a field's wire name
//! (`name=`), sequence number (`seq=`) and wire type (`type=`).

use crate::base::constants::WIRE_TAG_KEY;

use super::error::ConflictError;

/// Value of `key` in a struct tag, following `reflect.StructTag.Lookup`.
pub fn lookup(tag: &str, key: &str) -> Option<String> {
    let mut rest = tag;
    loop {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            return None;
        }

        // Key runs up to ':' and must not contain spaces, quotes or controls
        let key_end = rest
            .find(|c: char| c <= ' ' || c == ':' || c == '"' || c == '\u{7f}')
            .unwrap_or(rest.len());
        if key_end == 0 || !rest[key_end..].starts_with(":\"") {
            return None;
        }
        let name = &rest[..key_end];
        rest = &rest[key_end + 1..];

        // Quoted value, honoring backslash escapes
        let bytes = rest.as_bytes();
        let mut end = 1;
        while end < bytes.len() && bytes[end] != b'"' {
            if bytes[end] == b'\\' {
                end += 1;
            }
            end += 1;
        }
        if end >= bytes.len() {
            return None;
        }
        let quoted = &rest[..=end];
        rest = &rest[end + 1..];

        if name == key {
            return Some(crate::parser::unquote(quoted));
        }
    }
}

/// Overrides parsed from one field's `pb` tag
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WireDirectives {
    pub name: Option<String>,
    pub seq: Option<u32>,
    pub wire_type: Option<String>,
}

impl WireDirectives {
    /// Parse the `pb` directives of a field tag. `Ok(None)` when the tag has
    /// no `pb` key.
    pub fn from_tag(strc: &str, field: &str, tag: &str) -> Result<Option<Self>, ConflictError> {
        match lookup(tag, WIRE_TAG_KEY) {
            Some(value) if !value.is_empty() => Self::parse(strc, field, &value).map(Some),
            _ => Ok(None),
        }
    }

    /// Parse a directive list such as `name=user_id,seq=2,type=int64`.
    /// Unknown keys are ignored.
    pub fn parse(strc: &str, field: &str, value: &str) -> Result<Self, ConflictError> {
        let invalid = |directive: &str| ConflictError::InvalidDirective {
            strc: strc.to_string(),
            field: field.to_string(),
            directive: directive.to_string(),
        };

        let mut directives = Self::default();
        for directive in value.split(',').map(str::trim).filter(|d| !d.is_empty()) {
            let Some((key, arg)) = directive.split_once('=') else {
                continue;
            };
            match key.trim() {
                "name" if !arg.is_empty() => directives.name = Some(arg.to_string()),
                "seq" => {
                    let seq = arg.trim().parse().map_err(|_| invalid(directive))?;
                    directives.seq = Some(seq);
                }
                "type" if !arg.is_empty() => directives.wire_type = Some(arg.to_string()),
                "name" | "type" => return Err(invalid(directive)),
                _ => {}
            }
        }
        Ok(directives)
    }
}
