//! Error types for conversion synthesis.

use thiserror::Error;

/// Errors that abort the synthesis of a conversion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    /// A struct needed by the conversion is not in any struct table.
    #[error("unresolved struct {package}.{name}")]
    UnresolvedReference { package: String, name: String },

    /// An access path names a field the struct does not have.
    #[error("{path} has no field `{field}`")]
    UnknownField { path: String, field: String },

    /// No conversion rule covers the field's type.
    #[error("cannot convert {field}: unsupported {kind}")]
    UnsupportedConversion { field: String, kind: String },
}

impl SynthesisError {
    pub fn unresolved(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UnresolvedReference {
            package: package.into(),
            name: name.into(),
        }
    }

    pub fn unknown_field(path: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnknownField {
            path: path.into(),
            field: field.into(),
        }
    }

    pub fn unsupported(field: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::UnsupportedConversion {
            field: field.into(),
            kind: kind.into(),
        }
    }
}
