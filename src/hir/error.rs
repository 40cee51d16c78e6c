//! Error types for model extraction.

use crate::base::Position;
use thiserror::Error;

/// Errors that abort the extraction of a source unit.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The syntax tree contains errors or lacks required parts.
    #[error("parse error at {position}: {message}")]
    Parse { message: String, position: Position },

    /// A type expression outside the supported taxonomy.
    #[error("unsupported type `{shape}` at {position}")]
    UnsupportedType { shape: String, position: Position },

    /// A required cross-package type could not be located.
    #[error("unresolved reference {package}.{name}")]
    UnresolvedReference { package: String, name: String },

    /// Conflicting wire-schema directives.
    #[error(transparent)]
    NameConflict(#[from] ConflictError),

    /// IO error while loading package sources.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractError {
    /// Create a parse error.
    pub fn parse(message: impl Into<String>, position: Position) -> Self {
        Self::Parse {
            message: message.into(),
            position,
        }
    }

    /// Create an unsupported type error.
    pub fn unsupported(shape: impl Into<String>, position: Position) -> Self {
        Self::UnsupportedType {
            shape: shape.into(),
            position,
        }
    }

    /// Create an unresolved reference error.
    pub fn unresolved(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UnresolvedReference {
            package: package.into(),
            name: name.into(),
        }
    }
}

/// Conflicts between `pb:"..."` struct tag directives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConflictError {
    #[error("{strc}: fields {first} and {second} share wire name `{name}`")]
    DuplicateName {
        strc: String,
        first: String,
        second: String,
        name: String,
    },

    #[error("{strc}: fields {first} and {second} share sequence number {seq}")]
    DuplicateSequence {
        strc: String,
        first: String,
        second: String,
        seq: u32,
    },

    #[error("{strc}: the pb tag is set on {tagged} of {total} fields; tag all fields or none")]
    PartialTagging {
        strc: String,
        tagged: usize,
        total: usize,
    },

    #[error("{strc}.{field}: invalid pb directive `{directive}`")]
    InvalidDirective {
        strc: String,
        field: String,
        directive: String,
    },
}
