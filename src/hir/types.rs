//! Model entries: the closed type taxonomy and the declarations built on it.

use crate::base::Position;

#[cfg(feature = "interchange")]
use serde::{Deserialize, Serialize};

/// Shape of a type reference.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "interchange", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "interchange", serde(tag = "kind", rename_all = "snake_case"))]
pub enum TypeKind {
    /// Predeclared scalar (`int64`, `string`, `error`, ...)
    Basic { name: String },
    /// Named, non-builtin type; usually a struct, possibly an enum-like alias
    Struct { name: String },
    /// `[]T`, or `[N]T` when `len` is set
    Array { elem: Box<TypeRef>, len: Option<String> },
    Map { key: Box<TypeRef>, value: Box<TypeRef> },
    Func { signature: Box<Signature> },
    /// Variadic parameter `...T`
    Ellipsis { elem: Box<TypeRef> },
    /// Inline `interface{...}`
    Interface,
    Chan { elem: Box<TypeRef> },
    Unsupported { shape: String },
}

impl TypeKind {
    /// Short name of the kind, used in diagnostics
    pub fn label(&self) -> &'static str {
        match self {
            TypeKind::Basic { .. } => "basic",
            TypeKind::Struct { .. } => "struct",
            TypeKind::Array { .. } => "array",
            TypeKind::Map { .. } => "map",
            TypeKind::Func { .. } => "func",
            TypeKind::Ellipsis { .. } => "ellipsis",
            TypeKind::Interface => "interface",
            TypeKind::Chan { .. } => "chan",
            TypeKind::Unsupported { .. } => "unsupported",
        }
    }
}

/// A classified type expression.
///
/// `pointer` marks `*T`; `qualifier` is the package selector of `pkg.T`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "interchange", derive(Serialize, Deserialize))]
pub struct TypeRef {
    pub pointer: bool,
    pub qualifier: Option<String>,
    pub kind: TypeKind,
}

impl TypeRef {
    pub fn new(kind: TypeKind) -> Self {
        Self {
            pointer: false,
            qualifier: None,
            kind,
        }
    }

    pub fn basic(name: impl Into<String>) -> Self {
        Self::new(TypeKind::Basic { name: name.into() })
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::new(TypeKind::Struct { name: name.into() })
    }

    pub fn slice(elem: TypeRef) -> Self {
        Self::new(TypeKind::Array {
            elem: Box::new(elem),
            len: None,
        })
    }

    pub fn array(elem: TypeRef, len: impl Into<String>) -> Self {
        Self::new(TypeKind::Array {
            elem: Box::new(elem),
            len: Some(len.into()),
        })
    }

    pub fn map(key: TypeRef, value: TypeRef) -> Self {
        Self::new(TypeKind::Map {
            key: Box::new(key),
            value: Box::new(value),
        })
    }

    pub fn pointer_to(mut self) -> Self {
        self.pointer = true;
        self
    }

    pub fn with_pointer(mut self, pointer: bool) -> Self {
        self.pointer = pointer;
        self
    }

    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }

    pub fn is_basic(&self) -> bool {
        matches!(self.kind, TypeKind::Basic { .. })
    }

    pub fn is_struct(&self) -> bool {
        matches!(self.kind, TypeKind::Struct { .. })
    }

    /// Name of a Basic or Struct reference
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            TypeKind::Basic { name } | TypeKind::Struct { name } => Some(name),
            _ => None,
        }
    }

    /// The type stored in a container: element of an array or value of a
    /// map. Other kinds return themselves.
    pub fn stored(&self) -> &TypeRef {
        match &self.kind {
            TypeKind::Array { elem, .. } => elem,
            TypeKind::Map { value, .. } => value,
            _ => self,
        }
    }

    /// Same type, ignoring pointer-ness
    pub fn same_shape(&self, other: &TypeRef) -> bool {
        self.qualifier == other.qualifier && self.kind == other.kind
    }
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&super::render::render_type(self))
    }
}

/// Parameter and result lists of a function type or method.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "interchange", derive(Serialize, Deserialize))]
pub struct Signature {
    pub params: Vec<Field>,
    pub results: Vec<Field>,
}

impl Signature {
    /// Whether both signatures take and return the same types in the same
    /// order. Parameter names are ignored.
    pub fn matches(&self, other: &Signature) -> bool {
        fn types(fields: &[Field]) -> impl Iterator<Item = &TypeRef> {
            fields.iter().map(|f| &f.ty)
        }
        self.params.len() == other.params.len()
            && self.results.len() == other.results.len()
            && types(&self.params).eq(types(&other.params))
            && types(&self.results).eq(types(&other.results))
    }
}

/// A struct field, or a function parameter/result.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "interchange", derive(Serialize, Deserialize))]
pub struct Field {
    /// `None` for embedded fields and unnamed parameters
    pub name: Option<String>,
    pub ty: TypeRef,
    /// Tag text without the surrounding quotes
    pub tag: Option<String>,
    pub position: Position,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: Some(name.into()),
            ty,
            tag: None,
            position: Position::default(),
        }
    }

    pub fn unnamed(ty: TypeRef) -> Self {
        Self {
            name: None,
            ty,
            tag: None,
            position: Position::default(),
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

/// A function, method, or named function type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "interchange", derive(Serialize, Deserialize))]
pub struct Method {
    pub name: String,
    /// Empty for plain functions and function types
    pub receiver: Vec<Field>,
    pub signature: Signature,
    pub position: Position,
}

impl Method {
    pub fn params(&self) -> &[Field] {
        &self.signature.params
    }

    pub fn results(&self) -> &[Field] {
        &self.signature.results
    }

    /// Base type name of the receiver, pointer or value
    pub fn receiver_type(&self) -> Option<&str> {
        self.receiver.first().and_then(|f| f.ty.name())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "interchange", derive(Serialize, Deserialize))]
pub struct Interface {
    pub name: String,
    pub methods: Vec<Method>,
    /// Embedded interfaces as written (`io.Reader`, `Base`)
    pub embeds: Vec<String>,
    pub position: Position,
}

impl Interface {
    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// Either a record with fields or an enum-like definition over a basic type
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "interchange", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "interchange", serde(rename_all = "snake_case"))]
pub enum StructBody {
    Record(Vec<Field>),
    Alias(TypeRef),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "interchange", derive(Serialize, Deserialize))]
pub struct Struct {
    pub package: String,
    pub name: String,
    pub body: StructBody,
    /// Methods bound by receiver type name
    pub methods: Vec<Method>,
    pub position: Position,
}

impl Struct {
    pub fn record(package: impl Into<String>, name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
            body: StructBody::Record(fields),
            methods: Vec::new(),
            position: Position::default(),
        }
    }

    pub fn alias(package: impl Into<String>, name: impl Into<String>, aliased: TypeRef) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
            body: StructBody::Alias(aliased),
            methods: Vec::new(),
            position: Position::default(),
        }
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Fields of a record; empty for enum-like aliases
    pub fn fields(&self) -> &[Field] {
        match &self.body {
            StructBody::Record(fields) => fields,
            StructBody::Alias(_) => &[],
        }
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields()
            .iter()
            .find(|f| f.name.as_deref() == Some(name))
    }

    pub fn aliased_type(&self) -> Option<&TypeRef> {
        match &self.body {
            StructBody::Alias(ty) => Some(ty),
            StructBody::Record(_) => None,
        }
    }

    pub fn is_alias(&self) -> bool {
        self.aliased_type().is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "interchange", derive(Serialize, Deserialize))]
pub struct Import {
    pub alias: Option<String>,
    /// Unquoted import path
    pub path: String,
}

impl Import {
    pub fn new(alias: Option<String>, path: impl Into<String>) -> Self {
        Self {
            alias,
            path: path.into(),
        }
    }

    /// Local name of the package: the alias, or the last path segment
    pub fn package_name(&self) -> &str {
        match &self.alias {
            Some(alias) => alias,
            None => self.path.rsplit('/').next().unwrap_or(&self.path),
        }
    }
}

/// A `var` or `const` declaration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "interchange", derive(Serialize, Deserialize))]
pub struct Value {
    pub name: String,
    /// Declared or inferred type; `None` when neither is available
    pub ty: Option<TypeRef>,
    /// Initializer source text
    pub value: Option<String>,
    pub position: Position,
}
