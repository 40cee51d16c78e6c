//! Access paths into the source value of a conversion.
//!
//! A path such as `resp.Data.Name` is read inside generated code; every
//! pointer traversed on the way must be checked before the read. Two kinds
//! of paths exist:
//!
//! - [`FlatAlias`] names a local (`temp`, `k`) and never needs a check
//! - [`ShapeAlias`] is rooted at a struct value and knows its shape, so it can
//!   compute the [`NilGuard`] of any path below the root

use std::fmt;

use super::error::SynthesisError;
use super::index::StructIndex;

/// Conjunction of `expr != nil` conditions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NilGuard(Vec<String>);

impl NilGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Guarded expressions, outermost first
    pub fn exprs(&self) -> &[String] {
        &self.0
    }

    pub fn push(&mut self, expr: impl Into<String>) {
        self.0.push(expr.into());
    }

    /// This guard extended with `expr != nil`
    pub fn and(&self, expr: impl Into<String>) -> Self {
        let mut guard = self.clone();
        guard.push(expr);
        guard
    }
}

impl fmt::Display for NilGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, expr) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" && ")?;
            }
            write!(f, "{} != nil", expr)?;
        }
        Ok(())
    }
}

/// A dotted access expression rooted at a variable of the generated code.
pub trait AccessPath: Clone {
    /// The expression text, e.g. `req.User.Name`
    fn path(&self) -> &str;

    /// Conditions that must hold before [`AccessPath::path`] can be read.
    /// The leaf itself is never included.
    fn check_nil(&self, index: &StructIndex<'_>) -> Result<NilGuard, SynthesisError>;

    /// The path one field further down
    fn with_segment(&self, segment: &str) -> Self;
}

/// A bare local variable; reading it never dereferences a pointer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlatAlias {
    path: String,
}

impl FlatAlias {
    pub fn new(name: impl Into<String>) -> Self {
        Self { path: name.into() }
    }
}

impl AccessPath for FlatAlias {
    fn path(&self) -> &str {
        &self.path
    }

    fn check_nil(&self, _index: &StructIndex<'_>) -> Result<NilGuard, SynthesisError> {
        Ok(NilGuard::new())
    }

    fn with_segment(&self, segment: &str) -> Self {
        Self {
            path: format!("{}.{}", self.path, segment),
        }
    }
}

/// A path rooted at a variable of a known struct type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShapeAlias {
    root: String,
    segments: Vec<String>,
    path: String,
    package: String,
    name: String,
    root_pointer: bool,
}

impl ShapeAlias {
    /// `root` holds a `package.name` struct, or a pointer to one
    pub fn new(
        root: impl Into<String>,
        package: impl Into<String>,
        name: impl Into<String>,
        root_pointer: bool,
    ) -> Self {
        let root = root.into();
        Self {
            path: root.clone(),
            root,
            segments: Vec::new(),
            package: package.into(),
            name: name.into(),
            root_pointer,
        }
    }

    pub fn for_struct(root: impl Into<String>, strc: &crate::hir::Struct, root_pointer: bool) -> Self {
        Self::new(root, &strc.package, &strc.name, root_pointer)
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl AccessPath for ShapeAlias {
    fn path(&self) -> &str {
        &self.path
    }

    fn check_nil(&self, index: &StructIndex<'_>) -> Result<NilGuard, SynthesisError> {
        let mut guard = NilGuard::new();
        if self.root_pointer {
            guard.push(&self.root);
        }
        let inner = match self.segments.split_last() {
            Some((_leaf, inner)) if !inner.is_empty() => inner,
            _ => return Ok(guard),
        };

        let mut current = index
            .find(&self.package, &self.name)
            .ok_or_else(|| SynthesisError::unresolved(&self.package, &self.name))?;
        let mut prefix = self.root.clone();
        for segment in inner {
            let field = current
                .field(segment)
                .ok_or_else(|| SynthesisError::unknown_field(&prefix, segment))?;
            prefix.push('.');
            prefix.push_str(segment);

            if field.ty.is_basic() {
                break;
            }
            if field.ty.pointer {
                guard.push(&prefix);
            }
            let stored = field.ty.stored();
            let Some(name) = stored.name() else {
                break;
            };
            current = index
                .lookup(stored, &current.package)
                .ok_or_else(|| {
                    SynthesisError::unresolved(
                        stored.qualifier.as_deref().unwrap_or(&current.package),
                        name,
                    )
                })?;
        }
        Ok(guard)
    }

    fn with_segment(&self, segment: &str) -> Self {
        let mut alias = self.clone();
        alias.segments.push(segment.to_string());
        alias.path = format!("{}.{}", self.path, segment);
        alias
    }
}
