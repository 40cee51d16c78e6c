//! `var` and `const` declarations.

use super::TypeModelExtractor;
use crate::hir::error::ExtractError;
use crate::hir::types::{TypeRef, Value};
use crate::parser::{AstNode, Expr, SyntaxKind, ValueSpec};

/// Default type of an untyped literal
fn literal_type(kind: SyntaxKind) -> Option<&'static str> {
    match kind {
        SyntaxKind::INT => Some("int"),
        SyntaxKind::FLOAT => Some("float64"),
        SyntaxKind::IMAG => Some("complex128"),
        SyntaxKind::CHAR => Some("rune"),
        SyntaxKind::STRING | SyntaxKind::RAW_STRING => Some("string"),
        _ => None,
    }
}

impl TypeModelExtractor<'_> {
    /// Record the specs of one `var` or `const` declaration.
    ///
    /// Inside a const group a spec with neither type nor values repeats the
    /// type of the previous spec.
    pub(super) fn declare_values(
        &mut self,
        specs: impl Iterator<Item = ValueSpec>,
        constant: bool,
    ) -> Result<(), ExtractError> {
        let mut previous: Option<TypeRef> = None;
        for spec in specs {
            let declared = match spec.ty() {
                Some(ty) => Some(self.classify(&ty)?),
                None => None,
            };
            let values = spec.values();

            let mut spec_type = declared.clone();
            for (index, name) in spec.names().enumerate() {
                let position = self.position(name.syntax());
                let (inferred, text) = match values.get(index) {
                    Some(expr) => self.infer(expr)?,
                    None => (None, None),
                };
                let ty = match (&declared, inferred) {
                    (Some(declared), _) => Some(declared.clone()),
                    (None, Some(inferred)) => Some(inferred),
                    (None, None) if constant && values.is_empty() => previous.clone(),
                    (None, None) => None,
                };
                if spec_type.is_none() {
                    spec_type = ty.clone();
                }
                let value = Value {
                    name: name.text(),
                    ty,
                    value: text,
                    position,
                };
                if constant {
                    self.consts.push(value);
                } else {
                    self.vars.push(value);
                }
            }

            if declared.is_some() || !values.is_empty() {
                previous = spec_type;
            }
        }
        Ok(())
    }

    /// Type implied by an initializer, and its source text
    fn infer(&mut self, expr: &Expr) -> Result<(Option<TypeRef>, Option<String>), ExtractError> {
        let text = expr.syntax().text().to_string().trim().to_string();
        let ty = match expr {
            Expr::Literal(literal) => literal
                .kind()
                .and_then(literal_type)
                .map(TypeRef::basic),
            Expr::Unary(unary) if unary.is_address_of() => match unary.operand().and_then(|c| c.ty()) {
                Some(ty) => Some(self.classify(&ty)?.pointer_to()),
                None => None,
            },
            Expr::Composite(composite) => match composite.ty() {
                Some(ty) => Some(self.classify(&ty)?),
                None => None,
            },
            Expr::Unary(_) | Expr::Other(_) => None,
        };
        Ok((ty, Some(text)))
    }
}
