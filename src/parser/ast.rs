//! Typed AST wrappers over the untyped rowan CST.
//!
//! This module provides strongly-typed accessors for Go declaration nodes.
//! Each struct wraps a SyntaxNode and provides methods to access children.

use super::syntax_kind::SyntaxKind;
use super::{SyntaxNode, SyntaxToken};

/// Trait for AST nodes that wrap a SyntaxNode
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;
}

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$kind
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self(node))
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

fn first_token(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == kind)
}

fn has_token(node: &SyntaxNode, kind: SyntaxKind) -> bool {
    first_token(node, kind).is_some()
}

/// Strip the quotes from a Go string literal, resolving simple escapes in
/// interpreted strings.
pub fn unquote(text: &str) -> String {
    if let Some(raw) = text.strip_prefix('`').and_then(|t| t.strip_suffix('`')) {
        return raw.to_string();
    }
    let inner = text
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text);
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

// ============================================================================
// Root
// ============================================================================

ast_node!(SourceFile, SOURCE_FILE);

impl SourceFile {
    pub fn package_clause(&self) -> Option<PackageClause> {
        self.0.children().find_map(PackageClause::cast)
    }

    /// The declared package name
    pub fn package_name(&self) -> Option<String> {
        self.package_clause()?.name().map(|n| n.text())
    }

    pub fn imports(&self) -> impl Iterator<Item = ImportSpec> + '_ {
        self.0
            .children()
            .filter_map(ImportDecl::cast)
            .flat_map(|decl| decl.specs().collect::<Vec<_>>())
    }

    pub fn decls(&self) -> impl Iterator<Item = Decl> + '_ {
        self.0.children().filter_map(Decl::cast)
    }

    pub fn type_specs(&self) -> impl Iterator<Item = TypeSpec> + '_ {
        self.0
            .children()
            .filter_map(TypeDecl::cast)
            .flat_map(|decl| decl.specs().collect::<Vec<_>>())
    }

    pub fn func_decls(&self) -> impl Iterator<Item = FuncDecl> + '_ {
        self.0.children().filter_map(FuncDecl::cast)
    }
}

/// Top-level declaration (imports are reached through [`SourceFile::imports`])
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Decl {
    Type(TypeDecl),
    Var(VarDecl),
    Const(ConstDecl),
    Func(FuncDecl),
}

impl AstNode for Decl {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::TYPE_DECL
                | SyntaxKind::VAR_DECL
                | SyntaxKind::CONST_DECL
                | SyntaxKind::FUNC_DECL
        )
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::TYPE_DECL => Some(Self::Type(TypeDecl(node))),
            SyntaxKind::VAR_DECL => Some(Self::Var(VarDecl(node))),
            SyntaxKind::CONST_DECL => Some(Self::Const(ConstDecl(node))),
            SyntaxKind::FUNC_DECL => Some(Self::Func(FuncDecl(node))),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Type(n) => n.syntax(),
            Self::Var(n) => n.syntax(),
            Self::Const(n) => n.syntax(),
            Self::Func(n) => n.syntax(),
        }
    }
}

// ============================================================================
// Names
// ============================================================================

ast_node!(PackageClause, PACKAGE_CLAUSE);

impl PackageClause {
    pub fn name(&self) -> Option<Name> {
        self.0.children().find_map(Name::cast)
    }
}

ast_node!(Name, NAME);

impl Name {
    pub fn ident(&self) -> Option<SyntaxToken> {
        first_token(&self.0, SyntaxKind::IDENT)
    }

    pub fn text(&self) -> String {
        self.ident().map(|t| t.text().to_string()).unwrap_or_default()
    }
}

// ============================================================================
// Imports
// ============================================================================

ast_node!(ImportDecl, IMPORT_DECL);

impl ImportDecl {
    pub fn specs(&self) -> impl Iterator<Item = ImportSpec> + '_ {
        self.0.children().filter_map(ImportSpec::cast)
    }
}

ast_node!(ImportSpec, IMPORT_SPEC);

impl ImportSpec {
    /// Explicit local name (`alias "path"`)
    pub fn alias(&self) -> Option<Name> {
        self.0.children().find_map(Name::cast)
    }

    /// Dot import (`. "path"`)
    pub fn is_dot(&self) -> bool {
        has_token(&self.0, SyntaxKind::DOT)
    }

    /// The unquoted import path
    pub fn path(&self) -> Option<String> {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| t.kind().is_string())
            .map(|t| unquote(t.text()))
    }
}

// ============================================================================
// Type declarations
// ============================================================================

ast_node!(TypeDecl, TYPE_DECL);

impl TypeDecl {
    pub fn specs(&self) -> impl Iterator<Item = TypeSpec> + '_ {
        self.0.children().filter_map(TypeSpec::cast)
    }
}

ast_node!(TypeSpec, TYPE_SPEC);

impl TypeSpec {
    pub fn name(&self) -> Option<Name> {
        self.0.children().find_map(Name::cast)
    }

    pub fn has_type_params(&self) -> bool {
        self.0
            .children()
            .any(|n| n.kind() == SyntaxKind::TYPE_PARAMS)
    }

    /// `type A = B`
    pub fn is_alias(&self) -> bool {
        has_token(&self.0, SyntaxKind::EQ)
    }

    pub fn ty(&self) -> Option<Type> {
        self.0.children().find_map(Type::cast)
    }
}

// ============================================================================
// Value declarations
// ============================================================================

ast_node!(VarDecl, VAR_DECL);

impl VarDecl {
    pub fn specs(&self) -> impl Iterator<Item = ValueSpec> + '_ {
        self.0.children().filter_map(ValueSpec::cast)
    }
}

ast_node!(ConstDecl, CONST_DECL);

impl ConstDecl {
    pub fn specs(&self) -> impl Iterator<Item = ValueSpec> + '_ {
        self.0.children().filter_map(ValueSpec::cast)
    }
}

ast_node!(ValueSpec, VALUE_SPEC);

impl ValueSpec {
    pub fn names(&self) -> impl Iterator<Item = Name> + '_ {
        self.0.children().filter_map(Name::cast)
    }

    /// Declared type, if written
    pub fn ty(&self) -> Option<Type> {
        self.0.children().find_map(Type::cast)
    }

    pub fn values(&self) -> Vec<Expr> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::EXPR_LIST)
            .map(|list| list.children().filter_map(Expr::cast).collect())
            .unwrap_or_default()
    }
}

// ============================================================================
// Functions
// ============================================================================

ast_node!(FuncDecl, FUNC_DECL);

impl FuncDecl {
    pub fn receiver(&self) -> Option<Receiver> {
        self.0.children().find_map(Receiver::cast)
    }

    pub fn name(&self) -> Option<Name> {
        self.0.children().find_map(Name::cast)
    }

    pub fn params(&self) -> Option<ParamList> {
        self.0.children().find_map(ParamList::cast)
    }

    pub fn result(&self) -> Option<FuncResult> {
        self.0.children().find_map(FuncResult::cast)
    }
}

ast_node!(Receiver, RECEIVER);

impl Receiver {
    pub fn param(&self) -> Option<Param> {
        self.0
            .children()
            .find_map(ParamList::cast)?
            .params()
            .next()
    }

    /// Name of the receiver's base type: `T` for `(s *T)`, `(T)` or `(s T[K])`
    pub fn base_type_name(&self) -> Option<String> {
        let mut ty = self.param()?.ty()?;
        loop {
            ty = match ty {
                Type::Pointer(p) => p.elem()?,
                Type::Paren(p) => p.inner()?,
                Type::Generic(g) => g.base()?,
                Type::Named(n) => return n.name(),
                _ => return None,
            };
        }
    }
}

ast_node!(ParamList, PARAM_LIST);

impl ParamList {
    pub fn params(&self) -> impl Iterator<Item = Param> + '_ {
        self.0.children().filter_map(Param::cast)
    }
}

ast_node!(Param, PARAM);

impl Param {
    pub fn names(&self) -> impl Iterator<Item = Name> + '_ {
        self.0.children().filter_map(Name::cast)
    }

    pub fn ty(&self) -> Option<Type> {
        self.0.children().find_map(Type::cast)
    }
}

ast_node!(FuncResult, RESULT);

impl FuncResult {
    /// Parenthesized result list
    pub fn params(&self) -> Option<ParamList> {
        self.0.children().find_map(ParamList::cast)
    }

    /// Single unparenthesized result type
    pub fn ty(&self) -> Option<Type> {
        self.0.children().find_map(Type::cast)
    }
}

// ============================================================================
// Types
// ============================================================================

/// Any type expression
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Named(NamedType),
    Qualified(QualifiedType),
    Generic(GenericType),
    Pointer(PointerType),
    Slice(SliceType),
    Array(ArrayType),
    Map(MapType),
    Chan(ChanType),
    Func(FuncType),
    Interface(InterfaceType),
    Struct(StructType),
    Ellipsis(EllipsisType),
    Paren(ParenType),
}

impl AstNode for Type {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::NAMED_TYPE
                | SyntaxKind::QUALIFIED_TYPE
                | SyntaxKind::GENERIC_TYPE
                | SyntaxKind::POINTER_TYPE
                | SyntaxKind::SLICE_TYPE
                | SyntaxKind::ARRAY_TYPE
                | SyntaxKind::MAP_TYPE
                | SyntaxKind::CHAN_TYPE
                | SyntaxKind::FUNC_TYPE
                | SyntaxKind::INTERFACE_TYPE
                | SyntaxKind::STRUCT_TYPE
                | SyntaxKind::ELLIPSIS_TYPE
                | SyntaxKind::PAREN_TYPE
        )
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::NAMED_TYPE => Some(Self::Named(NamedType(node))),
            SyntaxKind::QUALIFIED_TYPE => Some(Self::Qualified(QualifiedType(node))),
            SyntaxKind::GENERIC_TYPE => Some(Self::Generic(GenericType(node))),
            SyntaxKind::POINTER_TYPE => Some(Self::Pointer(PointerType(node))),
            SyntaxKind::SLICE_TYPE => Some(Self::Slice(SliceType(node))),
            SyntaxKind::ARRAY_TYPE => Some(Self::Array(ArrayType(node))),
            SyntaxKind::MAP_TYPE => Some(Self::Map(MapType(node))),
            SyntaxKind::CHAN_TYPE => Some(Self::Chan(ChanType(node))),
            SyntaxKind::FUNC_TYPE => Some(Self::Func(FuncType(node))),
            SyntaxKind::INTERFACE_TYPE => Some(Self::Interface(InterfaceType(node))),
            SyntaxKind::STRUCT_TYPE => Some(Self::Struct(StructType(node))),
            SyntaxKind::ELLIPSIS_TYPE => Some(Self::Ellipsis(EllipsisType(node))),
            SyntaxKind::PAREN_TYPE => Some(Self::Paren(ParenType(node))),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Named(n) => n.syntax(),
            Self::Qualified(n) => n.syntax(),
            Self::Generic(n) => n.syntax(),
            Self::Pointer(n) => n.syntax(),
            Self::Slice(n) => n.syntax(),
            Self::Array(n) => n.syntax(),
            Self::Map(n) => n.syntax(),
            Self::Chan(n) => n.syntax(),
            Self::Func(n) => n.syntax(),
            Self::Interface(n) => n.syntax(),
            Self::Struct(n) => n.syntax(),
            Self::Ellipsis(n) => n.syntax(),
            Self::Paren(n) => n.syntax(),
        }
    }
}

fn child_type(node: &SyntaxNode) -> Option<Type> {
    node.children().find_map(Type::cast)
}

ast_node!(NamedType, NAMED_TYPE);

impl NamedType {
    pub fn name(&self) -> Option<String> {
        first_token(&self.0, SyntaxKind::IDENT).map(|t| t.text().to_string())
    }
}

ast_node!(QualifiedType, QUALIFIED_TYPE);

impl QualifiedType {
    fn idents(&self) -> impl Iterator<Item = SyntaxToken> + '_ {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| t.kind() == SyntaxKind::IDENT)
    }

    /// Package qualifier (`pkg` in `pkg.T`)
    pub fn qualifier(&self) -> Option<String> {
        self.idents().next().map(|t| t.text().to_string())
    }

    pub fn name(&self) -> Option<String> {
        self.idents().nth(1).map(|t| t.text().to_string())
    }
}

ast_node!(GenericType, GENERIC_TYPE);

impl GenericType {
    /// The type being instantiated
    pub fn base(&self) -> Option<Type> {
        child_type(&self.0)
    }
}

ast_node!(PointerType, POINTER_TYPE);

impl PointerType {
    pub fn elem(&self) -> Option<Type> {
        child_type(&self.0)
    }
}

ast_node!(SliceType, SLICE_TYPE);

impl SliceType {
    pub fn elem(&self) -> Option<Type> {
        child_type(&self.0)
    }
}

ast_node!(ArrayType, ARRAY_TYPE);

impl ArrayType {
    /// Length expression text as written (`4`, `N`, `...`)
    pub fn len_text(&self) -> Option<String> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::ARRAY_LEN)
            .map(|n| n.text().to_string().trim().to_string())
    }

    pub fn elem(&self) -> Option<Type> {
        child_type(&self.0)
    }
}

ast_node!(MapType, MAP_TYPE);

impl MapType {
    pub fn key(&self) -> Option<Type> {
        self.0.children().filter_map(Type::cast).next()
    }

    pub fn value(&self) -> Option<Type> {
        self.0.children().filter_map(Type::cast).nth(1)
    }
}

ast_node!(ChanType, CHAN_TYPE);

impl ChanType {
    pub fn elem(&self) -> Option<Type> {
        child_type(&self.0)
    }
}

ast_node!(FuncType, FUNC_TYPE);

impl FuncType {
    pub fn params(&self) -> Option<ParamList> {
        self.0.children().find_map(ParamList::cast)
    }

    pub fn result(&self) -> Option<FuncResult> {
        self.0.children().find_map(FuncResult::cast)
    }
}

ast_node!(EllipsisType, ELLIPSIS_TYPE);

impl EllipsisType {
    pub fn elem(&self) -> Option<Type> {
        child_type(&self.0)
    }
}

ast_node!(ParenType, PAREN_TYPE);

impl ParenType {
    pub fn inner(&self) -> Option<Type> {
        child_type(&self.0)
    }
}

ast_node!(StructType, STRUCT_TYPE);

impl StructType {
    pub fn fields(&self) -> impl Iterator<Item = FieldDecl> + '_ {
        self.0.children().filter_map(FieldDecl::cast)
    }
}

ast_node!(FieldDecl, FIELD_DECL);

impl FieldDecl {
    pub fn names(&self) -> impl Iterator<Item = Name> + '_ {
        self.0.children().filter_map(Name::cast)
    }

    /// Embedded fields have a type but no names
    pub fn is_embedded(&self) -> bool {
        self.names().next().is_none()
    }

    pub fn ty(&self) -> Option<Type> {
        child_type(&self.0)
    }

    pub fn tag(&self) -> Option<Tag> {
        self.0.children().find_map(Tag::cast)
    }
}

ast_node!(Tag, TAG);

impl Tag {
    /// The unquoted tag text
    pub fn value(&self) -> String {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| t.kind().is_string())
            .map(|t| unquote(t.text()))
            .unwrap_or_default()
    }
}

ast_node!(InterfaceType, INTERFACE_TYPE);

impl InterfaceType {
    pub fn methods(&self) -> impl Iterator<Item = MethodSpec> + '_ {
        self.0.children().filter_map(MethodSpec::cast)
    }

    pub fn embeds(&self) -> impl Iterator<Item = EmbeddedSpec> + '_ {
        self.0.children().filter_map(EmbeddedSpec::cast)
    }
}

ast_node!(MethodSpec, METHOD_SPEC);

impl MethodSpec {
    pub fn name(&self) -> Option<Name> {
        self.0.children().find_map(Name::cast)
    }

    pub fn params(&self) -> Option<ParamList> {
        self.0.children().find_map(ParamList::cast)
    }

    pub fn result(&self) -> Option<FuncResult> {
        self.0.children().find_map(FuncResult::cast)
    }
}

ast_node!(EmbeddedSpec, EMBEDDED_SPEC);

impl EmbeddedSpec {
    pub fn ty(&self) -> Option<Type> {
        child_type(&self.0)
    }
}

// ============================================================================
// Expressions
// ============================================================================

/// Initializer expression of a var or const spec
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Literal(Literal),
    Composite(CompositeLit),
    Unary(UnaryExpr),
    Other(OpaqueExpr),
}

impl AstNode for Expr {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::LITERAL
                | SyntaxKind::COMPOSITE_LIT
                | SyntaxKind::UNARY_EXPR
                | SyntaxKind::EXPR
        )
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::LITERAL => Some(Self::Literal(Literal(node))),
            SyntaxKind::COMPOSITE_LIT => Some(Self::Composite(CompositeLit(node))),
            SyntaxKind::UNARY_EXPR => Some(Self::Unary(UnaryExpr(node))),
            SyntaxKind::EXPR => Some(Self::Other(OpaqueExpr(node))),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Literal(n) => n.syntax(),
            Self::Composite(n) => n.syntax(),
            Self::Unary(n) => n.syntax(),
            Self::Other(n) => n.syntax(),
        }
    }
}

ast_node!(Literal, LITERAL);

impl Literal {
    pub fn token(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| t.kind().is_literal())
    }

    pub fn kind(&self) -> Option<SyntaxKind> {
        self.token().map(|t| t.kind())
    }
}

ast_node!(CompositeLit, COMPOSITE_LIT);

impl CompositeLit {
    pub fn ty(&self) -> Option<Type> {
        child_type(&self.0)
    }
}

ast_node!(UnaryExpr, UNARY_EXPR);

impl UnaryExpr {
    /// `&T{...}`
    pub fn is_address_of(&self) -> bool {
        has_token(&self.0, SyntaxKind::AMP)
    }

    pub fn operand(&self) -> Option<CompositeLit> {
        self.0.children().find_map(CompositeLit::cast)
    }
}

ast_node!(OpaqueExpr, EXPR);
