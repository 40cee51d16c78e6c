//! Recursive descent parser for Go declarations
//!
//! Builds a rowan GreenNode tree from tokens.
//! Supports error recovery and produces a lossless CST. Function bodies and
//! initializer expressions are kept as opaque token runs; only the shapes the
//! type model needs get dedicated nodes.

use super::ast::{AstNode, SourceFile};
use super::lexer::{Lexer, Token};
use super::syntax_kind::SyntaxKind;
use crate::base::LineIndex;
use rowan::{GreenNode, GreenNodeBuilder, TextRange, TextSize};

/// Parse result containing the green tree and any errors
#[derive(Debug, Clone)]
pub struct Parse {
    pub green: GreenNode,
    pub errors: Vec<SyntaxError>,
    line_index: LineIndex,
}

impl Parse {
    /// Get the root syntax node
    pub fn syntax(&self) -> super::SyntaxNode {
        super::SyntaxNode::new_root(self.green.clone())
    }

    /// Get the typed root node
    pub fn source_file(&self) -> Option<SourceFile> {
        SourceFile::cast(self.syntax())
    }

    /// Check if parsing succeeded without errors
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Offset to line/column mapping for the parsed text
    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }
}

/// A syntax error with location and message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

/// Parse Go source code into a CST
pub fn parse(input: &str) -> Parse {
    let tokens: Vec<_> = Lexer::new(input).collect();
    let mut parser = Parser::new(&tokens);
    parser.parse_source_file();
    parser.finish(LineIndex::new(input))
}

const DECL_KEYWORDS: &[SyntaxKind] = &[
    SyntaxKind::IMPORT_KW,
    SyntaxKind::TYPE_KW,
    SyntaxKind::VAR_KW,
    SyntaxKind::CONST_KW,
    SyntaxKind::FUNC_KW,
];

/// The parser state
struct Parser<'a> {
    tokens: &'a [Token<'a>],
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token<'a>]) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn finish(self, line_index: LineIndex) -> Parse {
        Parse {
            green: self.builder.finish(),
            errors: self.errors,
            line_index,
        }
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    fn current(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn current_kind(&self) -> SyntaxKind {
        self.current().map(|t| t.kind).unwrap_or(SyntaxKind::ERROR)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.current_kind() == kind
    }

    fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        kinds.contains(&self.current_kind())
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Index of the first significant token at or after `from`
    fn next_significant(&self, from: usize) -> usize {
        let mut idx = from;
        while idx < self.tokens.len() && self.tokens[idx].kind.is_trivia() {
            idx += 1;
        }
        idx
    }

    fn nth(&self, n: usize) -> SyntaxKind {
        // Look ahead, skipping trivia
        let mut idx = self.next_significant(self.pos);
        for _ in 0..n {
            idx = self.next_significant(idx + 1);
        }
        self.tokens
            .get(idx)
            .map(|t| t.kind)
            .unwrap_or(SyntaxKind::ERROR)
    }

    /// Whether the trivia strictly between `from` and `to` contains a line break
    fn newline_between(&self, from: usize, to: usize) -> bool {
        self.tokens[from + 1..to.min(self.tokens.len())]
            .iter()
            .any(|t| {
                t.kind == SyntaxKind::NEWLINE
                    || (t.kind == SyntaxKind::BLOCK_COMMENT && t.text.contains('\n'))
            })
    }

    /// Whether an automatic semicolon sits before the token at `idx`
    fn implicit_semi_before(&self, idx: usize) -> bool {
        let Some(prev) = (0..idx.min(self.tokens.len()))
            .rev()
            .find(|&i| !self.tokens[i].kind.is_trivia())
        else {
            return false;
        };
        self.tokens[prev].kind.ends_line() && self.newline_between(prev, idx)
    }

    /// True when a line break before the next significant token ends the
    /// current declaration.
    fn at_implicit_semi(&self) -> bool {
        self.implicit_semi_before(self.next_significant(self.pos))
    }

    /// Whether the declaration starting at the next significant token ends
    /// here: `;`, a closing delimiter, end of input or a line break.
    fn at_decl_end(&self) -> bool {
        matches!(
            self.nth(0),
            SyntaxKind::SEMICOLON | SyntaxKind::R_PAREN | SyntaxKind::R_BRACE | SyntaxKind::ERROR
        ) || self.at_implicit_semi()
    }

    /// Whether the token following the next significant one starts a new line
    fn second_on_new_line(&self) -> bool {
        let first = self.next_significant(self.pos);
        let second = self.next_significant(first + 1);
        second < self.tokens.len() && self.newline_between(first, second)
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    fn bump(&mut self) {
        if let Some(token) = self.current() {
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(format!("expected {:?}", kind));
            false
        }
    }

    fn skip_trivia(&mut self) {
        while self.current().map(|t| t.kind.is_trivia()).unwrap_or(false) {
            self.bump();
        }
    }

    /// Consume a bracketed token tree, starting at its opening delimiter
    fn bump_balanced(&mut self) {
        let mut depth = 0usize;
        while !self.at_eof() {
            match self.current_kind() {
                SyntaxKind::L_BRACE | SyntaxKind::L_BRACKET | SyntaxKind::L_PAREN => depth += 1,
                SyntaxKind::R_BRACE | SyntaxKind::R_BRACKET | SyntaxKind::R_PAREN => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.bump();
                        return;
                    }
                }
                _ => {}
            }
            self.bump();
        }
        self.error("unclosed delimiter");
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    fn error(&mut self, message: impl Into<String>) {
        let range = self
            .current()
            .map(|t| TextRange::at(t.offset, TextSize::of(t.text)))
            .or_else(|| {
                self.tokens
                    .last()
                    .map(|t| TextRange::empty(t.offset + TextSize::of(t.text)))
            })
            .unwrap_or_else(|| TextRange::empty(TextSize::new(0)));
        self.errors.push(SyntaxError::new(message, range));
    }

    fn error_recover(&mut self, message: impl Into<String>, recovery: &[SyntaxKind]) {
        self.error(message);
        self.builder.start_node(SyntaxKind::ERROR.into());
        // Always consume at least one token to make progress
        let mut consumed = false;
        while !self.at_eof() && !self.at_any(recovery) {
            self.bump();
            consumed = true;
        }
        if !consumed && !self.at_eof() {
            self.bump();
        }
        self.builder.finish_node();
    }

    // =========================================================================
    // Node building helpers
    // =========================================================================

    fn start_node(&mut self, kind: SyntaxKind) {
        self.builder.start_node(kind.into());
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    /// Parse `( spec* )` or a single spec, calling `spec` for each entry
    fn parse_group(&mut self, spec: fn(&mut Self)) {
        self.skip_trivia();
        if !self.eat(SyntaxKind::L_PAREN) {
            spec(self);
            return;
        }
        loop {
            self.skip_trivia();
            if self.at(SyntaxKind::R_PAREN) || self.at_eof() {
                break;
            }
            let before = self.pos;
            spec(self);
            self.skip_trivia();
            self.eat(SyntaxKind::SEMICOLON);
            if self.pos == before {
                self.error_recover(
                    format!("unexpected token in group: {:?}", self.current_kind()),
                    &[SyntaxKind::SEMICOLON, SyntaxKind::R_PAREN],
                );
            }
        }
        self.expect(SyntaxKind::R_PAREN);
    }

    // =========================================================================
    // Grammar rules - declarations
    // =========================================================================

    /// SourceFile = PackageClause TopLevelDecl*
    fn parse_source_file(&mut self) {
        self.start_node(SyntaxKind::SOURCE_FILE);

        self.skip_trivia();
        if self.at(SyntaxKind::PACKAGE_KW) {
            self.parse_package_clause();
        } else {
            self.error("expected package clause");
        }

        while !self.at_eof() {
            let pos_before = self.pos;
            self.skip_trivia();
            if self.at_eof() {
                break;
            }
            self.parse_top_level_decl();
            // Safety: if we didn't make progress, force-skip a token
            if self.pos == pos_before && !self.at_eof() {
                self.error(format!("stuck on token: {:?}", self.current_kind()));
                self.bump();
            }
        }

        self.finish_node();
    }

    /// PackageClause = 'package' Name
    fn parse_package_clause(&mut self) {
        self.start_node(SyntaxKind::PACKAGE_CLAUSE);
        self.expect(SyntaxKind::PACKAGE_KW);
        self.skip_trivia();
        self.parse_name();
        self.finish_node();
    }

    fn parse_top_level_decl(&mut self) {
        match self.current_kind() {
            SyntaxKind::IMPORT_KW => self.parse_import_decl(),
            SyntaxKind::TYPE_KW => self.parse_type_decl(),
            SyntaxKind::VAR_KW => self.parse_value_decl(SyntaxKind::VAR_DECL),
            SyntaxKind::CONST_KW => self.parse_value_decl(SyntaxKind::CONST_DECL),
            SyntaxKind::FUNC_KW => self.parse_func_decl(),
            SyntaxKind::SEMICOLON => self.bump(),
            _ => {
                self.error_recover(
                    format!("expected declaration, found {:?}", self.current_kind()),
                    DECL_KEYWORDS,
                );
            }
        }
    }

    fn parse_name(&mut self) {
        self.skip_trivia();
        if self.at(SyntaxKind::IDENT) {
            self.start_node(SyntaxKind::NAME);
            self.bump();
            self.finish_node();
        } else {
            self.error("expected identifier");
        }
    }

    /// ImportDecl = 'import' ( ImportSpec | '(' ImportSpec* ')' )
    fn parse_import_decl(&mut self) {
        self.start_node(SyntaxKind::IMPORT_DECL);
        self.expect(SyntaxKind::IMPORT_KW);
        self.parse_group(Self::parse_import_spec);
        self.finish_node();
    }

    /// ImportSpec = ( Name | '.' )? String
    fn parse_import_spec(&mut self) {
        self.start_node(SyntaxKind::IMPORT_SPEC);
        self.skip_trivia();
        if self.at(SyntaxKind::IDENT) {
            self.parse_name();
        } else {
            self.eat(SyntaxKind::DOT);
        }
        self.skip_trivia();
        if self.current_kind().is_string() {
            self.bump();
        } else {
            self.error("expected import path");
        }
        self.finish_node();
    }

    /// TypeDecl = 'type' ( TypeSpec | '(' TypeSpec* ')' )
    fn parse_type_decl(&mut self) {
        self.start_node(SyntaxKind::TYPE_DECL);
        self.expect(SyntaxKind::TYPE_KW);
        self.parse_group(Self::parse_type_spec);
        self.finish_node();
    }

    /// TypeSpec = Name TypeParams? '='? Type
    fn parse_type_spec(&mut self) {
        self.start_node(SyntaxKind::TYPE_SPEC);
        self.parse_name();
        // `[T any]` declares type parameters, `[N]T` is an array type
        if self.nth(0) == SyntaxKind::L_BRACKET
            && self.nth(1) == SyntaxKind::IDENT
            && self.nth(2) != SyntaxKind::R_BRACKET
        {
            self.parse_type_params();
        }
        self.skip_trivia();
        self.eat(SyntaxKind::EQ);
        self.parse_type();
        self.finish_node();
    }

    fn parse_type_params(&mut self) {
        self.skip_trivia();
        self.start_node(SyntaxKind::TYPE_PARAMS);
        self.bump_balanced();
        self.finish_node();
    }

    /// VarDecl | ConstDecl = kw ( ValueSpec | '(' ValueSpec* ')' )
    fn parse_value_decl(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.bump();
        self.parse_group(Self::parse_value_spec);
        self.finish_node();
    }

    /// ValueSpec = Name (',' Name)* Type? ('=' ExprList)?
    fn parse_value_spec(&mut self) {
        self.start_node(SyntaxKind::VALUE_SPEC);
        self.parse_name();
        while self.nth(0) == SyntaxKind::COMMA {
            self.skip_trivia();
            self.bump();
            self.parse_name();
        }
        if self.nth(0) != SyntaxKind::EQ && !self.at_decl_end() {
            self.parse_type();
        }
        if self.nth(0) == SyntaxKind::EQ {
            self.skip_trivia();
            self.bump();
            self.parse_expr_list();
        }
        self.finish_node();
    }

    /// FuncDecl = 'func' Receiver? Name TypeParams? ParamList Result? Block?
    fn parse_func_decl(&mut self) {
        self.start_node(SyntaxKind::FUNC_DECL);
        self.expect(SyntaxKind::FUNC_KW);
        self.skip_trivia();
        if self.at(SyntaxKind::L_PAREN) {
            self.start_node(SyntaxKind::RECEIVER);
            self.parse_param_list();
            self.finish_node();
        }
        self.parse_name();
        if self.nth(0) == SyntaxKind::L_BRACKET {
            self.parse_type_params();
        }
        self.parse_param_list();
        self.parse_result_opt();
        if self.nth(0) == SyntaxKind::L_BRACE && !self.at_implicit_semi() {
            self.skip_trivia();
            self.start_node(SyntaxKind::BLOCK);
            self.bump_balanced();
            self.finish_node();
        }
        self.finish_node();
    }

    // =========================================================================
    // Grammar rules - parameters
    // =========================================================================

    /// ParamList = '(' (Param (',' Param)* ','?)? ')'
    ///
    /// Go allows either all parameters named (`a, b int`) or none
    /// (`int, string`); a lookahead over the list decides which.
    fn parse_param_list(&mut self) {
        self.skip_trivia();
        self.start_node(SyntaxKind::PARAM_LIST);
        if self.expect(SyntaxKind::L_PAREN) {
            let named = self.param_list_is_named();
            loop {
                self.skip_trivia();
                if self.at(SyntaxKind::R_PAREN) || self.at_eof() {
                    break;
                }
                let before = self.pos;
                self.start_node(SyntaxKind::PARAM);
                if named {
                    self.parse_param_names();
                }
                self.parse_type();
                self.finish_node();
                if self.pos == before {
                    self.error_recover(
                        "expected parameter",
                        &[SyntaxKind::COMMA, SyntaxKind::R_PAREN],
                    );
                }
                self.skip_trivia();
                if !self.eat(SyntaxKind::COMMA) {
                    break;
                }
            }
            self.skip_trivia();
            self.expect(SyntaxKind::R_PAREN);
        }
        self.finish_node();
    }

    /// Names of one parameter group: `a, b` in `a, b int`
    fn parse_param_names(&mut self) {
        self.parse_name();
        // A name is followed either by its type or by `,` and another name
        while self.nth(0) == SyntaxKind::COMMA && self.nth(1) == SyntaxKind::IDENT {
            self.skip_trivia();
            self.bump();
            self.parse_name();
        }
    }

    /// Scan the parameter list starting just after `(` and report whether any
    /// entry has the `name Type` shape.
    fn param_list_is_named(&self) -> bool {
        let mut depth = 0usize;
        let mut first: Option<SyntaxKind> = None;
        let mut second: Option<SyntaxKind> = None;
        let mut idx = self.pos;
        while idx < self.tokens.len() {
            let kind = self.tokens[idx].kind;
            idx += 1;
            if kind.is_trivia() {
                continue;
            }
            if depth == 0 && matches!(kind, SyntaxKind::COMMA | SyntaxKind::R_PAREN) {
                if first == Some(SyntaxKind::IDENT)
                    && second.is_some_and(|k| k != SyntaxKind::DOT)
                {
                    return true;
                }
                if kind == SyntaxKind::R_PAREN {
                    return false;
                }
                first = None;
                second = None;
                continue;
            }
            if first.is_none() {
                first = Some(kind);
            } else if second.is_none() {
                second = Some(kind);
            }
            match kind {
                SyntaxKind::L_PAREN | SyntaxKind::L_BRACKET | SyntaxKind::L_BRACE => depth += 1,
                SyntaxKind::R_PAREN | SyntaxKind::R_BRACKET | SyntaxKind::R_BRACE => {
                    depth = depth.saturating_sub(1)
                }
                _ => {}
            }
        }
        false
    }

    /// Result = ParamList | Type, on the same line as the parameters
    fn parse_result_opt(&mut self) {
        let next = self.nth(0);
        if !next.starts_type() || self.at_implicit_semi() {
            return;
        }
        self.skip_trivia();
        self.start_node(SyntaxKind::RESULT);
        if next == SyntaxKind::L_PAREN {
            self.parse_param_list();
        } else {
            self.parse_type();
        }
        self.finish_node();
    }

    // =========================================================================
    // Grammar rules - types
    // =========================================================================

    fn parse_type(&mut self) {
        self.skip_trivia();
        match self.current_kind() {
            SyntaxKind::IDENT => self.parse_type_name(),
            SyntaxKind::STAR => {
                self.start_node(SyntaxKind::POINTER_TYPE);
                self.bump();
                self.parse_type();
                self.finish_node();
            }
            SyntaxKind::L_BRACKET => self.parse_array_or_slice_type(),
            SyntaxKind::MAP_KW => {
                self.start_node(SyntaxKind::MAP_TYPE);
                self.bump();
                self.skip_trivia();
                self.expect(SyntaxKind::L_BRACKET);
                self.parse_type();
                self.skip_trivia();
                self.expect(SyntaxKind::R_BRACKET);
                self.parse_type();
                self.finish_node();
            }
            SyntaxKind::CHAN_KW => {
                self.start_node(SyntaxKind::CHAN_TYPE);
                self.bump();
                if self.nth(0) == SyntaxKind::ARROW {
                    self.skip_trivia();
                    self.bump();
                }
                self.parse_type();
                self.finish_node();
            }
            SyntaxKind::ARROW => {
                self.start_node(SyntaxKind::CHAN_TYPE);
                self.bump();
                self.skip_trivia();
                self.expect(SyntaxKind::CHAN_KW);
                self.parse_type();
                self.finish_node();
            }
            SyntaxKind::FUNC_KW => {
                self.start_node(SyntaxKind::FUNC_TYPE);
                self.bump();
                self.parse_param_list();
                self.parse_result_opt();
                self.finish_node();
            }
            SyntaxKind::INTERFACE_KW => self.parse_interface_type(),
            SyntaxKind::STRUCT_KW => self.parse_struct_type(),
            SyntaxKind::ELLIPSIS => {
                self.start_node(SyntaxKind::ELLIPSIS_TYPE);
                self.bump();
                self.parse_type();
                self.finish_node();
            }
            SyntaxKind::L_PAREN => {
                self.start_node(SyntaxKind::PAREN_TYPE);
                self.bump();
                self.parse_type();
                self.skip_trivia();
                self.expect(SyntaxKind::R_PAREN);
                self.finish_node();
            }
            kind => self.error(format!("expected type, found {:?}", kind)),
        }
    }

    /// NamedType = Ident | Ident '.' Ident, optionally instantiated `[Args]`
    fn parse_type_name(&mut self) {
        let checkpoint = self.builder.checkpoint();
        self.bump();
        if self.nth(0) == SyntaxKind::DOT && self.nth(1) == SyntaxKind::IDENT {
            self.skip_trivia();
            self.bump();
            self.skip_trivia();
            self.bump();
            self.builder
                .start_node_at(checkpoint, SyntaxKind::QUALIFIED_TYPE.into());
        } else {
            self.builder
                .start_node_at(checkpoint, SyntaxKind::NAMED_TYPE.into());
        }
        self.finish_node();

        if self.at(SyntaxKind::L_BRACKET) {
            self.builder
                .start_node_at(checkpoint, SyntaxKind::GENERIC_TYPE.into());
            self.bump_balanced();
            self.finish_node();
        }
    }

    /// SliceType = '[' ']' Type ; ArrayType = '[' Len ']' Type
    fn parse_array_or_slice_type(&mut self) {
        if self.nth(1) == SyntaxKind::R_BRACKET {
            self.start_node(SyntaxKind::SLICE_TYPE);
            self.bump();
            self.skip_trivia();
            self.bump();
        } else {
            self.start_node(SyntaxKind::ARRAY_TYPE);
            self.bump();
            self.skip_trivia();
            self.start_node(SyntaxKind::ARRAY_LEN);
            let mut depth = 0usize;
            while !self.at_eof() {
                match self.current_kind() {
                    SyntaxKind::L_BRACKET | SyntaxKind::L_PAREN => depth += 1,
                    SyntaxKind::R_PAREN => depth = depth.saturating_sub(1),
                    SyntaxKind::R_BRACKET if depth == 0 => break,
                    SyntaxKind::R_BRACKET => depth -= 1,
                    _ => {}
                }
                self.bump();
            }
            self.finish_node();
            self.expect(SyntaxKind::R_BRACKET);
        }
        self.parse_type();
        self.finish_node();
    }

    /// StructType = 'struct' '{' FieldDecl* '}'
    fn parse_struct_type(&mut self) {
        self.start_node(SyntaxKind::STRUCT_TYPE);
        self.bump();
        self.skip_trivia();
        if self.expect(SyntaxKind::L_BRACE) {
            loop {
                self.skip_trivia();
                if self.at(SyntaxKind::R_BRACE) || self.at_eof() {
                    break;
                }
                let before = self.pos;
                self.parse_field_decl();
                self.skip_trivia();
                self.eat(SyntaxKind::SEMICOLON);
                if self.pos == before {
                    self.error_recover(
                        format!("unexpected token in struct: {:?}", self.current_kind()),
                        &[SyntaxKind::SEMICOLON, SyntaxKind::R_BRACE],
                    );
                }
            }
            self.expect(SyntaxKind::R_BRACE);
        }
        self.finish_node();
    }

    /// FieldDecl = (Name (',' Name)* Type | EmbeddedType) Tag?
    fn parse_field_decl(&mut self) {
        self.start_node(SyntaxKind::FIELD_DECL);
        match self.current_kind() {
            SyntaxKind::IDENT => {
                let embedded = matches!(
                    self.nth(1),
                    SyntaxKind::DOT
                        | SyntaxKind::STRING
                        | SyntaxKind::RAW_STRING
                        | SyntaxKind::SEMICOLON
                        | SyntaxKind::R_BRACE
                        | SyntaxKind::ERROR
                ) || self.second_on_new_line();
                if !embedded {
                    self.parse_name();
                    while self.nth(0) == SyntaxKind::COMMA {
                        self.skip_trivia();
                        self.bump();
                        self.parse_name();
                    }
                }
                self.parse_type();
            }
            SyntaxKind::STAR => self.parse_type(),
            kind => self.error(format!("expected field, found {:?}", kind)),
        }
        if self.nth(0).is_string() && !self.at_implicit_semi() {
            self.skip_trivia();
            self.start_node(SyntaxKind::TAG);
            self.bump();
            self.finish_node();
        }
        self.finish_node();
    }

    /// InterfaceType = 'interface' '{' (MethodSpec | EmbeddedSpec)* '}'
    fn parse_interface_type(&mut self) {
        self.start_node(SyntaxKind::INTERFACE_TYPE);
        self.bump();
        self.skip_trivia();
        if self.expect(SyntaxKind::L_BRACE) {
            loop {
                self.skip_trivia();
                if self.at(SyntaxKind::R_BRACE) || self.at_eof() {
                    break;
                }
                let before = self.pos;
                if self.at(SyntaxKind::IDENT) && self.nth(1) == SyntaxKind::L_PAREN {
                    self.start_node(SyntaxKind::METHOD_SPEC);
                    self.parse_name();
                    self.parse_param_list();
                    self.parse_result_opt();
                    self.finish_node();
                } else {
                    self.start_node(SyntaxKind::EMBEDDED_SPEC);
                    self.parse_type();
                    self.finish_node();
                    if self.nth(0) == SyntaxKind::PIPE {
                        self.skip_trivia();
                        self.error_recover(
                            "type unions are not supported",
                            &[SyntaxKind::SEMICOLON, SyntaxKind::R_BRACE],
                        );
                    }
                }
                self.skip_trivia();
                self.eat(SyntaxKind::SEMICOLON);
                if self.pos == before {
                    self.error_recover(
                        format!("unexpected token in interface: {:?}", self.current_kind()),
                        &[SyntaxKind::SEMICOLON, SyntaxKind::R_BRACE],
                    );
                }
            }
            self.expect(SyntaxKind::R_BRACE);
        }
        self.finish_node();
    }

    // =========================================================================
    // Grammar rules - expressions
    // =========================================================================

    fn parse_expr_list(&mut self) {
        self.skip_trivia();
        self.start_node(SyntaxKind::EXPR_LIST);
        loop {
            self.parse_expr();
            if self.nth(0) == SyntaxKind::COMMA && !self.at_implicit_semi() {
                self.skip_trivia();
                self.bump();
            } else {
                break;
            }
        }
        self.finish_node();
    }

    /// Index one past the last significant token of the expression starting
    /// at the next significant token.
    fn expr_end(&self) -> usize {
        let start = self.next_significant(self.pos);
        let mut depth = 0usize;
        let mut idx = start;
        let mut end = start;
        while idx < self.tokens.len() {
            let kind = self.tokens[idx].kind;
            if kind.is_trivia() {
                idx += 1;
                continue;
            }
            if depth == 0 {
                let closes = matches!(
                    kind,
                    SyntaxKind::COMMA
                        | SyntaxKind::SEMICOLON
                        | SyntaxKind::R_PAREN
                        | SyntaxKind::R_BRACE
                        | SyntaxKind::R_BRACKET
                );
                if closes || (idx > start && self.implicit_semi_before(idx)) {
                    break;
                }
            }
            match kind {
                SyntaxKind::L_PAREN | SyntaxKind::L_BRACKET | SyntaxKind::L_BRACE => depth += 1,
                SyntaxKind::R_PAREN | SyntaxKind::R_BRACKET | SyntaxKind::R_BRACE => {
                    depth = depth.saturating_sub(1)
                }
                _ => {}
            }
            idx += 1;
            end = idx;
        }
        end
    }

    fn significant_kinds(&self, start: usize, end: usize) -> Vec<SyntaxKind> {
        self.tokens[start..end]
            .iter()
            .map(|t| t.kind)
            .filter(|k| !k.is_trivia())
            .collect()
    }

    /// `T{...}`, `pkg.T{...}`, `[]T{...}`, `map[K]V{...}`
    fn is_composite_literal(kinds: &[SyntaxKind]) -> bool {
        let Some(brace) = kinds.iter().position(|k| *k == SyntaxKind::L_BRACE) else {
            return false;
        };
        brace > 0
            && kinds.last() == Some(&SyntaxKind::R_BRACE)
            && kinds[..brace].iter().all(|k| {
                matches!(
                    k,
                    SyntaxKind::IDENT
                        | SyntaxKind::DOT
                        | SyntaxKind::L_BRACKET
                        | SyntaxKind::R_BRACKET
                        | SyntaxKind::STAR
                        | SyntaxKind::MAP_KW
                        | SyntaxKind::INT
                        | SyntaxKind::ELLIPSIS
                )
            })
            && matches!(
                kinds[0],
                SyntaxKind::IDENT | SyntaxKind::L_BRACKET | SyntaxKind::MAP_KW
            )
            && Self::closes_at_end(&kinds[brace..])
    }

    /// Whether the brace opened at `kinds[0]` closes at the last token
    fn closes_at_end(kinds: &[SyntaxKind]) -> bool {
        let mut depth = 0usize;
        for (i, kind) in kinds.iter().enumerate() {
            match kind {
                SyntaxKind::L_BRACE => depth += 1,
                SyntaxKind::R_BRACE => {
                    depth -= 1;
                    if depth == 0 {
                        return i == kinds.len() - 1;
                    }
                }
                _ => {}
            }
        }
        false
    }

    fn parse_expr(&mut self) {
        self.skip_trivia();
        let end = self.expr_end();
        let kinds = self.significant_kinds(self.pos, end);

        if kinds.len() == 1 && kinds[0].is_literal() {
            self.start_node(SyntaxKind::LITERAL);
            self.bump();
            self.finish_node();
        } else if kinds.first() == Some(&SyntaxKind::AMP)
            && Self::is_composite_literal(&kinds[1..])
        {
            self.start_node(SyntaxKind::UNARY_EXPR);
            self.bump();
            self.skip_trivia();
            self.parse_composite_literal();
            self.finish_node();
        } else if Self::is_composite_literal(&kinds) {
            self.parse_composite_literal();
        } else {
            self.start_node(SyntaxKind::EXPR);
            if self.pos >= end {
                self.error("expected expression");
            }
            while self.pos < end {
                self.bump();
            }
            self.finish_node();
        }
    }

    fn parse_composite_literal(&mut self) {
        self.start_node(SyntaxKind::COMPOSITE_LIT);
        self.parse_type();
        self.skip_trivia();
        self.start_node(SyntaxKind::LITERAL_BODY);
        self.bump_balanced();
        self.finish_node();
        self.finish_node();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds_of(input: &str) -> Vec<SyntaxKind> {
        parse(input)
            .syntax()
            .descendants()
            .map(|n| n.kind())
            .collect()
    }

    #[test]
    fn test_parse_package_only() {
        let parse = parse("package svc\n");
        assert!(parse.ok(), "{:?}", parse.errors);
        assert!(kinds_of("package svc").contains(&SyntaxKind::PACKAGE_CLAUSE));
    }

    #[test]
    fn test_parse_is_lossless() {
        let source = "package svc\n\n// Foo does things\ntype Foo struct {\n\tName string `json:\"name\"`\n}\n";
        let parse = parse(source);
        assert!(parse.ok(), "{:?}", parse.errors);
        assert_eq!(parse.syntax().text().to_string(), source);
    }

    #[test]
    fn test_parse_missing_package_reports_error() {
        let parse = parse("type A struct{}");
        assert!(!parse.ok());
    }

    #[test]
    fn test_parse_function_body_is_skipped() {
        let source = "package svc\nfunc (s *svc) Do() error {\n\tif x { return nil }\n\treturn errors.New(\"}\")\n}\ntype A int\n";
        let parse = parse(source);
        assert!(parse.ok(), "{:?}", parse.errors);
        let kinds = kinds_of(source);
        assert!(kinds.contains(&SyntaxKind::BLOCK));
        assert!(kinds.contains(&SyntaxKind::TYPE_SPEC));
    }

    #[test]
    fn test_parse_unnamed_params() {
        let parse = parse("package svc\ntype F func(int, string) error\n");
        assert!(parse.ok(), "{:?}", parse.errors);
        let names = parse
            .syntax()
            .descendants()
            .filter(|n| n.kind() == SyntaxKind::PARAM)
            .filter(|n| n.children().any(|c| c.kind() == SyntaxKind::NAME))
            .count();
        assert_eq!(names, 0);
    }

    #[test]
    fn test_parse_grouped_param_names() {
        let parse = parse("package svc\nfunc Sum(a, b int, c string) {}\n");
        assert!(parse.ok(), "{:?}", parse.errors);
        let params: Vec<_> = parse
            .syntax()
            .descendants()
            .filter(|n| n.kind() == SyntaxKind::PARAM)
            .map(|n| n.children().filter(|c| c.kind() == SyntaxKind::NAME).count())
            .collect();
        assert_eq!(params, vec![2, 1]);
    }

    #[test]
    fn test_parse_result_on_next_line_is_not_a_result() {
        let source = "package svc\ntype S interface {\n\tClose()\n\tName() string\n}\n";
        let parse = parse(source);
        assert!(parse.ok(), "{:?}", parse.errors);
        let results = parse
            .syntax()
            .descendants()
            .filter(|n| n.kind() == SyntaxKind::RESULT)
            .count();
        assert_eq!(results, 1);
    }

    #[test]
    fn test_parse_const_group_with_iota() {
        let source = "package svc\nconst (\n\tA Kind = iota\n\tB\n\tC\n)\n";
        let parse = parse(source);
        assert!(parse.ok(), "{:?}", parse.errors);
        let specs = parse
            .syntax()
            .descendants()
            .filter(|n| n.kind() == SyntaxKind::VALUE_SPEC)
            .count();
        assert_eq!(specs, 3);
    }

    #[test]
    fn test_parse_composite_literal_value() {
        let kinds = kinds_of("package svc\nvar d = &Default{Name: \"x\"}\n");
        assert!(kinds.contains(&SyntaxKind::UNARY_EXPR));
        assert!(kinds.contains(&SyntaxKind::COMPOSITE_LIT));
    }

    #[test]
    fn test_parse_binary_expression_value() {
        let kinds = kinds_of("package svc\nconst Max = 1<<31 - 1\n");
        assert!(kinds.contains(&SyntaxKind::EXPR));
        assert!(!kinds.contains(&SyntaxKind::LITERAL));
    }

    #[test]
    fn test_parse_array_type_vs_type_params() {
        let kinds = kinds_of("package svc\ntype A [4]byte\n");
        assert!(kinds.contains(&SyntaxKind::ARRAY_TYPE));
        assert!(!kinds.contains(&SyntaxKind::TYPE_PARAMS));

        let kinds = kinds_of("package svc\ntype L[T any] struct{ items []T }\n");
        assert!(kinds.contains(&SyntaxKind::TYPE_PARAMS));
    }
}
