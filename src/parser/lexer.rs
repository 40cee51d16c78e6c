//! Logos-based lexer for Go source
//!
//! Fast tokenization using the logos crate. Newlines are kept as their own
//! trivia kind so the parser can apply Go's automatic semicolon rule.

use super::syntax_kind::SyntaxKind;
use logos::Logos;
use rowan::TextSize;

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    offset: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            offset: 0,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = TextSize::new(self.offset);
        self.offset += text.len() as u32;

        let kind = match logos_token {
            Ok(t) => t.into(),
            Err(()) => SyntaxKind::ERROR,
        };

        Some(Token { kind, text, offset })
    }
}

/// Extend a `/*` token through the closing `*/`. An unterminated comment
/// consumes the rest of the input and lexes as an error.
fn block_comment(lex: &mut logos::Lexer<'_, LogosToken>) -> bool {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => {
            lex.bump(lex.remainder().len());
            false
        }
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Logos token enum - maps to SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\x0C]+")]
    Whitespace,

    #[token("\n")]
    Newline,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[token("/*", block_comment)]
    BlockComment,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[_\p{XID_Start}][_\p{XID_Continue}]*")]
    Ident,

    #[regex(r"[0-9][0-9_]*")]
    #[regex(r"0[xX][0-9a-fA-F_]+")]
    #[regex(r"0[bB][01_]+")]
    #[regex(r"0[oO][0-7_]+")]
    Int,

    #[regex(r"[0-9][0-9_]*\.[0-9_]*([eE][+-]?[0-9_]+)?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9_]+")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9_]+)?")]
    Float,

    #[regex(r"[0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9_]+)?i")]
    Imag,

    #[regex(r"'([^'\\\n]|\\.)+'")]
    Char,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    String,

    #[regex(r"`[^`]*`")]
    RawString,

    // =========================================================================
    // MULTI-CHARACTER PUNCTUATION (must come before single-char)
    // =========================================================================
    #[token("...")]
    Ellipsis,

    #[token("<-")]
    Arrow,

    #[token(":=")]
    ColonEq,

    #[token("++")]
    Inc,

    #[token("--")]
    Dec,

    #[token("==")]
    #[token("!=")]
    #[token("<=")]
    #[token(">=")]
    #[token("&&")]
    #[token("||")]
    #[token("<<")]
    #[token(">>")]
    #[token("&^")]
    #[token("+=")]
    #[token("-=")]
    #[token("*=")]
    #[token("/=")]
    #[token("%=")]
    #[token("&=")]
    #[token("|=")]
    #[token("^=")]
    #[token("<<=")]
    #[token(">>=")]
    #[token("&^=")]
    #[token("<")]
    #[token(">")]
    #[token("/")]
    #[token("%")]
    Operator,

    // =========================================================================
    // SINGLE-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token("=")]
    Eq,
    #[token("*")]
    Star,
    #[token("&")]
    Amp,
    #[token("~")]
    Tilde,
    #[token("|")]
    Pipe,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("!")]
    Bang,
    #[token("^")]
    Caret,

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    #[token("break")]
    BreakKw,
    #[token("case")]
    CaseKw,
    #[token("chan")]
    ChanKw,
    #[token("const")]
    ConstKw,
    #[token("continue")]
    ContinueKw,
    #[token("default")]
    DefaultKw,
    #[token("defer")]
    DeferKw,
    #[token("else")]
    ElseKw,
    #[token("fallthrough")]
    FallthroughKw,
    #[token("for")]
    ForKw,
    #[token("func")]
    FuncKw,
    #[token("go")]
    GoKw,
    #[token("goto")]
    GotoKw,
    #[token("if")]
    IfKw,
    #[token("import")]
    ImportKw,
    #[token("interface")]
    InterfaceKw,
    #[token("map")]
    MapKw,
    #[token("package")]
    PackageKw,
    #[token("range")]
    RangeKw,
    #[token("return")]
    ReturnKw,
    #[token("select")]
    SelectKw,
    #[token("struct")]
    StructKw,
    #[token("switch")]
    SwitchKw,
    #[token("type")]
    TypeKw,
    #[token("var")]
    VarKw,
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        use LogosToken::*;
        match token {
            Whitespace => SyntaxKind::WHITESPACE,
            Newline => SyntaxKind::NEWLINE,
            LineComment => SyntaxKind::LINE_COMMENT,
            BlockComment => SyntaxKind::BLOCK_COMMENT,
            Ident => SyntaxKind::IDENT,
            Int => SyntaxKind::INT,
            Float => SyntaxKind::FLOAT,
            Imag => SyntaxKind::IMAG,
            Char => SyntaxKind::CHAR,
            String => SyntaxKind::STRING,
            RawString => SyntaxKind::RAW_STRING,
            Ellipsis => SyntaxKind::ELLIPSIS,
            Arrow => SyntaxKind::ARROW,
            ColonEq => SyntaxKind::COLON_EQ,
            Inc => SyntaxKind::INC,
            Dec => SyntaxKind::DEC,
            Operator => SyntaxKind::OPERATOR,
            LBrace => SyntaxKind::L_BRACE,
            RBrace => SyntaxKind::R_BRACE,
            LBracket => SyntaxKind::L_BRACKET,
            RBracket => SyntaxKind::R_BRACKET,
            LParen => SyntaxKind::L_PAREN,
            RParen => SyntaxKind::R_PAREN,
            Semicolon => SyntaxKind::SEMICOLON,
            Colon => SyntaxKind::COLON,
            Dot => SyntaxKind::DOT,
            Comma => SyntaxKind::COMMA,
            Eq => SyntaxKind::EQ,
            Star => SyntaxKind::STAR,
            Amp => SyntaxKind::AMP,
            Tilde => SyntaxKind::TILDE,
            Pipe => SyntaxKind::PIPE,
            Plus => SyntaxKind::PLUS,
            Minus => SyntaxKind::MINUS,
            Bang => SyntaxKind::BANG,
            Caret => SyntaxKind::CARET,
            BreakKw => SyntaxKind::BREAK_KW,
            CaseKw => SyntaxKind::CASE_KW,
            ChanKw => SyntaxKind::CHAN_KW,
            ConstKw => SyntaxKind::CONST_KW,
            ContinueKw => SyntaxKind::CONTINUE_KW,
            DefaultKw => SyntaxKind::DEFAULT_KW,
            DeferKw => SyntaxKind::DEFER_KW,
            ElseKw => SyntaxKind::ELSE_KW,
            FallthroughKw => SyntaxKind::FALLTHROUGH_KW,
            ForKw => SyntaxKind::FOR_KW,
            FuncKw => SyntaxKind::FUNC_KW,
            GoKw => SyntaxKind::GO_KW,
            GotoKw => SyntaxKind::GOTO_KW,
            IfKw => SyntaxKind::IF_KW,
            ImportKw => SyntaxKind::IMPORT_KW,
            InterfaceKw => SyntaxKind::INTERFACE_KW,
            MapKw => SyntaxKind::MAP_KW,
            PackageKw => SyntaxKind::PACKAGE_KW,
            RangeKw => SyntaxKind::RANGE_KW,
            ReturnKw => SyntaxKind::RETURN_KW,
            SelectKw => SyntaxKind::SELECT_KW,
            StructKw => SyntaxKind::STRUCT_KW,
            SwitchKw => SyntaxKind::SWITCH_KW,
            TypeKw => SyntaxKind::TYPE_KW,
            VarKw => SyntaxKind::VAR_KW,
        }
    }
}
