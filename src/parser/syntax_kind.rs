//! Syntax kinds for the Rowan-based CST
//!
//! This enum defines all possible node and token kinds in the syntax tree.
//! It covers the declaration-level subset of the Go grammar.

/// All syntax kinds (tokens and nodes) for Go declarations
///
/// Tokens are leaf nodes (identifiers, keywords, punctuation).
/// Nodes are composite (declarations, specs, types).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA (whitespace and comments - preserved but not semantically meaningful)
    // =========================================================================
    WHITESPACE = 0,
    NEWLINE,
    LINE_COMMENT,
    BLOCK_COMMENT,

    // =========================================================================
    // LITERALS
    // =========================================================================
    IDENT,      // identifier
    INT,        // 42, 0x2A
    FLOAT,      // 3.14
    IMAG,       // 2i
    CHAR,       // 'a'
    STRING,     // "hello"
    RAW_STRING, // `json:"name"`

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_BRACE,   // {
    R_BRACE,   // }
    L_BRACKET, // [
    R_BRACKET, // ]
    L_PAREN,   // (
    R_PAREN,   // )
    SEMICOLON, // ;
    COLON,     // :
    DOT,       // .
    ELLIPSIS,  // ...
    COMMA,     // ,
    EQ,        // =
    COLON_EQ,  // :=
    STAR,      // *
    AMP,       // &
    ARROW,     // <-
    TILDE,     // ~
    PIPE,      // |
    PLUS,      // +
    MINUS,     // -
    BANG,      // !
    CARET,     // ^
    INC,       // ++
    DEC,       // --
    OPERATOR,  // any other operator (==, <<, &&, +=, ...)

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    BREAK_KW,
    CASE_KW,
    CHAN_KW,
    CONST_KW,
    CONTINUE_KW,
    DEFAULT_KW,
    DEFER_KW,
    ELSE_KW,
    FALLTHROUGH_KW,
    FOR_KW,
    FUNC_KW,
    GO_KW,
    GOTO_KW,
    IF_KW,
    IMPORT_KW,
    INTERFACE_KW,
    MAP_KW,
    PACKAGE_KW,
    RANGE_KW,
    RETURN_KW,
    SELECT_KW,
    STRUCT_KW,
    SWITCH_KW,
    TYPE_KW,
    VAR_KW,

    // =========================================================================
    // NODES - declarations
    // =========================================================================
    SOURCE_FILE,
    PACKAGE_CLAUSE,
    NAME,
    IMPORT_DECL,
    IMPORT_SPEC,
    TYPE_DECL,
    TYPE_SPEC,
    TYPE_PARAMS,
    VAR_DECL,
    CONST_DECL,
    VALUE_SPEC,
    FUNC_DECL,
    RECEIVER,
    PARAM_LIST,
    PARAM,
    RESULT,
    BLOCK,

    // =========================================================================
    // NODES - types
    // =========================================================================
    NAMED_TYPE,
    QUALIFIED_TYPE,
    GENERIC_TYPE,
    POINTER_TYPE,
    SLICE_TYPE,
    ARRAY_TYPE,
    ARRAY_LEN,
    MAP_TYPE,
    CHAN_TYPE,
    FUNC_TYPE,
    INTERFACE_TYPE,
    STRUCT_TYPE,
    ELLIPSIS_TYPE,
    PAREN_TYPE,
    FIELD_DECL,
    TAG,
    METHOD_SPEC,
    EMBEDDED_SPEC,

    // =========================================================================
    // NODES - expressions (only what value inference needs)
    // =========================================================================
    EXPR_LIST,
    LITERAL,
    COMPOSITE_LIT,
    LITERAL_BODY,
    UNARY_EXPR,
    EXPR,

    // Special
    ERROR,

    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace, newline or comment)
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::WHITESPACE | Self::NEWLINE | Self::LINE_COMMENT | Self::BLOCK_COMMENT
        )
    }

    /// Check if this is a keyword
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::BREAK_KW as u16) && (self as u16) <= (Self::VAR_KW as u16)
    }

    /// Check if this is a literal
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            Self::INT | Self::FLOAT | Self::IMAG | Self::CHAR | Self::STRING | Self::RAW_STRING
        )
    }

    /// Check if this is a string literal (interpreted or raw)
    pub fn is_string(self) -> bool {
        matches!(self, Self::STRING | Self::RAW_STRING)
    }

    /// Tokens after which a line break terminates the statement
    /// (Go's automatic semicolon rule).
    pub fn ends_line(self) -> bool {
        self.is_literal()
            || matches!(
                self,
                Self::IDENT
                    | Self::BREAK_KW
                    | Self::CONTINUE_KW
                    | Self::FALLTHROUGH_KW
                    | Self::RETURN_KW
                    | Self::INC
                    | Self::DEC
                    | Self::R_PAREN
                    | Self::R_BRACKET
                    | Self::R_BRACE
            )
    }

    /// Tokens that can begin a type expression
    pub fn starts_type(self) -> bool {
        matches!(
            self,
            Self::IDENT
                | Self::STAR
                | Self::L_BRACKET
                | Self::MAP_KW
                | Self::CHAN_KW
                | Self::ARROW
                | Self::FUNC_KW
                | Self::INTERFACE_KW
                | Self::STRUCT_KW
                | Self::L_PAREN
                | Self::ELLIPSIS
        )
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: we control all syntax kinds and check bounds above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for Rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GoLanguage {}

impl rowan::Language for GoLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<GoLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<GoLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<GoLanguage>;
