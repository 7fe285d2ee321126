//! Syntax kinds for the PHP fragment CST
//!
//! One enum for every token and node kind in the tree, following the
//! rowan convention of a `#[repr(u16)]` kind with a `__LAST` sentinel.

/// All syntax kinds (tokens and nodes) of a PHP fragment.
///
/// Tokens are leaves (names, variables, literals, punctuation, keywords).
/// Nodes are composite (statements, expressions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    WHITESPACE = 0,
    LINE_COMMENT,
    BLOCK_COMMENT,

    // =========================================================================
    // LITERALS AND NAMES
    // =========================================================================
    NAME,         // foo, Foo\Bar, \strlen
    VARIABLE,     // $user
    INT_NUMBER,   // 42, 0x1F
    FLOAT_NUMBER, // 3.14
    STRING,       // 'a' or "b", possibly unterminated

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    OPEN_TAG,  // <?php, <?=
    CLOSE_TAG, // ?>
    L_BRACE,
    R_BRACE,
    L_BRACKET,
    R_BRACKET,
    L_PAREN,
    R_PAREN,
    SEMICOLON,
    COLON,
    COLON_COLON,
    COMMA,
    DOT,
    ELLIPSIS,
    DOLLAR,
    BACKSLASH,
    ARROW,          // ->
    NULLSAFE_ARROW, // ?->
    FAT_ARROW,      // =>
    QUESTION,
    QUESTION_QUESTION,
    AT,
    CAST, // (int), (string), ...

    // Operators
    EQ_EQ,
    EQ_EQ_EQ,
    BANG_EQ, // != and <>
    BANG_EQ_EQ,
    SPACESHIP,
    LT,
    GT,
    LT_EQ,
    GT_EQ,
    PLUS,
    MINUS,
    STAR,
    SLASH,
    PERCENT,
    STAR_STAR,
    SHL,
    SHR,
    AMP,
    PIPE,
    CARET,
    TILDE,
    BANG,
    AMP_AMP,
    PIPE_PIPE,
    PLUS_PLUS,
    MINUS_MINUS,

    // Assignment operators
    EQ,
    PLUS_EQ,
    MINUS_EQ,
    STAR_EQ,
    SLASH_EQ,
    DOT_EQ,
    PERCENT_EQ,
    STAR_STAR_EQ,
    AMP_EQ,
    PIPE_EQ,
    CARET_EQ,
    SHL_EQ,
    SHR_EQ,
    QUESTION_QUESTION_EQ,

    // =========================================================================
    // KEYWORDS (resolved case-insensitively from names)
    // =========================================================================
    AND_KW,
    ARRAY_KW,
    AS_KW,
    BREAK_KW,
    CASE_KW,
    CLONE_KW,
    CONTINUE_KW,
    DEFAULT_KW,
    ECHO_KW,
    ELSE_KW,
    ELSEIF_KW,
    FALSE_KW,
    FN_KW,
    FOR_KW,
    FOREACH_KW,
    FUNCTION_KW,
    GLOBAL_KW,
    IF_KW,
    INSTANCEOF_KW,
    MATCH_KW,
    NEW_KW,
    NULL_KW,
    OR_KW,
    PRINT_KW,
    RETURN_KW,
    STATIC_KW,
    SWITCH_KW,
    THROW_KW,
    TRUE_KW,
    USE_KW,
    WHILE_KW,
    XOR_KW,

    // =========================================================================
    // NODES - STATEMENTS
    // =========================================================================
    SOURCE_FILE,
    EXPR_STMT,
    ECHO_STMT,
    RETURN_STMT,
    IF_STMT,
    ELSE_CLAUSE,
    FOREACH_STMT,
    FOR_STMT,
    WHILE_STMT,
    SWITCH_STMT,
    CASE_CLAUSE,
    BLOCK,
    USE_STMT,
    GLOBAL_STMT,
    BREAK_STMT,
    FUNCTION_DECL,

    // =========================================================================
    // NODES - EXPRESSIONS
    // =========================================================================
    ASSIGN_EXPR,
    BINARY_EXPR,
    UNARY_EXPR,
    POSTFIX_EXPR,
    TERNARY_EXPR,
    CAST_EXPR,
    PAREN_EXPR,
    VAR_REF,
    NAME_REF,
    LITERAL,
    ARRAY_EXPR,
    ARRAY_ELEMENT,
    CALL_EXPR,
    ARG_LIST,
    ARG,
    MEMBER_EXPR,
    SCOPED_EXPR,
    NEW_EXPR,
    CLONE_EXPR,
    INDEX_EXPR,
    MATCH_EXPR,
    MATCH_ARM,
    CLOSURE_EXPR,
    ARROW_FN,
    PARAM_LIST,
    PARAM,
    CLOSURE_USE,
    TYPE,

    // Special
    ERROR,

    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace or comment)
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::LINE_COMMENT | Self::BLOCK_COMMENT)
    }

    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::AND_KW as u16) && (self as u16) <= (Self::XOR_KW as u16)
    }

    /// Tokens usable as a member or method name (`$a->list`, `Foo::new`).
    pub fn is_name_like(self) -> bool {
        self == Self::NAME || self.is_keyword()
    }

    pub fn is_assignment_op(self) -> bool {
        (self as u16) >= (Self::EQ as u16) && (self as u16) <= (Self::QUESTION_QUESTION_EQ as u16)
    }

    /// Nodes that are expressions.
    pub fn is_expr(self) -> bool {
        (self as u16) >= (Self::ASSIGN_EXPR as u16) && (self as u16) <= (Self::ARROW_FN as u16)
            && !matches!(self, Self::ARRAY_ELEMENT | Self::ARG_LIST | Self::ARG | Self::MATCH_ARM)
    }
}

/// Keywords, matched case-insensitively against unqualified names.
const KEYWORDS: &[(&str, SyntaxKind)] = &[
    ("and", SyntaxKind::AND_KW),
    ("array", SyntaxKind::ARRAY_KW),
    ("as", SyntaxKind::AS_KW),
    ("break", SyntaxKind::BREAK_KW),
    ("case", SyntaxKind::CASE_KW),
    ("clone", SyntaxKind::CLONE_KW),
    ("continue", SyntaxKind::CONTINUE_KW),
    ("default", SyntaxKind::DEFAULT_KW),
    ("echo", SyntaxKind::ECHO_KW),
    ("else", SyntaxKind::ELSE_KW),
    ("elseif", SyntaxKind::ELSEIF_KW),
    ("false", SyntaxKind::FALSE_KW),
    ("fn", SyntaxKind::FN_KW),
    ("for", SyntaxKind::FOR_KW),
    ("foreach", SyntaxKind::FOREACH_KW),
    ("function", SyntaxKind::FUNCTION_KW),
    ("global", SyntaxKind::GLOBAL_KW),
    ("if", SyntaxKind::IF_KW),
    ("instanceof", SyntaxKind::INSTANCEOF_KW),
    ("match", SyntaxKind::MATCH_KW),
    ("new", SyntaxKind::NEW_KW),
    ("null", SyntaxKind::NULL_KW),
    ("or", SyntaxKind::OR_KW),
    ("print", SyntaxKind::PRINT_KW),
    ("return", SyntaxKind::RETURN_KW),
    ("static", SyntaxKind::STATIC_KW),
    ("switch", SyntaxKind::SWITCH_KW),
    ("throw", SyntaxKind::THROW_KW),
    ("true", SyntaxKind::TRUE_KW),
    ("use", SyntaxKind::USE_KW),
    ("while", SyntaxKind::WHILE_KW),
    ("xor", SyntaxKind::XOR_KW),
];

/// Keyword kind for an unqualified name, if it is one.
pub fn keyword(name: &str) -> Option<SyntaxKind> {
    KEYWORDS
        .iter()
        .find(|(text, _)| text.eq_ignore_ascii_case(name))
        .map(|(_, kind)| *kind)
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
pub enum PhpLanguage {}

impl rowan::Language for PhpLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

pub type SyntaxNode = rowan::SyntaxNode<PhpLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<PhpLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<PhpLanguage>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup_ignores_case() {
        assert_eq!(keyword("foreach"), Some(SyntaxKind::FOREACH_KW));
        assert_eq!(keyword("TRUE"), Some(SyntaxKind::TRUE_KW));
        assert_eq!(keyword("isset"), None);
    }

    #[test]
    fn test_ranges() {
        assert!(SyntaxKind::AND_KW.is_keyword());
        assert!(SyntaxKind::XOR_KW.is_keyword());
        assert!(!SyntaxKind::SOURCE_FILE.is_keyword());
        assert!(SyntaxKind::QUESTION_QUESTION_EQ.is_assignment_op());
        assert!(!SyntaxKind::EQ_EQ.is_assignment_op());
        assert!(SyntaxKind::CALL_EXPR.is_expr());
        assert!(!SyntaxKind::ARG.is_expr());
        assert!(SyntaxKind::MATCH_EXPR.is_expr());
        assert!(!SyntaxKind::MATCH_ARM.is_expr());
        assert!(SyntaxKind::ARROW_FN.is_expr());
    }
}
