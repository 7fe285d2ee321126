//! Logos-based lexer for PHP fragments

use logos::Logos;
use text_size::TextSize;

use super::syntax_kind::{SyntaxKind, keyword};

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
            Ok(LogosToken::Name) if !text.contains('\\') => {
                keyword(text).unwrap_or(SyntaxKind::NAME)
            }
            Ok(t) => t.into(),
            Err(()) => SyntaxKind::ERROR,
        };

        Some(Token { kind, text, offset })
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
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    #[regex(r"(//|#)[^\n]*")]
    LineComment,

    #[regex(r"/\*[^*]*\*+([^/*][^*]*\*+)*/")]
    BlockComment,

    // =========================================================================
    // LITERALS AND NAMES
    // =========================================================================
    #[regex(r"\\?[A-Za-z_][A-Za-z0-9_]*(\\[A-Za-z_][A-Za-z0-9_]*)*")]
    Name,

    #[regex(r"\$[A-Za-z_][A-Za-z0-9_]*")]
    Variable,

    #[regex(r"0[xX][0-9a-fA-F_]+|0[bB][01_]+|[0-9][0-9_]*")]
    Int,

    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?|\.[0-9][0-9_]*([eE][+-]?[0-9]+)?|[0-9][0-9_]*[eE][+-]?[0-9]+")]
    Float,

    // Unterminated strings run to the end of the fragment
    #[regex(r#"'([^'\\]|\\(.|\n))*'?"#)]
    #[regex(r#""([^"\\]|\\(.|\n))*"?"#)]
    String,

    // =========================================================================
    // TAGS
    // =========================================================================
    #[regex(r"<\?(php|=)?")]
    OpenTag,

    #[token("?>")]
    CloseTag,

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    #[regex(r"\([ \t]*(int|integer|bool|boolean|float|double|real|string|array|object|unset|binary)[ \t]*\)")]
    Cast,

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
    #[token("::")]
    ColonColon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,
    #[token("$")]
    Dollar,
    #[token("\\")]
    Backslash,
    #[token("->")]
    Arrow,
    #[token("?->")]
    NullsafeArrow,
    #[token("=>")]
    FatArrow,
    #[token("?")]
    Question,
    #[token("??")]
    QuestionQuestion,
    #[token("@")]
    At,

    // =========================================================================
    // OPERATORS
    // =========================================================================
    #[token("==")]
    EqEq,
    #[token("===")]
    EqEqEq,
    #[token("!=")]
    #[token("<>")]
    BangEq,
    #[token("!==")]
    BangEqEq,
    #[token("<=>")]
    Spaceship,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("**")]
    StarStar,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("!")]
    Bang,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,

    #[token("=")]
    Eq,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token(".=")]
    DotEq,
    #[token("%=")]
    PercentEq,
    #[token("**=")]
    StarStarEq,
    #[token("&=")]
    AmpEq,
    #[token("|=")]
    PipeEq,
    #[token("^=")]
    CaretEq,
    #[token("<<=")]
    ShlEq,
    #[token(">>=")]
    ShrEq,
    #[token("??=")]
    QuestionQuestionEq,
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        match token {
            LogosToken::Whitespace => SyntaxKind::WHITESPACE,
            LogosToken::LineComment => SyntaxKind::LINE_COMMENT,
            LogosToken::BlockComment => SyntaxKind::BLOCK_COMMENT,
            LogosToken::Name => SyntaxKind::NAME,
            LogosToken::Variable => SyntaxKind::VARIABLE,
            LogosToken::Int => SyntaxKind::INT_NUMBER,
            LogosToken::Float => SyntaxKind::FLOAT_NUMBER,
            LogosToken::String => SyntaxKind::STRING,
            LogosToken::OpenTag => SyntaxKind::OPEN_TAG,
            LogosToken::CloseTag => SyntaxKind::CLOSE_TAG,
            LogosToken::Cast => SyntaxKind::CAST,
            LogosToken::LBrace => SyntaxKind::L_BRACE,
            LogosToken::RBrace => SyntaxKind::R_BRACE,
            LogosToken::LBracket => SyntaxKind::L_BRACKET,
            LogosToken::RBracket => SyntaxKind::R_BRACKET,
            LogosToken::LParen => SyntaxKind::L_PAREN,
            LogosToken::RParen => SyntaxKind::R_PAREN,
            LogosToken::Semicolon => SyntaxKind::SEMICOLON,
            LogosToken::Colon => SyntaxKind::COLON,
            LogosToken::ColonColon => SyntaxKind::COLON_COLON,
            LogosToken::Comma => SyntaxKind::COMMA,
            LogosToken::Dot => SyntaxKind::DOT,
            LogosToken::Ellipsis => SyntaxKind::ELLIPSIS,
            LogosToken::Dollar => SyntaxKind::DOLLAR,
            LogosToken::Backslash => SyntaxKind::BACKSLASH,
            LogosToken::Arrow => SyntaxKind::ARROW,
            LogosToken::NullsafeArrow => SyntaxKind::NULLSAFE_ARROW,
            LogosToken::FatArrow => SyntaxKind::FAT_ARROW,
            LogosToken::Question => SyntaxKind::QUESTION,
            LogosToken::QuestionQuestion => SyntaxKind::QUESTION_QUESTION,
            LogosToken::At => SyntaxKind::AT,
            LogosToken::EqEq => SyntaxKind::EQ_EQ,
            LogosToken::EqEqEq => SyntaxKind::EQ_EQ_EQ,
            LogosToken::BangEq => SyntaxKind::BANG_EQ,
            LogosToken::BangEqEq => SyntaxKind::BANG_EQ_EQ,
            LogosToken::Spaceship => SyntaxKind::SPACESHIP,
            LogosToken::Lt => SyntaxKind::LT,
            LogosToken::Gt => SyntaxKind::GT,
            LogosToken::LtEq => SyntaxKind::LT_EQ,
            LogosToken::GtEq => SyntaxKind::GT_EQ,
            LogosToken::Plus => SyntaxKind::PLUS,
            LogosToken::Minus => SyntaxKind::MINUS,
            LogosToken::Star => SyntaxKind::STAR,
            LogosToken::Slash => SyntaxKind::SLASH,
            LogosToken::Percent => SyntaxKind::PERCENT,
            LogosToken::StarStar => SyntaxKind::STAR_STAR,
            LogosToken::Shl => SyntaxKind::SHL,
            LogosToken::Shr => SyntaxKind::SHR,
            LogosToken::Amp => SyntaxKind::AMP,
            LogosToken::Pipe => SyntaxKind::PIPE,
            LogosToken::Caret => SyntaxKind::CARET,
            LogosToken::Tilde => SyntaxKind::TILDE,
            LogosToken::Bang => SyntaxKind::BANG,
            LogosToken::AmpAmp => SyntaxKind::AMP_AMP,
            LogosToken::PipePipe => SyntaxKind::PIPE_PIPE,
            LogosToken::PlusPlus => SyntaxKind::PLUS_PLUS,
            LogosToken::MinusMinus => SyntaxKind::MINUS_MINUS,
            LogosToken::Eq => SyntaxKind::EQ,
            LogosToken::PlusEq => SyntaxKind::PLUS_EQ,
            LogosToken::MinusEq => SyntaxKind::MINUS_EQ,
            LogosToken::StarEq => SyntaxKind::STAR_EQ,
            LogosToken::SlashEq => SyntaxKind::SLASH_EQ,
            LogosToken::DotEq => SyntaxKind::DOT_EQ,
            LogosToken::PercentEq => SyntaxKind::PERCENT_EQ,
            LogosToken::StarStarEq => SyntaxKind::STAR_STAR_EQ,
            LogosToken::AmpEq => SyntaxKind::AMP_EQ,
            LogosToken::PipeEq => SyntaxKind::PIPE_EQ,
            LogosToken::CaretEq => SyntaxKind::CARET_EQ,
            LogosToken::ShlEq => SyntaxKind::SHL_EQ,
            LogosToken::ShrEq => SyntaxKind::SHR_EQ,
            LogosToken::QuestionQuestionEq => SyntaxKind::QUESTION_QUESTION_EQ,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<SyntaxKind> {
        tokenize(input)
            .into_iter()
            .map(|t| t.kind)
            .filter(|k| !k.is_trivia())
            .collect()
    }

    #[test]
    fn test_member_access() {
        assert_eq!(
            kinds("$user?->posts()->first"),
            vec![
                SyntaxKind::VARIABLE,
                SyntaxKind::NULLSAFE_ARROW,
                SyntaxKind::NAME,
                SyntaxKind::L_PAREN,
                SyntaxKind::R_PAREN,
                SyntaxKind::ARROW,
                SyntaxKind::NAME,
            ]
        );
    }

    #[test]
    fn test_keywords_and_qualified_names() {
        assert_eq!(
            kinds("new \\App\\Models\\User FOREACH Static::class"),
            vec![
                SyntaxKind::NEW_KW,
                SyntaxKind::NAME,
                SyntaxKind::FOREACH_KW,
                SyntaxKind::STATIC_KW,
                SyntaxKind::COLON_COLON,
                SyntaxKind::NAME,
            ]
        );
    }

    #[test]
    fn test_strings_and_casts() {
        assert_eq!(
            kinds(r#"(int) 'it\'s' . "a\"b" . 'open"#),
            vec![
                SyntaxKind::CAST,
                SyntaxKind::STRING,
                SyntaxKind::DOT,
                SyntaxKind::STRING,
                SyntaxKind::DOT,
                SyntaxKind::STRING,
            ]
        );
    }

    #[test]
    fn test_offsets_are_contiguous() {
        let input = "<?php $a = 1.5; /* c */ ?>";
        let tokens = tokenize(input);
        let mut expected = TextSize::new(0);
        for token in &tokens {
            assert_eq!(token.offset, expected);
            expected += TextSize::of(token.text);
        }
        assert_eq!(expected, TextSize::of(input));
        assert_eq!(tokens[0].kind, SyntaxKind::OPEN_TAG);
        assert_eq!(tokens.last().map(|t| t.kind), Some(SyntaxKind::CLOSE_TAG));
    }
}
