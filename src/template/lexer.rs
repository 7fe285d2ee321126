//! Logos-based lexer for template text
//!
//! Produces the coarse markers the template parser scans from. Constructs
//! with a closing delimiter (echoes, comments, inline code, component tags)
//! are completed by the parser, which bumps the lexer past their content.

use logos::Logos;

/// Template token, one per construct opener plus text runs.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateToken {
    // =========================================================================
    // ECHOES AND COMMENTS
    // =========================================================================
    #[token("{{--")]
    CommentOpen,

    #[token("{!!")]
    RawEchoOpen,

    #[token("{{")]
    EchoOpen,

    /// `@{{` renders a literal `{{`.
    #[token("@{{")]
    EscapedEcho,

    // =========================================================================
    // DIRECTIVES
    // =========================================================================
    /// `@@if` renders a literal `@if`.
    #[regex(r"@@[A-Za-z_][A-Za-z0-9_]*")]
    EscapedDirective,

    #[regex(r"@[A-Za-z_][A-Za-z0-9_]*")]
    Directive,

    // =========================================================================
    // EMBEDDED CODE AND COMPONENTS
    // =========================================================================
    #[regex(r"<\?(php|=)")]
    InlineCodeOpen,

    #[regex(r"<x[-:][A-Za-z0-9_\-.:]*")]
    ComponentOpen,

    #[regex(r"</x[-:][A-Za-z0-9_\-.:]*")]
    ComponentClose,

    // =========================================================================
    // TEXT
    // =========================================================================
    #[regex(r"[^@{<]+")]
    Text,

    #[token("@")]
    At,

    #[token("{")]
    LBrace,

    #[token("<")]
    Lt,
}

impl TemplateToken {
    /// Tokens that never start a construct on their own.
    pub fn is_text(self) -> bool {
        matches!(
            self,
            Self::Text | Self::At | Self::LBrace | Self::Lt | Self::EscapedDirective
        )
    }
}
