//! PHP fragment parser
//!
//! A lossless, error-tolerant parser for the PHP embedded in templates:
//! - **logos** for lexing
//! - **rowan** for the CST
//!
//! ```text
//! Fragment Text
//!     ↓
//! Lexer (logos) → Tokens with SyntaxKind
//!     ↓
//! Parser → GreenNode tree
//!     ↓
//! SyntaxNode (rowan) → CST with parent pointers
//!     ↓
//! AST layer → Typed wrappers over SyntaxNode
//! ```
//!
//! The parser covers the statement and expression forms that appear in
//! templates. It does not check semantics.

pub mod ast;
mod lexer;
mod parser;
mod syntax_kind;

pub use ast::AstNode;
pub use lexer::{Lexer, Token, tokenize};
pub use parser::{Parse, SyntaxError, parse};
pub use syntax_kind::{PhpLanguage, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};
