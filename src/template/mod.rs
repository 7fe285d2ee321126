//! Template parser
//!
//! Parses template text into an ordered list of typed nodes: text, comments,
//! echoes, directives, component tags and inline code blocks. Each node keeps
//! its absolute byte range; line/column positions come from the document's
//! [`LineIndex`](crate::base::LineIndex).
//!
//! ```text
//! Source Text
//!     ↓
//! TemplateToken (logos) → construct openers and text runs
//!     ↓
//! Scanner → flat node list
//!     ↓
//! Pairing → opening/closing directive and component links
//! ```

mod lexer;
mod node;
mod parser;

pub use lexer::TemplateToken;
pub use node::{
    Attribute, AttributeBinding, Component, Directive, Echo, EchoStyle, InlineCode, NodeId,
    NodeKind, TagKind, TemplateNode,
};
pub use parser::TemplateDocument;
