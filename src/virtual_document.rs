//! Virtual document synthesizer
//!
//! Concatenates every embedded-code region of a template, in document order,
//! into one PHP document:
//!
//! ```text
//! <?php
//! $a = 1;                       <- <?php $a = 1; ?>
//! foreach($users as $user){}    <- @foreach($users as $user)
//! $user->name;                  <- {{ $user->name }}
//! ```
//!
//! The result is consumed by static extraction and by an external evaluator.
//! Positions in it are never reported to callers; [`Provenance`] records only
//! which template node each line came from.

use text_size::{TextRange, TextSize};
use tracing::trace;

use crate::config::TemplateConfig;
use crate::php::{self, SyntaxKind};
use crate::region::{CodeRegion, RegionKind, regions};
use crate::template::{NodeId, TemplateDocument};

/// First line of every virtual document.
pub const HEADER: &str = "<?php\n";

/// Where a line of the virtual document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Provenance {
    /// Range of the statement in the virtual document.
    pub output: TextRange,
    pub kind: RegionKind,
    pub node: NodeId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualDocument {
    pub text: String,
    pub provenance: Vec<Provenance>,
}

/// Build the virtual document of a parsed template.
pub fn synthesize_document(doc: &TemplateDocument<'_>, config: &TemplateConfig) -> VirtualDocument {
    let mut text = String::from(HEADER);
    let mut provenance = Vec::new();

    for region in regions(doc, config) {
        let Some(statement) = statement(doc, &region) else {
            trace!(kind = ?region.kind, node = %region.node, "empty region skipped");
            continue;
        };
        let start = TextSize::of(text.as_str());
        text.push_str(&statement);
        provenance.push(Provenance {
            output: TextRange::at(start, TextSize::of(statement.as_str())),
            kind: region.kind,
            node: region.node,
        });
        text.push('\n');
    }

    VirtualDocument { text, provenance }
}

/// Virtual document text of `source`, `None` if the template cannot be parsed.
pub fn synthesize(source: &str, config: &TemplateConfig) -> Option<String> {
    match TemplateDocument::parse_with(source, config) {
        Ok(doc) => Some(synthesize_document(&doc, config).text),
        Err(err) => {
            trace!(%err, "virtual document not synthesized");
            None
        }
    }
}

/// One statement for a region. Expression regions always get a `;`. Code
/// bodies keep their own terminator and otherwise get one on a line of its
/// own, past any trailing line comment. Parameter lists reuse the fragment
/// wrapper, which supplies the statement the directive stands for.
fn statement(doc: &TemplateDocument<'_>, region: &CodeRegion) -> Option<String> {
    let raw = doc.text(region.range)?;
    let body = raw.trim();
    match region.kind {
        RegionKind::DirectiveWithParameters => {
            Some(format!("{}{}{}", region.prefix(), raw, region.suffix()))
        }
        _ if body.is_empty() => None,
        RegionKind::EchoExpression | RegionKind::ComponentAttributeExpression => {
            Some(format!("{body};"))
        }
        RegionKind::InlineCode | RegionKind::DirectiveWithBody if ends_statement(body) => {
            Some(body.to_string())
        }
        RegionKind::InlineCode | RegionKind::DirectiveWithBody => Some(format!("{body}\n;")),
    }
}

/// `true` when the last token of `code` is a `;` or closes a statement block.
fn ends_statement(code: &str) -> bool {
    let root = php::parse(code).syntax();
    let last = root
        .descendants_with_tokens()
        .filter_map(|element| element.into_token())
        .filter(|token| !token.kind().is_trivia())
        .last();
    let Some(last) = last else {
        return false;
    };
    match last.kind() {
        SyntaxKind::SEMICOLON => true,
        SyntaxKind::R_BRACE => last.parent().is_some_and(|parent| match parent.kind() {
            SyntaxKind::BLOCK => parent.parent().is_some_and(|owner| !owner.kind().is_expr()),
            SyntaxKind::SWITCH_STMT => true,
            _ => false,
        }),
        _ => false,
    }
}
