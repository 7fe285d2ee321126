//! Template scanner
//!
//! Turns template text into a flat, ordered node list, then links opening and
//! closing directives and component tags. Scanning never fails: anything that
//! is not a complete construct is kept as text.

use logos::Logos;
use smol_str::SmolStr;
use text_size::{TextRange, TextSize};
use tracing::trace;

use super::lexer::TemplateToken;
use super::node::{
    Attribute, AttributeBinding, Component, Directive, Echo, EchoStyle, InlineCode, NodeId,
    NodeKind, TagKind, TemplateNode, is_end_name, is_section_terminator,
};
use crate::base::{LineCol, LineIndex};
use crate::config::TemplateConfig;
use crate::error::AnalysisError;

/// A parsed template: the source, its nodes in document order and a line index.
#[derive(Debug, Clone)]
pub struct TemplateDocument<'src> {
    source: &'src str,
    nodes: Vec<TemplateNode>,
    line_index: LineIndex,
}

impl<'src> TemplateDocument<'src> {
    /// Parse with the default configuration.
    pub fn parse(source: &'src str) -> Result<Self, AnalysisError> {
        Self::parse_with(source, &TemplateConfig::default())
    }

    pub fn parse_with(source: &'src str, config: &TemplateConfig) -> Result<Self, AnalysisError> {
        let max = config.max_document_size;
        if source.len() > max as usize {
            return Err(AnalysisError::DocumentTooLarge {
                size: source.len(),
                max,
            });
        }

        let mut nodes = Scanner::new(source, config).scan();
        pair_directives(&mut nodes, source, config);
        pair_components(&mut nodes);

        Ok(Self {
            source,
            nodes,
            line_index: LineIndex::new(source),
        })
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    pub fn len(&self) -> TextSize {
        TextSize::of(self.source)
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    pub fn nodes(&self) -> &[TemplateNode] {
        &self.nodes
    }

    /// Nodes with their ids, in document order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &TemplateNode)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index as u32), node))
    }

    pub fn node(&self, id: NodeId) -> Option<&TemplateNode> {
        self.nodes.get(id.index())
    }

    pub fn directive(&self, id: NodeId) -> Option<&Directive> {
        match &self.node(id)?.kind {
            NodeKind::Directive(directive) => Some(directive),
            _ => None,
        }
    }

    /// The directive closing `id`, following the final closing relation.
    pub fn closing_directive(&self, id: NodeId) -> Option<(NodeId, &TemplateNode)> {
        let closing = self.directive(id)?.closing?;
        Some((closing, self.node(closing)?))
    }

    /// Source text of `range`, `None` if it is out of bounds.
    pub fn text(&self, range: TextRange) -> Option<&'src str> {
        self.source.get(std::ops::Range::<usize>::from(range))
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    pub fn line_col(&self, offset: TextSize) -> LineCol {
        self.line_index.line_col(offset)
    }

    /// Innermost node whose range contains `offset` (end inclusive).
    pub fn node_at(&self, offset: TextSize) -> Option<NodeId> {
        self.iter()
            .filter(|(_, node)| node.range.contains_inclusive(offset))
            .map(|(id, _)| id)
            .last()
    }
}

// ============================================================================
// Scanning
// ============================================================================

struct Scanner<'src, 'cfg> {
    source: &'src str,
    config: &'cfg TemplateConfig,
    lexer: logos::Lexer<'src, TemplateToken>,
    nodes: Vec<TemplateNode>,
    text_start: Option<usize>,
}

impl<'src, 'cfg> Scanner<'src, 'cfg> {
    fn new(source: &'src str, config: &'cfg TemplateConfig) -> Self {
        Self {
            source,
            config,
            lexer: TemplateToken::lexer(source),
            nodes: Vec::new(),
            text_start: None,
        }
    }

    fn scan(mut self) -> Vec<TemplateNode> {
        while let Some(token) = self.lexer.next() {
            let span = self.lexer.span();
            let Ok(token) = token else {
                self.mark_text(span.start);
                continue;
            };
            match token {
                TemplateToken::CommentOpen => self.comment(span),
                TemplateToken::RawEchoOpen => self.echo(span, EchoStyle::Raw),
                TemplateToken::EchoOpen => self.echo(span, EchoStyle::Escaped),
                TemplateToken::InlineCodeOpen => self.inline_code(span),
                TemplateToken::Directive => self.directive(span),
                TemplateToken::ComponentOpen => self.component_open(span),
                TemplateToken::ComponentClose => self.component_close(span),
                TemplateToken::EscapedEcho
                | TemplateToken::EscapedDirective
                | TemplateToken::Text
                | TemplateToken::At
                | TemplateToken::LBrace
                | TemplateToken::Lt => self.mark_text(span.start),
            }
        }
        self.flush_text(self.source.len());
        self.nodes
    }

    // =========================================================================
    // Node building helpers
    // =========================================================================

    fn mark_text(&mut self, start: usize) {
        self.text_start.get_or_insert(start);
    }

    fn flush_text(&mut self, end: usize) {
        if let Some(start) = self.text_start.take()
            && start < end
        {
            self.nodes.push(TemplateNode {
                range: range(start, end),
                kind: NodeKind::Text,
            });
        }
    }

    fn push(&mut self, start: usize, end: usize, kind: NodeKind) -> NodeId {
        self.flush_text(start);
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(TemplateNode {
            range: range(start, end),
            kind,
        });
        id
    }

    /// Move the lexer from the end of the current token to `end`.
    fn advance_to(&mut self, token_end: usize, end: usize) {
        if end > token_end {
            self.lexer.bump(end - token_end);
        }
    }

    // =========================================================================
    // Constructs
    // =========================================================================

    fn comment(&mut self, span: std::ops::Range<usize>) {
        let end = find_from(self.source, span.end, "--}}")
            .map(|close| close + 4)
            .unwrap_or(self.source.len());
        self.advance_to(span.end, end);
        self.push(span.start, end, NodeKind::Comment);
    }

    fn echo(&mut self, span: std::ops::Range<usize>, style: EchoStyle) {
        let delimiter = match style {
            EchoStyle::Escaped => "}}",
            EchoStyle::Raw => "!!}",
        };
        let Some(close) = find_from(self.source, span.end, delimiter) else {
            self.mark_text(span.start);
            return;
        };
        let end = close + delimiter.len();
        self.advance_to(span.end, end);
        self.push(
            span.start,
            end,
            NodeKind::Echo(Echo {
                style,
                content: range(span.end, close),
            }),
        );
    }

    fn inline_code(&mut self, span: std::ops::Range<usize>) {
        let short_echo = self.source[span.clone()].ends_with('=');
        let (content_end, end, terminated) = match find_from(self.source, span.end, "?>") {
            Some(close) => (close, close + 2, true),
            None => (self.source.len(), self.source.len(), false),
        };
        self.advance_to(span.end, end);
        self.push(
            span.start,
            end,
            NodeKind::InlineCode(InlineCode {
                content: range(span.end, content_end),
                short_echo,
                terminated,
            }),
        );
    }

    fn directive(&mut self, span: std::ops::Range<usize>) {
        let preceded_by_ident = self.source[..span.start]
            .chars()
            .next_back()
            .is_some_and(unicode_ident::is_xid_continue);
        if preceded_by_ident {
            // `user@example.com`
            self.mark_text(span.start);
            return;
        }

        let name = SmolStr::new(&self.source[span.start + 1..span.end]);
        let name_range = range(span.start, span.end);
        let bytes = self.source.as_bytes();

        let mut cursor = span.end;
        while matches!(bytes.get(cursor), Some(b' ' | b'\t')) {
            cursor += 1;
        }
        let (arguments, end) = match bytes.get(cursor) {
            Some(b'(') => match matching_paren(self.source, cursor) {
                Some(close) => (Some(range(cursor + 1, close)), close + 1),
                None => {
                    trace!(directive = %name, "unbalanced directive parameters");
                    (None, span.end)
                }
            },
            _ => (None, span.end),
        };

        let config = self.config;
        if arguments.is_none()
            && let Some(closer) = config.raw_body_closer(&name)
            && let Some(close_start) = find_directive(self.source, end, closer)
        {
            let close_end = close_start + 1 + closer.len();
            self.advance_to(span.end, close_end);
            self.raw_body(name, name_range, end, close_start, close_end, closer);
            return;
        }

        self.advance_to(span.end, end);
        self.push(
            span.start,
            end,
            NodeKind::Directive(Directive {
                name,
                name_range,
                arguments,
                opening: None,
                closing: None,
            }),
        );
    }

    /// `@php ... @endphp` and `@verbatim ... @endverbatim`: the body is a single
    /// text node and the pair is linked here.
    fn raw_body(
        &mut self,
        name: SmolStr,
        name_range: TextRange,
        body_start: usize,
        close_start: usize,
        close_end: usize,
        closer: &str,
    ) {
        let opening = self.push(
            name_range.start().into(),
            body_start,
            NodeKind::Directive(Directive {
                name,
                name_range,
                arguments: None,
                opening: None,
                closing: None,
            }),
        );
        if body_start < close_start {
            self.push(body_start, close_start, NodeKind::Text);
        }
        let closing = self.push(
            close_start,
            close_end,
            NodeKind::Directive(Directive {
                name: SmolStr::new(closer),
                name_range: range(close_start, close_end),
                arguments: None,
                opening: Some(opening),
                closing: None,
            }),
        );
        if let NodeKind::Directive(directive) = &mut self.nodes[opening.index()].kind {
            directive.closing = Some(closing);
        }
    }

    fn component_open(&mut self, span: std::ops::Range<usize>) {
        let name_start = span.start + 3;
        if name_start >= span.end {
            self.mark_text(span.start);
            return;
        }
        let Some(scan) = scan_tag(self.source, span.end) else {
            self.mark_text(span.start);
            return;
        };
        self.advance_to(span.end, scan.end);
        self.push(
            span.start,
            scan.end,
            NodeKind::Component(Component {
                name: SmolStr::new(&self.source[name_start..span.end]),
                name_range: range(name_start, span.end),
                tag: scan.tag,
                attributes: scan.attributes,
                echoes: scan.echoes,
                closing: None,
            }),
        );
    }

    fn component_close(&mut self, span: std::ops::Range<usize>) {
        let name_start = span.start + 4;
        let close = self.source[span.end..]
            .find(|c: char| !c.is_whitespace())
            .map(|skip| span.end + skip)
            .filter(|&at| self.source.as_bytes()[at] == b'>');
        let Some(close) = close.filter(|_| name_start < span.end) else {
            self.mark_text(span.start);
            return;
        };
        let end = close + 1;
        self.advance_to(span.end, end);
        self.push(
            span.start,
            end,
            NodeKind::Component(Component {
                name: SmolStr::new(&self.source[name_start..span.end]),
                name_range: range(name_start, span.end),
                tag: TagKind::Closing,
                attributes: Vec::new(),
                echoes: Vec::new(),
                closing: None,
            }),
        );
    }
}

// ============================================================================
// Scanning helpers
// ============================================================================

fn range(start: usize, end: usize) -> TextRange {
    TextRange::new(TextSize::new(start as u32), TextSize::new(end as u32))
}

fn find_from(source: &str, from: usize, needle: &str) -> Option<usize> {
    source.get(from..)?.find(needle).map(|at| from + at)
}

/// Start of the next `@name` directive not followed by an identifier character.
fn find_directive(source: &str, from: usize, name: &str) -> Option<usize> {
    let mut cursor = from;
    while let Some(at) = find_from(source, cursor, "@") {
        let name_end = at + 1 + name.len();
        if source.get(at + 1..name_end) == Some(name)
            && !source[name_end..]
                .chars()
                .next()
                .is_some_and(unicode_ident::is_xid_continue)
        {
            return Some(at);
        }
        cursor = at + 1;
    }
    None
}

/// Index of the `)` matching the `(` at `open`, skipping quoted strings.
fn matching_paren(source: &str, open: usize) -> Option<usize> {
    let bytes = source.as_bytes();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut index = open;
    while let Some(&byte) = bytes.get(index) {
        match quote {
            Some(q) => {
                if byte == b'\\' {
                    index += 1;
                } else if byte == q {
                    quote = None;
                }
            }
            None => match byte {
                b'\'' | b'"' => quote = Some(byte),
                b'(' => depth += 1,
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(index);
                    }
                }
                _ => {}
            },
        }
        index += 1;
    }
    None
}

/// Number of top-level, comma-separated arguments in `text`.
fn argument_count(text: &str) -> usize {
    if text.trim().is_empty() {
        return 0;
    }
    let mut count = 1;
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for c in text.chars() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            ',' if depth == 0 => count += 1,
            _ => {}
        }
    }
    count
}

/// Attributes and echoes of a component tag, with how the tag ends.
struct TagScan {
    attributes: Vec<Attribute>,
    echoes: Vec<Echo>,
    tag: TagKind,
    end: usize,
}

/// Scan component attributes from `start` to the end of the tag.
///
/// Returns `None` when the tag is not terminated.
fn scan_tag(source: &str, start: usize) -> Option<TagScan> {
    let bytes = source.as_bytes();
    let mut attributes = Vec::new();
    let mut echoes = Vec::new();
    let mut index = start;

    loop {
        while bytes.get(index).is_some_and(u8::is_ascii_whitespace) {
            index += 1;
        }
        let closed = match *bytes.get(index)? {
            b'>' => Some((TagKind::Opening, index + 1)),
            b'/' if bytes.get(index + 1) == Some(&b'>') => Some((TagKind::SelfClosing, index + 2)),
            _ => None,
        };
        if let Some((tag, end)) = closed {
            return Some(TagScan {
                attributes,
                echoes,
                tag,
                end,
            });
        }
        if source.get(index..).is_some_and(|rest| rest.starts_with("{{--")) {
            index = find_from(source, index, "--}}")? + 4;
            continue;
        }
        // `{{ $attributes }}` inside the tag
        if let Some((echo, end)) = tag_echo(source, index) {
            echoes.push(echo);
            index = end;
            continue;
        }

        let name_start = index;
        while let Some(&byte) = bytes.get(index) {
            let tag_end = byte == b'/' && bytes.get(index + 1) == Some(&b'>');
            if byte.is_ascii_whitespace() || matches!(byte, b'=' | b'>' | b'"' | b'\'') || tag_end {
                break;
            }
            index += 1;
        }
        if index == name_start {
            index += 1;
            continue;
        }
        let raw_name = &source[name_start..index];
        // `:` values are PHP, echoes only count in plain and `::` values
        let echoes_in_value = raw_name.starts_with("::") || !raw_name.starts_with(':');

        let mut cursor = index;
        while bytes.get(cursor).is_some_and(u8::is_ascii_whitespace) {
            cursor += 1;
        }
        let mut value = None;
        if bytes.get(cursor) == Some(&b'=') {
            cursor += 1;
            while bytes.get(cursor).is_some_and(u8::is_ascii_whitespace) {
                cursor += 1;
            }
            match *bytes.get(cursor)? {
                b'"' | b'\'' => {
                    let mut found = Vec::new();
                    let close = quoted_value_end(source, cursor, &mut found)?;
                    if echoes_in_value {
                        echoes.extend(found);
                    }
                    value = Some(range(cursor + 1, close));
                    index = close + 1;
                }
                _ => {
                    let value_start = cursor;
                    while bytes
                        .get(cursor)
                        .is_some_and(|b| !b.is_ascii_whitespace() && *b != b'>')
                    {
                        cursor += 1;
                    }
                    value = Some(range(value_start, cursor));
                    index = cursor;
                }
            }
        }

        attributes.push(attribute(raw_name, name_start, index, value));
    }
}

/// Index of the quote closing the value opened at `open`. Echoes in the value
/// are skipped whole, so quotes inside them do not end it.
fn quoted_value_end(source: &str, open: usize, echoes: &mut Vec<Echo>) -> Option<usize> {
    let bytes = source.as_bytes();
    let quote = *bytes.get(open)?;
    let mut index = open + 1;
    loop {
        let byte = *bytes.get(index)?;
        if byte == quote {
            return Some(index);
        }
        if byte == b'{'
            && let Some((echo, end)) = tag_echo(source, index)
        {
            echoes.push(echo);
            index = end;
            continue;
        }
        index += 1;
    }
}

/// The `{{ ... }}` or `{!! ... !!}` echo opening at `index`, with its end.
fn tag_echo(source: &str, index: usize) -> Option<(Echo, usize)> {
    let rest = source.get(index..)?;
    let escaped = index > 0 && source.as_bytes().get(index - 1) == Some(&b'@');
    if escaped || rest.starts_with("{{--") {
        return None;
    }
    let (style, open, close) = if rest.starts_with("{!!") {
        (EchoStyle::Raw, 3, "!!}")
    } else if rest.starts_with("{{") {
        (EchoStyle::Escaped, 2, "}}")
    } else {
        return None;
    };
    let content_start = index + open;
    let close_at = find_from(source, content_start, close)?;
    let echo = Echo {
        style,
        content: range(content_start, close_at),
    };
    Some((echo, close_at + close.len()))
}

fn attribute(raw_name: &str, start: usize, end: usize, value: Option<TextRange>) -> Attribute {
    let (name, binding, value) = if let Some(name) = raw_name.strip_prefix("::") {
        (name, AttributeBinding::Escaped, value)
    } else if let Some(name) = raw_name.strip_prefix(":$") {
        let variable = range(start + 1, start + raw_name.len());
        (name, AttributeBinding::ShorthandVariable, Some(variable))
    } else if let Some(name) = raw_name.strip_prefix(':') {
        (name, AttributeBinding::Expression, value)
    } else {
        (raw_name, AttributeBinding::Static, value)
    };
    Attribute {
        name: SmolStr::new(name),
        range: range(start, end),
        value,
        binding,
    }
}

// ============================================================================
// Pairing
// ============================================================================

fn opens_block(directive: &Directive, source: &str, config: &TemplateConfig) -> bool {
    if !config.is_block_directive(&directive.name) {
        return false;
    }
    let arguments = directive
        .arguments
        .and_then(|args| source.get(std::ops::Range::<usize>::from(args)));
    match directive.name.as_str() {
        // `@section('title', 'Home')` is inline
        "section" | "slot" => arguments.is_some_and(|args| argument_count(args) == 1),
        // `@empty` without parameters belongs to `@forelse`
        "empty" => arguments.is_some(),
        _ => true,
    }
}

fn pair_directives(nodes: &mut [TemplateNode], source: &str, config: &TemplateConfig) {
    let mut stack: Vec<(SmolStr, NodeId)> = Vec::new();
    let mut links = Vec::new();

    for (index, node) in nodes.iter().enumerate() {
        let NodeKind::Directive(directive) = &node.kind else {
            continue;
        };
        if directive.opening.is_some() || directive.closing.is_some() {
            continue;
        }
        let id = NodeId(index as u32);
        let name = directive.name.as_str();

        let target = if is_section_terminator(name) {
            Some("section")
        } else if is_end_name(name) {
            Some(&name[3..])
        } else {
            None
        };

        if let Some(target) = target {
            match stack
                .iter()
                .rposition(|(open, _)| open.eq_ignore_ascii_case(target))
            {
                Some(pos) => {
                    let opening = stack[pos].1;
                    for (name, _) in stack.drain(pos..).skip(1) {
                        trace!(directive = %name, "block directive left unclosed");
                    }
                    links.push((opening, id));
                }
                None => trace!(directive = name, "closing directive without opening"),
            }
        } else if opens_block(directive, source, config) {
            stack.push((directive.name.clone(), id));
        }
    }

    for (name, _) in &stack {
        trace!(directive = %name, "block directive left unclosed");
    }

    for (opening, closing) in links {
        if let NodeKind::Directive(directive) = &mut nodes[opening.index()].kind {
            directive.closing = Some(closing);
        }
        if let NodeKind::Directive(directive) = &mut nodes[closing.index()].kind {
            directive.opening = Some(opening);
        }
    }
}

fn pair_components(nodes: &mut [TemplateNode]) {
    let mut stack: Vec<(SmolStr, NodeId)> = Vec::new();
    let mut links = Vec::new();

    for (index, node) in nodes.iter().enumerate() {
        let NodeKind::Component(component) = &node.kind else {
            continue;
        };
        let id = NodeId(index as u32);
        match component.tag {
            TagKind::Opening => stack.push((component.name.clone(), id)),
            TagKind::SelfClosing => {}
            TagKind::Closing => {
                if let Some(pos) = stack.iter().rposition(|(name, _)| *name == component.name) {
                    links.push((stack[pos].1, id));
                    stack.truncate(pos);
                }
            }
        }
    }

    for (opening, closing) in links {
        if let NodeKind::Component(component) = &mut nodes[opening.index()].kind {
            component.closing = Some(closing);
        }
    }
}
