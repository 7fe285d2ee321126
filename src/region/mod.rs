//! Region classifier
//!
//! Finds the embedded-code regions of a template. Five independent matchers,
//! one per [`RegionKind`], run on every node; a node may produce several
//! regions (a component with several bound attributes) and a region never
//! extends past its node.
//!
//! ```text
//! TemplateDocument
//!     ↓
//! matchers (inline code, directive body, directive parameters, echo, attribute)
//!     ↓
//! CodeRegion → offsets (fragment ⇄ document) → CodeFragment (php::Parse)
//! ```

mod fragment;
mod offsets;

use smol_str::SmolStr;
use text_size::{TextRange, TextSize};
use tracing::trace;

use crate::config::{ParameterForm, TemplateConfig};
use crate::error::AnalysisError;
use crate::template::{EchoStyle, NodeId, NodeKind, TagKind, TemplateDocument, TemplateNode};

pub use fragment::CodeFragment;
pub use offsets::{
    ATTRIBUTE_PREFIX, ATTRIBUTE_SUFFIX, DIRECTIVE_BODY_PREFIX, DIRECTIVE_BODY_SUFFIX,
    DIRECTIVE_KEYWORD_WIDTH, ECHO_PREFIX, ECHO_SUFFIX, INLINE_CODE_PREFIX, INLINE_CODE_SUFFIX,
};

/// Kind of embedded-code region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RegionKind {
    /// `<?php ... ?>`, `<?= ... ?>`
    InlineCode,
    /// `@php ... @endphp`
    DirectiveWithBody,
    /// `@if(...)`, `@foreach(...)`, `@include(...)`, ...
    DirectiveWithParameters,
    /// `{{ ... }}`, `{!! ... !!}`
    EchoExpression,
    /// `<x-alert :type="..." />`, `<x-alert :$type />`
    ComponentAttributeExpression,
}

impl RegionKind {
    pub const ALL: [RegionKind; 5] = [
        RegionKind::InlineCode,
        RegionKind::DirectiveWithBody,
        RegionKind::DirectiveWithParameters,
        RegionKind::EchoExpression,
        RegionKind::ComponentAttributeExpression,
    ];
}

/// The template construct a region was found in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Construct {
    InlineCode { short_echo: bool },
    DirectiveBody { name: SmolStr },
    DirectiveArguments { name: SmolStr, form: ParameterForm },
    Echo(EchoStyle),
    ComponentAttribute { component: SmolStr, attribute: SmolStr },
}

impl Construct {
    /// Directive name, for directive regions.
    pub fn directive(&self) -> Option<&str> {
        match self {
            Construct::DirectiveBody { name } | Construct::DirectiveArguments { name, .. } => {
                Some(name)
            }
            _ => None,
        }
    }
}

/// A span of embedded code in a template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CodeRegion {
    pub kind: RegionKind,
    /// Absolute range of the raw code, delimiters excluded.
    pub range: TextRange,
    /// The node the region was found in.
    pub node: NodeId,
    pub construct: Construct,
}

impl CodeRegion {
    /// `start <= offset <= end`
    pub fn contains(&self, offset: TextSize) -> bool {
        self.range.contains_inclusive(offset)
    }
}

/// A per-kind region matcher.
type Matcher = fn(&TemplateDocument<'_>, &TemplateConfig, NodeId, &TemplateNode, &mut Vec<CodeRegion>);

const MATCHERS: [Matcher; 5] = [
    match_inline_code,
    match_directive_body,
    match_directive_parameters,
    match_echo,
    match_component_attributes,
];

/// All regions of the document, in document order.
pub fn regions(doc: &TemplateDocument<'_>, config: &TemplateConfig) -> Vec<CodeRegion> {
    let mut out = Vec::new();
    for (id, node) in doc.iter() {
        for matcher in MATCHERS {
            matcher(doc, config, id, node, &mut out);
        }
    }
    out.sort_by_key(|region| (region.range.start(), region.range.end()));
    out
}

/// Regions containing `offset`. An offset in no region yields an empty list.
pub fn classify(
    doc: &TemplateDocument<'_>,
    config: &TemplateConfig,
    offset: TextSize,
) -> Result<Vec<CodeRegion>, AnalysisError> {
    if offset > doc.len() {
        return Err(AnalysisError::OffsetOutOfBounds {
            offset: offset.into(),
            len: doc.len().into(),
        });
    }
    let mut out = Vec::new();
    for (id, node) in doc.iter() {
        if !node.range.contains_inclusive(offset) {
            continue;
        }
        for matcher in MATCHERS {
            matcher(doc, config, id, node, &mut out);
        }
    }
    out.retain(|region| region.contains(offset));
    Ok(out)
}

// ============================================================================
// Matchers
// ============================================================================

fn match_inline_code(
    _doc: &TemplateDocument<'_>,
    _config: &TemplateConfig,
    id: NodeId,
    node: &TemplateNode,
    out: &mut Vec<CodeRegion>,
) {
    if let NodeKind::InlineCode(code) = &node.kind {
        out.push(CodeRegion {
            kind: RegionKind::InlineCode,
            range: code.content,
            node: id,
            construct: Construct::InlineCode {
                short_echo: code.short_echo,
            },
        });
    }
}

fn match_directive_body(
    doc: &TemplateDocument<'_>,
    config: &TemplateConfig,
    id: NodeId,
    node: &TemplateNode,
    out: &mut Vec<CodeRegion>,
) {
    let NodeKind::Directive(directive) = &node.kind else {
        return;
    };
    if directive.arguments.is_some()
        || directive.is_closing_half()
        || !config.is_code_body_directive(&directive.name)
    {
        return;
    }
    let body = doc
        .closing_directive(id)
        .map(|(_, closing)| TextRange::new(node.range.end(), closing.range.start()))
        .ok_or_else(|| AnalysisError::missing(id, "closing directive"));
    match body {
        Ok(range) => out.push(CodeRegion {
            kind: RegionKind::DirectiveWithBody,
            range,
            node: id,
            construct: Construct::DirectiveBody {
                name: directive.name.clone(),
            },
        }),
        Err(err) => trace!(directive = %directive.name, %err, "skipping directive body"),
    }
}

fn match_directive_parameters(
    _doc: &TemplateDocument<'_>,
    config: &TemplateConfig,
    id: NodeId,
    node: &TemplateNode,
    out: &mut Vec<CodeRegion>,
) {
    let NodeKind::Directive(directive) = &node.kind else {
        return;
    };
    let (Some(arguments), Some(form)) = (
        directive.arguments,
        config.parameter_form(&directive.name),
    ) else {
        return;
    };
    out.push(CodeRegion {
        kind: RegionKind::DirectiveWithParameters,
        range: arguments,
        node: id,
        construct: Construct::DirectiveArguments {
            name: directive.name.clone(),
            form,
        },
    });
}

fn match_echo(
    _doc: &TemplateDocument<'_>,
    _config: &TemplateConfig,
    id: NodeId,
    node: &TemplateNode,
    out: &mut Vec<CodeRegion>,
) {
    let echoes = match &node.kind {
        NodeKind::Echo(echo) => std::slice::from_ref(echo),
        NodeKind::Component(component) => component.echoes.as_slice(),
        _ => return,
    };
    out.extend(echoes.iter().map(|echo| CodeRegion {
        kind: RegionKind::EchoExpression,
        range: echo.content,
        node: id,
        construct: Construct::Echo(echo.style),
    }));
}

fn match_component_attributes(
    _doc: &TemplateDocument<'_>,
    _config: &TemplateConfig,
    id: NodeId,
    node: &TemplateNode,
    out: &mut Vec<CodeRegion>,
) {
    let NodeKind::Component(component) = &node.kind else {
        return;
    };
    if component.tag == TagKind::Closing {
        return;
    }
    for attribute in &component.attributes {
        if let Some(range) = attribute.expression() {
            out.push(CodeRegion {
                kind: RegionKind::ComponentAttributeExpression,
                range,
                node: id,
                construct: Construct::ComponentAttribute {
                    component: component.name.clone(),
                    attribute: attribute.name.clone(),
                },
            });
        }
    }
}
