//! Template node types.

use std::fmt;

use smol_str::SmolStr;
use text_size::TextRange;

/// Index of a node in its document's node list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A template node with its absolute range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateNode {
    pub range: TextRange,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Markup, or the verbatim body of a raw-body directive.
    Text,
    /// `{{-- ... --}}`
    Comment,
    Echo(Echo),
    Directive(Directive),
    Component(Component),
    InlineCode(InlineCode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EchoStyle {
    /// `{{ ... }}`
    Escaped,
    /// `{!! ... !!}`
    Raw,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Echo {
    pub style: EchoStyle,
    /// Text between the delimiters.
    pub content: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// Name without the `@`.
    pub name: SmolStr,
    /// Range of `@name`.
    pub name_range: TextRange,
    /// Text between the parentheses of the parameter list, if it is balanced.
    pub arguments: Option<TextRange>,
    /// The directive this one closes.
    pub opening: Option<NodeId>,
    /// The directive closing this one.
    pub closing: Option<NodeId>,
}

impl Directive {
    /// `true` for `@endX` and the section terminators.
    pub fn is_closing_half(&self) -> bool {
        self.opening.is_some() || is_end_name(&self.name) || is_section_terminator(&self.name)
    }
}

pub(crate) fn is_end_name(name: &str) -> bool {
    name.len() > 3 && name.starts_with("end")
}

pub(crate) fn is_section_terminator(name: &str) -> bool {
    matches!(name, "show" | "stop" | "append" | "overwrite")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// `<x-alert ...>`
    Opening,
    /// `<x-alert ... />`
    SelfClosing,
    /// `</x-alert>`
    Closing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Name without the `x-`/`x:` prefix.
    pub name: SmolStr,
    pub name_range: TextRange,
    pub tag: TagKind,
    pub attributes: Vec<Attribute>,
    /// Echoes inside the tag: in static attribute values and at attribute
    /// position (`{{ $attributes }}`).
    pub echoes: Vec<Echo>,
    pub closing: Option<NodeId>,
}

impl Component {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.name == name)
    }
}

/// How an attribute value reaches the component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeBinding {
    /// `title="Hello"`
    Static,
    /// `:title="$post->title"`
    Expression,
    /// `::title="..."`, passed through verbatim
    Escaped,
    /// `:$title`
    ShorthandVariable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Name without binding prefix (`:$title` and `:title` are both `title`).
    pub name: SmolStr,
    /// The whole attribute, including its value.
    pub range: TextRange,
    /// Unquoted value, or the `$var` of a shorthand binding.
    pub value: Option<TextRange>,
    pub binding: AttributeBinding,
}

impl Attribute {
    /// Range of the PHP expression this attribute binds, if any.
    pub fn expression(&self) -> Option<TextRange> {
        match self.binding {
            AttributeBinding::Expression | AttributeBinding::ShorthandVariable => self.value,
            AttributeBinding::Static | AttributeBinding::Escaped => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineCode {
    /// Code between `<?php`/`<?=` and `?>`.
    pub content: TextRange,
    /// Opened with `<?=`.
    pub short_echo: bool,
    /// `false` when the block runs to the end of the document.
    pub terminated: bool,
}
