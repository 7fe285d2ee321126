//! Template analysis options.

use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;

/// Largest template accepted by default (16 MiB).
pub const DEFAULT_MAX_DOCUMENT_SIZE: u32 = 16 * 1024 * 1024;

/// How the parenthesized parameters of a directive are regenerated as PHP.
///
/// Each form names the keyword written in front of the parameter list, so
/// `@foreach ($users as $user)` becomes `foreach($users as $user){}` and
/// `@include('nav', ['a' => 1])` becomes `array  ('nav', ['a' => 1]);`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParameterForm {
    /// `@if`, `@elseif`, `@unless`
    Condition,
    /// `@foreach`, `@forelse`
    Foreach,
    /// `@for`
    For,
    /// `@while`
    While,
    /// `@switch`
    Switch,
    /// Every other directive: the parameters are a list of expressions.
    Arguments,
}

impl ParameterForm {
    /// The PHP keyword that opens the regenerated statement.
    pub fn keyword(self) -> &'static str {
        match self {
            ParameterForm::Condition => "if",
            ParameterForm::Foreach => "foreach",
            ParameterForm::For => "for",
            ParameterForm::While => "while",
            ParameterForm::Switch => "switch",
            ParameterForm::Arguments => "array",
        }
    }

    /// Text closing the regenerated statement after the parameter list.
    pub fn suffix(self) -> &'static str {
        match self {
            ParameterForm::Arguments => ");",
            _ => "){}",
        }
    }
}

/// Directive tables and limits used by the template parser and classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemplateConfig {
    /// Directives whose parenthesized parameters hold PHP.
    pub expression_directives: FxHashMap<SmolStr, ParameterForm>,
    /// Directives that open a block closed by `@end<name>`.
    pub block_directives: FxHashSet<SmolStr>,
    /// Directives whose body is copied verbatim up to the closing directive,
    /// mapped to that closing directive's name.
    pub raw_body_directives: FxHashMap<SmolStr, SmolStr>,
    /// Raw-body directives whose body is PHP.
    pub code_body_directives: FxHashSet<SmolStr>,
    /// Templates larger than this many bytes are rejected.
    pub max_document_size: u32,
}

const CONDITION_DIRECTIVES: &[&str] = &["if", "elseif", "unless"];

const ARGUMENT_DIRECTIVES: &[&str] = &[
    "isset", "empty", "case", "break", "continue", "checked", "selected", "disabled",
    "readonly", "required", "class", "style", "json", "php", "include", "includeIf",
    "includeWhen", "includeUnless", "includeFirst", "each", "extends", "section", "yield",
    "push", "prepend", "pushOnce", "prependOnce", "pushIf", "stack", "hasSection",
    "sectionMissing", "can", "cannot", "canany", "auth", "guest", "env", "error", "props",
    "aware", "method", "lang", "choice", "inject", "dd", "dump", "session", "context",
    "vite", "livewire", "fragment", "component", "slot", "use",
];

const BLOCK_DIRECTIVES: &[&str] = &[
    "if", "unless", "isset", "empty", "auth", "guest", "env", "production", "foreach",
    "forelse", "for", "while", "switch", "section", "push", "prepend", "pushOnce",
    "prependOnce", "pushIf", "once", "can", "cannot", "canany", "error", "component", "slot",
    "fragment", "session", "context", "hasSection", "sectionMissing",
];

impl Default for TemplateConfig {
    fn default() -> Self {
        let mut expression_directives = FxHashMap::default();
        for name in CONDITION_DIRECTIVES {
            expression_directives.insert(SmolStr::new(name), ParameterForm::Condition);
        }
        for name in ARGUMENT_DIRECTIVES {
            expression_directives.insert(SmolStr::new(name), ParameterForm::Arguments);
        }
        expression_directives.insert(SmolStr::new_static("foreach"), ParameterForm::Foreach);
        expression_directives.insert(SmolStr::new_static("forelse"), ParameterForm::Foreach);
        expression_directives.insert(SmolStr::new_static("for"), ParameterForm::For);
        expression_directives.insert(SmolStr::new_static("while"), ParameterForm::While);
        expression_directives.insert(SmolStr::new_static("switch"), ParameterForm::Switch);

        let mut raw_body_directives = FxHashMap::default();
        raw_body_directives.insert(SmolStr::new_static("php"), SmolStr::new_static("endphp"));
        raw_body_directives.insert(
            SmolStr::new_static("verbatim"),
            SmolStr::new_static("endverbatim"),
        );

        Self {
            expression_directives,
            block_directives: BLOCK_DIRECTIVES.iter().map(SmolStr::new).collect(),
            raw_body_directives,
            code_body_directives: std::iter::once(SmolStr::new_static("php")).collect(),
            max_document_size: DEFAULT_MAX_DOCUMENT_SIZE,
        }
    }
}

impl TemplateConfig {
    /// Register a (custom) directive whose parameters hold PHP.
    pub fn with_expression_directive(mut self, name: &str, form: ParameterForm) -> Self {
        self.expression_directives.insert(SmolStr::new(name), form);
        self
    }

    /// Register a (custom) directive that opens a block closed by `@end<name>`.
    pub fn with_block_directive(mut self, name: &str) -> Self {
        self.block_directives.insert(SmolStr::new(name));
        self
    }

    /// Set the size limit, in bytes.
    pub fn with_max_document_size(mut self, max: u32) -> Self {
        self.max_document_size = max;
        self
    }

    /// Parameter form of a directive, if its parameters hold PHP.
    pub fn parameter_form(&self, directive: &str) -> Option<ParameterForm> {
        self.expression_directives.get(directive).copied()
    }

    pub fn is_block_directive(&self, directive: &str) -> bool {
        self.block_directives.contains(directive)
    }

    /// Name of the directive closing a raw body opened by `directive`.
    pub fn raw_body_closer(&self, directive: &str) -> Option<&str> {
        self.raw_body_directives.get(directive).map(SmolStr::as_str)
    }

    pub fn is_code_body_directive(&self, directive: &str) -> bool {
        self.code_body_directives.contains(directive)
    }
}
