//! Predicate engine
//!
//! Yes/no questions about an offset: is it in a region of some kind, is it in
//! the arguments of some call. Each step can come up empty, so every predicate
//! threads `Option` and answers `false`/`None` at the first missing piece.

use smol_str::SmolStr;
use text_size::{TextRange, TextSize};

use crate::config::TemplateConfig;
use crate::extract::callee_name;
use crate::php::ast::{ArgList, CallExpr, MemberExpr, NameRef, ScopedExpr};
use crate::php::{AstNode, SyntaxKind, SyntaxNode, SyntaxToken};
use crate::region::{CodeFragment, Construct, RegionKind, classify};
use crate::template::{EchoStyle, TemplateDocument};

/// Narrows a region match to one template construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructFilter<'a> {
    /// Directive name without `@`, case-insensitive.
    Directive(&'a str),
    /// Component name without `x-`.
    Component(&'a str),
    /// Bound attribute name without `:`.
    Attribute(&'a str),
    Echo(EchoStyle),
}

impl ConstructFilter<'_> {
    pub fn matches(&self, construct: &Construct) -> bool {
        match (*self, construct) {
            (ConstructFilter::Directive(wanted), construct) => construct
                .directive()
                .is_some_and(|name| name.eq_ignore_ascii_case(wanted)),
            (ConstructFilter::Component(wanted), Construct::ComponentAttribute { component, .. }) => {
                component == wanted
            }
            (ConstructFilter::Attribute(wanted), Construct::ComponentAttribute { attribute, .. }) => {
                attribute == wanted
            }
            (ConstructFilter::Echo(wanted), Construct::Echo(style)) => *style == wanted,
            _ => false,
        }
    }
}

/// A callable whose arguments are of interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallTarget<'a> {
    /// `route(...)`
    Function(&'a str),
    /// `$x->trans(...)`, any receiver
    Method(&'a str),
    /// `Route::has(...)`; `class` may be fully qualified or short.
    StaticMethod { class: &'a str, method: &'a str },
}

/// The call argument an offset sits in.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CallArgument {
    /// `route`, `trans` or `Route::has`, as written.
    pub callee: SmolStr,
    /// Zero-based argument index.
    pub index: usize,
    /// Document range of the argument; empty at the offset when no argument
    /// has been written yet.
    pub range: TextRange,
    /// The offset is inside a string literal.
    pub string_literal: bool,
    pub region: RegionKind,
}

pub fn is_offset_in_region_of_kind(
    doc: &TemplateDocument<'_>,
    config: &TemplateConfig,
    offset: TextSize,
    kind: RegionKind,
    filter: Option<ConstructFilter<'_>>,
) -> bool {
    classify(doc, config, offset).is_ok_and(|regions| {
        regions.iter().any(|region| {
            region.kind == kind && filter.is_none_or(|f| f.matches(&region.construct))
        })
    })
}

/// The argument at `offset` of the innermost call enclosing it, if that call
/// is one of `targets`.
pub fn call_argument_at(
    doc: &TemplateDocument<'_>,
    config: &TemplateConfig,
    offset: TextSize,
    targets: &[CallTarget<'_>],
) -> Option<CallArgument> {
    classify(doc, config, offset)
        .ok()?
        .into_iter()
        .find_map(|region| {
            let fragment = CodeFragment::new(doc, region).ok()?;
            argument_in_fragment(&fragment, offset, targets)
        })
}

pub fn is_offset_in_call_arguments(
    doc: &TemplateDocument<'_>,
    config: &TemplateConfig,
    offset: TextSize,
    target: CallTarget<'_>,
) -> bool {
    call_argument_at(doc, config, offset, &[target]).is_some()
}

fn argument_in_fragment(
    fragment: &CodeFragment,
    offset: TextSize,
    targets: &[CallTarget<'_>],
) -> Option<CallArgument> {
    let at = fragment.to_fragment_offset(offset)?;
    let root = fragment.syntax();
    let (call, args) = innermost_call(&root, at)?;
    let callee = call.callee()?;
    if !targets.iter().any(|target| target_matches(*target, &call)) {
        return None;
    }

    let index = args.commas().filter(|comma| comma.text_range().end() <= at).count();
    let range = args
        .args()
        .nth(index)
        .map(|arg| arg.range())
        .filter(|range| !range.is_empty() && range.contains_inclusive(at))
        .and_then(|range| fragment.to_absolute_range(range))
        .unwrap_or_else(|| TextRange::empty(offset));
    let string_literal = root
        .token_at_offset(at)
        .any(|token| token.kind() == SyntaxKind::STRING && inside_string(&token, at));

    Some(CallArgument {
        callee: callee_name(callee)?,
        index,
        range,
        string_literal,
        region: fragment.region.kind,
    })
}

/// The call with the smallest argument list containing `at`.
fn innermost_call(root: &SyntaxNode, at: TextSize) -> Option<(CallExpr, ArgList)> {
    root.descendants()
        .filter_map(CallExpr::cast)
        .filter_map(|call| {
            let args = call.arg_list()?;
            let inner = args.inner_range()?;
            inner.contains_inclusive(at).then_some((call, args, inner))
        })
        .min_by_key(|(_, _, inner)| inner.len())
        .map(|(call, args, _)| (call, args))
}

fn target_matches(target: CallTarget<'_>, call: &CallExpr) -> bool {
    let Some(callee) = call.callee() else {
        return false;
    };
    let node = callee.syntax().clone();
    match target {
        CallTarget::Function(name) => NameRef::cast(node)
            .and_then(|n| n.name())
            .is_some_and(|written| same_name(written.text(), name)),
        CallTarget::Method(name) => MemberExpr::cast(node)
            .and_then(|member| member.name())
            .is_some_and(|written| same_name(written.text(), name)),
        CallTarget::StaticMethod { class, method } => {
            let Some(scoped) = ScopedExpr::cast(node) else {
                return false;
            };
            let written_class = scoped
                .receiver()
                .and_then(|r| NameRef::cast(r.syntax().clone()))
                .and_then(|n| n.name());
            let written_method = scoped.member();
            written_class.is_some_and(|c| same_class(c.text(), class))
                && written_method.is_some_and(|m| same_name(m.text(), method))
        }
    }
}

/// PHP function and method names: case-insensitive, leading `\` ignored.
fn same_name(written: &str, wanted: &str) -> bool {
    written
        .trim_start_matches('\\')
        .eq_ignore_ascii_case(wanted.trim_start_matches('\\'))
}

/// Class names match fully qualified or by their last segment.
fn same_class(written: &str, wanted: &str) -> bool {
    fn short(name: &str) -> &str {
        name.rsplit('\\').next().unwrap_or(name)
    }
    same_name(written, wanted) || short(written).eq_ignore_ascii_case(short(wanted))
}

/// `at` lies after the opening quote and before the closing one, if any.
fn inside_string(token: &SyntaxToken, at: TextSize) -> bool {
    let range = token.text_range();
    let text = token.text();
    let closed = text.len() >= 2 && text.chars().next() == text.chars().last();
    range.start() < at && (at < range.end() || !closed)
}
