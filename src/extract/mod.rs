//! Member/symbol extractors
//!
//! Pure functions over the syntax tree of one [`CodeFragment`]. Every range
//! they report is fragment-relative; [`crate::ide`] translates results back
//! to document offsets.
//!
//! - [`variable_assignments`]: `$name = value` with a coarse value kind
//! - [`static_lookups`]: `Class::member` and what is chained after it
//! - [`scope_resolution_members`]: the `::` members, by kind
//! - [`instance_members`]: `->` members of non-static receivers
//! - [`symbol_references`]: all of the above, plus variables and calls
//!
//! [`CodeFragment`]: crate::region::CodeFragment

mod assignments;
mod members;

use smol_str::SmolStr;
use text_size::{TextRange, TextSize};

pub(crate) use assignments::callee_name;
pub use assignments::{ValueKind, VariableAssignment, variable_assignments};
pub use members::{
    ScopeResolutionMembers, StaticLookup, insertion_at, instance_members,
    scope_resolution_members, static_lookups, symbol_references,
};

/// Kind of a member reached with `::`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScopeMember {
    /// `Foo::BAR`, `Foo::class`
    Constant,
    /// `Foo::bar()`
    StaticMethod,
    /// `Foo::$bar`
    StaticProperty,
    /// `Foo::` with nothing typed yet
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SymbolKind {
    /// `$user`
    Variable,
    /// `route(...)`
    Call,
    /// A member chained after a static access: `first` in `User::query()->first()`
    StaticLookup,
    ScopeResolutionMember(ScopeMember),
    /// A member of a non-static receiver: `name` in `$user->name`
    InstanceMember,
}

/// Where a reference sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SymbolSpan {
    /// The text of the name.
    Range(TextRange),
    /// Just after an access operator, before any name has been typed.
    Insertion(TextSize),
}

impl SymbolSpan {
    pub fn start(self) -> TextSize {
        match self {
            SymbolSpan::Range(range) => range.start(),
            SymbolSpan::Insertion(offset) => offset,
        }
    }

    /// End offset. An insertion point ends one before it starts, so an empty
    /// span is always recognizable by `start() > end()`.
    pub fn end(self) -> TextSize {
        match self {
            SymbolSpan::Range(range) => range.end(),
            SymbolSpan::Insertion(offset) => {
                offset.checked_sub(TextSize::new(1)).unwrap_or_default()
            }
        }
    }

    pub fn is_insertion(self) -> bool {
        matches!(self, SymbolSpan::Insertion(_))
    }

    /// `start <= offset <= end` for ranges; equality for insertion points.
    pub fn touches(self, offset: TextSize) -> bool {
        match self {
            SymbolSpan::Range(range) => range.contains_inclusive(offset),
            SymbolSpan::Insertion(at) => at == offset,
        }
    }
}

/// A name in a fragment, with the receiver chain that leads to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SymbolReference {
    /// `$user`, `route`, `first`; empty for insertion points.
    pub name: SmolStr,
    pub kind: SymbolKind,
    pub span: SymbolSpan,
    /// Receivers from the root outwards: `["$user", "posts"]` for
    /// `$user->posts()->first`.
    pub path: Vec<SmolStr>,
}

impl SymbolReference {
    /// Map the span with `map`, dropping the reference if it does not map.
    pub fn map_span(self, map: impl Fn(TextSize) -> Option<TextSize>) -> Option<Self> {
        let span = match self.span {
            SymbolSpan::Range(range) => {
                SymbolSpan::Range(TextRange::new(map(range.start())?, map(range.end())?))
            }
            SymbolSpan::Insertion(offset) => SymbolSpan::Insertion(map(offset)?),
        };
        Some(Self { span, ..self })
    }
}
