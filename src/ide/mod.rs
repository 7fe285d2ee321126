//! IDE features — High-level APIs for editor integrations.
//!
//! This module is the boundary between the template model and whatever
//! serves editor requests. Each function answers one question about a
//! template and an offset in it.
//!
//! ## Design Principles
//!
//! 1. **Pure functions**: Take text in, return data out
//! 2. **No protocol types**: Offsets are `TextSize`, converted at the server boundary
//! 3. **Errors stop here**: Failures below become empty results, `false` or `None`
//!
//! ## Usage
//!
//! The free functions use the default directive tables:
//!
//! ```ignore
//! use bladescope::ide::{RegionKind, classify_offset, is_offset_in_region_of_kind};
//!
//! let regions = classify_offset("{{ $user->name }}", 5.into());
//! let in_echo = is_offset_in_region_of_kind(text, offset, RegionKind::EchoExpression, None);
//! ```
//!
//! Use [`Analysis`] to analyze with a custom [`TemplateConfig`](crate::config::TemplateConfig).

mod analysis;
mod predicates;

use text_size::TextSize;

pub use analysis::Analysis;
pub use predicates::{CallArgument, CallTarget, ConstructFilter};
pub use crate::extract::{SymbolKind, SymbolReference, SymbolSpan, VariableAssignment};
pub use crate::region::{CodeRegion, RegionKind};

use analysis::DEFAULT_ANALYSIS;

/// Every region containing `offset`.
pub fn classify_offset(text: &str, offset: TextSize) -> Vec<CodeRegion> {
    DEFAULT_ANALYSIS.classify_offset(text, offset)
}

/// `offset` is in a region of `kind`, optionally narrowed by `filter`.
pub fn is_offset_in_region_of_kind(
    text: &str,
    offset: TextSize,
    kind: RegionKind,
    filter: Option<ConstructFilter<'_>>,
) -> bool {
    DEFAULT_ANALYSIS.is_offset_in_region_of_kind(text, offset, kind, filter)
}

/// One PHP document holding the code of every region, in document order.
pub fn synthesize_virtual_document(text: &str) -> Option<String> {
    DEFAULT_ANALYSIS.synthesize_virtual_document(text)
}

pub fn extract_symbol_references(text: &str, offset: TextSize) -> Vec<SymbolReference> {
    DEFAULT_ANALYSIS.extract_symbol_references(text, offset)
}

pub fn call_argument_at(
    text: &str,
    offset: TextSize,
    targets: &[CallTarget<'_>],
) -> Option<CallArgument> {
    DEFAULT_ANALYSIS.call_argument_at(text, offset, targets)
}

pub fn is_offset_in_call_arguments(text: &str, offset: TextSize, target: CallTarget<'_>) -> bool {
    DEFAULT_ANALYSIS.is_offset_in_call_arguments(text, offset, target)
}

pub fn template_variables(text: &str) -> Vec<VariableAssignment> {
    DEFAULT_ANALYSIS.template_variables(text)
}
