//! # bladescope-base
//!
//! Core library for finding, mapping and analyzing the PHP embedded in
//! Blade templates.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide, evaluate       → Offset queries, call-argument predicates, evaluator seam
//!   ↓
//! virtual_document    → All regions as one PHP document
//! extract             → Assignments, static lookups, member references
//!   ↓
//! region              → Region classifier, offset adjuster, code fragments
//!   ↓
//! template, php       → Template scanner; Logos lexer + rowan parser for PHP
//!   ↓
//! base, config, error → TextRange/LineIndex, directive tables, AnalysisError
//! ```

// ============================================================================
// MODULES (dependency order: base → template/php → region → extract → ide)
// ============================================================================

/// Foundation types: TextRange, TextSize, LineIndex
pub mod base;

/// Directive tables and limits
pub mod config;

/// AnalysisError
pub mod error;

/// Template scanner: echoes, directives, components, inline code
pub mod template;

/// PHP syntax: Logos lexer, rowan CST, typed AST
pub mod php;

/// Embedded-code regions and their fragments
pub mod region;

/// Virtual document synthesis
pub mod virtual_document;

/// Static extraction over fragment syntax trees
pub mod extract;

/// IDE features: classification, predicates, symbol references
pub mod ide;

/// Evaluation of the virtual document by an external PHP runtime
pub mod evaluate;

// Re-export the query surface
pub use ide::{
    Analysis, CallArgument, CallTarget, ConstructFilter, call_argument_at, classify_offset,
    extract_symbol_references, is_offset_in_call_arguments, is_offset_in_region_of_kind,
    synthesize_virtual_document, template_variables,
};

// Re-export foundation types
pub use base::{LineCol, LineIndex, TextRange, TextSize};
pub use config::TemplateConfig;
pub use error::AnalysisError;
pub use region::{CodeRegion, RegionKind};
