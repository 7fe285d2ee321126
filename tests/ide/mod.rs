//! IDE boundary tests
//!
//! Tests for:
//! - Offset classification
//! - Region-kind and call-argument predicates
//! - Symbol references at a cursor
//! - Virtual document synthesis and template variables

pub mod tests_classify;
pub mod tests_predicates;
pub mod tests_references;
pub mod tests_virtual_document;
