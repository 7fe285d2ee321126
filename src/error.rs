//! Error types for template analysis.
//!
//! None of these cross the [`crate::ide`] boundary: every public query turns
//! them into an empty, `false` or `None` result.

use thiserror::Error;

use crate::template::NodeId;

/// Errors raised while parsing a template or mapping one of its regions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// The template exceeds the configured size limit.
    #[error("template is too large ({size} bytes, max {max})")]
    DocumentTooLarge { size: usize, max: u32 },

    /// A caller-supplied offset does not fall inside the document.
    #[error("offset {offset} is outside the document ({len} bytes)")]
    OffsetOutOfBounds { offset: u32, len: u32 },

    /// A node lacks a piece of metadata, typically because the source is mid-edit.
    #[error("template node {node} has no {what}")]
    MissingMetadata { node: NodeId, what: &'static str },
}

impl AnalysisError {
    /// Create a missing metadata error.
    pub fn missing(node: NodeId, what: &'static str) -> Self {
        Self::MissingMetadata { node, what }
    }
}
