//! Regenerated, independently parsable code fragments.

use text_size::{TextRange, TextSize};
use tracing::debug;

use super::CodeRegion;
use crate::error::AnalysisError;
use crate::php::{self, Parse, SyntaxNode};
use crate::template::TemplateDocument;

/// A region's raw code wrapped as standalone PHP, with its parse tree.
#[derive(Debug, Clone)]
pub struct CodeFragment {
    pub region: CodeRegion,
    pub text: String,
    pub parse: Parse,
}

impl CodeFragment {
    pub fn new(doc: &TemplateDocument<'_>, region: CodeRegion) -> Result<Self, AnalysisError> {
        let raw = doc
            .text(region.range)
            .ok_or_else(|| AnalysisError::missing(region.node, "source text"))?;
        let text = format!("{}{}{}", region.prefix(), raw, region.suffix());
        let parse = php::parse(&text);
        if !parse.ok() {
            debug!(
                kind = ?region.kind,
                errors = parse.errors.len(),
                "fragment parsed with errors"
            );
        }
        Ok(Self {
            region,
            text,
            parse,
        })
    }

    pub fn syntax(&self) -> SyntaxNode {
        self.parse.syntax()
    }

    /// Fragment text between the synthetic prefix and suffix.
    pub fn raw_range(&self) -> TextRange {
        TextRange::at(self.region.synthetic_prefix_length(), self.region.range.len())
    }

    pub fn to_fragment_offset(&self, absolute: TextSize) -> Option<TextSize> {
        self.region.to_fragment_offset(absolute)
    }

    pub fn to_absolute_offset(&self, fragment: TextSize) -> Option<TextSize> {
        self.region.to_absolute_offset(fragment)
    }

    pub fn to_absolute_range(&self, fragment: TextRange) -> Option<TextRange> {
        self.region.to_absolute_range(fragment)
    }
}
