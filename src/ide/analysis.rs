//! Analysis — the entry point for every template query.
//!
//! An `Analysis` holds nothing but its [`TemplateConfig`]. Each query parses
//! the text it is given, answers, and drops everything it built, so one value
//! can be shared freely between threads.
//!
//! ## Usage
//!
//! ```ignore
//! let analysis = Analysis::new(TemplateConfig::default().with_block_directive("feature"));
//!
//! let regions = analysis.classify_offset(text, offset);
//! let refs = analysis.extract_symbol_references(text, offset);
//! ```

use std::sync::LazyLock;

use text_size::TextSize;
use tracing::trace;

use super::predicates::{self, CallArgument, CallTarget, ConstructFilter};
use crate::config::TemplateConfig;
use crate::extract::{
    SymbolReference, VariableAssignment, insertion_at, symbol_references, variable_assignments,
};
use crate::region::{CodeFragment, CodeRegion, RegionKind, classify, regions};
use crate::template::TemplateDocument;
use crate::virtual_document::{self, VirtualDocument};

/// Template analysis under one configuration.
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    config: TemplateConfig,
}

/// Shared instance behind the free functions of [`crate::ide`].
pub(crate) static DEFAULT_ANALYSIS: LazyLock<Analysis> = LazyLock::new(Analysis::default);

impl Analysis {
    pub fn new(config: TemplateConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TemplateConfig {
        &self.config
    }

    fn parse<'a>(&self, text: &'a str) -> Option<TemplateDocument<'a>> {
        match TemplateDocument::parse_with(text, &self.config) {
            Ok(doc) => Some(doc),
            Err(err) => {
                trace!(%err, "template not parsed");
                None
            }
        }
    }

    /// Regions containing `offset`; empty when there are none or the query fails.
    pub fn classify_offset(&self, text: &str, offset: TextSize) -> Vec<CodeRegion> {
        let Some(doc) = self.parse(text) else {
            return Vec::new();
        };
        classify(&doc, &self.config, offset).unwrap_or_else(|err| {
            trace!(%err, "offset not classified");
            Vec::new()
        })
    }

    pub fn is_offset_in_region_of_kind(
        &self,
        text: &str,
        offset: TextSize,
        kind: RegionKind,
        filter: Option<ConstructFilter<'_>>,
    ) -> bool {
        self.parse(text).is_some_and(|doc| {
            predicates::is_offset_in_region_of_kind(&doc, &self.config, offset, kind, filter)
        })
    }

    pub fn synthesize_virtual_document(&self, text: &str) -> Option<String> {
        virtual_document::synthesize(text, &self.config)
    }

    /// The virtual document together with the provenance of each statement.
    pub fn virtual_document(&self, text: &str) -> Option<VirtualDocument> {
        let doc = self.parse(text)?;
        Some(virtual_document::synthesize_document(&doc, &self.config))
    }

    /// References touching `offset`, in document offsets.
    ///
    /// Right after `->`, `?->` or `::` the only result is the insertion point
    /// of that access, even when a member name follows.
    pub fn extract_symbol_references(&self, text: &str, offset: TextSize) -> Vec<SymbolReference> {
        let Some(doc) = self.parse(text) else {
            return Vec::new();
        };
        let regions = match classify(&doc, &self.config, offset) {
            Ok(regions) => regions,
            Err(err) => {
                trace!(%err, "no references extracted");
                return Vec::new();
            }
        };

        let mut out = Vec::new();
        for region in regions {
            let fragment = match CodeFragment::new(&doc, region) {
                Ok(fragment) => fragment,
                Err(err) => {
                    trace!(%err, "fragment not built");
                    continue;
                }
            };
            let Some(at) = fragment.to_fragment_offset(offset) else {
                continue;
            };
            let root = fragment.syntax();
            let found = match insertion_at(&root, at) {
                Some(insertion) => vec![insertion],
                None => symbol_references(&root)
                    .into_iter()
                    .filter(|reference| reference.span.touches(at))
                    .collect(),
            };
            out.extend(
                found
                    .into_iter()
                    .filter_map(|reference| reference.map_span(|o| fragment.to_absolute_offset(o))),
            );
        }
        out
    }

    pub fn call_argument_at(
        &self,
        text: &str,
        offset: TextSize,
        targets: &[CallTarget<'_>],
    ) -> Option<CallArgument> {
        let doc = self.parse(text)?;
        predicates::call_argument_at(&doc, &self.config, offset, targets)
    }

    pub fn is_offset_in_call_arguments(
        &self,
        text: &str,
        offset: TextSize,
        target: CallTarget<'_>,
    ) -> bool {
        self.parse(text)
            .is_some_and(|doc| predicates::is_offset_in_call_arguments(&doc, &self.config, offset, target))
    }

    /// Variables assigned anywhere in the template, in document order, with
    /// document ranges.
    pub fn template_variables(&self, text: &str) -> Vec<VariableAssignment> {
        let Some(doc) = self.parse(text) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for region in regions(&doc, &self.config) {
            let Ok(fragment) = CodeFragment::new(&doc, region) else {
                continue;
            };
            for mut assignment in variable_assignments(&fragment.syntax()) {
                if let Some(range) = fragment.to_absolute_range(assignment.name_range) {
                    assignment.name_range = range;
                    out.push(assignment);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{SymbolKind, SymbolSpan};

    #[test]
    fn test_analysis_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Analysis>();
    }

    #[test]
    fn test_custom_config() {
        let text = "@money($price)";
        assert!(Analysis::default().classify_offset(text, 8.into()).is_empty());

        let config = TemplateConfig::default()
            .with_expression_directive("money", crate::config::ParameterForm::Arguments);
        let regions = Analysis::new(config).classify_offset(text, 8.into());
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].kind, RegionKind::DirectiveWithParameters);
    }

    #[test]
    fn test_oversized_template_is_absorbed() {
        let analysis = Analysis::new(TemplateConfig::default().with_max_document_size(4));
        assert!(analysis.classify_offset("{{ $a }}", 3.into()).is_empty());
        assert!(analysis.synthesize_virtual_document("{{ $a }}").is_none());
    }

    #[test]
    fn test_references_are_absolute() {
        let text = "<p>{{ $user->name }}</p>";
        let refs = Analysis::default().extract_symbol_references(text, 14.into());
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].name, "name");
        assert_eq!(refs[0].kind, SymbolKind::InstanceMember);
        assert_eq!(refs[0].span, SymbolSpan::Range(text_size::TextRange::new(13.into(), 17.into())));
    }

    #[test]
    fn test_template_variables_in_document_offsets() {
        let text = "@php $title = 'x'; @endphp\n<?php $count = 3; ?>";
        let vars = Analysis::default().template_variables(text);
        let summary: Vec<_> = vars
            .iter()
            .map(|v| (v.name.as_str(), &text[v.name_range]))
            .collect();
        assert_eq!(summary, vec![("$title", "$title"), ("$count", "$count")]);
    }
}
