//! Offset translation and synthesis properties.

use bladescope::config::TemplateConfig;
use bladescope::ide::{
    RegionKind, classify_offset, is_offset_in_region_of_kind, synthesize_virtual_document,
};
use bladescope::region::{CodeFragment, regions};
use bladescope::template::TemplateDocument;
use bladescope::TextSize;
use proptest::prelude::*;

/// Number of constructs [`embed`] can wrap code in.
const WRAPPERS: usize = 7;

/// A template embedding `code` in one of the constructs that carry PHP.
fn embed(wrapper: usize, code: &str) -> String {
    match wrapper {
        0 => format!("{{{{ {code} }}}}"),
        1 => format!("{{!! {code} !!}}"),
        2 => format!("@if ({code})"),
        3 => format!("<?php {code} ?>"),
        4 => format!("@php {code} @endphp"),
        5 => format!("<x-alert :type=\"{code}\" />"),
        _ => format!("<x-alert title=\"{{{{ {code} }}}}\" />"),
    }
}

fn code() -> impl Strategy<Value = String> {
    ("[a-z][a-z0-9_]{0,8}", "[a-z][a-zA-Z]{0,8}")
        .prop_map(|(var, member)| format!("${var}->{member}"))
}

proptest! {
    #[test]
    fn prop_offsets_translate_linearly(
        before in "[a-z .]{0,20}",
        after in "[a-z .]{0,20}",
        wrapper in 0usize..WRAPPERS,
        code in code(),
    ) {
        let source = format!("{before} {} {after}", embed(wrapper, &code));
        let config = TemplateConfig::default();
        let doc = TemplateDocument::parse_with(&source, &config).unwrap();
        let found = regions(&doc, &config);
        prop_assert_eq!(found.len(), 1, "{}", source);

        let region = &found[0];
        let prefix = region.synthetic_prefix_length();
        for raw in u32::from(region.range.start())..=u32::from(region.range.end()) {
            let absolute = TextSize::new(raw);
            let fragment = region.to_fragment_offset(absolute).unwrap();
            prop_assert_eq!(fragment, absolute - region.range.start() + prefix);
            prop_assert_eq!(region.to_absolute_offset(fragment), Some(absolute));
        }

        let fragment = CodeFragment::new(&doc, region.clone()).unwrap();
        prop_assert_eq!(&fragment.text[fragment.raw_range()], &source[region.range]);
    }

    #[test]
    fn prop_offsets_outside_regions_do_not_map(
        wrapper in 0usize..WRAPPERS,
        code in code(),
    ) {
        let source = format!("ab {} cd", embed(wrapper, &code));
        let config = TemplateConfig::default();
        let doc = TemplateDocument::parse_with(&source, &config).unwrap();
        let region = regions(&doc, &config).remove(0);
        prop_assert_eq!(region.to_fragment_offset(TextSize::new(1)), None);
        let inside_prefix = region.to_absolute_offset(TextSize::new(0));
        prop_assert_eq!(inside_prefix.is_some(), region.synthetic_prefix_length() == TextSize::new(0));
    }

    #[test]
    fn prop_plain_text_is_never_classified(text in "[a-zA-Z0-9 .,;:!?\n]{0,60}") {
        for offset in 0..=text.len() {
            prop_assert!(classify_offset(&text, TextSize::new(offset as u32)).is_empty());
        }
    }

    #[test]
    fn prop_synthesis_is_idempotent(
        wrappers in proptest::collection::vec(0usize..WRAPPERS, 0..6),
        code in code(),
    ) {
        let source: String = wrappers.iter().map(|w| embed(*w, &code) + "\n").collect();
        prop_assert_eq!(
            synthesize_virtual_document(&source),
            synthesize_virtual_document(&source)
        );
    }

    #[test]
    fn prop_classification_is_idempotent(
        wrappers in proptest::collection::vec(0usize..WRAPPERS, 0..5),
        code in code(),
        picks in proptest::collection::vec(0usize..512, 1..8),
    ) {
        let source: String = wrappers.iter().map(|w| embed(*w, &code) + " x ").collect();
        for pick in picks {
            let offset = TextSize::new((pick % (source.len() + 1)) as u32);
            let first = classify_offset(&source, offset);
            prop_assert_eq!(&first, &classify_offset(&source, offset), "{}", source);
            for kind in RegionKind::ALL {
                let inside = is_offset_in_region_of_kind(&source, offset, kind, None);
                prop_assert_eq!(inside, is_offset_in_region_of_kind(&source, offset, kind, None));
                prop_assert_eq!(inside, first.iter().any(|region| region.kind == kind));
            }
        }
    }

    #[test]
    fn prop_synthesis_preserves_order(vars in proptest::collection::vec("[a-z]{1,8}", 1..8)) {
        let source = vars
            .iter()
            .map(|v| format!("{{{{ ${v} }}}}"))
            .collect::<Vec<_>>()
            .join(" | ");
        let text = synthesize_virtual_document(&source).unwrap();
        let lines: Vec<_> = text.lines().skip(1).collect();
        let expected: Vec<_> = vars.iter().map(|v| format!("${v};")).collect();
        prop_assert_eq!(lines, expected);
    }
}
