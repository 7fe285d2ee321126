//! Offset classification at the IDE boundary.

use crate::helpers::source_fixtures::*;
use bladescope::ide::{ConstructFilter, classify_offset, is_offset_in_region_of_kind};
use bladescope::region::Construct;
use bladescope::template::EchoStyle;
use bladescope::{RegionKind, TextRange, TextSize};
use rstest::rstest;

// =============================================================================
// INLINE CODE
// =============================================================================

#[test]
fn test_inline_code_region_bounds() {
    let source = INLINE_CODE_TEMPLATE;
    assert_eq!(at(source, "?>"), TextSize::new(86));

    let regions = classify_offset(source, TextSize::new(34));
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].kind, RegionKind::InlineCode);
    assert_eq!(regions[0].range, TextRange::new(14.into(), 86.into()));
    assert!(&source[regions[0].range].contains("$inlineVar = \"sample1Value\";"));
}

#[test]
fn test_inline_code_membership() {
    let source = INLINE_CODE_TEMPLATE;
    let kind = RegionKind::InlineCode;
    assert!(is_offset_in_region_of_kind(source, 34.into(), kind, None));
    assert!(!is_offset_in_region_of_kind(source, 5.into(), kind, None));
    // both ends are inside
    assert!(is_offset_in_region_of_kind(source, 14.into(), kind, None));
    assert!(is_offset_in_region_of_kind(source, 86.into(), kind, None));
    assert!(!is_offset_in_region_of_kind(source, 87.into(), kind, None));
}

// =============================================================================
// DIRECTIVE PARAMETERS
// =============================================================================

#[test]
fn test_if_parameters() {
    let source = CONDITIONAL_TEMPLATE;
    let kind = RegionKind::DirectiveWithParameters;

    assert!(is_offset_in_region_of_kind(source, after(source, "isset($hea"), kind, None));
    assert!(is_offset_in_region_of_kind(source, after(source, "@if ("), kind, None));
    assert!(is_offset_in_region_of_kind(source, after(source, "($header)"), kind, None));
    assert!(!is_offset_in_region_of_kind(source, at(source, "@if"), kind, None));
    assert!(!is_offset_in_region_of_kind(source, 2.into(), kind, None));
    assert!(!is_offset_in_region_of_kind(source, after(source, "@i"), kind, None));
}

#[test]
fn test_parameters_filtered_by_directive() {
    let source = LAYOUT_TEMPLATE;
    let offset = after(source, "$user->po");
    let kind = RegionKind::DirectiveWithParameters;
    assert!(is_offset_in_region_of_kind(
        source,
        offset,
        kind,
        Some(ConstructFilter::Directive("foreach"))
    ));
    assert!(!is_offset_in_region_of_kind(
        source,
        offset,
        kind,
        Some(ConstructFilter::Directive("if"))
    ));
}

// =============================================================================
// EVERY KIND
// =============================================================================

#[rstest]
#[case("'layouts", RegionKind::DirectiveWithParameters)]
#[case("$title = 'Dash", RegionKind::DirectiveWithBody)]
#[case("auth()->us", RegionKind::DirectiveWithBody)]
#[case("'cont", RegionKind::DirectiveWithParameters)]
#[case(":title=\"$ti", RegionKind::ComponentAttributeExpression)]
#[case("route('posts", RegionKind::EchoExpression)]
#[case("{!! $post->ti", RegionKind::EchoExpression)]
fn test_layout_regions(#[case] marker: &str, #[case] kind: RegionKind) {
    let regions = classify_offset(LAYOUT_TEMPLATE, after(LAYOUT_TEMPLATE, marker));
    let kinds: Vec<_> = regions.iter().map(|r| r.kind).collect();
    assert_eq!(kinds, vec![kind], "{marker}");
}

#[rstest]
#[case("<a")]
#[case("class=\"mt")]
#[case("</x-card")]
#[case("@endforeach")]
#[case("@endsection\n")]
fn test_markup_is_unclassified(#[case] marker: &str) {
    assert!(classify_offset(LAYOUT_TEMPLATE, after(LAYOUT_TEMPLATE, marker)).is_empty());
}

#[test]
fn test_component_construct() {
    let regions = classify_offset(LAYOUT_TEMPLATE, after(LAYOUT_TEMPLATE, ":title=\"$"));
    assert_eq!(
        regions[0].construct,
        Construct::ComponentAttribute {
            component: "card".into(),
            attribute: "title".into(),
        }
    );
}

// =============================================================================
// ECHOES IN COMPONENT TAGS
// =============================================================================

#[test]
fn test_echo_in_component_attribute_value() {
    let source = "<x-alert title=\"{{ $user->name }}\" :type=\"$kind\" {{ $attributes }} />";
    let regions = classify_offset(source, after(source, "$us"));
    assert_eq!(regions.len(), 1, "{regions:?}");
    assert_eq!(regions[0].kind, RegionKind::EchoExpression);
    assert_eq!(&source[regions[0].range], " $user->name ");
    assert_eq!(regions[0].construct, Construct::Echo(EchoStyle::Escaped));

    let offset = after(source, "$attr");
    assert!(is_offset_in_region_of_kind(source, offset, RegionKind::EchoExpression, None));
    assert!(!is_offset_in_region_of_kind(
        source,
        offset,
        RegionKind::ComponentAttributeExpression,
        None
    ));
    assert!(classify_offset(source, after(source, "titl")).is_empty());
}

// =============================================================================
// INCOMPLETE TEMPLATES
// =============================================================================

#[test]
fn test_unclosed_body_directive_yields_no_region() {
    let source = "@php\n    $a = 1;\n<p>{{ $a }}</p>\n";
    let offset = after(source, "$a = ");
    assert!(classify_offset(source, offset).is_empty());
    assert!(!is_offset_in_region_of_kind(
        source,
        offset,
        RegionKind::DirectiveWithBody,
        None
    ));
    // the rest of the template is still analyzed
    let echo = classify_offset(source, after(source, "{{ $"));
    assert_eq!(echo.len(), 1);
    assert_eq!(echo[0].kind, RegionKind::EchoExpression);
}

#[test]
fn test_unclosed_block_keeps_its_parameters() {
    let source = "@foreach ($items as $item)\n<li>{{ $item }}</li>\n";
    let regions = classify_offset(source, after(source, "$ite"));
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].kind, RegionKind::DirectiveWithParameters);
}

#[rstest]
#[case("{{ $a ")]
#[case("{!! $a")]
#[case("@if ($a")]
#[case("<x-alert :type=\"$a")]
#[case("<?php $a = ")]
#[case("@php")]
#[case("")]
fn test_truncated_templates_do_not_panic(#[case] source: &str) {
    for offset in 0..=source.len() {
        let _ = classify_offset(source, TextSize::new(offset as u32));
    }
}

#[test]
fn test_offset_past_end_is_empty() {
    assert!(classify_offset("{{ $a }}", 9.into()).is_empty());
    assert!(classify_offset("{{ $a }}", 400.into()).is_empty());
}
