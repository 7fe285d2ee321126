//! Virtual document synthesis and template variables.

use crate::helpers::source_fixtures::*;
use bladescope::extract::ValueKind;
use bladescope::ide::{Analysis, synthesize_virtual_document, template_variables};
use bladescope::php;
use bladescope::{RegionKind, TemplateConfig};

#[test]
fn test_assignment_precedes_echo_read() {
    let source = "@php $a = 1; @endphp\n<p>{{ $a }}</p>\n";
    let text = synthesize_virtual_document(source).expect("synthesized");
    let assign = text.find("$a = 1;").expect("assignment present");
    let read = text.find("$a;").expect("echo present");
    assert!(assign < read, "{text}");
}

#[test]
fn test_layout_document() {
    let text = synthesize_virtual_document(LAYOUT_TEMPLATE).expect("synthesized");
    let expected = [
        "<?php",
        "array  ('layouts.app');",
        "$title = 'Dashboard';\n    $user = auth()->user();",
        "array  ('content');",
        "$title;",
        "foreach($user->posts as $post){}",
        "route('posts.show', $post);",
        "$post->title;",
    ];
    let mut cursor = 0;
    for line in expected {
        let found = text[cursor..]
            .find(line)
            .unwrap_or_else(|| panic!("{line:?} missing or out of order in:\n{text}"));
        cursor += found + line.len();
    }
}

#[test]
fn test_provenance_follows_regions() {
    let doc = Analysis::default()
        .virtual_document("{{ $a }} <?php $b = 2; ?> @if ($c)")
        .expect("synthesized");
    let kinds: Vec<_> = doc.provenance.iter().map(|p| p.kind).collect();
    assert_eq!(
        kinds,
        vec![
            RegionKind::EchoExpression,
            RegionKind::InlineCode,
            RegionKind::DirectiveWithParameters
        ]
    );
    for record in &doc.provenance {
        assert!(!doc.text[record.output].is_empty());
    }
    assert_eq!(&doc.text[doc.provenance[2].output], "if     ($c){}");
}

#[test]
fn test_component_echoes_are_synthesized() {
    let source = "@php $user = auth()->user(); @endphp<x-alert title=\"{{ $user->name }}\" {{ $attributes }} />";
    let text = synthesize_virtual_document(source).expect("synthesized");
    assert_eq!(
        text,
        "<?php\n$user = auth()->user();\n$user->name;\n$attributes;\n"
    );
}

#[test]
fn test_every_statement_is_terminated() {
    for source in [
        "{{ $obj->{'title'} }}{{ $next }}",
        "{{ match($a) { 1 => 'one', default => 'many' } }}{{ $next }}",
        "<?php $a = 1 // note ?>{{ $a }}",
        "<?php $a = 1 # note ?>{{ $a }}",
        "@php $f = fn() => 1 @endphp{{ $f() }}",
        "<x-a :b=\"function () { return 1; }\" />{{ $next }}",
    ] {
        let text = synthesize_virtual_document(source).expect("synthesized");
        let parse = php::parse(&text);
        assert!(parse.ok(), "{source:?} gave {text:?}: {:?}", parse.errors);
    }
}

#[test]
fn test_empty_regions_are_skipped() {
    let text = synthesize_virtual_document("{{ }} {{ $a }} <?php ?>").expect("synthesized");
    assert_eq!(text, "<?php\n$a;\n");
}

#[test]
fn test_oversized_template_is_not_synthesized() {
    let analysis = Analysis::new(TemplateConfig::default().with_max_document_size(8));
    assert!(analysis.synthesize_virtual_document("{{ $a }} {{ $b }}").is_none());
}

#[test]
fn test_template_variables() {
    let vars = template_variables(LAYOUT_TEMPLATE);
    let summary: Vec<_> = vars
        .iter()
        .map(|v| (v.name.as_str(), v.value, v.detail.as_deref()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("$title", ValueKind::String, None),
            ("$user", ValueKind::Call, Some("user")),
            ("$post", ValueKind::Other, None),
        ]
    );
    for var in &vars {
        assert_eq!(&LAYOUT_TEMPLATE[var.name_range], var.name.as_str());
    }
}
