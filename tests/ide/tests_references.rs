//! Symbol references at a cursor.

use crate::helpers::source_fixtures::*;
use bladescope::TextSize;
use bladescope::extract::ScopeMember;
use bladescope::ide::{SymbolKind, SymbolSpan, extract_symbol_references};

#[test]
fn test_cursor_after_arrow_is_insertion_point() {
    let source = "{{ $obj->foo() }}";
    let refs = extract_symbol_references(source, TextSize::new(9));
    assert_eq!(refs.len(), 1, "{refs:?}");
    let insertion = &refs[0];
    assert_eq!(insertion.kind, SymbolKind::InstanceMember);
    assert_eq!(insertion.span, SymbolSpan::Insertion(TextSize::new(9)));
    assert!(insertion.span.start() > insertion.span.end());
    assert_eq!(insertion.path, vec!["$obj"]);
    assert!(insertion.name.is_empty());
}

#[test]
fn test_cursor_after_bare_arrow() {
    let source = "<p>{{ $user-> }}</p>";
    let offset = after(source, "$user->");
    let refs = extract_symbol_references(source, offset);
    assert_eq!(refs.len(), 1);
    assert_eq!(refs[0].span, SymbolSpan::Insertion(offset));
}

#[test]
fn test_cursor_after_nullsafe_and_scope_operators() {
    let source = "{{ $user?->name }} {{ Route:: }}";
    let refs = extract_symbol_references(source, after(source, "?->"));
    assert_eq!(refs.len(), 1);
    assert!(refs[0].span.is_insertion());

    let refs = extract_symbol_references(source, after(source, "Route::"));
    assert_eq!(refs.len(), 1);
    assert_eq!(
        refs[0].kind,
        SymbolKind::ScopeResolutionMember(ScopeMember::Pending)
    );
    assert_eq!(refs[0].path, vec!["Route"]);
}

#[test]
fn test_cursor_after_arrow_in_component_attribute_echo() {
    let source = "<x-alert title=\"{{ $user-> }}\" />";
    let offset = after(source, "$user->");
    let refs = extract_symbol_references(source, offset);
    assert_eq!(refs.len(), 1, "{refs:?}");
    assert_eq!(refs[0].kind, SymbolKind::InstanceMember);
    assert_eq!(refs[0].span, SymbolSpan::Insertion(offset));
    assert_eq!(refs[0].path, vec!["$user"]);
}

#[test]
fn test_cursor_inside_member_name() {
    let source = "{{ $user->posts()->first()->title }}";
    let refs = extract_symbol_references(source, after(source, "->fir"));
    assert_eq!(refs.len(), 1);
    let first = &refs[0];
    assert_eq!(first.name, "first");
    assert_eq!(first.path, vec!["$user", "posts"]);
    let SymbolSpan::Range(range) = first.span else {
        panic!("expected a range, got {:?}", first.span);
    };
    assert_eq!(&source[range], "first");
}

#[test]
fn test_static_lookup_chain_kinds() {
    let source = "@php $latest = Post::query()->latest()->first(); @endphp";
    let refs = extract_symbol_references(source, after(source, "Post::que"));
    assert_eq!(refs[0].kind, SymbolKind::ScopeResolutionMember(ScopeMember::StaticMethod));

    let refs = extract_symbol_references(source, after(source, "->lat"));
    assert_eq!(refs[0].kind, SymbolKind::StaticLookup);
    assert_eq!(refs[0].path, vec!["Post", "query"]);
}

#[test]
fn test_variables_and_calls() {
    let source = LAYOUT_TEMPLATE;
    let refs = extract_symbol_references(source, after(source, "$us"));
    assert_eq!(refs.len(), 1);
    assert_eq!(refs[0].name, "$user");
    assert_eq!(refs[0].kind, SymbolKind::Variable);

    let refs = extract_symbol_references(source, after(source, "rou"));
    assert_eq!(refs.len(), 1);
    assert_eq!(refs[0].kind, SymbolKind::Call);
    assert_eq!(refs[0].name, "route");
}

#[test]
fn test_no_references_outside_regions() {
    assert!(extract_symbol_references(LAYOUT_TEMPLATE, 0.into()).is_empty());
    assert!(extract_symbol_references("<p>$user->name</p>", 10.into()).is_empty());
    assert!(extract_symbol_references("{{ $a }}", 100.into()).is_empty());
}
