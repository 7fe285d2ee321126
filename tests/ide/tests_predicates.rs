//! Call-argument predicates across region kinds.

use crate::helpers::source_fixtures::*;
use bladescope::ide::{CallTarget, call_argument_at, is_offset_in_call_arguments};
use bladescope::RegionKind;
use rstest::rstest;

#[test]
fn test_isset_inside_if() {
    let source = CONDITIONAL_TEMPLATE;
    let target = CallTarget::Function("isset");
    assert!(is_offset_in_call_arguments(source, after(source, "isset($he"), target));
    assert!(!is_offset_in_call_arguments(source, after(source, "iss"), target));
    assert!(!is_offset_in_call_arguments(source, at(source, "<h1>"), target));
}

#[test]
fn test_route_name_argument() {
    let source = LAYOUT_TEMPLATE;
    let found = call_argument_at(source, after(source, "route('posts."), &[CallTarget::Function("route")])
        .expect("inside route()");
    assert_eq!(found.callee, "route");
    assert_eq!(found.index, 0);
    assert!(found.string_literal);
    assert_eq!(&source[found.range], "'posts.show'");
    assert_eq!(found.region, RegionKind::EchoExpression);

    let found = call_argument_at(source, after(source, "'posts.show', $po"), &[CallTarget::Function("route")])
        .expect("second argument");
    assert_eq!(found.index, 1);
    assert!(!found.string_literal);
}

#[test]
fn test_view_name_in_directive_arguments() {
    let source = "@include('partials.nav', ['active' => view('x')])";
    let targets = [CallTarget::Function("view"), CallTarget::Function("route")];
    let found = call_argument_at(source, after(source, "view('"), &targets).expect("inside view()");
    assert_eq!(found.callee, "view");
    assert_eq!(found.region, RegionKind::DirectiveWithParameters);
}

#[rstest]
#[case("{{ __('messages.welcome') }}", "__('mess", CallTarget::Function("__"))]
#[case("{{ app('translator')->get('auth.failed') }}", "get('auth", CallTarget::Method("get"))]
#[case("{{ Lang::get('auth.failed') }}", "get('auth", CallTarget::StaticMethod { class: "Lang", method: "get" })]
#[case("{{ \\Illuminate\\Support\\Facades\\Lang::get('a') }}", "get('", CallTarget::StaticMethod { class: "Lang", method: "GET" })]
#[case("@php $x = config('app.name'); @endphp", "config('app", CallTarget::Function("config"))]
#[case("<?= trans('a') ?>", "trans('", CallTarget::Function("trans"))]
#[case("<x-nav :items=\"menu('main')\" />", "menu('ma", CallTarget::Function("menu"))]
fn test_call_arguments_in_every_region(
    #[case] source: &str,
    #[case] marker: &str,
    #[case] target: CallTarget<'static>,
) {
    assert!(is_offset_in_call_arguments(source, after(source, marker), target), "{source}");
}

#[rstest]
#[case("{{ Lang::get('a') }}", "get('", CallTarget::Function("get"))]
#[case("{{ Lang::get('a') }}", "get('", CallTarget::Method("get"))]
#[case("{{ $lang->get('a') }}", "get('", CallTarget::StaticMethod { class: "Lang", method: "get" })]
#[case("{{ Str::get('a') }}", "get('", CallTarget::StaticMethod { class: "Lang", method: "get" })]
#[case("<p>route('a')</p>", "route('", CallTarget::Function("route"))]
fn test_call_target_kinds_do_not_mix(
    #[case] source: &str,
    #[case] marker: &str,
    #[case] target: CallTarget<'static>,
) {
    assert!(!is_offset_in_call_arguments(source, after(source, marker), target), "{source}");
}
