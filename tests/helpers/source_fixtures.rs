//! Template fixtures and helpers for locating offsets in them.

use bladescope::TextSize;

/// Inline code at bytes 14..86 assigning `$inlineVar`.
pub const INLINE_CODE_TEMPLATE: &str = concat!(
    "<p>Hi</p><?php",
    "\n    $inlineVar = \"sample1Value\";\n    echo strtoupper($inlineVar);\n\n    ",
    "?>\n<p>{{ $inlineVar }}</p>\n",
);

pub const CONDITIONAL_TEMPLATE: &str = "<div>\n@if (isset($header))\n    <h1>{{ $header }}</h1>\n@endif\n</div>\n";

pub const LAYOUT_TEMPLATE: &str = r#"@extends('layouts.app')

@php
    $title = 'Dashboard';
    $user = auth()->user();
@endphp

@section('content')
    <x-card :title="$title" class="mt-4">
        @foreach ($user->posts as $post)
            <a href="{{ route('posts.show', $post) }}">{!! $post->title !!}</a>
        @endforeach
    </x-card>
@endsection
"#;

/// Offset just past the first occurrence of `marker`.
pub fn after(source: &str, marker: &str) -> TextSize {
    let start = source
        .find(marker)
        .unwrap_or_else(|| panic!("marker {marker:?} not in fixture"));
    TextSize::new((start + marker.len()) as u32)
}

/// Offset of the first byte of `marker`.
pub fn at(source: &str, marker: &str) -> TextSize {
    let start = source
        .find(marker)
        .unwrap_or_else(|| panic!("marker {marker:?} not in fixture"));
    TextSize::new(start as u32)
}
