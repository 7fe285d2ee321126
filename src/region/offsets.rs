//! Offset adjuster
//!
//! Every region is regenerated as a standalone PHP fragment by wrapping its
//! raw text in a fixed prefix and suffix. The prefix length depends only on
//! the region kind, so translating an offset is a single subtraction:
//!
//! ```text
//! fragment = absolute - region.start + prefix_length
//! absolute = fragment + region.start - prefix_length
//! ```
//!
//! | kind                         | fragment                    |
//! |------------------------------|-----------------------------|
//! | InlineCode                   | `<raw>`                     |
//! | DirectiveWithBody            | `{ <raw>\n}`                |
//! | DirectiveWithParameters      | `foreach(<raw>){}`          |
//! | EchoExpression               | `echo <raw>;`               |
//! | ComponentAttributeExpression | `return <raw>;`             |

use std::borrow::Cow;

use text_size::{TextRange, TextSize};

use super::{CodeRegion, Construct, RegionKind};

pub const INLINE_CODE_PREFIX: &str = "";
pub const INLINE_CODE_SUFFIX: &str = "";

pub const DIRECTIVE_BODY_PREFIX: &str = "{ ";
pub const DIRECTIVE_BODY_SUFFIX: &str = "\n}";

/// Directive keywords are left-aligned in a slot this wide, then followed by `(`.
pub const DIRECTIVE_KEYWORD_WIDTH: usize = 7;

pub const ECHO_PREFIX: &str = "echo ";
pub const ECHO_SUFFIX: &str = ";";

pub const ATTRIBUTE_PREFIX: &str = "return ";
pub const ATTRIBUTE_SUFFIX: &str = ";";

impl RegionKind {
    /// Length of the synthetic text in front of the raw span of a fragment.
    pub const fn synthetic_prefix_length(self) -> TextSize {
        let len = match self {
            RegionKind::InlineCode => INLINE_CODE_PREFIX.len(),
            RegionKind::DirectiveWithBody => DIRECTIVE_BODY_PREFIX.len(),
            RegionKind::DirectiveWithParameters => DIRECTIVE_KEYWORD_WIDTH + 1,
            RegionKind::EchoExpression => ECHO_PREFIX.len(),
            RegionKind::ComponentAttributeExpression => ATTRIBUTE_PREFIX.len(),
        };
        TextSize::new(len as u32)
    }
}

impl CodeRegion {
    pub fn synthetic_prefix_length(&self) -> TextSize {
        self.kind.synthetic_prefix_length()
    }

    /// Text placed before the raw span in this region's fragment.
    pub fn prefix(&self) -> Cow<'static, str> {
        match (&self.construct, self.kind) {
            (Construct::DirectiveArguments { form, .. }, _) => Cow::Owned(format!(
                "{:<width$}(",
                form.keyword(),
                width = DIRECTIVE_KEYWORD_WIDTH
            )),
            (_, RegionKind::InlineCode) => Cow::Borrowed(INLINE_CODE_PREFIX),
            (_, RegionKind::DirectiveWithBody) => Cow::Borrowed(DIRECTIVE_BODY_PREFIX),
            (_, RegionKind::EchoExpression) => Cow::Borrowed(ECHO_PREFIX),
            (_, RegionKind::ComponentAttributeExpression) => Cow::Borrowed(ATTRIBUTE_PREFIX),
            (_, RegionKind::DirectiveWithParameters) => Cow::Borrowed("array  ("),
        }
    }

    /// Text placed after the raw span in this region's fragment.
    pub fn suffix(&self) -> &'static str {
        match (&self.construct, self.kind) {
            (Construct::DirectiveArguments { form, .. }, _) => form.suffix(),
            (_, RegionKind::InlineCode) => INLINE_CODE_SUFFIX,
            (_, RegionKind::DirectiveWithBody) => DIRECTIVE_BODY_SUFFIX,
            (_, RegionKind::EchoExpression) => ECHO_SUFFIX,
            (_, RegionKind::ComponentAttributeExpression) => ATTRIBUTE_SUFFIX,
            (_, RegionKind::DirectiveWithParameters) => ");",
        }
    }

    /// Fragment offset of a document offset, `None` outside the region.
    pub fn to_fragment_offset(&self, absolute: TextSize) -> Option<TextSize> {
        if !self.contains(absolute) {
            return None;
        }
        Some(absolute - self.range.start() + self.synthetic_prefix_length())
    }

    /// Document offset of a fragment offset, `None` inside the synthetic
    /// prefix or suffix.
    pub fn to_absolute_offset(&self, fragment: TextSize) -> Option<TextSize> {
        let prefix = self.synthetic_prefix_length();
        let raw = fragment.checked_sub(prefix)?;
        if raw > self.range.len() {
            return None;
        }
        Some(self.range.start() + raw)
    }

    /// Document range of a fragment range, `None` unless both ends map.
    pub fn to_absolute_range(&self, fragment: TextRange) -> Option<TextRange> {
        Some(TextRange::new(
            self.to_absolute_offset(fragment.start())?,
            self.to_absolute_offset(fragment.end())?,
        ))
    }
}
