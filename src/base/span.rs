//! Byte offsets and line/column conversion.

pub use text_size::{TextRange, TextSize};

/// A zero-based line/column pair. `col` counts UTF-8 bytes from the line start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

/// Maps byte offsets to line/column pairs and back.
///
/// Lines are separated by `\n`; a preceding `\r` stays part of the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Offset of the first byte of every line. Always starts with `0`.
    line_starts: Vec<TextSize>,
    len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::new(0)];
        let mut offset = TextSize::new(0);
        for c in text.chars() {
            offset += TextSize::of(c);
            if c == '\n' {
                line_starts.push(offset);
            }
        }

        Self {
            line_starts,
            len: offset,
        }
    }

    /// Total length of the indexed text.
    pub fn len(&self) -> TextSize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == TextSize::new(0)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Convert a byte offset into a line/column pair.
    ///
    /// Offsets past the end clamp to the end of the text.
    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let offset = offset.min(self.len);
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let line_start = self.line_starts[line];

        LineCol {
            line: line as u32,
            col: u32::from(offset - line_start),
        }
    }

    /// Convert a line/column pair back into a byte offset.
    ///
    /// Returns `None` when the line does not exist or the column runs past
    /// the end of that line.
    pub fn offset(&self, line_col: LineCol) -> Option<TextSize> {
        let line = usize::try_from(line_col.line).ok()?;
        let start = *self.line_starts.get(line)?;
        let next = self.line_starts.get(line + 1).copied().unwrap_or(self.len);
        let offset = start.checked_add(TextSize::new(line_col.col))?;

        (offset <= next).then_some(offset)
    }
}
