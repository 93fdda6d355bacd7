//! Offsets and spans into a [`Source`](super::Source).
//!
//! Spans are plain byte ranges. They do not own or borrow the text they
//! point into; converting them to line/column or to a string slice always
//! goes through the `Source` they were created against.

use serde::{Deserialize, Serialize};

use super::Source;

/// A byte offset into a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct SourceOffset(pub usize);

impl SourceOffset {
    pub fn new(offset: usize) -> Self {
        SourceOffset(offset)
    }

    pub fn offset(self) -> usize {
        self.0
    }

    /// Returns a new offset `delta` bytes away. Saturates at zero.
    pub fn move_by(self, delta: isize) -> SourceOffset {
        if delta < 0 {
            SourceOffset(self.0.saturating_sub(delta.unsigned_abs()))
        } else {
            SourceOffset(self.0 + delta as usize)
        }
    }

    /// An empty span located at this offset.
    pub fn collapsed(self) -> SourceSpan {
        SourceSpan::new(self.0, self.0)
    }

    /// The span from this offset up to (but excluding) `end`.
    pub fn until(self, end: SourceOffset) -> SourceSpan {
        SourceSpan::new(self.0, end.0)
    }
}

/// A half-open `[start, end)` byte range.
///
/// `start <= end` always holds; the constructor normalizes reversed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start: usize,
    pub end: usize,
}

impl SourceSpan {
    pub fn new(start: usize, end: usize) -> Self {
        if start <= end {
            SourceSpan { start, end }
        } else {
            SourceSpan { start: end, end: start }
        }
    }

    /// Span used for nodes that were built programmatically.
    pub fn synthetic() -> Self {
        SourceSpan::default()
    }

    pub fn start_offset(&self) -> SourceOffset {
        SourceOffset(self.start)
    }

    pub fn end_offset(&self) -> SourceOffset {
        SourceOffset(self.end)
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn collapse_start(&self) -> SourceSpan {
        SourceSpan::new(self.start, self.start)
    }

    pub fn collapse_end(&self) -> SourceSpan {
        SourceSpan::new(self.end, self.end)
    }

    pub fn with_start(&self, start: usize) -> SourceSpan {
        SourceSpan::new(start, self.end)
    }

    pub fn with_end(&self, end: usize) -> SourceSpan {
        SourceSpan::new(self.start, end)
    }

    /// The smallest span covering both `self` and `other`.
    pub fn extend(&self, other: SourceSpan) -> SourceSpan {
        SourceSpan::new(self.start.min(other.start), self.end.max(other.end))
    }

    pub fn contains(&self, other: SourceSpan) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// The text this span covers, or `""` when the span does not fit the
    /// source (synthetic sources have no text).
    pub fn slice<'a>(&self, source: &'a Source) -> &'a str {
        source.slice(self.start, self.end).unwrap_or("")
    }
}

/// A name together with the span it was read from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceSlice {
    pub chars: String,
    pub loc: SourceSpan,
}

impl SourceSlice {
    pub fn new(chars: impl Into<String>, loc: SourceSpan) -> Self {
        SourceSlice { chars: chars.into(), loc }
    }

    pub fn synthetic(chars: impl Into<String>) -> Self {
        SourceSlice::new(chars, SourceSpan::synthetic())
    }

    pub fn as_str(&self) -> &str {
        &self.chars
    }
}

/// A handlebars-style position: 1-based line, 0-based column (in chars).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourcePosition {
    pub line: usize,
    pub column: usize,
}

impl SourcePosition {
    pub fn new(line: usize, column: usize) -> Self {
        SourcePosition { line, column }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub start: SourcePosition,
    pub end: SourcePosition,
}
