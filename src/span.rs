//! Half-open byte spans over document text.

use serde::{Deserialize, Serialize};

/// A half-open byte range `[start, end)` within one file's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Create a span from start and end byte offsets.
    ///
    /// `end` must be greater than or equal to `start`; a zero-length span
    /// is permitted (it covers no bytes).
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(end >= start, "span end before start");
        Self { start, end }
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether a byte offset lies inside the span.
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }

    /// Whether another span lies entirely inside this span.
    ///
    /// A span contains itself.
    pub fn contains_span(&self, other: Span) -> bool {
        other.start >= self.start && other.end <= self.end
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}
