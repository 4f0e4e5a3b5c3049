//! Source locations.
//!
//! Every token, node and diagnostic carries a [`TextSpan`]: a half-open
//! byte range into the borrowed source buffer. Spans are never resolved
//! into copied text until a consumer asks for it.

use std::fmt;
use std::ops::Range;

/// A byte offset into the source buffer.
pub type TextPos = u32;

/// A half-open byte range `[start, start + length)`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct TextSpan {
    pub start: TextPos,
    pub length: TextPos,
}

impl TextSpan {
    #[inline]
    pub fn new(start: TextPos, length: TextPos) -> Self {
        Self { start, length }
    }

    /// Create a span from start and end positions.
    #[inline]
    pub fn from_bounds(start: TextPos, end: TextPos) -> Self {
        debug_assert!(end >= start);
        Self {
            start,
            length: end.saturating_sub(start),
        }
    }

    /// A zero-width span at `pos`.
    #[inline]
    pub fn empty(pos: TextPos) -> Self {
        Self { start: pos, length: 0 }
    }

    /// Exclusive end offset.
    #[inline]
    pub fn end(&self) -> TextPos {
        self.start + self.length
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    #[inline]
    pub fn contains(&self, pos: TextPos) -> bool {
        pos >= self.start && pos < self.end()
    }

    /// The smallest span covering both `self` and `other`.
    pub fn cover(&self, other: TextSpan) -> TextSpan {
        TextSpan::from_bounds(self.start.min(other.start), self.end().max(other.end()))
    }

    #[inline]
    pub fn to_range(&self) -> Range<usize> {
        self.start as usize..self.end() as usize
    }

    /// The text this span covers, or `None` if it is out of range or
    /// splits a UTF-8 sequence.
    pub fn slice<'s>(&self, source: &'s str) -> Option<&'s str> {
        source.get(self.to_range())
    }
}

impl fmt::Debug for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end())
    }
}

impl fmt::Display for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end())
    }
}

impl From<TextSpan> for Range<usize> {
    fn from(span: TextSpan) -> Self {
        span.to_range()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_span() {
        let span = TextSpan::new(5, 10);
        assert_eq!(span.end(), 15);
        assert!(span.contains(5));
        assert!(span.contains(14));
        assert!(!span.contains(15));
        assert_eq!(span.to_range(), 5..15);
    }

    #[test]
    fn test_cover() {
        let a = TextSpan::from_bounds(4, 6);
        let b = TextSpan::from_bounds(10, 12);
        assert_eq!(a.cover(b), TextSpan::from_bounds(4, 12));
        assert_eq!(b.cover(a), TextSpan::from_bounds(4, 12));
    }

    #[test]
    fn test_slice() {
        let text = "let x = 1";
        assert_eq!(TextSpan::from_bounds(4, 5).slice(text), Some("x"));
        assert_eq!(TextSpan::from_bounds(4, 50).slice(text), None);
    }
}
