//! Byte-offset text spans.

/// A half-open byte range `[start, start + length)`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct TextSpan {
    pub start: u32,
    pub length: u32,
}

impl TextSpan {
    pub const fn new(start: u32, length: u32) -> Self {
        TextSpan { start, length }
    }

    pub const fn from_bounds(start: u32, end: u32) -> Self {
        TextSpan {
            start,
            length: end.saturating_sub(start),
        }
    }

    pub const fn end(&self) -> u32 {
        self.start + self.length
    }

    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Strict containment: `start < offset < end`.
    pub const fn strictly_contains(&self, offset: u32) -> bool {
        self.start < offset && offset < self.end()
    }

    /// Inclusive containment: `start <= offset <= end`.
    pub const fn touches(&self, offset: u32) -> bool {
        self.start <= offset && offset <= self.end()
    }

    pub const fn contains_span(&self, other: TextSpan) -> bool {
        self.start <= other.start && other.end() <= self.end()
    }
}
