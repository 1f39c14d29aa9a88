//! Source location tracking for declarations and diagnostics.
//!
//! # Examples
//!
//! ```
//! use objcx_ast::span::Span;
//!
//! let class_header = Span::new(0, 12, 1, 1);
//! let body_end = Span::new(40, 41, 4, 1);
//! let merged = Span::merge(class_header, body_end);
//!
//! assert_eq!(merged.start, 0);
//! assert_eq!(merged.end, 41);
//! assert_eq!(merged.line, 1);
//! ```

use std::fmt;

/// A source span: byte offsets plus the line/column where it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Byte offset of the span start (0-indexed)
    pub start: usize,

    /// Byte offset of the span end (exclusive)
    pub end: usize,

    /// Line number of the span start (1-indexed, 0 for synthesized nodes)
    pub line: usize,

    /// Column number of the span start (1-indexed, in bytes)
    pub col: usize,
}

impl Span {
    /// Span used by declarations the compiler synthesizes itself.
    pub const SYNTHESIZED: Span = Span::new(0, 0, 0, 0);

    /// Creates a new span.
    #[must_use]
    pub const fn new(start: usize, end: usize, line: usize, col: usize) -> Self {
        Self {
            start,
            end,
            line,
            col,
        }
    }

    /// Creates a zero-length span at one position.
    #[must_use]
    pub const fn point(offset: usize, line: usize, col: usize) -> Self {
        Self::new(offset, offset, line, col)
    }

    /// Creates a span covering `left` through `right`.
    #[must_use]
    pub const fn merge(left: Span, right: Span) -> Self {
        Self {
            start: left.start,
            end: right.end,
            line: left.line,
            col: left.col,
        }
    }

    /// Returns the length of the span in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the span has zero length.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns `true` for spans of compiler-synthesized nodes.
    #[must_use]
    pub const fn is_synthesized(&self) -> bool {
        self.line == 0
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_synthesized() {
            write!(f, "<synthesized>")
        } else {
            write!(f, "{}:{}", self.line, self.col)
        }
    }
}

/// Trait for nodes that carry a source span.
pub trait Spanned {
    /// Returns the source span of this item.
    fn span(&self) -> Span;
}

impl Spanned for Span {
    fn span(&self) -> Span {
        *self
    }
}
