use std::fmt;

use crate::token::Span;

/// Maps character offsets to 1-based `(line, column)` pairs.
///
/// Holds the offset at which each line starts, in ascending order. The first
/// line always starts at offset zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl Default for LineIndex {
    fn default() -> Self {
        LineIndex { starts: vec![0] }
    }
}

impl LineIndex {
    pub fn new() -> LineIndex {
        LineIndex::default()
    }

    /// Builds the index for the whole source at once.
    pub fn of(src: &str) -> LineIndex {
        let mut lines = LineIndex::new();
        for (offset, c) in src.chars().enumerate() {
            if c == '\n' {
                lines.push_line_start(offset + 1);
            }
        }
        lines
    }

    /// Records that a new line starts at `offset`. Offsets must be pushed in
    /// ascending order.
    pub fn push_line_start(&mut self, offset: usize) {
        let last = self.starts.last().copied().unwrap_or(0);
        debug_assert!(offset > last, "line starts must be ascending");
        if offset > last {
            self.starts.push(offset);
        }
    }

    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// Returns the 1-based line and column of the provided offset.
    pub fn locate(&self, offset: usize) -> (usize, usize) {
        // Number of line starts at or before `offset`; at least one since the
        // first start is zero.
        let line = self.starts.partition_point(|&start| start <= offset);
        let start = self.starts[line - 1];
        (line, offset - start + 1)
    }

    /// Returns a value which displays the span as `line,col..line,col`, the
    /// end position naming the span's last character.
    pub fn span(&self, span: Span) -> LineSpan {
        let start = self.locate(span.lo);
        let end = if span.len == 0 {
            start
        } else {
            self.locate(span.hi() - 1)
        };
        LineSpan { start, end }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LineSpan {
    pub start: (usize, usize),
    pub end: (usize, usize),
}

impl fmt::Display for LineSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let LineSpan {
            start: (l0, c0),
            end: (l1, c1),
        } = self;
        write!(f, "{l0},{c0}..{l1},{c1}")
    }
}
