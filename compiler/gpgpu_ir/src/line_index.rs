//! Byte offset to line/column mapping.

use std::fmt;

use crate::Span;

/// A resolved source position: 1-based line, 0-based column.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Loc {
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.line, self.column)
    }
}

/// Line start offsets of one source text.
#[derive(Clone, Debug, Default)]
pub struct LineIndex {
    line_starts: Vec<u32>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (offset, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(u32::try_from(offset + 1).unwrap_or(u32::MAX));
            }
        }
        LineIndex { line_starts }
    }

    /// Position of a byte offset. Offsets past the end land on the last line.
    pub fn loc(&self, offset: u32) -> Loc {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(next) => next.saturating_sub(1),
        };
        let start = self.line_starts.get(line).copied().unwrap_or(0);
        Loc {
            line: u32::try_from(line + 1).unwrap_or(u32::MAX),
            column: offset - start,
        }
    }

    /// Position of the start of a span.
    #[inline]
    pub fn span_loc(&self, span: Span) -> Loc {
        self.loc(span.start)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
