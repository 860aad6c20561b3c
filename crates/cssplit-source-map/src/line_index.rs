//! Efficient position lookups for source and generated text

use crate::types::Position;
use crate::utils::utf16_len;

/// Line index over immutable text
///
/// Scans the content once to record where every line starts and, after
/// every non-ASCII character, the UTF-16 column reached at that byte. Text
/// between checkpoints is ASCII, so a lookup is two binary searches plus a
/// byte difference, even on a minified single-line stylesheet.
///
/// # Example
///
/// ```
/// use cssplit_source_map::{LineIndex, Position};
///
/// let index = LineIndex::new("hello\nworld");
/// assert_eq!(index.position_at(6), Some(Position::new(2, 0)));
/// ```
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    /// Byte offset where each line starts; always begins with 0
    line_starts: Vec<usize>,
    /// (byte offset just past a non-ASCII character, UTF-16 column there)
    checkpoints: Vec<(usize, usize)>,
}

impl<'a> LineIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        let mut checkpoints = Vec::new();
        let mut column = 0;

        for (idx, ch) in text.char_indices() {
            if ch == '\n' {
                line_starts.push(idx + 1);
                column = 0;
                continue;
            }
            column += ch.len_utf16();
            if !ch.is_ascii() {
                checkpoints.push((idx + ch.len_utf8(), column));
            }
        }

        LineIndex {
            text,
            line_starts,
            checkpoints,
        }
    }

    /// Convert a byte offset to a Position
    ///
    /// Returns None if the offset is out of bounds or not on a character
    /// boundary.
    pub fn position_at(&self, offset: usize) -> Option<Position> {
        if offset > self.text.len() || !self.text.is_char_boundary(offset) {
            return None;
        }

        // line_starts[i] is the first byte of line i; a newline belongs to
        // the line it terminates
        let row = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let line_start = self.line_starts[row];

        let after = self.checkpoints.partition_point(|&(byte, _)| byte <= offset);
        let column = match after.checked_sub(1).map(|idx| self.checkpoints[idx]) {
            Some((byte, column)) if byte > line_start => column + (offset - byte),
            _ => offset - line_start,
        };

        Some(Position {
            line: (row + 1) as u32,
            column: column as u32,
        })
    }

    /// Get the number of lines in the text
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    pub fn text(&self) -> &'a str {
        self.text
    }
}

/// Tracks the end position of a buffer that is only ever appended to
///
/// Advancing the cursor scans only the appended text, never the text that
/// was already written, so a block that receives many small appends stays
/// linear overall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PositionCursor {
    offset: usize,
    position: Position,
}

impl PositionCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Byte length of everything appended so far
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Position the next appended character will be written at
    pub fn position(&self) -> Position {
        self.position
    }

    /// Move the cursor past `appended`
    pub fn advance(&mut self, appended: &str) {
        self.position = Self::position_after(self.position, appended);
        self.offset += appended.len();
    }

    /// Position of byte `relative` of `appended`, as if `appended` were
    /// written at the cursor
    ///
    /// Returns None if `relative` is out of bounds or not on a character
    /// boundary of `appended`.
    pub fn position_within(&self, appended: &str, relative: usize) -> Option<Position> {
        if relative > appended.len() || !appended.is_char_boundary(relative) {
            return None;
        }
        Some(Self::position_after(self.position, &appended[..relative]))
    }

    fn position_after(start: Position, text: &str) -> Position {
        match text.rfind('\n') {
            Some(idx) => Position {
                line: start.line + text.matches('\n').count() as u32,
                column: utf16_len(&text[idx + 1..]) as u32,
            },
            None => Position {
                line: start.line,
                column: start.column + utf16_len(text) as u32,
            },
        }
    }
}
