//! Utility functions for working with source positions

use crate::types::Position;

/// Length of `text` in UTF-16 code units
pub fn utf16_len(text: &str) -> usize {
    if text.is_ascii() {
        text.len()
    } else {
        text.chars().map(char::len_utf16).sum()
    }
}

/// Convert a byte offset to a Position
///
/// An offset equal to the text length yields the position the next
/// character would be written at. Returns None if the offset is out of
/// bounds or falls inside a multi-byte character.
pub fn offset_to_position(source: &str, offset: usize) -> Option<Position> {
    if offset > source.len() || !source.is_char_boundary(offset) {
        return None;
    }

    let prefix = &source[..offset];
    let (line, line_start) = match prefix.rfind('\n') {
        Some(idx) => (prefix.matches('\n').count() + 1, idx + 1),
        None => (1, 0),
    };

    Some(Position {
        line: line as u32,
        column: utf16_len(&prefix[line_start..]) as u32,
    })
}

/// Convert a Position back to a byte offset
///
/// Returns None if the line does not exist or the column runs past the end
/// of the line.
pub fn position_to_offset(source: &str, position: Position) -> Option<usize> {
    if position.line == 0 {
        return None;
    }

    let mut line_start = 0;
    for _ in 1..position.line {
        line_start += source[line_start..].find('\n')? + 1;
    }

    let line_end = source[line_start..]
        .find('\n')
        .map_or(source.len(), |idx| line_start + idx);

    let mut column = 0u32;
    for (idx, ch) in source[line_start..line_end].char_indices() {
        if column == position.column {
            return Some(line_start + idx);
        }
        column += ch.len_utf16() as u32;
    }

    // The column may address the end of the line
    if column == position.column {
        return Some(line_end);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_to_position_simple() {
        let source = "hello\nworld";

        assert_eq!(offset_to_position(source, 0), Some(Position::new(1, 0)));
        assert_eq!(offset_to_position(source, 3), Some(Position::new(1, 3)));
        // The newline itself belongs to the line it terminates
        assert_eq!(offset_to_position(source, 5), Some(Position::new(1, 5)));
        assert_eq!(offset_to_position(source, 6), Some(Position::new(2, 0)));
        assert_eq!(offset_to_position(source, 9), Some(Position::new(2, 3)));
    }

    #[test]
    fn test_offset_to_position_empty() {
        assert_eq!(offset_to_position("", 0), Some(Position::START));
    }

    #[test]
    fn test_offset_to_position_end() {
        assert_eq!(offset_to_position("ab\ncd\n", 6), Some(Position::new(3, 0)));
        assert_eq!(offset_to_position("hello", 5), Some(Position::new(1, 5)));
    }

    #[test]
    fn test_offset_to_position_out_of_bounds() {
        assert!(offset_to_position("hello", 100).is_none());
    }

    #[test]
    fn test_offset_to_position_inside_multibyte_char() {
        // 'é' occupies bytes 3..5
        assert!(offset_to_position("café", 4).is_none());
    }

    #[test]
    fn test_columns_count_utf16_units() {
        // '😀' is 4 bytes in UTF-8 and 2 code units in UTF-16
        let source = "a😀b";
        assert_eq!(offset_to_position(source, 5), Some(Position::new(1, 3)));
    }

    #[test]
    fn test_position_to_offset_simple() {
        let source = "hello\nworld";

        assert_eq!(position_to_offset(source, Position::new(1, 0)), Some(0));
        assert_eq!(position_to_offset(source, Position::new(1, 3)), Some(3));
        assert_eq!(position_to_offset(source, Position::new(2, 0)), Some(6));
        assert_eq!(position_to_offset(source, Position::new(2, 5)), Some(11));
    }

    #[test]
    fn test_position_to_offset_out_of_bounds() {
        let source = "hello\nworld";
        assert!(position_to_offset(source, Position::new(3, 0)).is_none());
        assert!(position_to_offset(source, Position::new(1, 100)).is_none());
        assert!(position_to_offset(source, Position::new(0, 0)).is_none());
    }

    #[test]
    fn test_roundtrip() {
        let source = "hello\nwörld\n😀 test";

        for (offset, _) in source.char_indices() {
            let pos = offset_to_position(source, offset).unwrap();
            assert_eq!(position_to_offset(source, pos), Some(offset));
        }
    }

    #[test]
    fn test_utf16_len() {
        assert_eq!(utf16_len("abc"), 3);
        assert_eq!(utf16_len("é"), 1);
        assert_eq!(utf16_len("😀"), 2);
    }
}
