//! Core types for source mapping

use serde::{Deserialize, Serialize};

/// A position in text, in source-map conventions
///
/// Lines are 1-based and columns are 0-based. Columns count UTF-16 code
/// units, which is what browsers and other source map consumers expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-based)
    pub line: u32,
    /// Column number (0-based, in UTF-16 code units)
    pub column: u32,
}

impl Position {
    /// The position of the first character of any text
    pub const START: Position = Position { line: 1, column: 0 };

    pub fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::START
    }
}

/// A position in one of the original sources of a source map
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OriginalPosition {
    /// Source name as listed in the map (with any `sourceRoot` applied)
    pub source: String,
    /// Line number (1-based)
    pub line: u32,
    /// Column number (0-based)
    pub column: u32,
}

impl OriginalPosition {
    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }
}
