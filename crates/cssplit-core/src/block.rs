//! Output blocks.
//!
//! Copyright (c) 2025 Posit, PBC

use cssplit_source_map::{OriginalPosition, Position, PositionCursor};

/// Index of a [`Block`] in its registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub(crate) usize);

impl BlockId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One generated ↔ original position pair recorded in a block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    /// Where the text starts in the block
    pub generated: Position,
    pub original: OriginalPosition,
}

/// An output unit accumulating the rules routed to it
///
/// Text is only ever appended, so the block keeps a cursor at its end
/// instead of recomputing positions from the start of the buffer.
#[derive(Debug, Clone)]
pub struct Block {
    /// Name delimiters refer to; the document's file name for the
    /// document block
    identity_name: String,
    /// Name the filename template is applied to
    output_name: String,
    is_document: bool,
    text: String,
    cursor: PositionCursor,
    mappings: Vec<MappingEntry>,
    referenced_sources: Vec<String>,
}

impl Block {
    pub(crate) fn named(identity_name: impl Into<String>, output_name: impl Into<String>) -> Self {
        Block {
            identity_name: identity_name.into(),
            output_name: output_name.into(),
            is_document: false,
            text: String::new(),
            cursor: PositionCursor::new(),
            mappings: Vec::new(),
            referenced_sources: Vec::new(),
        }
    }

    pub(crate) fn document(name: impl Into<String>) -> Self {
        let name = name.into();
        Block {
            is_document: true,
            ..Block::named(name.clone(), name)
        }
    }

    pub fn identity_name(&self) -> &str {
        &self.identity_name
    }

    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    /// Whether this is the block for rules outside every delimiter pair
    pub fn is_document(&self) -> bool {
        self.is_document
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Position the next appended character will land at
    pub fn end_position(&self) -> Position {
        self.cursor.position()
    }

    pub fn mappings(&self) -> &[MappingEntry] {
        &self.mappings
    }

    /// Sources referenced by this block's mappings, in first-reference order
    pub fn referenced_sources(&self) -> &[String] {
        &self.referenced_sources
    }

    /// Append `text`, recording one mapping per `(offset, original)` pair
    ///
    /// Offsets are relative to the start of `text`; each mapping's generated
    /// position is where that byte of `text` lands in this block. Pairs
    /// whose offset is not a character boundary of `text` are skipped.
    pub fn append(&mut self, text: &str, origins: impl IntoIterator<Item = (usize, OriginalPosition)>) {
        for (offset, original) in origins {
            let Some(generated) = self.cursor.position_within(text, offset) else {
                continue;
            };
            if !self.referenced_sources.contains(&original.source) {
                self.referenced_sources.push(original.source.clone());
            }
            self.mappings.push(MappingEntry { generated, original });
        }

        self.text.push_str(text);
        self.cursor.advance(text);
    }
}
