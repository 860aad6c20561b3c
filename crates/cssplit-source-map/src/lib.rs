//! Source mapping for cssplit
//!
//! This crate provides the two position-related collaborators the splitter
//! needs: converting byte offsets into (line, column) positions, and reading
//! and writing version 3 source maps.
//!
//! # Overview
//!
//! The core types are:
//! - [`Position`]: A 1-based line and 0-based column
//! - [`LineIndex`]: Offset lookups over immutable text
//! - [`PositionCursor`]: Offset tracking over a buffer that only grows
//! - [`SourceMap`]: A decoded source map, queried by position
//! - [`SourceMapGenerator`]: Builds a new source map from mappings
//!
//! # Example
//!
//! ```rust
//! use cssplit_source_map::*;
//!
//! let mut generator = SourceMapGenerator::new(Some("out.css".into()));
//! generator.add_mapping(Position::new(1, 0), "in.scss", Position::new(3, 2));
//!
//! let map = SourceMap::from_json(&generator.to_json_string().unwrap()).unwrap();
//! let original = map.original_position_for(Position::new(1, 0)).unwrap();
//! assert_eq!(original.source, "in.scss");
//! assert_eq!(original.line, 3);
//! ```

pub mod consumer;
pub mod error;
pub mod generator;
pub mod line_index;
pub mod raw;
pub mod types;
pub mod utils;
pub mod vlq;

// Re-export main types
pub use consumer::{Segment, SegmentOrigin, SourceMap};
pub use error::SourceMapError;
pub use generator::SourceMapGenerator;
pub use line_index::{LineIndex, PositionCursor};
pub use raw::RawSourceMap;
pub use types::{OriginalPosition, Position};
pub use utils::{offset_to_position, position_to_offset, utf16_len};
