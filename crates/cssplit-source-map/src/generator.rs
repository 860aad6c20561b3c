//! Building new source maps

use std::collections::HashMap;

use crate::error::SourceMapError;
use crate::raw::RawSourceMap;
use crate::types::Position;
use crate::vlq;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct GeneratedMapping {
    generated: Position,
    source: usize,
    original: Position,
}

/// Accumulates mappings and source contents for one generated file
///
/// Sources are numbered in the order they are first referenced by
/// [`SourceMapGenerator::add_mapping`]. Mappings may be added in any order;
/// they are sorted by generated position when encoded.
#[derive(Debug, Clone, Default)]
pub struct SourceMapGenerator {
    file: Option<String>,
    sources: Vec<String>,
    source_indices: HashMap<String, usize>,
    sources_content: HashMap<usize, String>,
    mappings: Vec<GeneratedMapping>,
}

impl SourceMapGenerator {
    pub fn new(file: Option<String>) -> Self {
        SourceMapGenerator {
            file,
            ..Self::default()
        }
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    pub fn set_file(&mut self, file: Option<String>) {
        self.file = file;
    }

    /// Record that `generated` came from `original` in `source`
    pub fn add_mapping(&mut self, generated: Position, source: &str, original: Position) {
        let source = self.source_index(source);
        self.mappings.push(GeneratedMapping {
            generated,
            source,
            original,
        });
    }

    /// Embed the content of a referenced source
    ///
    /// Content for sources that no mapping references is ignored. Passing
    /// None removes previously embedded content.
    pub fn set_source_content(&mut self, source: &str, content: Option<String>) {
        let Some(&index) = self.source_indices.get(source) else {
            return;
        };
        match content {
            Some(content) => {
                self.sources_content.insert(index, content);
            }
            None => {
                self.sources_content.remove(&index);
            }
        }
    }

    /// Sources referenced so far, in first-reference order
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn has_source(&self, source: &str) -> bool {
        self.source_indices.contains_key(source)
    }

    pub fn mapping_count(&self) -> usize {
        self.mappings.len()
    }

    /// Encode the `mappings` field
    ///
    /// Exact duplicate mappings are written once.
    pub fn encoded_mappings(&self) -> String {
        let mut sorted = self.mappings.clone();
        sorted.sort();
        sorted.dedup();

        let mut out = String::new();
        let mut line = 1;
        let mut previous_column: i64 = 0;
        let mut previous_source: i64 = 0;
        let mut previous_original_line: i64 = 0;
        let mut previous_original_column: i64 = 0;

        for (idx, mapping) in sorted.iter().enumerate() {
            if mapping.generated.line > line {
                while line < mapping.generated.line {
                    out.push(';');
                    line += 1;
                }
                previous_column = 0;
            } else if idx > 0 {
                out.push(',');
            }

            let column = i64::from(mapping.generated.column);
            vlq::encode(column - previous_column, &mut out);
            previous_column = column;

            let source = mapping.source as i64;
            vlq::encode(source - previous_source, &mut out);
            previous_source = source;

            // Encoded original lines are 0-based
            let original_line = i64::from(mapping.original.line) - 1;
            vlq::encode(original_line - previous_original_line, &mut out);
            previous_original_line = original_line;

            let original_column = i64::from(mapping.original.column);
            vlq::encode(original_column - previous_original_column, &mut out);
            previous_original_column = original_column;
        }

        out
    }

    /// Build the JSON object model of the map
    ///
    /// `sourcesContent` is present only when at least one source has
    /// embedded content; sources without content are `null`.
    pub fn to_raw(&self) -> RawSourceMap {
        let sources_content = if self.sources_content.is_empty() {
            None
        } else {
            Some(
                (0..self.sources.len())
                    .map(|idx| self.sources_content.get(&idx).cloned())
                    .collect(),
            )
        };

        RawSourceMap {
            version: 3,
            file: self.file.clone(),
            source_root: None,
            sources: self.sources.iter().cloned().map(Some).collect(),
            sources_content,
            names: Vec::new(),
            mappings: self.encoded_mappings(),
        }
    }

    pub fn to_json_value(&self) -> Result<serde_json::Value, SourceMapError> {
        Ok(serde_json::to_value(self.to_raw())?)
    }

    pub fn to_json_string(&self) -> Result<String, SourceMapError> {
        Ok(serde_json::to_string(&self.to_raw())?)
    }

    fn source_index(&mut self, source: &str) -> usize {
        if let Some(&index) = self.source_indices.get(source) {
            return index;
        }
        let index = self.sources.len();
        self.sources.push(source.to_string());
        self.source_indices.insert(source.to_string(), index);
        index
    }
}
