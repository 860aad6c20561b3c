//! Decoded source maps and position queries against them

use crate::error::SourceMapError;
use crate::raw::RawSourceMap;
use crate::types::{OriginalPosition, Position};
use crate::vlq;

/// Where a segment points in the original sources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentOrigin {
    /// Index into [`SourceMap::sources`]
    pub source: usize,
    /// Original line (1-based)
    pub line: u32,
    /// Original column (0-based)
    pub column: u32,
}

/// One decoded entry of `mappings`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub generated_column: u32,
    /// None for segments that only mark a generated column
    pub original: Option<SegmentOrigin>,
}

/// A decoded version 3 source map
///
/// Segments are grouped by generated line and sorted by generated column,
/// so position queries are a binary search within one line.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceMap {
    file: Option<String>,
    sources: Vec<String>,
    sources_content: Vec<Option<String>>,
    /// `lines[i]` holds the segments of generated line `i + 1`
    lines: Vec<Vec<Segment>>,
    mapping_count: usize,
}

impl SourceMap {
    /// Parse and decode a source map from its JSON text
    pub fn from_json(json: &str) -> Result<Self, SourceMapError> {
        let raw: RawSourceMap = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    /// Decode an already-deserialized source map
    pub fn from_raw(raw: RawSourceMap) -> Result<Self, SourceMapError> {
        if raw.version != 3 {
            return Err(SourceMapError::UnsupportedVersion(raw.version));
        }

        let root = raw.source_root.as_deref().unwrap_or("");
        let sources: Vec<String> = raw
            .sources
            .into_iter()
            .map(|source| join_source_root(root, &source.unwrap_or_default()))
            .collect();

        let mut sources_content = raw.sources_content.unwrap_or_default();
        sources_content.resize(sources.len(), None);

        let lines = decode_mappings(&raw.mappings, sources.len())?;
        let mapping_count = lines
            .iter()
            .flatten()
            .filter(|segment| segment.original.is_some())
            .count();

        Ok(SourceMap {
            file: raw.file,
            sources,
            sources_content,
            lines,
            mapping_count,
        })
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    /// Source names, with `sourceRoot` applied
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Embedded content of `source`, if the map carries it
    pub fn source_content_for(&self, source: &str) -> Option<&str> {
        let index = self.sources.iter().position(|s| s == source)?;
        self.sources_content.get(index)?.as_deref()
    }

    /// Number of segments that point into an original source
    pub fn mapping_count(&self) -> usize {
        self.mapping_count
    }

    /// True when the map carries no usable mappings at all
    pub fn is_empty(&self) -> bool {
        self.mapping_count == 0
    }

    /// Segments of a generated line (1-based)
    pub fn line_segments(&self, line: u32) -> &[Segment] {
        line.checked_sub(1)
            .and_then(|idx| self.lines.get(idx as usize))
            .map_or(&[], Vec::as_slice)
    }

    /// Find the original position a generated position came from
    ///
    /// Picks the closest segment at or before `position` on the same
    /// generated line. Returns None when there is no such segment or the
    /// closest one carries no original position.
    pub fn original_position_for(&self, position: Position) -> Option<OriginalPosition> {
        let segments = self.line_segments(position.line);
        let after = segments.partition_point(|s| s.generated_column <= position.column);
        let segment = segments.get(after.checked_sub(1)?)?;
        let origin = segment.original?;

        Some(OriginalPosition {
            source: self.sources[origin.source].clone(),
            line: origin.line,
            column: origin.column,
        })
    }

    /// Find where an original position ended up in the generated text
    ///
    /// Considers mappings from `source` on the given original line and picks
    /// the one with the greatest original column at or before `column`,
    /// falling back to the first mapping on that line.
    pub fn generated_position_for(&self, source: &str, line: u32, column: u32) -> Option<Position> {
        let source_index = self.sources.iter().position(|s| s == source)?;

        let mut best: Option<(u32, Position)> = None;
        let mut first_on_line: Option<(u32, Position)> = None;

        for (idx, segments) in self.lines.iter().enumerate() {
            for segment in segments {
                let Some(origin) = segment.original else {
                    continue;
                };
                if origin.source != source_index || origin.line != line {
                    continue;
                }

                let generated = Position::new(idx as u32 + 1, segment.generated_column);
                if origin.column <= column && best.is_none_or(|(c, _)| origin.column > c) {
                    best = Some((origin.column, generated));
                }
                if first_on_line.is_none_or(|(c, _)| origin.column < c) {
                    first_on_line = Some((origin.column, generated));
                }
            }
        }

        best.or(first_on_line).map(|(_, generated)| generated)
    }

    /// Iterate over every mapped segment as (generated, original) pairs
    pub fn mappings(&self) -> impl Iterator<Item = (Position, OriginalPosition)> + '_ {
        self.lines.iter().enumerate().flat_map(move |(idx, segments)| {
            segments.iter().filter_map(move |segment| {
                let origin = segment.original?;
                Some((
                    Position::new(idx as u32 + 1, segment.generated_column),
                    OriginalPosition {
                        source: self.sources[origin.source].clone(),
                        line: origin.line,
                        column: origin.column,
                    },
                ))
            })
        })
    }
}

fn join_source_root(root: &str, source: &str) -> String {
    if root.is_empty() || source.starts_with('/') || source.contains("://") {
        source.to_string()
    } else if root.ends_with('/') {
        format!("{}{}", root, source)
    } else {
        format!("{}/{}", root, source)
    }
}

fn decode_mappings(mappings: &str, source_count: usize) -> Result<Vec<Vec<Segment>>, SourceMapError> {
    let mut lines = Vec::new();

    // Everything but the generated column is delta-encoded across lines
    let mut source: i64 = 0;
    let mut original_line: i64 = 0;
    let mut original_column: i64 = 0;
    let mut name: i64 = 0;

    for line in mappings.split(';') {
        let mut generated_column: i64 = 0;
        let mut segments = Vec::new();

        for text in line.split(',').filter(|s| !s.is_empty()) {
            let fields = vlq::decode_segment(text)?;

            generated_column = apply_delta(generated_column, fields[0], "generated column")?;

            let original = match fields.len() {
                1 => None,
                4 | 5 => {
                    source = apply_delta(source, fields[1], "source index")?;
                    original_line = apply_delta(original_line, fields[2], "original line")?;
                    original_column = apply_delta(original_column, fields[3], "original column")?;
                    if let Some(&delta) = fields.get(4) {
                        name = apply_delta(name, delta, "name index")?;
                    }

                    let source_index = usize::try_from(source)
                        .ok()
                        .filter(|&index| index < source_count)
                        .ok_or(SourceMapError::SourceIndexOutOfRange {
                            index: source,
                            count: source_count,
                        })?;

                    Some(SegmentOrigin {
                        source: source_index,
                        // Lines are 0-based on the wire
                        line: to_u32(original_line, "original line")?
                            .checked_add(1)
                            .ok_or(SourceMapError::OutOfRange("original line"))?,
                        column: to_u32(original_column, "original column")?,
                    })
                }
                count => return Err(SourceMapError::InvalidSegment(count)),
            };

            segments.push(Segment {
                generated_column: to_u32(generated_column, "generated column")?,
                original,
            });
        }

        segments.sort_by_key(|s| s.generated_column);
        lines.push(segments);
    }

    Ok(lines)
}

/// Add a decoded delta to a running value, rejecting overflow and
/// negative results
fn apply_delta(value: i64, delta: i64, what: &'static str) -> Result<i64, SourceMapError> {
    let value = value.checked_add(delta).ok_or(SourceMapError::OutOfRange(what))?;
    if value < 0 {
        return Err(SourceMapError::Negative(what));
    }
    Ok(value)
}

fn to_u32(value: i64, what: &'static str) -> Result<u32, SourceMapError> {
    u32::try_from(value).map_err(|_| SourceMapError::OutOfRange(what))
}
