//! Error types for source map decoding.

use thiserror::Error;

/// Errors that can occur while reading or writing a source map
#[derive(Debug, Error)]
pub enum SourceMapError {
    /// The map is not valid JSON or is missing required fields
    #[error("invalid source map JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Only version 3 maps are understood
    #[error("unsupported source map version {0}, expected 3")]
    UnsupportedVersion(u32),

    /// A character outside the base64 alphabet appeared in `mappings`
    #[error("invalid base64 VLQ character {0:?} in mappings")]
    InvalidBase64(char),

    /// A VLQ value ended with its continuation bit set
    #[error("truncated VLQ value in mappings")]
    UnexpectedEnd,

    /// A VLQ value does not fit in 64 bits
    #[error("VLQ value overflows in mappings")]
    Overflow,

    /// A segment had a field count other than 1, 4 or 5
    #[error("mapping segment has {0} fields, expected 1, 4 or 5")]
    InvalidSegment(usize),

    /// A segment referenced a source that is not listed in `sources`
    #[error("mapping references source index {index} but only {count} sources are listed")]
    SourceIndexOutOfRange { index: i64, count: usize },

    /// Delta decoding produced a negative line, column or index
    #[error("mapping decodes to a negative {0}")]
    Negative(&'static str),

    /// Delta decoding produced a value too large to represent
    #[error("mapping decodes to an out-of-range {0}")]
    OutOfRange(&'static str),
}
