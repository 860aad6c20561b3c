//! Error types for stylesheet parsing.
//!
//! Copyright (c) 2025 Posit, PBC

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A problem found while scanning a stylesheet
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{reason} (line {line}, column {column})")]
pub struct ParseDiagnostic {
    pub reason: String,
    /// Byte offset the problem was detected at
    pub offset: usize,
    /// Line of `offset` (1-based)
    pub line: u32,
    /// Column of `offset` (0-based)
    pub column: u32,
}
