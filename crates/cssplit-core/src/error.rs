//! Issues collected while splitting a document.
//!
//! Copyright (c) 2025 Posit, PBC

use std::ops::Range;

use cssplit_css::ParseDiagnostic;
use cssplit_error_reporting::{DiagnosticMessage, SourceLocation};
use thiserror::Error;

/// Something that went wrong during a split run
///
/// Issues never abort the run on their own. A [`SplitIssue::Parse`] means
/// the document produced no blocks; every other issue leaves the output
/// usable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitIssue {
    /// The stylesheet could not be parsed
    #[error("Failed to parse stylesheet: {diagnostic}")]
    Parse { diagnostic: ParseDiagnostic },

    /// An `end` delimiter did not name the active block
    #[error("Closing block mismatch: open={}, closing={closing}", .open.as_deref().unwrap_or("(none)"))]
    BlockMismatch {
        /// The active block, None when no delimited block is open
        open: Option<String>,
        closing: String,
        /// Span of the `end` comment
        span: Range<usize>,
    },

    /// A block was still open at the end of the document
    #[error("Block was not closed: {name}")]
    UnclosedBlock {
        name: String,
        /// Span of the `start` comment that opened it
        span: Range<usize>,
    },

    /// Two blocks resolved to the same output path; only the first is kept
    #[error("Output path collision: {path} is already written by {}", .kept.as_deref().unwrap_or("the document"))]
    OutputCollision {
        path: String,
        /// Identity name of the block that keeps the path, None for the
        /// document block
        kept: Option<String>,
        /// Identity name of the block that was dropped
        dropped: String,
    },

    /// The document's source map was unusable; output maps were skipped
    #[error("Invalid source map: {reason}")]
    InvalidSourceMap { reason: String },

    /// An output could not be produced
    #[error("Internal error: {reason}")]
    Internal { reason: String },
}

impl SplitIssue {
    /// Stable code from the error catalog
    pub fn code(&self) -> &'static str {
        match self {
            SplitIssue::Internal { .. } => "CS-0-1",
            SplitIssue::Parse { .. } => "CS-1-1",
            SplitIssue::BlockMismatch { .. } => "CS-2-1",
            SplitIssue::UnclosedBlock { .. } => "CS-2-2",
            SplitIssue::OutputCollision { .. } => "CS-2-3",
            SplitIssue::InvalidSourceMap { .. } => "CS-3-1",
        }
    }

    pub fn is_error(&self) -> bool {
        !matches!(self, SplitIssue::InvalidSourceMap { .. })
    }

    /// Whether the issue left the document without output
    pub fn is_fatal(&self) -> bool {
        matches!(self, SplitIssue::Parse { .. })
    }

    /// Convert to a diagnostic located in the document at `path`
    pub fn to_diagnostic(&self, path: &str) -> DiagnosticMessage {
        let code = self.code();
        let title = cssplit_error_reporting::get_error_info(code)
            .map_or("Error", |info| info.title.as_str());

        match self {
            SplitIssue::Parse { diagnostic } => DiagnosticMessage::error(title)
                .with_code(code)
                .with_problem(format!("`{}` is not a valid stylesheet", path))
                .with_location(SourceLocation::new(path, diagnostic.offset..diagnostic.offset))
                .add_detail(format!(
                    "{} at line {}, column {}",
                    diagnostic.reason, diagnostic.line, diagnostic.column
                ))
                .add_info("No blocks were written for this document"),

            SplitIssue::BlockMismatch { open, closing, span } => {
                let message = DiagnosticMessage::error(title)
                    .with_code(code)
                    .with_problem(format!("`end:{}` does not close the active block", closing))
                    .with_location(SourceLocation::new(path, span.clone()));
                match open {
                    Some(open) => message
                        .add_info(format!("The active block is `{}`", open))
                        .add_hint(format!("Did you mean `/*! end:{} */`?", open)),
                    None => message
                        .add_info("No block is open here")
                        .add_hint(format!("Is there a missing `/*! start:{} */`?", closing)),
                }
            }

            SplitIssue::UnclosedBlock { name, span } => DiagnosticMessage::error(title)
                .with_code(code)
                .with_problem(format!("`{}` was opened but never closed", name))
                .with_location(SourceLocation::new(path, span.clone()))
                .add_info("The block was still written with everything after its start")
                .add_hint(format!("Did you forget `/*! end:{} */`?", name)),

            SplitIssue::OutputCollision { path, kept, dropped } => {
                let owner = match kept {
                    Some(kept) => format!("block `{}`", kept),
                    None => "the document itself".to_string(),
                };
                DiagnosticMessage::error(title)
                    .with_code(code)
                    .with_problem(format!("`{}` and {} both resolve to `{}`", dropped, owner, path))
                    .add_info(format!("`{}` was not written", dropped))
                    .add_hint("Rename the block or use a `filename` template with [name]?")
            }

            SplitIssue::InvalidSourceMap { reason } => DiagnosticMessage::warning(title)
                .with_code(code)
                .with_problem(format!("The source map for `{}` could not be used", path))
                .add_detail(reason.clone())
                .add_info("Output was written without source maps"),

            SplitIssue::Internal { reason } => DiagnosticMessage::error(title)
                .with_code(code)
                .with_problem(reason.clone()),
        }
    }
}
