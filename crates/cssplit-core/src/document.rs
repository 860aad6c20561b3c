//! Documents and the per-document split entry points.
//!
//! Copyright (c) 2025 Posit, PBC

use std::collections::HashMap;

use cssplit_css::{CssParser, StylesheetParser};
use cssplit_error_reporting::DiagnosticMessage;
use cssplit_source_map::{SourceMap, SourceMapError};
use tracing::{debug, warn};

use crate::block::Block;
use crate::config::SplitOptions;
use crate::error::SplitIssue;
use crate::serialize::{BlockOutput, render_block};
use crate::splitter::split_rules;

/// A stylesheet to split, with the map describing where it came from
#[derive(Debug)]
pub struct Document {
    path: String,
    text: String,
    /// Decoding failures are kept so the run can report them
    map: Option<Result<SourceMap, SourceMapError>>,
}

impl Document {
    /// `path` is where the document is written; named blocks are written
    /// next to it
    pub fn new(path: impl Into<String>, text: impl Into<String>) -> Self {
        Document {
            path: path.into(),
            text: text.into(),
            map: None,
        }
    }

    pub fn with_map(mut self, map: SourceMap) -> Self {
        self.map = Some(Ok(map));
        self
    }

    /// Attach a map from its JSON text
    ///
    /// A map that fails to decode does not fail here; splitting reports it
    /// as [`SplitIssue::InvalidSourceMap`] and continues without maps.
    pub fn with_map_json(mut self, json: &str) -> Self {
        self.map = Some(SourceMap::from_json(json));
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The decoded original map, if one was attached and decoded
    pub fn map(&self) -> Option<&SourceMap> {
        self.map.as_ref().and_then(|map| map.as_ref().ok())
    }

    pub(crate) fn map_state(&self) -> Option<&Result<SourceMap, SourceMapError>> {
        self.map.as_ref()
    }
}

/// Everything a split run produced for one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOutcome {
    pub path: String,
    /// One output per block, in first-reference order; the document's own
    /// block comes first
    pub blocks: Vec<BlockOutput>,
    pub issues: Vec<SplitIssue>,
}

impl SplitOutcome {
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(SplitIssue::is_error)
    }

    /// Find a block by its output name
    pub fn block(&self, name: &str) -> Option<&BlockOutput> {
        self.blocks.iter().find(|block| block.name == name)
    }

    pub fn diagnostics(&self) -> Vec<DiagnosticMessage> {
        self.issues
            .iter()
            .map(|issue| issue.to_diagnostic(&self.path))
            .collect()
    }
}

/// Split `document` with the built-in stylesheet scanner
///
/// # Example
///
/// ```
/// use cssplit_core::{Document, SplitOptions, split_document};
///
/// let document = Document::new(
///     "dist/main.css",
///     "/*! start:a.css */.x{color:red}/*! end:a.css */.y{color:blue}",
/// );
/// let outcome = split_document(&document, &SplitOptions::default());
///
/// assert!(outcome.issues.is_empty());
/// assert_eq!(outcome.blocks[0].css, ".y{color:blue}\n");
/// assert_eq!(outcome.blocks[1].path, "dist/a.css");
/// assert_eq!(outcome.blocks[1].css, ".x{color:red}\n");
/// ```
pub fn split_document(document: &Document, options: &SplitOptions) -> SplitOutcome {
    split_document_with(document, &CssParser, options)
}

/// Split `document`, using `parser` to find its rules
pub fn split_document_with<P>(document: &Document, parser: &P, options: &SplitOptions) -> SplitOutcome
where
    P: StylesheetParser + ?Sized,
{
    let run = split_rules(document, parser, options);
    let mut issues = run.issues;
    let mut blocks = Vec::with_capacity(run.blocks.len());
    // Output path -> the block that claimed it first
    let mut claimed: HashMap<String, &Block> = HashMap::new();

    for block in &run.blocks {
        match render_block(block, document.path(), options, run.map) {
            Ok(output) => match claimed.get(&output.path) {
                Some(owner) => {
                    warn!(path = %output.path, block = block.identity_name(), "output path collision");
                    issues.push(SplitIssue::OutputCollision {
                        kept: (!owner.is_document()).then(|| owner.identity_name().to_string()),
                        dropped: block.identity_name().to_string(),
                        path: output.path,
                    });
                }
                None => {
                    claimed.insert(output.path.clone(), block);
                    blocks.push(output);
                }
            },
            Err(err) => issues.push(SplitIssue::Internal {
                reason: format!(
                    "Failed to write the source map for `{}`: {}",
                    block.output_name(),
                    err
                ),
            }),
        }
    }

    debug!(
        path = document.path(),
        blocks = blocks.len(),
        issues = issues.len(),
        "split document"
    );

    SplitOutcome {
        path: document.path().to_string(),
        blocks,
        issues,
    }
}

/// Split each document on its own
///
/// Runs share nothing, so an error in one document never affects another.
pub fn split_batch<P>(documents: &[Document], parser: &P, options: &SplitOptions) -> Vec<SplitOutcome>
where
    P: StylesheetParser + ?Sized,
{
    documents
        .iter()
        .map(|document| split_document_with(document, parser, options))
        .collect()
}
