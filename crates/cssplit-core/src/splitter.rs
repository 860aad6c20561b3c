//! The forward pass that routes rules into blocks.
//!
//! Copyright (c) 2025 Posit, PBC

use cssplit_css::{Rule, StylesheetParser};
use cssplit_source_map::{LineIndex, OriginalPosition, SourceMap};
use tracing::{debug, warn};

use crate::block::Block;
use crate::config::SplitOptions;
use crate::delimiter::{CommentClass, classify_comment};
use crate::document::Document;
use crate::error::SplitIssue;
use crate::naming::file_name;
use crate::registry::BlockRegistry;

/// Blocks and issues of one pass, before serialization
#[derive(Debug)]
pub struct SplitRun<'d> {
    /// Every block in first-reference order, the document block first
    pub blocks: Vec<Block>,
    pub issues: Vec<SplitIssue>,
    /// The original map, when output maps are being generated
    pub map: Option<&'d SourceMap>,
}

/// Walk the top-level rules of `document`, appending each one to the
/// active block
///
/// Delimiter comments open and close blocks and are not copied. Stale map
/// pragmas are dropped. With a usable map every copied rule, and every
/// child of a copied `@media` rule, gets a mapping back to where the map
/// says it came from.
pub fn split_rules<'d, P>(document: &'d Document, parser: &P, options: &SplitOptions) -> SplitRun<'d>
where
    P: StylesheetParser + ?Sized,
{
    let text = document.text();
    let parsed = parser.parse(text);

    if let Some(diagnostic) = parsed.diagnostics.into_iter().next() {
        warn!(path = document.path(), %diagnostic, "stylesheet could not be parsed");
        return SplitRun {
            blocks: Vec::new(),
            issues: vec![SplitIssue::Parse { diagnostic }],
            map: None,
        };
    }

    let mut issues = Vec::new();
    let map = usable_map(document, options, &mut issues);
    let index = LineIndex::new(text);
    let mut registry = BlockRegistry::new(file_name(document.path()), options.reopen);

    for rule in &parsed.stylesheet.rules {
        if let Some(comment) = rule.comment() {
            match classify_comment(comment) {
                CommentClass::Start(name) => {
                    registry.open(name, rule.span.clone());
                    continue;
                }
                CommentClass::End(name) => {
                    if let Err(issue) = registry.close(name, rule.span.clone()) {
                        warn!(path = document.path(), %issue, "end delimiter ignored");
                        issues.push(issue);
                    }
                    continue;
                }
                CommentClass::StaleMapPragma => {
                    debug!(path = document.path(), "dropping stale source map pragma");
                    continue;
                }
                CommentClass::Content => {}
            }
        }

        let origins = map.map_or_else(Vec::new, |map| origins_for(rule, map, &index));
        registry.active_mut().append(rule.text(text), origins);
    }

    let (blocks, unclosed) = registry.finish();
    for issue in &unclosed {
        warn!(path = document.path(), %issue, "block still open at end of document");
    }
    issues.extend(unclosed);

    SplitRun { blocks, issues, map }
}

/// The document's map, if output maps should and can be generated
fn usable_map<'d>(
    document: &'d Document,
    options: &SplitOptions,
    issues: &mut Vec<SplitIssue>,
) -> Option<&'d SourceMap> {
    if !options.source_maps {
        return None;
    }

    let reason = match document.map_state()? {
        Ok(map) if !map.is_empty() => return Some(map),
        Ok(_) => "source map has no mappings".to_string(),
        Err(err) => err.to_string(),
    };

    warn!(path = document.path(), %reason, "continuing without source maps");
    issues.push(SplitIssue::InvalidSourceMap { reason });
    None
}

/// Original positions of `rule` and its direct children, keyed by their
/// offset relative to the start of `rule`
///
/// Positions the map has no mapping for are left out.
fn origins_for(rule: &Rule, map: &SourceMap, index: &LineIndex) -> Vec<(usize, OriginalPosition)> {
    std::iter::once(rule)
        .chain(rule.children())
        .filter_map(|part| {
            let generated = index.position_at(part.span.start)?;
            let original = map.original_position_for(generated)?;
            Some((part.span.start - rule.span.start, original))
        })
        .collect()
}
