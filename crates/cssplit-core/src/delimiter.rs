//! Recognition of block delimiter comments.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Blocks are marked with bang comments naming the output file:
//!
//! ```text
//! /*! start:print.css */
//! .page { margin: 0 }
//! /*! end:print.css */
//! ```
//!
//! Comments left behind by an earlier build step that point at a stale map
//! (`/*# sourceMappingURL=main.css.map */`) are recognized too, so they can
//! be dropped from the output.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches the body of a delimiter comment.
///
/// Captures the direction in group 1 and the block name in group 2. Names
/// are limited to ASCII word characters and `-`, and must end in `.css`.
static DELIMITER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^!\s?(start|end):([A-Za-z0-9_-]+\.css)\s?$").unwrap());

/// Matches the body of a source map pragma for a stylesheet.
static STALE_MAP_PRAGMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^# sourceMappingURL=[A-Za-z0-9_-]+\.css\.map").unwrap());

/// What a comment means to the splitter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentClass<'a> {
    /// `/*! start:<name> */`
    Start(&'a str),
    /// `/*! end:<name> */`
    End(&'a str),
    /// `/*# sourceMappingURL=<name>.css.map */`
    StaleMapPragma,
    /// Any other comment; it is copied to the output like a rule
    Content,
}

/// Classify a comment by its body (the text between `/*` and `*/`)
pub fn classify_comment(text: &str) -> CommentClass<'_> {
    if let Some(captures) = DELIMITER.captures(text) {
        let name = captures.get(2).map_or("", |m| m.as_str());
        return match captures.get(1).map(|m| m.as_str()) {
            Some("start") => CommentClass::Start(name),
            _ => CommentClass::End(name),
        };
    }

    if STALE_MAP_PRAGMA.is_match(text) {
        return CommentClass::StaleMapPragma;
    }

    CommentClass::Content
}
