//! The rule stream produced by parsing a stylesheet.
//!
//! Copyright (c) 2025 Posit, PBC

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// What kind of syntactic unit a [`Rule`] is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RuleKind {
    /// A qualified rule such as `.btn { color: red }`
    Style,
    /// Any at-rule other than `@media`, with or without a block
    AtRule { name: String },
    /// An `@media` rule together with the rules nested inside it
    Media { children: Vec<Rule> },
    /// A comment; `text` excludes the `/*` and `*/` delimiters
    Comment { text: String },
}

/// One rule of a stylesheet and the byte range it occupies in the source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub kind: RuleKind,
    pub span: Range<usize>,
}

impl Rule {
    pub fn new(kind: RuleKind, span: Range<usize>) -> Self {
        Rule { kind, span }
    }

    /// The exact source text of this rule
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.clone()]
    }

    /// The comment body, for comment rules
    pub fn comment(&self) -> Option<&str> {
        match &self.kind {
            RuleKind::Comment { text } => Some(text),
            _ => None,
        }
    }

    /// Rules nested inside an `@media` block; empty for every other kind
    pub fn children(&self) -> &[Rule] {
        match &self.kind {
            RuleKind::Media { children } => children,
            _ => &[],
        }
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.kind, RuleKind::Comment { .. })
    }
}

/// The top-level rule sequence of a stylesheet, in source order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stylesheet {
    pub rules: Vec<Rule>,
}
