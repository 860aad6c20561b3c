//! Rule-level stylesheet scanning.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! The scanner does not understand declarations or selectors. It only finds
//! where each top-level rule starts and ends, which is all block splitting
//! needs:
//!
//! ```text
//! /* comment */                  -> Comment
//! .btn { color: red }            -> Style
//! @import "base.css";            -> AtRule { name: "import" }
//! @media print { .btn { } }      -> Media { children: [Style] }
//! ```
//!
//! Strings, comments, escapes and nested blocks are skipped when looking for
//! the end of a rule, so braces inside `content: "}"` do not confuse it.

use cssplit_source_map::LineIndex;

use crate::error::ParseDiagnostic;
use crate::rule::{Rule, RuleKind, Stylesheet};

/// Result of parsing a stylesheet
///
/// A stylesheet is always produced; `diagnostics` lists every problem the
/// scanner recovered from, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutput {
    pub stylesheet: Stylesheet,
    pub diagnostics: Vec<ParseDiagnostic>,
}

impl ParseOutput {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Anything that can turn stylesheet text into a rule stream
pub trait StylesheetParser {
    fn parse(&self, text: &str) -> ParseOutput;
}

/// The built-in rule-level scanner
#[derive(Debug, Clone, Copy, Default)]
pub struct CssParser;

impl StylesheetParser for CssParser {
    fn parse(&self, text: &str) -> ParseOutput {
        parse_stylesheet(text)
    }
}

/// Parse `text` into its top-level rules
///
/// # Example
///
/// ```
/// use cssplit_css::{RuleKind, parse_stylesheet};
///
/// let output = parse_stylesheet("/*! start:a.css */.x{color:red}");
/// assert!(output.is_clean());
/// assert_eq!(output.stylesheet.rules.len(), 2);
/// assert_eq!(output.stylesheet.rules[1].kind, RuleKind::Style);
/// ```
pub fn parse_stylesheet(text: &str) -> ParseOutput {
    let mut scanner = Scanner::new(text);
    let start = if text.starts_with('\u{FEFF}') { '\u{FEFF}'.len_utf8() } else { 0 };
    let rules = scanner.parse_rules(start, text.len());

    let index = LineIndex::new(text);
    let diagnostics = scanner
        .problems
        .into_iter()
        .map(|(offset, reason)| {
            let position = index.position_at(offset).unwrap_or_default();
            ParseDiagnostic {
                reason,
                offset,
                line: position.line,
                column: position.column,
            }
        })
        .collect();

    ParseOutput {
        stylesheet: Stylesheet { rules },
        diagnostics,
    }
}

/// Where a forward scan stopped
enum Stop {
    At(usize, u8),
    Limit,
}

struct Scanner<'a> {
    text: &'a str,
    bytes: &'a [u8],
    /// (offset, reason) pairs, converted to diagnostics at the end
    problems: Vec<(usize, String)>,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Scanner {
            text,
            bytes: text.as_bytes(),
            problems: Vec::new(),
        }
    }

    fn problem(&mut self, offset: usize, reason: impl Into<String>) {
        self.problems.push((offset, reason.into()));
    }

    fn parse_rules(&mut self, mut pos: usize, limit: usize) -> Vec<Rule> {
        let mut rules = Vec::new();

        loop {
            pos = self.skip_whitespace(pos, limit);
            if pos >= limit {
                break;
            }

            match self.bytes[pos] {
                b'/' if self.bytes.get(pos + 1) == Some(&b'*') && pos + 1 < limit => {
                    let (rule, next) = self.comment(pos, limit);
                    rules.push(rule);
                    pos = next;
                }
                b'}' => {
                    self.problem(pos, "unexpected '}'");
                    pos += 1;
                }
                b'@' => {
                    let (rule, next) = self.at_rule(pos, limit);
                    rules.extend(rule);
                    pos = next;
                }
                _ => {
                    let (rule, next) = self.style_rule(pos, limit);
                    rules.extend(rule);
                    pos = next;
                }
            }
        }

        rules
    }

    fn comment(&mut self, start: usize, limit: usize) -> (Rule, usize) {
        let body_start = start + 2;
        match self.text[body_start..limit].find("*/") {
            Some(idx) => {
                let body_end = body_start + idx;
                let end = body_end + 2;
                let text = self.text[body_start..body_end].to_string();
                (Rule::new(RuleKind::Comment { text }, start..end), end)
            }
            None => {
                self.problem(start, "missing '*/' at end of comment");
                let text = self.text[body_start..limit].to_string();
                (Rule::new(RuleKind::Comment { text }, start..limit), limit)
            }
        }
    }

    fn at_rule(&mut self, start: usize, limit: usize) -> (Option<Rule>, usize) {
        let name_start = start + 1;
        let name_end = self.bytes[name_start..limit]
            .iter()
            .position(|&b| !(b.is_ascii_alphanumeric() || b == b'-' || b == b'_'))
            .map_or(limit, |idx| name_start + idx);
        let name = self.text[name_start..name_end].to_string();

        if name.is_empty() {
            self.problem(start, "missing at-rule name after '@'");
        }

        match self.scan_until(name_end, limit, &[b';', b'{', b'}']) {
            Stop::At(idx, b';') => (
                Some(Rule::new(RuleKind::AtRule { name }, start..idx + 1)),
                idx + 1,
            ),
            Stop::At(idx, b'{') => {
                let Some(close) = self.block_end(idx, limit) else {
                    self.problem(start, format!("missing '}}' to close '@{}'", name));
                    return (Some(Rule::new(RuleKind::AtRule { name }, start..limit)), limit);
                };

                let kind = if name.eq_ignore_ascii_case("media") {
                    RuleKind::Media {
                        children: self.parse_rules(idx + 1, close),
                    }
                } else {
                    RuleKind::AtRule { name }
                };
                (Some(Rule::new(kind, start..close + 1)), close + 1)
            }
            // A statement at-rule may end without ';' at the end of its
            // enclosing block or the stylesheet
            Stop::At(idx, _) => {
                let end = self.trim_end(start, idx);
                (Some(Rule::new(RuleKind::AtRule { name }, start..end)), idx)
            }
            Stop::Limit => {
                let end = self.trim_end(start, limit);
                (Some(Rule::new(RuleKind::AtRule { name }, start..end)), limit)
            }
        }
    }

    fn style_rule(&mut self, start: usize, limit: usize) -> (Option<Rule>, usize) {
        match self.scan_until(start, limit, &[b'{', b';', b'}']) {
            Stop::At(idx, b'{') => {
                if self.text[start..idx].trim().is_empty() {
                    self.problem(start, "selector missing");
                }
                match self.block_end(idx, limit) {
                    Some(close) => (Some(Rule::new(RuleKind::Style, start..close + 1)), close + 1),
                    None => {
                        self.problem(start, "missing '}' to close rule");
                        (Some(Rule::new(RuleKind::Style, start..limit)), limit)
                    }
                }
            }
            Stop::At(idx, b';') => {
                self.problem(start, "missing '{' after selector");
                (None, idx + 1)
            }
            Stop::At(idx, _) => {
                // Leave the '}' for the caller to report
                self.problem(start, "missing '{' after selector");
                (None, idx)
            }
            Stop::Limit => {
                self.problem(start, "missing '{' after selector");
                (None, limit)
            }
        }
    }

    fn skip_whitespace(&self, mut pos: usize, limit: usize) -> usize {
        while pos < limit && matches!(self.bytes[pos], b' ' | b'\t' | b'\n' | b'\r' | b'\x0C') {
            pos += 1;
        }
        pos
    }

    fn trim_end(&self, start: usize, end: usize) -> usize {
        start + self.text[start..end].trim_end().len()
    }

    /// Find the first byte in `stops` outside strings, comments, escapes
    /// and parentheses
    fn scan_until(&self, mut pos: usize, limit: usize, stops: &[u8]) -> Stop {
        let mut parens = 0usize;

        while pos < limit {
            let byte = self.bytes[pos];
            match byte {
                b'"' | b'\'' => {
                    pos = self.skip_string(pos, limit);
                    continue;
                }
                b'/' if self.bytes.get(pos + 1) == Some(&b'*') => {
                    match self.text[pos + 2..limit].find("*/") {
                        Some(idx) => pos += 2 + idx + 2,
                        None => return Stop::Limit,
                    }
                    continue;
                }
                b'\\' => {
                    pos += 2;
                    continue;
                }
                b'(' => parens += 1,
                b')' => parens = parens.saturating_sub(1),
                _ if parens == 0 && stops.contains(&byte) => return Stop::At(pos, byte),
                _ => {}
            }
            pos += 1;
        }

        Stop::Limit
    }

    /// Find the '}' matching the '{' at `open`
    fn block_end(&self, open: usize, limit: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut pos = open;

        while pos < limit {
            match self.bytes[pos] {
                b'"' | b'\'' => {
                    pos = self.skip_string(pos, limit);
                    continue;
                }
                b'/' if self.bytes.get(pos + 1) == Some(&b'*') => {
                    let idx = self.text[pos + 2..limit].find("*/")?;
                    pos += 2 + idx + 2;
                    continue;
                }
                b'\\' => {
                    pos += 2;
                    continue;
                }
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(pos);
                    }
                }
                _ => {}
            }
            pos += 1;
        }

        None
    }

    /// Skip a quoted string starting at `start`; an unterminated string
    /// ends at the next newline
    fn skip_string(&self, start: usize, limit: usize) -> usize {
        let quote = self.bytes[start];
        let mut pos = start + 1;
        while pos < limit {
            match self.bytes[pos] {
                b'\\' => pos += 2,
                b'\n' => return pos,
                b if b == quote => return pos + 1,
                _ => pos += 1,
            }
        }
        limit
    }
}
