//! Core diagnostic message types.
//!
//! This module defines the structures for representing diagnostic messages
//! (errors and warnings) following tidyverse-style guidelines.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// The kind of diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticKind {
    /// An error that prevents completion
    Error,
    /// A warning that doesn't prevent completion but indicates a problem
    Warning,
}

impl DiagnosticKind {
    fn label(self) -> &'static str {
        match self {
            DiagnosticKind::Error => "Error",
            DiagnosticKind::Warning => "Warning",
        }
    }
}

/// How detail items should be presented (tidyverse x/i bullet style).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailKind {
    /// Error detail (✖ bullet)
    Error,
    /// Info detail (ℹ bullet)
    Info,
}

impl DetailKind {
    fn bullet(self) -> &'static str {
        match self {
            DetailKind::Error => "✖",
            DetailKind::Info => "ℹ",
        }
    }
}

/// A byte range inside a named file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub path: String,
    pub range: Range<usize>,
}

impl SourceLocation {
    pub fn new(path: impl Into<String>, range: Range<usize>) -> Self {
        SourceLocation {
            path: path.into(),
            range,
        }
    }
}

/// A detail item in a diagnostic message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailItem {
    pub kind: DetailKind,
    pub content: String,
}

/// A diagnostic message following tidyverse-style structure.
///
/// Structure:
/// 1. **Code**: Optional error code (e.g., "CS-2-1") for searchability
/// 2. **Title**: Brief error message
/// 3. **Kind**: Error or Warning
/// 4. **Problem**: What went wrong (the "must" or "can't" statement)
/// 5. **Details**: Specific information (bulleted)
/// 6. **Hints**: Optional guidance for fixing (ends with ?)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    pub title: String,

    pub kind: DiagnosticKind,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<DetailItem>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<String>,

    /// Where in the input the issue occurred
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
}

impl DiagnosticMessage {
    /// Create a new diagnostic message with just a title and kind.
    pub fn new(kind: DiagnosticKind, title: impl Into<String>) -> Self {
        Self {
            code: None,
            title: title.into(),
            kind,
            problem: None,
            details: Vec::new(),
            hints: Vec::new(),
            location: None,
        }
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Error, title)
    }

    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Warning, title)
    }

    /// Set the error code.
    ///
    /// Error codes follow the format `CS-<subsystem>-<number>`.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_problem(mut self, problem: impl Into<String>) -> Self {
        self.problem = Some(problem.into());
        self
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Add an error detail (✖ bullet)
    pub fn add_detail(self, content: impl Into<String>) -> Self {
        self.add_detail_item(DetailKind::Error, content)
    }

    /// Add an info detail (ℹ bullet)
    pub fn add_info(self, content: impl Into<String>) -> Self {
        self.add_detail_item(DetailKind::Info, content)
    }

    pub fn add_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    fn add_detail_item(mut self, kind: DetailKind, content: impl Into<String>) -> Self {
        self.details.push(DetailItem {
            kind,
            content: content.into(),
        });
        self
    }

    pub fn is_error(&self) -> bool {
        self.kind == DiagnosticKind::Error
    }

    /// Render this diagnostic message as text following tidyverse style.
    ///
    /// Format:
    /// ```text
    /// Error [CS-2-1]: title
    /// Problem statement here
    /// ✖ Error detail
    /// ℹ Info detail
    /// ? Hint
    /// ```
    ///
    /// When the message has a location and `source` holds the content of
    /// the located file, a source snippet rendered with ariadne replaces the
    /// title and problem.
    ///
    /// # Example
    ///
    /// ```
    /// use cssplit_error_reporting::DiagnosticMessage;
    ///
    /// let msg = DiagnosticMessage::error("Invalid input")
    ///     .with_problem("Values must be numeric")
    ///     .add_detail("Found text in column 3")
    ///     .add_hint("Convert to numbers first?");
    /// let text = msg.to_text(None);
    /// assert!(text.contains("Error: Invalid input"));
    /// assert!(text.contains("Values must be numeric"));
    /// ```
    pub fn to_text(&self, source: Option<&str>) -> String {
        let mut lines = Vec::new();

        let snippet = match (&self.location, source) {
            (Some(location), Some(content)) => self.render_ariadne_source_context(location, content),
            _ => None,
        };

        match &snippet {
            Some(snippet) => lines.push(snippet.trim_end().to_string()),
            None => {
                match &self.code {
                    Some(code) => lines.push(format!("{} [{}]: {}", self.kind.label(), code, self.title)),
                    None => lines.push(format!("{}: {}", self.kind.label(), self.title)),
                }
                if let Some(problem) = &self.problem {
                    lines.push(problem.clone());
                }
            }
        }

        for detail in &self.details {
            lines.push(format!("{} {}", detail.kind.bullet(), detail.content));
        }

        for hint in &self.hints {
            lines.push(format!("? {}", hint));
        }

        lines.join("\n")
    }

    /// Render this diagnostic message as a JSON value.
    ///
    /// # Example
    ///
    /// ```
    /// use cssplit_error_reporting::DiagnosticMessage;
    ///
    /// let msg = DiagnosticMessage::error("Something went wrong");
    /// let json = msg.to_json();
    /// assert_eq!(json["kind"], "error");
    /// assert_eq!(json["title"], "Something went wrong");
    /// ```
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|e| {
            serde_json::json!({
                "kind": "error",
                "code": "CS-0-1",
                "title": format!("Failed to serialize diagnostic: {}", e),
            })
        })
    }

    /// Render source context using ariadne (private helper for to_text).
    fn render_ariadne_source_context(&self, location: &SourceLocation, content: &str) -> Option<String> {
        use ariadne::{Color, Config, Label, Report, ReportKind, Source};

        // ariadne spans count characters, not bytes
        let mut main_span = char_span(content, &location.range)?;
        // A point location underlines the character after it
        if main_span.is_empty() {
            if main_span.start >= content.chars().count() {
                return None;
            }
            main_span.end += 1;
        }

        let (report_kind, main_color) = match self.kind {
            DiagnosticKind::Error => (ReportKind::Error, Color::Red),
            DiagnosticKind::Warning => (ReportKind::Warning, Color::Yellow),
        };

        let mut report = Report::build(report_kind, location.path.clone(), main_span.start)
            .with_config(Config::default().with_color(false));

        if let Some(code) = &self.code {
            report = report.with_message(format!("[{}] {}", code, self.title));
        } else {
            report = report.with_message(&self.title);
        }

        let main_message = self.problem.as_deref().unwrap_or(&self.title);
        report = report.with_label(
            Label::new((location.path.clone(), main_span))
                .with_message(main_message)
                .with_color(main_color),
        );

        let mut output = Vec::new();
        report
            .finish()
            .write((location.path.clone(), Source::from(content)), &mut output)
            .ok()?;

        String::from_utf8(output).ok()
    }
}

/// Convert a byte range into a character range, rejecting ranges that fall
/// outside `content` or inside a multi-byte character
fn char_span(content: &str, range: &Range<usize>) -> Option<Range<usize>> {
    if range.start > range.end
        || range.end > content.len()
        || !content.is_char_boundary(range.start)
        || !content.is_char_boundary(range.end)
    {
        return None;
    }
    let start = content[..range.start].chars().count();
    let end = start + content[range.start..range.end].chars().count();
    Some(start..end)
}
