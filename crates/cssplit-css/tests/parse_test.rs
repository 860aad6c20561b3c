//! Copyright (c) 2025 Posit, PBC

use cssplit_css::{CssParser, RuleKind, StylesheetParser, parse_stylesheet};
use pretty_assertions::assert_eq;

#[test]
fn test_delimited_stylesheet_rule_stream() {
    let text = "/*! start:a.css */\n.a { color: red; }\n/*! end:a.css */\n.doc{}\n";
    let output = parse_stylesheet(text);
    assert!(output.is_clean());

    let texts: Vec<&str> = output.stylesheet.rules.iter().map(|r| r.text(text)).collect();
    assert_eq!(
        texts,
        vec![
            "/*! start:a.css */",
            ".a { color: red; }",
            "/*! end:a.css */",
            ".doc{}",
        ]
    );
}

#[test]
fn test_media_children_are_parsed() {
    let text = "@media (min-width: 10px) {\n  /*! start:m.css */\n  .m { x: y }\n  /*! end:m.css */\n}";
    let output = parse_stylesheet(text);
    assert!(output.is_clean());
    assert_eq!(output.stylesheet.rules.len(), 1);

    let media = &output.stylesheet.rules[0];
    assert!(matches!(media.kind, RuleKind::Media { .. }));
    assert_eq!(media.span, 0..text.len());

    let children: Vec<&str> = media.children().iter().map(|r| r.text(text)).collect();
    assert_eq!(
        children,
        vec!["/*! start:m.css */", ".m { x: y }", "/*! end:m.css */"]
    );
    assert_eq!(media.children()[0].comment(), Some("! start:m.css "));
}

#[test]
fn test_media_is_case_insensitive() {
    let text = "@MEDIA print{.a{}}";
    let output = parse_stylesheet(text);
    assert_eq!(output.stylesheet.rules[0].children().len(), 1);
}

#[test]
fn test_unclosed_comment_is_reported() {
    let output = parse_stylesheet(".a{}\n/* never closed");
    assert_eq!(output.stylesheet.rules.len(), 2);
    assert_eq!(output.diagnostics.len(), 1);

    let diagnostic = &output.diagnostics[0];
    assert_eq!(diagnostic.reason, "missing '*/' at end of comment");
    assert_eq!(diagnostic.offset, 5);
    assert_eq!((diagnostic.line, diagnostic.column), (2, 0));
    assert_eq!(
        diagnostic.to_string(),
        "missing '*/' at end of comment (line 2, column 0)"
    );
}

#[test]
fn test_unclosed_rule_is_reported() {
    let output = parse_stylesheet(".a { color: red;");
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].reason, "missing '}' to close rule");
}

#[test]
fn test_missing_selector_and_brace() {
    let output = parse_stylesheet("{color:red}");
    assert_eq!(output.diagnostics[0].reason, "selector missing");

    let output = parse_stylesheet("color: red;\n.b{}");
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].reason, "missing '{' after selector");
    assert_eq!(output.stylesheet.rules.len(), 1);
}

#[test]
fn test_missing_at_rule_name() {
    let output = parse_stylesheet("@ foo;");
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].reason, "missing at-rule name after '@'");
}

#[test]
fn test_parser_trait_matches_free_function() {
    let text = "@import 'x.css';\n.a{}/* c */";
    assert_eq!(CssParser.parse(text), parse_stylesheet(text));
}

#[test]
fn test_columns_count_utf16_units() {
    let text = ".é{}\n.😀{} }";
    let output = parse_stylesheet(text);
    assert_eq!(output.diagnostics.len(), 1);
    // "😀" is two UTF-16 code units
    assert_eq!((output.diagnostics[0].line, output.diagnostics[0].column), (2, 6));
}
