//! Copyright (c) 2025 Posit, PBC
//!
//! End-to-end tests for splitting documents, with and without maps.

use cssplit_core::{
    Document, FilenameTemplate, HashDigest, HashOptions, ReopenPolicy, SplitIssue, SplitOptions,
    content_hash, split_batch, split_document,
};
use cssplit_css::{CssParser, parse_stylesheet};
use cssplit_source_map::{
    Position, SourceMap, SourceMapGenerator, offset_to_position, position_to_offset,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const NESTED: &str = "\
.doc{a:1}
/*! start:a.css */
.a1{b:2}
@media print{.m{c:3}}
/*! start:b.css */
.b1{d:4}
/*! end:b.css */
.a2{e:5}
/*! end:a.css */
/*# sourceMappingURL=main.css.map */
.doc2{f:6}
";

/// A map sending every rule and media child of `text` to its own line of a
/// pretend original; rules starting with `.b` come from `b.scss`
fn original_map(text: &str) -> SourceMap {
    let mut generator = SourceMapGenerator::new(Some("dist/main.css".into()));
    let mut line = 0;
    for rule in &parse_stylesheet(text).stylesheet.rules {
        if rule.is_comment() {
            continue;
        }
        for part in std::iter::once(rule).chain(rule.children()) {
            line += 1;
            let source = if part.text(text).starts_with(".b") { "b.scss" } else { "main.scss" };
            let generated = offset_to_position(text, part.span.start).unwrap();
            generator.add_mapping(generated, source, Position::new(line, 2));
        }
    }
    generator.set_source_content("main.scss", Some("// main".into()));
    generator.set_source_content("b.scss", Some("// b".into()));
    SourceMap::from_json(&generator.to_json_string().unwrap()).unwrap()
}

fn text_of(css: &str) -> &str {
    css.split("\n/*# sourceMappingURL=").next().unwrap().trim_end_matches('\n')
}

/// Text from `offset` up to and including the next '}'
fn up_to_brace(text: &str, offset: usize) -> &str {
    let rest = &text[offset..];
    &rest[..rest.find('}').map_or(rest.len(), |idx| idx + 1)]
}

#[test]
fn test_delimited_scenario_without_map() {
    let document = Document::new(
        "main.css",
        "/*! start:a.css */.x{color:red}/*! end:a.css */.y{color:blue}",
    );
    let outcome = split_document(&document, &SplitOptions::default());

    assert!(outcome.issues.is_empty());
    assert_eq!(outcome.blocks.len(), 2);
    assert_eq!(outcome.blocks[0].name, "main.css");
    assert_eq!(outcome.blocks[0].css, ".y{color:blue}\n");
    assert_eq!(outcome.blocks[0].map, None);
    assert_eq!(outcome.blocks[1].name, "a.css");
    assert_eq!(outcome.blocks[1].css, ".x{color:red}\n");
    assert!(outcome.blocks.iter().all(|b| !b.css.contains("/*!")));
}

#[test]
fn test_each_block_holds_only_its_rules() {
    let outcome = split_document(&Document::new("dist/main.css", NESTED), &SplitOptions::default());

    assert!(outcome.issues.is_empty());
    let blocks: Vec<(&str, &str, &str)> = outcome
        .blocks
        .iter()
        .map(|b| (b.name.as_str(), b.path.as_str(), b.css.as_str()))
        .collect();
    assert_eq!(
        blocks,
        vec![
            ("main.css", "dist/main.css", ".doc{a:1}.doc2{f:6}\n"),
            ("a.css", "dist/a.css", ".a1{b:2}@media print{.m{c:3}}.a2{e:5}\n"),
            ("b.css", "dist/b.css", ".b1{d:4}\n"),
        ]
    );
}

#[test]
fn test_blocks_rejoin_to_the_rule_text() {
    let outcome = split_document(&Document::new("main.css", NESTED), &SplitOptions::default());

    let mut from_blocks: Vec<String> = Vec::new();
    for block in &outcome.blocks {
        let reparsed = text_of(&block.css);
        from_blocks.extend(
            parse_stylesheet(reparsed)
                .stylesheet
                .rules
                .iter()
                .map(|r| r.text(reparsed).to_string()),
        );
    }
    from_blocks.sort();

    let mut from_document: Vec<String> = parse_stylesheet(NESTED)
        .stylesheet
        .rules
        .iter()
        .filter(|r| !r.is_comment())
        .map(|r| r.text(NESTED).to_string())
        .collect();
    from_document.sort();

    assert_eq!(from_blocks, from_document);
}

#[test]
fn test_mappings_round_trip_through_both_maps() {
    let input = original_map(NESTED);
    let document = Document::new("dist/main.css", NESTED).with_map(original_map(NESTED));
    let outcome = split_document(&document, &SplitOptions::default());
    assert!(outcome.issues.is_empty());

    let mut checked = 0;
    for block in &outcome.blocks {
        let output = SourceMap::from_json(block.map.as_deref().unwrap()).unwrap();
        assert_eq!(output.file(), Some(block.path.as_str()));

        for (generated, original) in output.mappings() {
            // Back to the original through the output map
            assert_eq!(
                output.generated_position_for(&original.source, original.line, original.column),
                Some(generated)
            );

            // The same text sits at both ends
            let in_document = input
                .generated_position_for(&original.source, original.line, original.column)
                .unwrap();
            assert_eq!(input.original_position_for(in_document), Some(original.clone()));

            let document_offset = position_to_offset(NESTED, in_document).unwrap();
            let block_offset = position_to_offset(&block.css, generated).unwrap();
            assert_eq!(
                up_to_brace(&block.css, block_offset),
                up_to_brace(NESTED, document_offset)
            );
            checked += 1;
        }
    }

    // Seven rules and media children in the document, each mapped once
    assert_eq!(checked, 7);
}

#[test]
fn test_repeated_rule_text_maps_each_occurrence() {
    let text = ".a{}\n/*! start:x.css */\n.a{}\n/*! end:x.css */\n.a{}\n.a{}\n";
    let document = Document::new("main.css", text).with_map(original_map(text));
    let outcome = split_document(&document, &SplitOptions::default());
    assert!(outcome.issues.is_empty());

    let main = outcome.block("main.css").unwrap();
    assert_eq!(text_of(&main.css), ".a{}.a{}.a{}");

    // Each copy maps from where it was appended, not where the text first
    // appears in the block
    let map = SourceMap::from_json(main.map.as_deref().unwrap()).unwrap();
    let mapped: Vec<(Position, Position)> = map
        .mappings()
        .map(|(generated, original)| (generated, original.position()))
        .collect();
    assert_eq!(
        mapped,
        vec![
            (Position::new(1, 0), Position::new(1, 2)),
            (Position::new(1, 4), Position::new(3, 2)),
            (Position::new(1, 8), Position::new(4, 2)),
        ]
    );

    let x = SourceMap::from_json(outcome.block("x.css").unwrap().map.as_deref().unwrap()).unwrap();
    let mapped: Vec<(Position, Position)> = x
        .mappings()
        .map(|(generated, original)| (generated, original.position()))
        .collect();
    assert_eq!(mapped, vec![(Position::new(1, 0), Position::new(2, 2))]);
}

#[test]
fn test_media_children_get_their_own_entries() {
    let document = Document::new("main.css", NESTED).with_map(original_map(NESTED));
    let outcome = split_document(&document, &SplitOptions::default());

    let block = outcome.block("a.css").unwrap();
    let map = SourceMap::from_json(block.map.as_deref().unwrap()).unwrap();
    let generated: Vec<Position> = map.mappings().map(|(generated, _)| generated).collect();

    // .a1, @media, .m inside the media rule, .a2
    assert_eq!(
        generated,
        vec![
            Position::new(1, 0),
            Position::new(1, 8),
            Position::new(1, 21),
            Position::new(1, 29),
        ]
    );
}

#[test]
fn test_output_maps_embed_only_referenced_sources() {
    let document = Document::new("main.css", NESTED).with_map(original_map(NESTED));
    let outcome = split_document(&document, &SplitOptions::default());

    let a = SourceMap::from_json(outcome.block("a.css").unwrap().map.as_deref().unwrap()).unwrap();
    assert_eq!(a.sources(), ["main.scss"]);
    assert_eq!(a.source_content_for("main.scss"), Some("// main"));

    let b = SourceMap::from_json(outcome.block("b.css").unwrap().map.as_deref().unwrap()).unwrap();
    assert_eq!(b.sources(), ["b.scss"]);
    assert_eq!(b.source_content_for("b.scss"), Some("// b"));

    assert_eq!(
        outcome.block("b.css").unwrap().css,
        ".b1{d:4}\n/*# sourceMappingURL=b.css.map*/\n"
    );
}

#[test]
fn test_unmatched_end_is_one_mismatch() {
    let document = Document::new(
        "main.css",
        "/*! start:a.css */.a{}/*! end:b.css */.x{}/*! end:a.css */.d{}",
    );
    let outcome = split_document(&document, &SplitOptions::default());

    assert_eq!(
        outcome.issues,
        vec![SplitIssue::BlockMismatch {
            open: Some("a.css".into()),
            closing: "b.css".into(),
            span: 22..38,
        }]
    );
    assert_eq!(outcome.block("main.css").unwrap().css, ".d{}\n");
    assert_eq!(outcome.block("a.css").unwrap().css, ".a{}.x{}\n");
    assert!(outcome.has_errors());
}

#[test]
fn test_end_without_open_block() {
    let outcome = split_document(
        &Document::new("main.css", "/*! end:a.css */.d{}"),
        &SplitOptions::default(),
    );

    assert_eq!(outcome.issues.len(), 1);
    assert!(matches!(
        &outcome.issues[0],
        SplitIssue::BlockMismatch { open: None, closing, .. } if closing == "a.css"
    ));
    assert_eq!(outcome.blocks.len(), 1);
    assert_eq!(outcome.blocks[0].css, ".d{}\n");
}

#[test]
fn test_unclosed_block_is_still_written() {
    let outcome = split_document(
        &Document::new("main.css", ".d{}/*! start:a.css */.a{}"),
        &SplitOptions::default(),
    );

    assert_eq!(
        outcome.issues,
        vec![SplitIssue::UnclosedBlock {
            name: "a.css".into(),
            span: 4..22,
        }]
    );
    assert_eq!(outcome.blocks.len(), 2);
    assert_eq!(outcome.blocks[0].css, ".d{}\n");
    assert_eq!(outcome.blocks[1].css, ".a{}\n");
}

#[test]
fn test_parse_error_produces_no_blocks() {
    let outcome = split_document(
        &Document::new("main.css", "/*! start:a.css */.a{"),
        &SplitOptions::default(),
    );

    assert!(outcome.blocks.is_empty());
    assert_eq!(outcome.issues.len(), 1);
    assert_eq!(outcome.issues[0].code(), "CS-1-1");
    assert!(outcome.has_errors());

    let diagnostics = outcome.diagnostics();
    assert_eq!(diagnostics[0].title, "Stylesheet Parse Error");
}

#[test]
fn test_undecodable_map_is_a_warning() {
    let document = Document::new("main.css", "/*! start:a.css */.a{}/*! end:a.css */")
        .with_map_json("{not json");
    let outcome = split_document(&document, &SplitOptions::default());

    assert_eq!(outcome.issues.len(), 1);
    assert!(matches!(outcome.issues[0], SplitIssue::InvalidSourceMap { .. }));
    assert!(!outcome.has_errors());
    assert!(outcome.blocks.iter().all(|b| b.map.is_none()));
    assert_eq!(outcome.block("a.css").unwrap().css, ".a{}\n");
}

#[test]
fn test_map_without_mappings_is_a_warning() {
    let document = Document::new("main.css", ".a{}")
        .with_map_json(r#"{"version":3,"sources":[],"names":[],"mappings":""}"#);
    let outcome = split_document(&document, &SplitOptions::default());

    assert_eq!(
        outcome.issues,
        vec![SplitIssue::InvalidSourceMap {
            reason: "source map has no mappings".into(),
        }]
    );
    assert_eq!(outcome.blocks[0].map, None);
}

#[test]
fn test_filename_template_with_content_hash() {
    let options = SplitOptions {
        filename: FilenameTemplate::new("[name].[contenthash].css"),
        hash: HashOptions {
            digest: HashDigest::Hex,
            length: 8,
        },
        ..SplitOptions::default()
    };
    let document = Document::new("dist/main.css", "/*! start:a.css */.a{}/*! end:a.css */")
        .with_map(original_map("/*! start:a.css */.a{}/*! end:a.css */"));
    let outcome = split_document(&document, &options);

    let hash = content_hash(".a{}", &options.hash);
    let block = outcome.block("a.css").unwrap();
    assert_eq!(block.path, format!("dist/a.{}.css", hash));
    assert_eq!(
        block.css,
        format!(".a{{}}\n/*# sourceMappingURL=a.{}.css.map*/\n", hash)
    );
    // The document keeps its own name
    assert_eq!(outcome.blocks[0].path, "dist/main.css");
}

#[test]
fn test_reopen_policies() {
    let text = "/*! start:a.css */.a{}/*! end:a.css */.b{}/*! start:a.css */.c{}/*! end:a.css */";

    let outcome = split_document(&Document::new("main.css", text), &SplitOptions::default());
    let names: Vec<&str> = outcome.blocks.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["main.css", "a.css"]);
    assert_eq!(outcome.block("a.css").unwrap().css, ".a{}.c{}\n");

    let options = SplitOptions {
        reopen: ReopenPolicy::Separate,
        ..SplitOptions::default()
    };
    let outcome = split_document(&Document::new("main.css", text), &options);
    let names: Vec<&str> = outcome.blocks.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["main.css", "a.css", "a-2.css"]);
    assert_eq!(outcome.block("a.css").unwrap().css, ".a{}\n");
    assert_eq!(outcome.block("a-2.css").unwrap().css, ".c{}\n");
    assert!(outcome.issues.is_empty());
}

#[test]
fn test_numbered_occurrence_never_overwrites_declared_block() {
    let text = "/*! start:a.css */.x{}/*! end:a.css */\
                /*! start:a.css */.y{}/*! end:a.css */\
                /*! start:a-2.css */.z{}/*! end:a-2.css */";
    let options = SplitOptions {
        reopen: ReopenPolicy::Separate,
        ..SplitOptions::default()
    };
    let outcome = split_document(&Document::new("dist/main.css", text), &options);

    let written: Vec<(&str, &str)> = outcome
        .blocks
        .iter()
        .map(|b| (b.path.as_str(), b.css.as_str()))
        .collect();
    assert_eq!(
        written,
        vec![
            ("dist/main.css", "\n"),
            ("dist/a.css", ".x{}\n"),
            ("dist/a-2.css", ".y{}\n"),
        ]
    );
    assert_eq!(
        outcome.issues,
        vec![SplitIssue::OutputCollision {
            path: "dist/a-2.css".into(),
            kept: Some("a.css".into()),
            dropped: "a-2.css".into(),
        }]
    );
    assert!(outcome.has_errors());
}

#[test]
fn test_block_named_after_the_document_is_reported() {
    let document = Document::new("dist/main.css", ".d{}/*! start:main.css */.x{}/*! end:main.css */");
    let outcome = split_document(&document, &SplitOptions::default());

    assert_eq!(outcome.blocks.len(), 1);
    assert_eq!(outcome.blocks[0].path, "dist/main.css");
    assert_eq!(outcome.blocks[0].css, ".d{}\n");
    assert_eq!(
        outcome.issues,
        vec![SplitIssue::OutputCollision {
            path: "dist/main.css".into(),
            kept: None,
            dropped: "main.css".into(),
        }]
    );
}

#[test]
fn test_identical_content_with_hash_only_template() {
    let options = SplitOptions {
        filename: FilenameTemplate::new("[contenthash].css"),
        ..SplitOptions::default()
    };
    let text = "/*! start:a.css */.a{}/*! end:a.css *//*! start:b.css */.a{}/*! end:b.css */";
    let outcome = split_document(&Document::new("main.css", text), &options);

    assert_eq!(outcome.blocks.len(), 2);
    assert_eq!(outcome.issues.len(), 1);
    assert!(matches!(
        &outcome.issues[0],
        SplitIssue::OutputCollision { kept: Some(kept), dropped, .. } if kept == "a.css" && dropped == "b.css"
    ));
}

#[test]
fn test_batch_documents_are_independent() {
    let documents = vec![
        Document::new("broken.css", "/*! start:a.css */"),
        Document::new("ok.css", "/*! start:a.css */.a{}/*! end:a.css */"),
    ];
    let outcomes = split_batch(&documents, &CssParser, &SplitOptions::default());

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes[0].has_errors());
    assert!(outcomes[1].issues.is_empty());
    assert_eq!(outcomes[1].path, "ok.css");
    assert_eq!(outcomes[1].block("a.css").unwrap().css, ".a{}\n");
}

fn render(segments: &[(Option<usize>, Vec<u32>)]) -> String {
    let mut text = String::new();
    for (name, rules) in segments {
        if let Some(name) = name {
            text.push_str(&format!("/*! start:n{}.css */\n", name));
        }
        for rule in rules {
            text.push_str(&format!(".r{}{{x:{}}}\n", rule, rule));
        }
        if let Some(name) = name {
            text.push_str(&format!("/*! end:n{}.css */\n", name));
        }
    }
    text
}

proptest! {
    #[test]
    fn matched_pairs_route_rules_and_resplit_cleanly(
        segments in proptest::collection::vec(
            (proptest::option::of(0usize..3), proptest::collection::vec(0u32..50, 0..4)),
            0..8,
        )
    ) {
        let text = render(&segments);
        let outcome = split_document(&Document::new("main.css", text), &SplitOptions::default());
        prop_assert!(outcome.issues.is_empty());

        let expected = |wanted: Option<usize>| -> String {
            segments
                .iter()
                .filter(|(name, _)| *name == wanted)
                .flat_map(|(_, rules)| rules.iter().map(|r| format!(".r{}{{x:{}}}", r, r)))
                .collect()
        };

        prop_assert_eq!(&outcome.blocks[0].css, &format!("{}\n", expected(None)));
        for block in &outcome.blocks[1..] {
            let index: usize = block.name[1..2].parse().unwrap();
            prop_assert_eq!(&block.css, &format!("{}\n", expected(Some(index))));
        }

        let distinct: std::collections::HashSet<usize> =
            segments.iter().filter_map(|(name, _)| *name).collect();
        prop_assert_eq!(outcome.blocks.len(), distinct.len() + 1);

        // A block's output splits into itself
        for block in &outcome.blocks {
            let again = split_document(&Document::new("x.css", block.css.clone()), &SplitOptions::default());
            prop_assert!(again.issues.is_empty());
            prop_assert_eq!(again.blocks.len(), 1);
            prop_assert_eq!(&again.blocks[0].css, &format!("{}\n", block.css.trim_end_matches('\n')));
        }
    }
}
