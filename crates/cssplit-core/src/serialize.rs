//! Turning blocks into output files.
//!
//! Copyright (c) 2025 Posit, PBC

use cssplit_source_map::{SourceMap, SourceMapError, SourceMapGenerator};
use serde::Serialize;

use crate::block::Block;
use crate::config::SplitOptions;
use crate::naming::{file_name, sibling_path};

/// The serialized form of one block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockOutput {
    /// Output name of the block; the document's file name for the
    /// document block
    pub name: String,
    /// Where the CSS is written
    pub path: String,
    /// The CSS to write, including the map pragma when there is a map
    pub css: String,
    /// Source map JSON, written to `<path>.map`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map: Option<String>,
}

impl BlockOutput {
    pub fn map_path(&self) -> String {
        format!("{}.map", self.path)
    }

    /// `(path, contents)` for every file this block produces
    pub fn artifacts(&self) -> Vec<(String, &str)> {
        let mut artifacts = vec![(self.path.clone(), self.css.as_str())];
        if let Some(map) = &self.map {
            artifacts.push((self.map_path(), map.as_str()));
        }
        artifacts
    }
}

/// Where `block` is written when split from the document at `document_path`
pub fn resolve_path(block: &Block, document_path: &str, options: &SplitOptions) -> String {
    if block.is_document() {
        return document_path.to_string();
    }
    let name = options
        .filename
        .apply(block.output_name(), block.text(), &options.hash);
    sibling_path(document_path, &name)
}

/// Serialize `block`, with a map when `original` is given
///
/// The map lists sources in the order the block first referenced them and
/// embeds whatever content `original` has for each of them.
pub fn render_block(
    block: &Block,
    document_path: &str,
    options: &SplitOptions,
    original: Option<&SourceMap>,
) -> Result<BlockOutput, SourceMapError> {
    let path = resolve_path(block, document_path, options);

    let Some(original) = original else {
        return Ok(BlockOutput {
            name: block.output_name().to_string(),
            css: format!("{}\n", block.text()),
            path,
            map: None,
        });
    };

    let mut generator = SourceMapGenerator::new(Some(path.clone()));
    for entry in block.mappings() {
        generator.add_mapping(entry.generated, &entry.original.source, entry.original.position());
    }
    for source in block.referenced_sources() {
        generator.set_source_content(source, original.source_content_for(source).map(str::to_string));
    }

    Ok(BlockOutput {
        name: block.output_name().to_string(),
        css: format!(
            "{}\n/*# sourceMappingURL={}.map*/\n",
            block.text(),
            file_name(&path)
        ),
        map: Some(generator.to_json_string()?),
        path,
    })
}
