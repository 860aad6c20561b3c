//! Output file naming.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Named blocks are written next to the document they were split from,
//! under a name produced by a [`FilenameTemplate`]. Two placeholders are
//! understood:
//!
//! - `[name]`: the block name without its `.css` extension
//! - `[contenthash]`: a digest of the block's CSS, see [`content_hash`]

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub const NAME_PLACEHOLDER: &str = "[name]";
pub const HASH_PLACEHOLDER: &str = "[contenthash]";

/// How the content hash is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashDigest {
    #[default]
    Hex,
    /// URL-safe alphabet, no padding
    Base64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HashOptions {
    pub digest: HashDigest,
    /// Number of digest characters kept
    pub length: usize,
}

impl Default for HashOptions {
    fn default() -> Self {
        HashOptions {
            digest: HashDigest::Hex,
            length: 20,
        }
    }
}

/// SHA-256 of `contents`, rendered per `options` and truncated to
/// `options.length` characters
pub fn content_hash(contents: &str, options: &HashOptions) -> String {
    let digest = Sha256::digest(contents.as_bytes());
    let mut rendered = match options.digest {
        HashDigest::Hex => hex::encode(digest),
        HashDigest::Base64 => URL_SAFE_NO_PAD.encode(digest),
    };
    // Both alphabets are ASCII
    rendered.truncate(options.length.min(rendered.len()));
    rendered
}

/// A file name pattern for named blocks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilenameTemplate(String);

impl Default for FilenameTemplate {
    fn default() -> Self {
        FilenameTemplate("[name].css".to_string())
    }
}

impl fmt::Display for FilenameTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FilenameTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        FilenameTemplate(template.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn uses_name(&self) -> bool {
        self.0.contains(NAME_PLACEHOLDER)
    }

    pub fn uses_hash(&self) -> bool {
        self.0.contains(HASH_PLACEHOLDER)
    }

    /// Produce the file name for block `name` whose CSS is `contents`
    ///
    /// The hash is only computed when the template asks for it.
    ///
    /// # Example
    ///
    /// ```
    /// use cssplit_core::{FilenameTemplate, HashOptions};
    ///
    /// let template = FilenameTemplate::new("css/[name].min.css");
    /// assert_eq!(template.apply("print.css", "", &HashOptions::default()), "css/print.min.css");
    /// ```
    pub fn apply(&self, name: &str, contents: &str, hash: &HashOptions) -> String {
        let stem = name.strip_suffix(".css").unwrap_or(name);
        let output = self.0.replace(NAME_PLACEHOLDER, stem);

        if self.uses_hash() {
            output.replace(HASH_PLACEHOLDER, &content_hash(contents, hash))
        } else {
            output
        }
    }
}

/// Output path of a named block split from the document at `document_path`
pub fn sibling_path(document_path: &str, file_name: &str) -> String {
    match document_path.rfind('/') {
        Some(idx) => format!("{}/{}", &document_path[..idx], file_name),
        None => file_name.to_string(),
    }
}

/// The last path component of `path`
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
