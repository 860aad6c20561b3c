//! Split configuration.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Options can be read from a TOML file:
//!
//! ```toml
//! filename = "[name].[contenthash].css"
//! source-maps = true
//! reopen = "append"
//!
//! [hash]
//! digest = "hex"
//! length = 20
//! ```
//!
//! Every key is optional.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::naming::{FilenameTemplate, HashOptions};
use crate::registry::ReopenPolicy;

/// Errors that can occur while loading split options
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config{}: {source}", .path.as_ref().map(|p| format!(" file {}", p.display())).unwrap_or_default())]
    Parse {
        path: Option<PathBuf>,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid config value for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Options for one split run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct SplitOptions {
    /// Naming pattern for named blocks
    pub filename: FilenameTemplate,
    /// Generate output maps when the document has a map
    pub source_maps: bool,
    /// What a second `start` of an already used name does
    pub reopen: ReopenPolicy,
    pub hash: HashOptions,
}

impl Default for SplitOptions {
    fn default() -> Self {
        SplitOptions {
            filename: FilenameTemplate::default(),
            source_maps: true,
            reopen: ReopenPolicy::default(),
            hash: HashOptions::default(),
        }
    }
}

impl SplitOptions {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let options: SplitOptions =
            toml::from_str(text).map_err(|source| ConfigError::Parse { path: None, source })?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let options: SplitOptions = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: Some(path.to_path_buf()),
            source,
        })?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let template = self.filename.as_str();
        if template.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "filename",
                reason: "template is empty".to_string(),
            });
        }
        if template.ends_with('/') {
            return Err(ConfigError::Invalid {
                key: "filename",
                reason: format!("`{}` names a directory, not a file", template),
            });
        }
        if !self.filename.uses_name() && !self.filename.uses_hash() {
            return Err(ConfigError::Invalid {
                key: "filename",
                reason: format!(
                    "`{}` has no [name] or [contenthash], so every block would get the same file",
                    template
                ),
            });
        }
        if self.hash.length == 0 {
            return Err(ConfigError::Invalid {
                key: "hash.length",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::HashDigest;

    #[test]
    fn test_empty_config_uses_defaults() {
        let options = SplitOptions::from_toml_str("").unwrap();
        assert_eq!(options, SplitOptions::default());
        assert_eq!(options.filename.as_str(), "[name].css");
        assert!(options.source_maps);
        assert_eq!(options.reopen, ReopenPolicy::Append);
        assert_eq!(options.hash.length, 20);
    }

    #[test]
    fn test_full_config() {
        let options = SplitOptions::from_toml_str(
            r#"
filename = "[name].[contenthash].css"
source-maps = false
reopen = "separate"

[hash]
digest = "base64"
length = 8
"#,
        )
        .unwrap();

        assert_eq!(options.filename.as_str(), "[name].[contenthash].css");
        assert!(!options.source_maps);
        assert_eq!(options.reopen, ReopenPolicy::Separate);
        assert_eq!(options.hash.digest, HashDigest::Base64);
        assert_eq!(options.hash.length, 8);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = SplitOptions::from_toml_str("sourcemaps = true").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { path: None, .. }));
    }

    #[test]
    fn test_invalid_values() {
        let err = SplitOptions::from_toml_str("filename = \"\"").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "filename", .. }));

        let err = SplitOptions::from_toml_str("filename = \"bundle.css\"").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "filename", .. }));
        assert!(SplitOptions::from_toml_str("filename = \"[contenthash].css\"").is_ok());

        let err = SplitOptions::from_toml_str("[hash]\nlength = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "hash.length", .. }));

        let err = SplitOptions::from_toml_str("reopen = \"merge\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = SplitOptions::load(Path::new("/nonexistent/cssplit.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/cssplit.toml"));
    }
}
