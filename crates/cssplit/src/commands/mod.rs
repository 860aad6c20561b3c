//! Command implementations for the cssplit CLI
//!
//! Each command module handles the CLI interface and delegates to
//! cssplit-core for the actual splitting.

pub mod check;
pub mod split;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use tracing::debug;

use cssplit_core::{Document, FilenameTemplate, ReopenPolicy, SplitOptions, SplitOutcome};
use cssplit_error_reporting::DiagnosticMessage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReopenArg {
    Append,
    Separate,
}

impl From<ReopenArg> for ReopenPolicy {
    fn from(arg: ReopenArg) -> Self {
        match arg {
            ReopenArg::Append => ReopenPolicy::Append,
            ReopenArg::Separate => ReopenPolicy::Separate,
        }
    }
}

/// Options given on the command line; flags win over the config file
#[derive(Debug, Default)]
pub struct OptionOverrides {
    pub config: Option<PathBuf>,
    pub filename: Option<String>,
    pub no_source_maps: bool,
    pub reopen: Option<ReopenArg>,
}

impl OptionOverrides {
    pub fn resolve(&self) -> Result<SplitOptions> {
        let mut options = match &self.config {
            Some(path) => SplitOptions::load(path)?,
            None => SplitOptions::default(),
        };

        if let Some(filename) = &self.filename {
            options.filename = FilenameTemplate::new(filename.clone());
        }
        if self.no_source_maps {
            options.source_maps = false;
        }
        if let Some(reopen) = self.reopen {
            options.reopen = reopen.into();
        }

        options.validate()?;
        Ok(options)
    }
}

/// Read `input` and its `<input>.map`, if any
///
/// `output_path` becomes the document's path, so named blocks are placed
/// next to it.
pub fn read_document(input: &Path, output_path: &Path) -> Result<Document> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("Failed to read stylesheet {}", input.display()))?;
    let mut document = Document::new(path_string(output_path), text);

    let map_path = map_path_for(input);
    if map_path.is_file() {
        debug!(path = %map_path.display(), "reading source map");
        let map = fs::read_to_string(&map_path)
            .with_context(|| format!("Failed to read source map {}", map_path.display()))?;
        document = document.with_map_json(&map);
    }

    Ok(document)
}

pub fn map_path_for(input: &Path) -> PathBuf {
    let mut path = input.as_os_str().to_owned();
    path.push(".map");
    PathBuf::from(path)
}

/// Paths inside documents always use '/'
pub fn path_string(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[derive(Serialize)]
struct DocumentReport<'a> {
    path: &'a str,
    outputs: Vec<String>,
    diagnostics: Vec<DiagnosticMessage>,
}

/// Print the diagnostics of every outcome
///
/// Text goes to stderr with a source snippet where possible; JSON goes to
/// stdout as one array with an entry per document. `written` reports
/// whether outputs were written, so JSON can list them.
pub fn report(outcomes: &[(SplitOutcome, Document)], format: OutputFormat, written: bool) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for (outcome, document) in outcomes {
                for diagnostic in outcome.diagnostics() {
                    eprintln!("{}\n", diagnostic.to_text(Some(document.text())));
                }
            }
        }
        OutputFormat::Json => {
            let reports: Vec<DocumentReport> = outcomes
                .iter()
                .map(|(outcome, _)| DocumentReport {
                    path: &outcome.path,
                    outputs: if written {
                        outcome
                            .blocks
                            .iter()
                            .flat_map(|block| block.artifacts().into_iter().map(|(path, _)| path))
                            .collect()
                    } else {
                        Vec::new()
                    },
                    diagnostics: outcome.diagnostics(),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
    }
    Ok(())
}

/// Fail when any document had an error diagnostic
pub fn ensure_no_errors(outcomes: &[(SplitOutcome, Document)]) -> Result<()> {
    let failed = outcomes.iter().filter(|(outcome, _)| outcome.has_errors()).count();
    if failed > 0 {
        anyhow::bail!(
            "{} of {} stylesheet(s) had errors",
            failed,
            outcomes.len()
        );
    }
    Ok(())
}
