//! Split command implementation.
//!
//! Splits each input and writes every block it produces, plus a map per
//! block when the input has a `<input>.map` next to it.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use cssplit_core::{SplitOutcome, split_document};

use super::{OptionOverrides, OutputFormat, ensure_no_errors, read_document, report};

/// Arguments for the split command
#[derive(Debug)]
pub struct SplitArgs {
    pub inputs: Vec<PathBuf>,
    /// Write outputs here instead of next to each input
    pub out_dir: Option<PathBuf>,
    pub overrides: OptionOverrides,
    pub format: OutputFormat,
}

/// Execute the split command
pub fn execute(args: SplitArgs) -> Result<()> {
    let options = args.overrides.resolve()?;
    let mut outcomes = Vec::with_capacity(args.inputs.len());

    for input in &args.inputs {
        let output_path = match &args.out_dir {
            Some(dir) => {
                let name = input
                    .file_name()
                    .with_context(|| format!("Input {} has no file name", input.display()))?;
                dir.join(name)
            }
            None => input.clone(),
        };

        let document = read_document(input, &output_path)?;
        let outcome = split_document(&document, &options);
        write_outputs(&outcome)?;
        outcomes.push((outcome, document));
    }

    report(&outcomes, args.format, true)?;
    ensure_no_errors(&outcomes)
}

fn write_outputs(outcome: &SplitOutcome) -> Result<()> {
    let mut written = 0;
    for block in &outcome.blocks {
        for (path, contents) in block.artifacts() {
            let path = Path::new(&path);
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory {}", parent.display()))?;
            }
            fs::write(path, contents)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            written += 1;
        }
    }

    info!(
        input = %outcome.path,
        blocks = outcome.blocks.len(),
        files = written,
        "split stylesheet"
    );
    Ok(())
}
