//! Check command implementation.
//!
//! Runs the same split as `cssplit split` and reports its diagnostics, but
//! writes nothing.

use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use cssplit_core::split_document;

use super::{OptionOverrides, OutputFormat, ensure_no_errors, read_document, report};

/// Arguments for the check command
#[derive(Debug)]
pub struct CheckArgs {
    pub inputs: Vec<PathBuf>,
    pub overrides: OptionOverrides,
    pub format: OutputFormat,
}

/// Execute the check command
pub fn execute(args: CheckArgs) -> Result<()> {
    let options = args.overrides.resolve()?;
    let mut outcomes = Vec::with_capacity(args.inputs.len());

    for input in &args.inputs {
        let document = read_document(input, input)?;
        let outcome = split_document(&document, &options);
        info!(
            input = %outcome.path,
            blocks = outcome.blocks.len(),
            issues = outcome.issues.len(),
            "checked stylesheet"
        );
        outcomes.push((outcome, document));
    }

    report(&outcomes, args.format, false)?;
    ensure_no_errors(&outcomes)
}
