//! cssplit CLI - Main entry point

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{OutputFormat, ReopenArg};

#[derive(Parser)]
#[command(name = "cssplit")]
#[command(version)]
#[command(about = "Split stylesheets into the files their delimiter comments name", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split stylesheets and write every block, with source maps when
    /// `<INPUT>.map` exists
    Split {
        /// Stylesheets to split
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Write outputs to DIR instead of next to each input
        #[arg(short = 'o', long)]
        out_dir: Option<PathBuf>,

        /// TOML file with split options
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,

        /// File name template for blocks ([name], [contenthash])
        #[arg(long)]
        filename: Option<String>,

        /// Do not generate source maps
        #[arg(long)]
        no_source_maps: bool,

        /// What a repeated start delimiter does
        #[arg(long, value_enum)]
        reopen: Option<ReopenArg>,

        /// Diagnostic output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Report delimiter and source map problems without writing anything
    Check {
        /// Stylesheets to check
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// TOML file with split options
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,

        /// Diagnostic output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr so JSON reports on stdout stay parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cssplit=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Split {
            inputs,
            out_dir,
            config,
            filename,
            no_source_maps,
            reopen,
            format,
        } => commands::split::execute(commands::split::SplitArgs {
            inputs,
            out_dir,
            overrides: commands::OptionOverrides {
                config,
                filename,
                no_source_maps,
                reopen,
            },
            format,
        }),
        Commands::Check {
            inputs,
            config,
            format,
        } => commands::check::execute(commands::check::CheckArgs {
            inputs,
            overrides: commands::OptionOverrides {
                config,
                ..Default::default()
            },
            format,
        }),
    }
}
