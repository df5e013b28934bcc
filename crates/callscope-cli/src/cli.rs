//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Callscope - Turn sales-call transcripts into structured sales intelligence.
#[derive(Debug, Parser)]
#[command(name = "callscope")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "CALLSCOPE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log pipeline progress (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze a transcript and store the result
    Analyze(AnalyzeArgs),

    /// List stored analyses, newest first
    List,

    /// Show one analysis
    Show(ShowArgs),

    /// Delete a transcript and its analysis
    Delete(DeleteArgs),

    /// Rank objections, opportunities and content ideas across all analyses
    Aggregate,

    /// Draft the marketing asset for one suggestion
    Collateral(CollateralArgs),

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Arguments for the analyze command.
#[derive(Debug, Parser)]
pub struct AnalyzeArgs {
    /// Transcript file (.txt, .csv, .md, .text, .log, .vtt, .srt)
    #[arg(required_unless_present = "stdin", conflicts_with = "stdin")]
    pub file: Option<PathBuf>,

    /// Read the transcript from stdin
    #[arg(long)]
    pub stdin: bool,

    /// Title; defaults to `Transcript <timestamp>`
    #[arg(short, long)]
    pub title: Option<String>,

    /// Where the transcript came from
    #[arg(short, long, default_value = "manual")]
    pub source: String,
}

/// Arguments for the show command.
#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Analysis ID
    pub id: String,
}

/// Arguments for the delete command.
#[derive(Debug, Parser)]
pub struct DeleteArgs {
    /// Analysis ID
    pub id: String,

    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Arguments for the collateral command.
#[derive(Debug, Parser)]
pub struct CollateralArgs {
    /// Analysis ID
    pub id: String,

    /// Position of the suggestion in the analysis (0-based, as shown by `show`)
    pub index: usize,

    /// Extra guidance for the draft
    #[arg(long)]
    pub context: Option<String>,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}
