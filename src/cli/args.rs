//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    add::AddArgs, chart::ChartArgs, completions::CompletionsArgs, delete::DeleteArgs,
    edit::EditArgs, export::ExportArgs, init::InitArgs, list::ListArgs, report::ReportArgs,
    show::ShowArgs, summary::SummaryArgs,
};

#[derive(Parser)]
#[command(name = "trainreg")]
#[command(author, version, about = "Training completion register")]
#[command(
    long_about = "Keep a register of which employee completed which training, stored in a spreadsheet or CSV file."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging on stderr)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Register file (default: `data_file` from config, or TRAINREG_FILE)
    #[arg(long, global = true)]
    pub file: Option<PathBuf>,

    /// Project root (default: auto-detect by finding .trainreg/)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a register project
    Init(InitArgs),

    /// Record a training completion (or a pending training)
    Add(AddArgs),

    /// List records, optionally filtered
    List(ListArgs),

    /// Show a single record
    Show(ShowArgs),

    /// Edit a record by reference or by its current values
    Edit(EditArgs),

    /// Delete a record by reference or by its current values
    Delete(DeleteArgs),

    /// Count total, completed and pending records
    Summary(SummaryArgs),

    /// Chart record counts grouped by a field
    Chart(ChartArgs),

    /// Export the (filtered) register to CSV or XLSX
    Export(ExportArgs),

    /// Generate a printable markdown report
    Report(ReportArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (yaml for show, tsv for list)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
    /// Just IDs, one per line
    Id,
}
