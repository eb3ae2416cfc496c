//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    boxes::BoxCommands,
    cabinet::CabinetCommands,
    completions::CompletionsArgs,
    division::DivisionCommands,
    export::ExportArgs,
    folder::FolderCommands,
    init::InitArgs,
    record::RecordCommands,
    shelf::ShelfCommands,
    status::StatusArgs,
    validate::ValidateArgs,
};

#[derive(Parser)]
#[command(name = "pft")]
#[command(author, version, about = "Procurement File Tracker")]
#[command(long_about = "A Unix-style tool for tracking physical procurement records across shelves, cabinets, folders and boxes, stored as plain text YAML files.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format for list/show output
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress reconciliation summaries and other chatter
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Project root (default: walk up from the current directory to .pft/)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new PFT project
    Init(InitArgs),

    /// Shelf management (top storage tier)
    #[command(subcommand)]
    Shelf(ShelfCommands),

    /// Cabinet management (belongs to a shelf)
    #[command(subcommand)]
    Cabinet(CabinetCommands),

    /// Folder management (belongs to a cabinet or a box)
    #[command(subcommand)]
    Folder(FolderCommands),

    /// Box management (alternate top storage tier)
    #[command(subcommand)]
    Box(BoxCommands),

    /// Division management (originating offices)
    #[command(subcommand)]
    Division(DivisionCommands),

    /// Procurement record management
    #[command(subcommand)]
    Record(RecordCommands),

    /// Show project status dashboard
    Status(StatusArgs),

    /// Export records to CSV
    Export(ExportArgs),

    /// Validate project files and cross-references
    Validate(ValidateArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pick per command: tsv for list, yaml for show
    #[default]
    Auto,
    /// Full-fidelity YAML, as stored on disk
    Yaml,
    /// Tab-separated columns for piping
    Tsv,
    /// JSON for scripting
    Json,
    /// CSV for spreadsheets
    Csv,
    /// Markdown tables
    Md,
    /// Entity IDs only, one per line
    Id,
}
