//! CLI command definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Arguments for a one-shot form submission.
#[derive(Debug, Args)]
pub struct CreateCommand {
    /// Student name (Nome)
    #[arg(long, default_value = "")]
    pub nome: String,

    /// Course (Curso)
    #[arg(long, default_value = "")]
    pub curso: String,

    /// Grade index (Ira), clamped to 0..=10
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub ira: String,

    /// Print the created record as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Student list arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Only students of this course
    #[arg(long)]
    pub curso: Option<String>,

    /// Maximum number of rows (defaults to `storage.list_limit`)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Course list arguments.
#[derive(Debug, Args)]
pub struct CoursesCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Remove a student by id.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Student id, as shown by `list`
    pub id: i64,
}

/// Open a page by path.
#[derive(Debug, Args)]
pub struct OpenCommand {
    /// Page path, e.g. `/aluno/listar`
    pub path: String,

    /// Output format for list pages
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One record per line
    Plain,
    /// Aligned columns
    #[default]
    Table,
    /// JSON array
    Json,
}
