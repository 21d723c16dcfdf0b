//! Command-line interface for alunos.
//!
//! This module provides the CLI structure, output rendering and the
//! interactive form session used by the `alunos` binary.

mod commands;
pub mod render;
pub mod session;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logging::Verbosity;

pub use commands::{
    ConfigCommand, CoursesCommand, CreateCommand, DeleteCommand, ListCommand, OpenCommand,
    OutputFormat, StatusCommand,
};

/// alunos - Student registry
///
/// Create students through a validated form and browse students and courses.
#[derive(Debug, Parser)]
#[command(name = "alunos")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit the creation form once
    Create(CreateCommand),

    /// Fill in the creation form interactively
    Form,

    /// List students (/aluno/listar)
    List(ListCommand),

    /// Remove a student
    Delete(DeleteCommand),

    /// List courses (/cursos/listar)
    Courses(CoursesCommand),

    /// Open a page by its path
    Open(OpenCommand),

    /// Show the navigation menu
    Routes,

    /// Show database status
    Status(StatusCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}
