//! # Gradebook CLI Module
//!
//! This module implements the CLI interface for Gradebook.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server (default when no command is given)
//! - `check` - Load a roster file and report its summary or first error
//! - `average` - Compute a student's average in a subject from a roster file

mod commands;

use clap::{Parser, Subcommand};
use gradebook::{AppError, ServerConfig};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Gradebook - students, teachers, subjects and grades
///
/// An in-memory registry that only accepts grades for registered students,
/// teachers and subjects.
#[derive(Parser, Debug)]
#[command(name = "gradebook")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to (overrides config)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Roster JSON file to load at startup (overrides config)
        #[arg(short, long)]
        seed: Option<PathBuf>,

        /// Reject updates whose record id differs from the path id
        #[arg(long)]
        strict_ids: bool,
    },

    /// Load a roster file and report its contents
    Check {
        /// Path to the roster JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Average of a student's grades in a subject
    Average {
        /// Path to the roster JSON file
        #[arg(short, long)]
        file: PathBuf,

        /// Student id
        #[arg(long)]
        student: i64,

        /// Subject id
        #[arg(long)]
        subject: i64,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), AppError> {
    let config = ServerConfig::load(cli.config.as_deref())?;
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server {
            host,
            port,
            seed,
            strict_ids,
        }) => {
            let overrides = ServerOverrides {
                host,
                port,
                seed,
                strict_ids,
            };
            cmd_server(config, overrides).await
        }
        Some(Commands::Check { file }) => cmd_check(&config, &file, json_mode),
        Some(Commands::Average {
            file,
            student,
            subject,
        }) => cmd_average(&config, &file, student, subject, json_mode),
        None => cmd_server(config, ServerOverrides::default()).await,
    }
}
