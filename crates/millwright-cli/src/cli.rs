//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Millwright - extract industrial asset records from site documents.
#[derive(Debug, Parser)]
#[command(name = "millwright")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the pipeline over a batch manifest
    Run(RunArgs),

    /// Re-export completed extraction artifacts without any model calls
    Export(ExportArgs),

    /// Show per-stage progress for a batch
    Status(StatusArgs),
}

/// Arguments for the run command.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// CSV manifest of sites and document URLs
    #[arg(short, long)]
    pub manifest: PathBuf,

    /// Work directory holding the per-stage artifacts
    #[arg(short, long)]
    pub work_dir: PathBuf,

    /// Write the final CSV export here after the batch completes
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Process only the first N manifest rows (smoke runs)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Cloud model identifier
    #[arg(long, env = "MILLWRIGHT_CLOUD_MODEL")]
    pub cloud_model: Option<String>,

    /// Local fallback model identifier
    #[arg(long, env = "MILLWRIGHT_LOCAL_MODEL")]
    pub local_model: Option<String>,

    /// Credential for the cloud endpoint
    #[arg(long, env = "MILLWRIGHT_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Width of the conversion worker pool
    #[arg(long)]
    pub workers: Option<usize>,

    /// Sources are already in the work directory; do not download
    #[arg(long)]
    pub no_fetch: bool,
}

/// Arguments for the export command.
#[derive(Debug, Parser)]
pub struct ExportArgs {
    /// CSV manifest of sites and document URLs
    #[arg(short, long)]
    pub manifest: PathBuf,

    /// Work directory holding the per-stage artifacts
    #[arg(short, long)]
    pub work_dir: PathBuf,

    /// Output CSV path
    #[arg(short, long)]
    pub out: PathBuf,
}

/// Arguments for the status command.
#[derive(Debug, Parser)]
pub struct StatusArgs {
    /// CSV manifest of sites and document URLs
    #[arg(short, long)]
    pub manifest: PathBuf,

    /// Work directory holding the per-stage artifacts
    #[arg(short, long)]
    pub work_dir: PathBuf,
}
