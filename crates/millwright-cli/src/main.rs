//! Millwright CLI - batch extraction of industrial asset records.

use clap::Parser;
use millwright_cli::{commands, Cli, Command, FileConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let file_config = FileConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Run(args) => commands::execute_run(args, &file_config).await?,
        Command::Export(args) => commands::execute_export(args).await?,
        Command::Status(args) => commands::execute_status(args).await?,
    }

    Ok(())
}
