//! skiff - incremental deployment state tracker.
//!
//! This is the main entry point for the skiff CLI.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "skiff")]
#[command(author, version, about = "Track file and dependency changes between deploys", long_about = None)]
struct Cli {
    /// Project root directory
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show file and dependency changes since the last committed baseline
    Status {
        /// Print the delta as JSON
        #[arg(long)]
        json: bool,
    },
    /// Commit the current tree and dependency list as the new baseline
    Commit,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Status { json } => commands::status::run(&cli.root, json).await,
        Commands::Commit => commands::commit::run(&cli.root).await,
    }
}

/// Initialize logging to stderr, keeping stdout for command output.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        "skiff=debug,skiff_core=debug"
    } else {
        "skiff=warn,skiff_core=warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
