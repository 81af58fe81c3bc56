mod commands;
mod config;
mod google;
mod schedule;
mod session;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "classcal")]
#[command(about = "Import a weekly class schedule CSV into Google Calendar as recurring events")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Authenticate with Google Calendar
    Auth,
    /// Import the schedule CSV into the configured calendar
    Import {
        /// CSV file to import (overrides csv_filename from config)
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Build and print events without submitting anything
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Auth => commands::auth::run().await,
        Commands::Import { csv, dry_run } => commands::import::run(csv, dry_run).await,
    }
}
