use std::path::PathBuf;

use anyhow::Result;

use classcal_core::{Importer, RowOutcome, build_event};

use crate::google::GoogleSink;
use crate::session::Session;
use crate::{config, schedule};

pub async fn run(csv_override: Option<PathBuf>, dry_run: bool) -> Result<()> {
    let cfg = config::load_config()?;
    let term = cfg.term_window()?;

    let csv_path = csv_override.unwrap_or_else(|| PathBuf::from(&cfg.csv_filename));
    if !csv_path.exists() {
        anyhow::bail!(
            "CSV file '{}' not found.\n\
            Set csv_filename in config.toml or pass --csv.",
            csv_path.display()
        );
    }

    println!("Reading {}...", csv_path.display());
    let rows = schedule::read_rows(&csv_path)?;

    if rows.is_empty() {
        println!("No rows to import.");
        return Ok(());
    }

    if dry_run {
        for (index, row) in rows.iter().enumerate() {
            match build_event(row, &term) {
                Ok(event) => {
                    println!(
                        "[{}] {} — {} {}–{} ({})",
                        event.id,
                        event.summary,
                        row.day,
                        row.start_time,
                        row.end_time,
                        event.location
                    );
                }
                Err(err) => println!("Skipping row {}: {}", index + 1, err),
            }
        }
        println!("\nDry run: nothing submitted.");
        return Ok(());
    }

    println!("Authenticating with Google...");
    let session = Session::load_valid(&cfg.google).await?;
    let sink = GoogleSink::new(session.access_token().to_string());

    let importer = Importer::new(&sink, &term, &cfg.calendar_id);
    let report = importer.run(&rows).await;

    for outcome in &report.outcomes {
        match outcome {
            RowOutcome::Created { summary, .. } => println!("Created: {}", summary),
            RowOutcome::AlreadyExists { summary, .. } => println!("Skipped (exists): {}", summary),
            RowOutcome::Skipped { row, reason } => println!("Skipping row {}: {}", row, reason),
            RowOutcome::Failed { row, reason } => {
                eprintln!("Error creating event for row {}: {}", row, reason)
            }
        }
    }

    println!(
        "\nImport complete! {} created, {} already existed, {} skipped, {} failed.",
        report.created, report.duplicates, report.skipped, report.failed
    );
    if report.cancelled {
        println!("Import was cancelled before the last row.");
    }

    Ok(())
}
