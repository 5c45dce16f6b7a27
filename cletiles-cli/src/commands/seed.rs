//! `seed` - warm the cache with a list of tile URLs.

use std::path::PathBuf;

use clap::Args;
use cletiles::BackendConfig;
use serde_json::json;

use crate::error::CliError;

use super::start_worker;

/// Arguments for the seed command.
#[derive(Debug, Args)]
pub struct SeedArgs {
    /// Tile URLs to seed, in order.
    pub urls: Vec<String>,

    /// File with one tile URL per line (# starts a comment).
    #[arg(long, short)]
    pub file: Option<PathBuf>,

    /// Path to an alternate config file.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Run the seed command.
pub async fn run(args: SeedArgs) -> Result<(), CliError> {
    let mut urls = args.urls;
    if let Some(path) = &args.file {
        let contents =
            std::fs::read_to_string(path).map_err(|e| CliError::UrlList(e.to_string()))?;
        urls.extend(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(String::from),
        );
    }
    if urls.is_empty() {
        return Err(CliError::UrlList("no URLs given".to_string()));
    }

    let worker = start_worker(args.config.as_ref()).await?;
    if matches!(worker.config().backend, BackendConfig::Memory { .. }) {
        println!("Note: memory backend selected; seeded tiles are gone when this process exits.");
    }

    println!("Seeding {} tiles into {}...", urls.len(), worker.config().namespace());

    let ack = worker
        .clone()
        .handle_message_with_ack(json!({ "type": "seedTiles", "urls": urls }))
        .expect("seed command is well-formed by construction");
    let report = ack
        .await
        .map_err(|e| CliError::WorkerStart(format!("seed task ended early: {}", e)))?;

    println!(
        "Seeded {} of {} tiles ({} failed)",
        report.seeded, report.requested, report.failed
    );
    Ok(())
}
