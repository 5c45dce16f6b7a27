//! `stats` - show cache namespace statistics.

use std::path::PathBuf;

use clap::Args;
use cletiles::BackendConfig;

use crate::error::CliError;

use super::{format_size, start_worker};

/// Arguments for the stats command.
#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Path to an alternate config file.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Run the stats command.
pub async fn run(args: StatsArgs) -> Result<(), CliError> {
    let worker = start_worker(args.config.as_ref()).await?;

    let cache = worker
        .current_cache()
        .await
        .map_err(|e| CliError::Stats(e.to_string()))?;

    println!("Namespace: {}", worker.config().namespace());
    match &worker.config().backend {
        BackendConfig::Memory { max_size_bytes } => {
            println!("Backend:   memory (max {})", format_size(*max_size_bytes));
        }
        BackendConfig::Disk { directory } => {
            println!("Backend:   disk ({})", directory.display());
        }
    }
    println!("Entries:   {}", cache.entry_count());
    println!("Size:      {}", format_size(cache.size_bytes()));

    let metrics = worker.metrics();
    println!();
    println!("Worker counters (this process):");
    println!("  Hits:           {}", metrics.hits);
    println!("  Misses:         {}", metrics.misses);
    println!("  Hit rate:       {:.1}%", metrics.hit_rate() * 100.0);
    println!("  Pass-throughs:  {}", metrics.pass_throughs);
    println!("  Net fetches:    {}", metrics.network_fetches);
    println!("  Net errors:     {}", metrics.network_errors);
    println!("  Store failures: {}", metrics.store_failures);
    println!("  URLs seeded:    {}", metrics.urls_seeded);
    println!("  Seed failures:  {}", metrics.seed_failures);
    Ok(())
}
