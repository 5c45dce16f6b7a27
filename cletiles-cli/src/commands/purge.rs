//! `purge` - run an activation cycle and report purged namespaces.
//!
//! Activation already purges stale namespaces on every worker start; this
//! command exists to do it explicitly after a version bump and show what
//! was removed.

use std::path::PathBuf;

use clap::Args;

use crate::error::CliError;

use super::build_worker;

/// Arguments for the purge command.
#[derive(Debug, Args)]
pub struct PurgeArgs {
    /// Path to an alternate config file.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Run the purge command.
pub async fn run(args: PurgeArgs) -> Result<(), CliError> {
    let worker = build_worker(args.config.as_ref())?;
    worker.install();
    let report = worker
        .activate()
        .await
        .map_err(|e| CliError::Activate(e.to_string()))?;

    println!("Current namespace: {}", worker.config().namespace());
    if report.deleted.is_empty() && report.delete_failures.is_empty() {
        println!("No stale namespaces found.");
    }
    for name in &report.deleted {
        println!("Deleted: {}", name);
    }
    for name in &report.delete_failures {
        println!("Failed to delete: {}", name);
    }
    Ok(())
}
