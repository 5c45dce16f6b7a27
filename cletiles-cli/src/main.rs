//! CLE Tiles CLI - command-line interface to the tile cache worker.
//!
//! Stands in for the map page as a driver of the worker's entry points:
//! seeding the cache for offline use, inspecting it, and purging stale
//! versioned namespaces.

mod commands;
mod error;

use clap::{Parser, Subcommand};

use commands::{purge, seed, stats};

#[derive(Debug, Parser)]
#[command(name = "cletiles", version, about = "Offline tile cache for the 1945 Cleveland theater map")]
struct Cli {
    /// Enable debug logging.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch and cache a list of tile URLs for offline use
    Seed(seed::SeedArgs),
    /// Show cache namespace statistics
    Stats(stats::StatsArgs),
    /// Delete stale cache namespaces from previous versions
    Purge(purge::PurgeArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    cletiles::logging::init(cli.verbose);

    let result = match cli.command {
        Command::Seed(args) => seed::run(args).await,
        Command::Stats(args) => stats::run(args).await,
        Command::Purge(args) => purge::run(args).await,
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
