//! CLI subcommand implementations.

pub mod purge;
pub mod seed;
pub mod stats;

use std::path::PathBuf;
use std::sync::Arc;

use cletiles::{ConfigFile, TileWorker};

use crate::error::CliError;

/// Build a worker from the config file (or an explicit path), not yet
/// installed or activated.
pub fn build_worker(config_path: Option<&PathBuf>) -> Result<Arc<TileWorker>, CliError> {
    let config = match config_path {
        Some(path) => ConfigFile::from_path(path).map_err(|e| CliError::Config(e.to_string()))?,
        None => ConfigFile::load().map_err(|e| CliError::Config(e.to_string()))?,
    };

    let worker = TileWorker::from_config(config.worker)
        .map_err(|e| CliError::WorkerStart(e.to_string()))?;
    Ok(Arc::new(worker))
}

/// Build, install, and activate a worker.
///
/// Every subcommand goes through a full install/activate cycle first, the
/// same way the browser drives the worker before any fetch or message
/// event is delivered.
pub async fn start_worker(config_path: Option<&PathBuf>) -> Result<Arc<TileWorker>, CliError> {
    let worker = build_worker(config_path)?;
    worker.install();
    worker
        .activate()
        .await
        .map_err(|e| CliError::Activate(e.to_string()))?;
    Ok(worker)
}

/// Human-readable byte count.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[unit])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }
}
