//! CLI error types.

use std::fmt;

/// Errors surfaced to the terminal user.
#[derive(Debug)]
pub enum CliError {
    /// Configuration could not be loaded.
    Config(String),

    /// The worker could not be constructed.
    WorkerStart(String),

    /// Activation (namespace purge) failed.
    Activate(String),

    /// A seed URL list file could not be read.
    UrlList(String),

    /// Cache statistics could not be read.
    Stats(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::WorkerStart(msg) => write!(f, "Failed to start worker: {}", msg),
            CliError::Activate(msg) => write!(f, "Activation failed: {}", msg),
            CliError::UrlList(msg) => write!(f, "Failed to read URL list: {}", msg),
            CliError::Stats(msg) => write!(f, "Failed to read cache stats: {}", msg),
        }
    }
}

impl std::error::Error for CliError {}
