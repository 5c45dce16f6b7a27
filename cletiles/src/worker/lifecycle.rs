//! Worker lifecycle: install and activate.
//!
//! The lifecycle is two-phase with nothing in between: `install` makes the
//! new worker version eligible immediately (no waiting for a previous
//! version's clients to drain), and `activate` purges every namespace the
//! prefix family owns except the current one, then claims all clients.
//! Version bump plus redeploy is the only migration mechanism.

use tracing::{info, warn};

use crate::cache::CacheError;

use super::TileWorker;

/// Lifecycle state of a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Constructed, not yet installed.
    New,
    /// Installed and eligible to activate immediately.
    Installed,
    /// Activated and controlling all clients.
    Active,
}

/// What an activation cycle did.
#[derive(Debug, Clone, Default)]
pub struct ActivationReport {
    /// Stale namespaces that were deleted.
    pub deleted: Vec<String>,
    /// Stale namespaces whose deletion failed and was skipped.
    ///
    /// A partial deletion set is tolerated; the leftovers are retried on
    /// the next activation.
    pub delete_failures: Vec<String>,
}

impl TileWorker {
    /// Install the worker.
    ///
    /// Equivalent to skip-waiting: the new version replaces any previous
    /// one as soon as it activates, with no graceful handover.
    pub fn install(&self) {
        *self.state.lock() = WorkerState::Installed;
        info!(version = %self.config.version, "Worker installed, skipping waiting phase");
    }

    /// Activate the worker: purge stale namespaces, then claim clients.
    ///
    /// Deletes every namespace that shares the configured prefix but is not
    /// the current `"<prefix>-<version>"` name. Errors enumerating the
    /// store abort activation; errors deleting an individual namespace are
    /// recorded and skipped.
    pub async fn activate(&self) -> Result<ActivationReport, CacheError> {
        let current = self.config.namespace();
        let mut report = ActivationReport::default();

        for name in self.store.names().await? {
            if !self.config.owns_namespace(&name) || name == current {
                continue;
            }
            match self.store.delete(&name).await {
                Ok(true) => {
                    info!(namespace = %name, "Purged stale cache namespace");
                    report.deleted.push(name);
                }
                Ok(false) => {}
                Err(e) => {
                    warn!(namespace = %name, error = %e, "Failed to purge stale namespace");
                    report.delete_failures.push(name);
                }
            }
        }

        // Claim clients: from here every page is controlled by this version.
        *self.state.lock() = WorkerState::Active;
        info!(namespace = %current, "Worker active and controlling clients");

        Ok(report)
    }
}
