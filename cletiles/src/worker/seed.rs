//! Message-driven cache seeding.
//!
//! The page client sends `{"type": "seedTiles", "urls": [...]}` to warm
//! the cache ahead of offline use. The protocol is fire-and-forget: the
//! sender is never blocked and malformed commands are dropped without a
//! reply. Each URL is processed independently with a cache-bypassing fetch
//! so the warmed entry reflects the origin rather than an intermediate
//! HTTP cache.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::oneshot;
use tracing::{debug, info};

use crate::net::{CachePolicy, TileRequest};

use super::TileWorker;

/// Discriminator value for seed commands.
pub(crate) const SEED_MESSAGE_TYPE: &str = "seedTiles";

/// Outcome of one seed batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// URLs the command asked for.
    pub requested: usize,
    /// URLs fetched and stored.
    pub seeded: usize,
    /// URLs skipped after a fetch or store failure.
    pub failed: usize,
}

/// Extract the URL list from a seed command.
///
/// Returns `None` for anything malformed: wrong discriminator, missing or
/// non-array `urls`. Non-string list elements are dropped, matching the
/// per-URL failure a nonsense entry would produce anyway.
fn parse_seed_urls(message: &Value) -> Option<Vec<String>> {
    let object = message.as_object()?;
    if object.get("type")?.as_str()? != SEED_MESSAGE_TYPE {
        return None;
    }
    let urls = object.get("urls")?.as_array()?;
    Some(
        urls.iter()
            .filter_map(|u| u.as_str().map(String::from))
            .collect(),
    )
}

impl TileWorker {
    /// Handle a control message, fire-and-forget.
    ///
    /// A valid seed command spawns a background batch; the sender gets no
    /// acknowledgment and is never blocked. Anything else is silently
    /// ignored - no error is surfaced to the sender.
    pub fn handle_message(self: Arc<Self>, message: Value) {
        if let Some(urls) = parse_seed_urls(&message) {
            tokio::spawn(async move {
                self.run_seed(urls).await;
            });
        } else {
            debug!("Ignoring malformed control message");
        }
    }

    /// Handle a control message and report batch completion.
    ///
    /// Same semantics as [`handle_message`](Self::handle_message), with an
    /// optional acknowledgment channel for callers (like the CLI) that want
    /// to know when the batch finished. Malformed messages return `None`.
    pub fn handle_message_with_ack(
        self: Arc<Self>,
        message: Value,
    ) -> Option<oneshot::Receiver<SeedReport>> {
        let urls = parse_seed_urls(&message)?;
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let report = self.run_seed(urls).await;
            // Receiver may have gone away; the batch result stands anyway.
            let _ = tx.send(report);
        });
        Some(rx)
    }

    /// Run one seed batch: cache-bypassing fetch and best-effort store per
    /// URL, in order, failures skipped. Stops early only on shutdown.
    async fn run_seed(&self, urls: Vec<String>) -> SeedReport {
        let mut report = SeedReport {
            requested: urls.len(),
            ..Default::default()
        };

        let cache = match self.current_cache().await {
            Ok(cache) => cache,
            Err(e) => {
                debug!(error = %e, "Seed batch dropped, cache unavailable");
                report.failed = report.requested;
                return report;
            }
        };

        for url in urls {
            if self.shutdown.is_cancelled() {
                break;
            }

            let request = TileRequest::new(&url);
            let fetched = tokio::select! {
                result = self.fetcher.fetch(&request, CachePolicy::Reload) => result,
                _ = self.shutdown.cancelled() => break,
            };

            match fetched {
                Ok(response) => {
                    let stored = match response.encode() {
                        Ok(encoded) => cache.set(&url, encoded).await.is_ok(),
                        Err(_) => false,
                    };
                    if stored {
                        self.metrics.url_seeded();
                        report.seeded += 1;
                    } else {
                        self.metrics.store_failure();
                        self.metrics.seed_failure();
                        report.failed += 1;
                    }
                }
                Err(e) => {
                    // Single-tile failures never abort the batch.
                    debug!(url = %url, error = %e, "Seed fetch failed");
                    self.metrics.seed_failure();
                    report.failed += 1;
                }
            }
        }

        info!(
            requested = report.requested,
            seeded = report.seeded,
            failed = report.failed,
            "Seed batch finished"
        );
        report
    }
}
