//! The tile cache worker.
//!
//! `TileWorker` is the Rust rendering of the map page's offline worker. It
//! exposes the four entry points the host environment drives:
//!
//! - [`TileWorker::install`] / [`TileWorker::activate`] - lifecycle
//! - [`TileWorker::handle_fetch`] - cache-first interception
//! - [`TileWorker::handle_message`] - the seed control channel
//!
//! One worker serves exactly one versioned namespace. The namespace handle
//! is worker-scoped shared state, opened lazily on first use and torn down
//! only when the worker is dropped.

mod fetch;
mod lifecycle;
mod seed;

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::OnceCell;
use tokio_util::sync::CancellationToken;

use crate::cache::{
    Cache, CacheError, DiskNamespaceStore, MemoryNamespaceStore, NamespaceStore,
};
use crate::config::{BackendConfig, WorkerConfig};
use crate::net::{FetchError, Fetcher, ReqwestFetcher};
use crate::telemetry::{MetricsSnapshot, WorkerMetrics};

pub use fetch::{FetchOutcome, ServeSource};
pub use lifecycle::{ActivationReport, WorkerState};
pub use seed::SeedReport;

/// Offline tile cache worker.
///
/// Safe to share across tasks (`Arc<TileWorker>`); every interception and
/// seeding flow runs concurrently against the same namespace with no
/// cross-request ordering guarantees.
pub struct TileWorker {
    config: WorkerConfig,
    store: Arc<dyn NamespaceStore>,
    fetcher: Arc<dyn Fetcher>,
    /// Lazily opened handle to the current-version namespace.
    current: OnceCell<Arc<dyn Cache>>,
    state: Mutex<WorkerState>,
    metrics: Arc<WorkerMetrics>,
    shutdown: CancellationToken,
}

impl TileWorker {
    /// Create a worker with an explicit store and fetcher.
    pub fn new(
        config: WorkerConfig,
        store: Arc<dyn NamespaceStore>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        Self {
            config,
            store,
            fetcher,
            current: OnceCell::new(),
            state: Mutex::new(WorkerState::New),
            metrics: Arc::new(WorkerMetrics::new()),
            shutdown: CancellationToken::new(),
        }
    }

    /// Create a worker from configuration alone, wiring the backend the
    /// config selects and a real HTTP fetcher.
    pub fn from_config(config: WorkerConfig) -> Result<Self, FetchError> {
        let store: Arc<dyn NamespaceStore> = match &config.backend {
            BackendConfig::Memory { max_size_bytes } => {
                Arc::new(MemoryNamespaceStore::new(*max_size_bytes))
            }
            BackendConfig::Disk { directory } => {
                Arc::new(DiskNamespaceStore::new(directory.clone()))
            }
        };
        let fetcher = Arc::new(ReqwestFetcher::new()?);
        Ok(Self::new(config, store, fetcher))
    }

    /// The worker's configuration.
    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Current lifecycle state.
    pub fn state(&self) -> WorkerState {
        *self.state.lock()
    }

    /// Point-in-time copy of the worker counters.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Handle to the current-version namespace, opened on first access.
    pub async fn current_cache(&self) -> Result<Arc<dyn Cache>, CacheError> {
        let cache = self
            .current
            .get_or_try_init(|| self.store.open(&self.config.namespace()))
            .await?;
        Ok(cache.clone())
    }

    /// Stop background seeding. Interception keeps working; the host
    /// environment dropping the worker is the real teardown.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::cache::TileResponse;
    use crate::net::MockFetcher;

    /// Worker over a memory store and a mock fetcher, for tests.
    pub(crate) fn test_worker(fetcher: MockFetcher) -> (Arc<TileWorker>, Arc<MockFetcher>) {
        let fetcher = Arc::new(fetcher);
        let worker = TileWorker::new(
            WorkerConfig::default(),
            Arc::new(MemoryNamespaceStore::new(10 * 1024 * 1024)),
            fetcher.clone(),
        );
        (Arc::new(worker), fetcher)
    }

    pub(crate) fn opaque_tile() -> TileResponse {
        // JPEG magic is what ArcGIS actually serves; content is arbitrary.
        TileResponse::Opaque {
            body: vec![0xFF, 0xD8, 0xFF, 0xE0],
        }
    }

    #[tokio::test]
    async fn test_current_cache_is_lazy_and_shared() {
        let (worker, _) = test_worker(MockFetcher::ok(opaque_tile()));

        let first = worker.current_cache().await.unwrap();
        first.set("https://a/1", vec![1]).await.unwrap();

        let second = worker.current_cache().await.unwrap();
        assert_eq!(second.get("https://a/1").await.unwrap(), Some(vec![1]));
    }
}
