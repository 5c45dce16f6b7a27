//! End-to-end worker tests over the disk backend.
//!
//! Drives the worker the way the browser does: install, activate, then a
//! mix of fetch interceptions and seed messages, including a redeploy with
//! a bumped version literal.

use std::sync::{Arc, Mutex};

use serde_json::json;

use cletiles::{
    BackendConfig, BoxFuture, CachePolicy, FetchError, FetchOutcome, Fetcher, ServeSource,
    TileRequest, TileResponse, TileWorker, WorkerConfig,
};

const TILE_URL: &str =
    "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/3/2/1";

/// Test fetcher replaying a fixed body and counting calls.
struct CountingFetcher {
    body: Vec<u8>,
    fail: bool,
    calls: Mutex<usize>,
}

impl CountingFetcher {
    fn serving(body: Vec<u8>) -> Arc<Self> {
        Arc::new(Self {
            body,
            fail: false,
            calls: Mutex::new(0),
        })
    }

    fn offline() -> Arc<Self> {
        Arc::new(Self {
            body: Vec::new(),
            fail: true,
            calls: Mutex::new(0),
        })
    }

    fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl Fetcher for CountingFetcher {
    fn fetch(
        &self,
        _request: &TileRequest,
        _policy: CachePolicy,
    ) -> BoxFuture<'_, Result<TileResponse, FetchError>> {
        *self.calls.lock().unwrap() += 1;
        let result = if self.fail {
            Err(FetchError::Transport("offline".to_string()))
        } else {
            Ok(TileResponse::Opaque {
                body: self.body.clone(),
            })
        };
        Box::pin(async move { result })
    }
}

fn disk_worker(
    dir: &std::path::Path,
    version: &str,
    fetcher: Arc<CountingFetcher>,
) -> Arc<TileWorker> {
    let config = WorkerConfig::default()
        .with_version(version)
        .with_backend(BackendConfig::Disk {
            directory: dir.to_path_buf(),
        });
    let store = Arc::new(cletiles::cache::DiskNamespaceStore::new(dir.to_path_buf()));
    Arc::new(TileWorker::new(config, store, fetcher))
}

#[tokio::test]
async fn first_fetch_populates_disk_and_second_run_serves_offline() {
    let tmp = tempfile::tempdir().unwrap();
    let tile = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];

    // First run: online, tile fetched and stored.
    {
        let fetcher = CountingFetcher::serving(tile.clone());
        let worker = disk_worker(tmp.path(), "v1", fetcher.clone());
        worker.install();
        worker.activate().await.unwrap();

        let outcome = worker.handle_fetch(&TileRequest::new(TILE_URL)).await;
        match outcome {
            FetchOutcome::Served { source, response } => {
                assert_eq!(source, ServeSource::Network);
                assert_eq!(response.body(), tile.as_slice());
            }
            other => panic!("Expected network serve, got {:?}", other),
        }
        assert_eq!(fetcher.calls(), 1);
    }

    // Second run: offline, same tile served byte-identical from disk.
    {
        let fetcher = CountingFetcher::offline();
        let worker = disk_worker(tmp.path(), "v1", fetcher.clone());
        worker.install();
        worker.activate().await.unwrap();

        let outcome = worker.handle_fetch(&TileRequest::new(TILE_URL)).await;
        match outcome {
            FetchOutcome::Served { source, response } => {
                assert_eq!(source, ServeSource::Cache);
                assert_eq!(response.body(), tile.as_slice());
                assert!(response.is_opaque());
            }
            other => panic!("Expected cache serve, got {:?}", other),
        }
        assert_eq!(fetcher.calls(), 0);
    }
}

#[tokio::test]
async fn version_bump_purges_previous_namespace_directory() {
    let tmp = tempfile::tempdir().unwrap();

    let v1 = disk_worker(tmp.path(), "v1", CountingFetcher::serving(vec![1, 2, 3]));
    v1.install();
    v1.activate().await.unwrap();
    v1.handle_fetch(&TileRequest::new(TILE_URL)).await;
    assert!(tmp.path().join("cle-tiles-v1").exists());

    let v2 = disk_worker(tmp.path(), "v2", CountingFetcher::serving(vec![4, 5, 6]));
    v2.install();
    let report = v2.activate().await.unwrap();

    assert_eq!(report.deleted, vec!["cle-tiles-v1".to_string()]);
    assert!(!tmp.path().join("cle-tiles-v1").exists());

    // The old tile is gone; the new namespace refetches.
    let outcome = v2.handle_fetch(&TileRequest::new(TILE_URL)).await;
    match outcome {
        FetchOutcome::Served { source, response } => {
            assert_eq!(source, ServeSource::Network);
            assert_eq!(response.body(), &[4, 5, 6]);
        }
        other => panic!("Expected refetch in new namespace, got {:?}", other),
    }
}

#[tokio::test]
async fn seed_message_warms_disk_for_a_later_offline_fetch() {
    let tmp = tempfile::tempdir().unwrap();
    let tile = vec![9u8; 128];

    {
        let worker = disk_worker(tmp.path(), "v1", CountingFetcher::serving(tile.clone()));
        worker.install();
        worker.activate().await.unwrap();

        let urls: Vec<String> = (0..4)
            .map(|i| format!("https://server.arcgisonline.com/tile/4/{}/7", i))
            .collect();
        let report = worker
            .clone()
            .handle_message_with_ack(json!({"type": "seedTiles", "urls": urls}))
            .unwrap()
            .await
            .unwrap();
        assert_eq!(report.seeded, 4);
    }

    let fetcher = CountingFetcher::offline();
    let worker = disk_worker(tmp.path(), "v1", fetcher.clone());
    worker.install();
    worker.activate().await.unwrap();

    for i in 0..4 {
        let url = format!("https://server.arcgisonline.com/tile/4/{}/7", i);
        let outcome = worker.handle_fetch(&TileRequest::new(&url)).await;
        match outcome {
            FetchOutcome::Served { source, response } => {
                assert_eq!(source, ServeSource::Cache);
                assert_eq!(response.body(), tile.as_slice());
            }
            other => panic!("Expected seeded tile at {}, got {:?}", url, other),
        }
    }
    assert_eq!(fetcher.calls(), 0);
}
