//! CLE Tiles - offline tile caching for the 1945 Cleveland theater map.
//!
//! This library provides the tile cache worker that backs the map viewer:
//! a cache-first interceptor for map tile requests, versioned cache
//! namespaces with purge-on-activation, and a message-driven seed protocol
//! for warming the cache ahead of offline use.

pub mod cache;
pub mod config;
pub mod logging;
pub mod net;
pub mod telemetry;
pub mod worker;

pub use cache::{BoxFuture, Cache, CacheError, NamespaceStore, TileResponse};
pub use config::{BackendConfig, ConfigFile, HostAllowlist, WorkerConfig};
pub use net::{CachePolicy, FetchError, Fetcher, RequestMode, ReqwestFetcher, TileRequest};
pub use telemetry::{MetricsSnapshot, WorkerMetrics};
pub use worker::{ActivationReport, FetchOutcome, SeedReport, ServeSource, TileWorker};
