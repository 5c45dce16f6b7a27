//! Cache-first fetch interception.
//!
//! For every request to an allowlisted tile host: serve from cache when
//! possible, otherwise fetch and opportunistically store a copy. No error
//! on this path ever reaches the interception point as a panic or an `Err`;
//! the worst outcome is [`FetchOutcome::NetworkError`], which the page
//! renders as a gap in the map.

use tracing::{debug, warn};

use crate::cache::TileResponse;
use crate::net::{CachePolicy, TileRequest};

use super::TileWorker;

/// Where a served response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServeSource {
    /// Returned from the current namespace; no network activity occurred.
    Cache,
    /// Fetched from the network (and stored best-effort).
    Network,
}

/// Result of intercepting one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The host is not allowlisted; the request proceeds through the
    /// normal network path untouched, with zero cache activity.
    PassThrough,

    /// A response was produced, from cache or network.
    Served {
        response: TileResponse,
        source: ServeSource,
    },

    /// The network failed and no cached entry existed. Generic error
    /// result; nothing is surfaced to the user beyond a missing tile.
    NetworkError,
}

impl TileWorker {
    /// Intercept one outbound request.
    ///
    /// Lookup always precedes any network fetch, and the lookup matches on
    /// the exact URL including the full query string. Duplicate concurrent
    /// misses for the same URL each fetch and store independently;
    /// last-write-wins is acceptable because tile content is idempotent
    /// per key.
    pub async fn handle_fetch(&self, request: &TileRequest) -> FetchOutcome {
        if !self.config.allowlist.allows_url(&request.url) {
            self.metrics.pass_through();
            return FetchOutcome::PassThrough;
        }

        let cache = match self.current_cache().await {
            Ok(cache) => cache,
            Err(e) => {
                // Storage unavailable: degrade to a plain network fetch.
                warn!(error = %e, "Cache namespace unavailable, fetching without cache");
                return match self.fetcher.fetch(request, CachePolicy::Default).await {
                    Ok(response) => {
                        self.metrics.network_fetch();
                        FetchOutcome::Served {
                            response,
                            source: ServeSource::Network,
                        }
                    }
                    Err(_) => {
                        self.metrics.network_error();
                        FetchOutcome::NetworkError
                    }
                };
            }
        };

        match cache.get(&request.url).await {
            Ok(Some(encoded)) => match TileResponse::decode(&encoded) {
                Ok(response) => {
                    self.metrics.hit();
                    return FetchOutcome::Served {
                        response,
                        source: ServeSource::Cache,
                    };
                }
                Err(e) => {
                    // Unreadable entry is treated as a miss and overwritten.
                    warn!(url = %request.url, error = %e, "Dropping undecodable cache entry");
                }
            },
            Ok(None) => {}
            Err(e) => {
                warn!(url = %request.url, error = %e, "Cache lookup failed");
            }
        }

        self.metrics.miss();
        match self.fetcher.fetch(request, CachePolicy::Default).await {
            Ok(response) => {
                self.metrics.network_fetch();
                // Store a copy before returning; failure to store must
                // never prevent returning the response.
                match response.encode() {
                    Ok(encoded) => {
                        if let Err(e) = cache.set(&request.url, encoded).await {
                            self.metrics.store_failure();
                            debug!(url = %request.url, error = %e, "Failed to store tile");
                        }
                    }
                    Err(e) => {
                        self.metrics.store_failure();
                        debug!(url = %request.url, error = %e, "Failed to encode tile");
                    }
                }
                FetchOutcome::Served {
                    response,
                    source: ServeSource::Network,
                }
            }
            Err(e) => {
                self.metrics.network_error();
                debug!(url = %request.url, error = %e, "Network fetch failed");
                // A concurrent flow may have stored the tile since the
                // first lookup; fall back to cache before giving up.
                if let Ok(Some(encoded)) = cache.get(&request.url).await {
                    if let Ok(response) = TileResponse::decode(&encoded) {
                        self.metrics.hit();
                        return FetchOutcome::Served {
                            response,
                            source: ServeSource::Cache,
                        };
                    }
                }
                FetchOutcome::NetworkError
            }
        }
    }
}
