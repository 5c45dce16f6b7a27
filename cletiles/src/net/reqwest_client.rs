//! Real fetcher implementation using reqwest.

use std::time::Duration;

use crate::cache::{BoxFuture, TileResponse};

use super::fetch::{CachePolicy, FetchError, Fetcher, RequestMode, TileRequest};

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Fetcher backed by a shared async reqwest client.
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    /// Creates a new ReqwestFetcher with default configuration.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Creates a new ReqwestFetcher with a custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| FetchError::Client(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl Fetcher for ReqwestFetcher {
    fn fetch(
        &self,
        request: &TileRequest,
        policy: CachePolicy,
    ) -> BoxFuture<'_, Result<TileResponse, FetchError>> {
        let url = request.url.clone();
        let mode = request.mode;
        Box::pin(async move {
            let mut builder = self.client.get(&url);
            if policy == CachePolicy::Reload {
                // Seed fetches must reach the origin, not an intermediate cache.
                builder = builder
                    .header(reqwest::header::CACHE_CONTROL, "no-cache")
                    .header(reqwest::header::PRAGMA, "no-cache");
            }

            let response = builder
                .send()
                .await
                .map_err(|e| FetchError::Transport(format!("Request failed: {}", e)))?;

            let status = response.status().as_u16();
            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.to_string());

            let body = response
                .bytes()
                .await
                .map_err(|e| FetchError::Transport(format!("Failed to read response: {}", e)))?
                .to_vec();

            // In no-cors mode the caller has no right to the status or
            // headers, so the response is delivered opaque even when the
            // origin returned an error status.
            Ok(match mode {
                RequestMode::NoCors => TileResponse::Opaque { body },
                RequestMode::Cors => TileResponse::Readable {
                    status,
                    content_type,
                    body,
                },
            })
        })
    }
}
