//! Fetcher abstraction for tile requests.
//!
//! This abstraction allows for dependency injection and easier testing by
//! enabling mock fetchers in tests. The real implementation lives in
//! [`crate::net::reqwest_client`].

use thiserror::Error;

use crate::cache::{BoxFuture, TileResponse};

/// Errors that can occur while fetching a tile.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// The request never produced a response (DNS failure, refused
    /// connection, offline, transport timeout).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The fetcher itself could not be constructed or used.
    #[error("Client error: {0}")]
    Client(String),
}

/// Cross-origin mode of an outbound request.
///
/// Tile hosts generally do not grant cross-origin read access, so the
/// worker requests tiles in [`RequestMode::NoCors`] and accepts the
/// resulting opaque responses as first-class cacheable values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    /// Readable response expected (same-origin or CORS-granting host).
    Cors,
    /// Opaque response accepted; status and headers are unreadable.
    NoCors,
}

/// Intermediate-cache policy for an outbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Normal fetch; intermediate HTTP caches may answer.
    Default,
    /// Force a fresh network round-trip, bypassing intermediate caches.
    /// Used by seeding so a warmed entry reflects the origin.
    Reload,
}

/// An outbound tile request as seen by the interceptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileRequest {
    /// Absolute request URL, query string included.
    pub url: String,
    /// Cross-origin mode the response will be fetched under.
    pub mode: RequestMode,
}

impl TileRequest {
    /// A tile request in no-cors mode, the shape map panning produces.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            mode: RequestMode::NoCors,
        }
    }

    /// A tile request expecting a readable response.
    pub fn cors(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            mode: RequestMode::Cors,
        }
    }
}

/// Trait for performing tile fetches.
///
/// Implementations must be `Send + Sync`; the worker shares one fetcher
/// across all concurrent interception and seeding flows.
pub trait Fetcher: Send + Sync {
    /// Fetch the request's URL and return the response in the shape the
    /// request's mode allows.
    ///
    /// A completed HTTP exchange is `Ok` regardless of status: in no-cors
    /// mode the status is unreadable by definition, and in cors mode an
    /// error status is still a response the caller may cache and serve.
    /// `Err` means the exchange never completed.
    fn fetch(
        &self,
        request: &TileRequest,
        policy: CachePolicy,
    ) -> BoxFuture<'_, Result<TileResponse, FetchError>>;
}

#[cfg(test)]
pub mod tests {
    use super::*;

    /// Mock fetcher for testing.
    ///
    /// Replays a fixed response and records every URL fetched, so tests can
    /// assert on network activity (or its absence).
    pub struct MockFetcher {
        pub response: Result<TileResponse, FetchError>,
        pub calls: std::sync::Mutex<Vec<(String, CachePolicy)>>,
    }

    impl MockFetcher {
        pub fn ok(response: TileResponse) -> Self {
            Self {
                response: Ok(response),
                calls: std::sync::Mutex::new(Vec::new()),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                response: Err(FetchError::Transport(message.to_string())),
                calls: std::sync::Mutex::new(Vec::new()),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl Fetcher for MockFetcher {
        fn fetch(
            &self,
            request: &TileRequest,
            policy: CachePolicy,
        ) -> BoxFuture<'_, Result<TileResponse, FetchError>> {
            self.calls
                .lock()
                .unwrap()
                .push((request.url.clone(), policy));
            let response = self.response.clone();
            Box::pin(async move { response })
        }
    }

    #[tokio::test]
    async fn test_mock_fetcher_success() {
        let mock = MockFetcher::ok(TileResponse::Opaque { body: vec![1, 2] });

        let result = mock
            .fetch(&TileRequest::new("https://example.com/t"), CachePolicy::Default)
            .await;

        assert!(result.is_ok());
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_fetcher_error() {
        let mock = MockFetcher::failing("offline");

        let result = mock
            .fetch(&TileRequest::new("https://example.com/t"), CachePolicy::Default)
            .await;

        assert!(matches!(result, Err(FetchError::Transport(_))));
    }
}
