//! Core traits for the versioned tile cache.
//!
//! Two abstractions make up the storage layer:
//!
//! - [`Cache`] is a domain-agnostic key-value interface over a single
//!   namespace. Keys are tile URLs, values are encoded [`TileResponse`]
//!   records.
//! - [`NamespaceStore`] manages the set of named namespaces so the worker
//!   lifecycle can enumerate and delete stale versions as a unit.
//!
//! Both traits use `Pin<Box<dyn Future>>` for dyn compatibility, allowing
//! the worker to hold `Arc<dyn Cache>` / `Arc<dyn NamespaceStore>` handles
//! regardless of backend.
//!
//! [`TileResponse`]: crate::cache::TileResponse

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use thiserror::Error;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// I/O error during cache operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored entry could not be encoded or decoded.
    #[error("Codec error: {0}")]
    Codec(String),
}

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Key-value storage over a single cache namespace.
///
/// Keys are tile URL strings, kept verbatim (query string included) so a
/// lookup matches exactly the request that populated the entry. Values are
/// opaque byte records; the worker layer handles response encoding.
///
/// Implementations must be `Send + Sync` for use across async tasks.
pub trait Cache: Send + Sync {
    /// Store a value under the given key, replacing any existing entry.
    ///
    /// Concurrent writers to the same key race with last-write-wins
    /// semantics; callers rely on tile content being idempotent per key.
    fn set(&self, key: &str, value: Vec<u8>) -> BoxFuture<'_, Result<(), CacheError>>;

    /// Retrieve a value by key.
    ///
    /// Returns `Ok(None)` if the key is not present.
    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>, CacheError>>;

    /// Delete a value by key.
    ///
    /// Returns `Ok(true)` if the key existed and was deleted.
    fn delete(&self, key: &str) -> BoxFuture<'_, Result<bool, CacheError>>;

    /// Check if a key exists without retrieving the value.
    fn contains(&self, key: &str) -> BoxFuture<'_, Result<bool, CacheError>>;

    /// Current number of entries in the namespace.
    fn entry_count(&self) -> u64;

    /// Current size of the namespace in bytes.
    ///
    /// For memory backends this is the weighted size of all entries; for
    /// disk backends the total size of all entry files.
    fn size_bytes(&self) -> u64;
}

/// Registry of named cache namespaces.
///
/// The worker opens exactly one namespace (`"<prefix>-<version>"`) for
/// serving, and on activation uses `names()` / `delete()` to purge every
/// namespace left behind by previous versions.
pub trait NamespaceStore: Send + Sync {
    /// Open (creating if necessary) the namespace with the given name.
    fn open(&self, name: &str) -> BoxFuture<'_, Result<Arc<dyn Cache>, CacheError>>;

    /// List the names of all existing namespaces.
    fn names(&self) -> BoxFuture<'_, Result<Vec<String>, CacheError>>;

    /// Delete a namespace and all of its entries.
    ///
    /// Returns `Ok(true)` if the namespace existed.
    fn delete(&self, name: &str) -> BoxFuture<'_, Result<bool, CacheError>>;
}
