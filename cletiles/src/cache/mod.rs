//! Versioned tile cache storage.
//!
//! A [`NamespaceStore`] holds any number of named namespaces; the worker
//! serves from exactly one (`"<prefix>-<version>"`) and purges the rest on
//! activation. Entries map tile URLs to encoded [`TileResponse`] records.

mod entry;
pub mod providers;
mod traits;

pub use entry::TileResponse;
pub use providers::{DiskCacheProvider, DiskNamespaceStore, MemoryCacheProvider, MemoryNamespaceStore};
pub use traits::{BoxFuture, Cache, CacheError, NamespaceStore};
