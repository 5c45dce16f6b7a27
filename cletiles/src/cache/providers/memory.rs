//! In-memory cache backend using moka.
//!
//! Each namespace is its own `moka::future::Cache` with size-based LRU
//! eviction. Moka uses lock-free data structures internally, so a namespace
//! is safe to share across concurrent interception and seeding flows
//! without blocking the Tokio runtime.

use std::sync::Arc;

use dashmap::DashMap;
use moka::future::Cache as MokaCache;

use crate::cache::traits::{BoxFuture, Cache, CacheError, NamespaceStore};

/// A single in-memory namespace backed by moka.
pub struct MemoryCacheProvider {
    cache: MokaCache<String, Vec<u8>>,
}

impl MemoryCacheProvider {
    /// Create a namespace bounded to `max_size_bytes` of entry data.
    pub fn new(max_size_bytes: u64) -> Self {
        let cache = MokaCache::builder()
            // Weight each entry by its data size
            .weigher(|_key: &String, value: &Vec<u8>| -> u32 {
                // moka uses u32 for weights, cap at u32::MAX for very large entries
                value.len().min(u32::MAX as usize) as u32
            })
            .max_capacity(max_size_bytes)
            .build();

        Self { cache }
    }
}

impl Cache for MemoryCacheProvider {
    fn set(&self, key: &str, value: Vec<u8>) -> BoxFuture<'_, Result<(), CacheError>> {
        let key = key.to_string();
        Box::pin(async move {
            self.cache.insert(key, value).await;
            Ok(())
        })
    }

    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>, CacheError>> {
        let key = key.to_string();
        Box::pin(async move { Ok(self.cache.get(&key).await) })
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, Result<bool, CacheError>> {
        let key = key.to_string();
        Box::pin(async move {
            let existed = self.cache.contains_key(&key);
            self.cache.remove(&key).await;
            Ok(existed)
        })
    }

    fn contains(&self, key: &str) -> BoxFuture<'_, Result<bool, CacheError>> {
        let key = key.to_string();
        Box::pin(async move { Ok(self.cache.contains_key(&key)) })
    }

    fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    fn size_bytes(&self) -> u64 {
        self.cache.weighted_size()
    }
}

/// In-memory namespace registry.
///
/// Namespaces live for the lifetime of the store; deleting one drops the
/// whole moka cache, which releases every entry at once.
pub struct MemoryNamespaceStore {
    namespaces: DashMap<String, Arc<MemoryCacheProvider>>,
    max_size_bytes: u64,
}

impl MemoryNamespaceStore {
    /// Create a store whose namespaces are each bounded to `max_size_bytes`.
    pub fn new(max_size_bytes: u64) -> Self {
        Self {
            namespaces: DashMap::new(),
            max_size_bytes,
        }
    }
}

impl NamespaceStore for MemoryNamespaceStore {
    fn open(&self, name: &str) -> BoxFuture<'_, Result<Arc<dyn Cache>, CacheError>> {
        let name = name.to_string();
        Box::pin(async move {
            let provider = self
                .namespaces
                .entry(name)
                .or_insert_with(|| Arc::new(MemoryCacheProvider::new(self.max_size_bytes)))
                .clone();
            Ok(provider as Arc<dyn Cache>)
        })
    }

    fn names(&self) -> BoxFuture<'_, Result<Vec<String>, CacheError>> {
        Box::pin(async move {
            Ok(self
                .namespaces
                .iter()
                .map(|entry| entry.key().clone())
                .collect())
        })
    }

    fn delete(&self, name: &str) -> BoxFuture<'_, Result<bool, CacheError>> {
        let name = name.to_string();
        Box::pin(async move { Ok(self.namespaces.remove(&name).is_some()) })
    }
}
