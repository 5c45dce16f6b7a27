//! On-disk cache backend.
//!
//! Each namespace is a directory under the store root; each entry is a file
//! named by the SHA-256 digest of its key. Deleting a namespace removes the
//! directory as a unit, which is what the worker lifecycle relies on when
//! purging stale versions.
//!
//! Size and entry counters are tracked with atomics, initialized by a
//! directory scan when the namespace is first opened. Concurrent writers to
//! the same key can skew `size_bytes` by a file's length transiently; the
//! counters are advisory, used only for stats display.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use sha2::{Digest, Sha256};
use tokio::fs;

use crate::cache::traits::{BoxFuture, Cache, CacheError, NamespaceStore};

/// Monotonic counter for unique temp-file names within the process.
static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// File name for a cache key: hex SHA-256 of the key string.
fn key_file_name(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    let mut name = String::with_capacity(digest.len() * 2 + 4);
    for byte in digest {
        name.push_str(&format!("{:02x}", byte));
    }
    name.push_str(".bin");
    name
}

/// A single on-disk namespace.
pub struct DiskCacheProvider {
    dir: PathBuf,
    entries: AtomicU64,
    bytes: AtomicU64,
}

impl DiskCacheProvider {
    /// Open a namespace directory, creating it if necessary, and scan it to
    /// initialize the size counters.
    pub async fn open(dir: PathBuf) -> Result<Self, CacheError> {
        fs::create_dir_all(&dir).await?;

        let mut entries = 0u64;
        let mut bytes = 0u64;
        let mut listing = fs::read_dir(&dir).await?;
        while let Some(item) = listing.next_entry().await? {
            let meta = item.metadata().await?;
            if meta.is_file() {
                entries += 1;
                bytes += meta.len();
            }
        }

        Ok(Self {
            dir,
            entries: AtomicU64::new(entries),
            bytes: AtomicU64::new(bytes),
        })
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(key_file_name(key))
    }

    /// Length of an existing entry file, if any.
    async fn existing_len(&self, path: &Path) -> Option<u64> {
        match fs::metadata(path).await {
            Ok(meta) => Some(meta.len()),
            Err(_) => None,
        }
    }
}

impl Cache for DiskCacheProvider {
    fn set(&self, key: &str, value: Vec<u8>) -> BoxFuture<'_, Result<(), CacheError>> {
        let path = self.entry_path(key);
        Box::pin(async move {
            let old_len = self.existing_len(&path).await;

            // Write-then-rename so a reader never observes a partial entry.
            let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
            let tmp = path.with_extension(format!("tmp{}", seq));
            let new_len = value.len() as u64;
            fs::write(&tmp, value).await?;
            fs::rename(&tmp, &path).await?;

            match old_len {
                Some(old) => {
                    self.bytes.fetch_add(new_len, Ordering::Relaxed);
                    self.bytes.fetch_sub(old, Ordering::Relaxed);
                }
                None => {
                    self.entries.fetch_add(1, Ordering::Relaxed);
                    self.bytes.fetch_add(new_len, Ordering::Relaxed);
                }
            }
            Ok(())
        })
    }

    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>, CacheError>> {
        let path = self.entry_path(key);
        Box::pin(async move {
            match fs::read(&path).await {
                Ok(data) => Ok(Some(data)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, Result<bool, CacheError>> {
        let path = self.entry_path(key);
        Box::pin(async move {
            let old_len = self.existing_len(&path).await;
            match fs::remove_file(&path).await {
                Ok(()) => {
                    self.entries.fetch_sub(1, Ordering::Relaxed);
                    if let Some(old) = old_len {
                        self.bytes.fetch_sub(old, Ordering::Relaxed);
                    }
                    Ok(true)
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn contains(&self, key: &str) -> BoxFuture<'_, Result<bool, CacheError>> {
        let path = self.entry_path(key);
        Box::pin(async move {
            match fs::metadata(&path).await {
                Ok(meta) => Ok(meta.is_file()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn entry_count(&self) -> u64 {
        self.entries.load(Ordering::Relaxed)
    }

    fn size_bytes(&self) -> u64 {
        self.bytes.load(Ordering::Relaxed)
    }
}

/// On-disk namespace registry rooted at a cache directory.
pub struct DiskNamespaceStore {
    root: PathBuf,
    open_namespaces: DashMap<String, Arc<DiskCacheProvider>>,
}

impl DiskNamespaceStore {
    /// Create a store rooted at `root`. The directory is created lazily when
    /// the first namespace is opened.
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            open_namespaces: DashMap::new(),
        }
    }
}

impl NamespaceStore for DiskNamespaceStore {
    fn open(&self, name: &str) -> BoxFuture<'_, Result<Arc<dyn Cache>, CacheError>> {
        let name = name.to_string();
        Box::pin(async move {
            if let Some(existing) = self.open_namespaces.get(&name) {
                return Ok(existing.clone() as Arc<dyn Cache>);
            }

            let provider = Arc::new(DiskCacheProvider::open(self.root.join(&name)).await?);
            let provider = self
                .open_namespaces
                .entry(name)
                .or_insert(provider)
                .clone();
            Ok(provider as Arc<dyn Cache>)
        })
    }

    fn names(&self) -> BoxFuture<'_, Result<Vec<String>, CacheError>> {
        Box::pin(async move {
            let mut names = Vec::new();
            let mut listing = match fs::read_dir(&self.root).await {
                Ok(listing) => listing,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(names),
                Err(e) => return Err(e.into()),
            };
            while let Some(item) = listing.next_entry().await? {
                if item.metadata().await?.is_dir() {
                    if let Some(name) = item.file_name().to_str() {
                        names.push(name.to_string());
                    }
                }
            }
            Ok(names)
        })
    }

    fn delete(&self, name: &str) -> BoxFuture<'_, Result<bool, CacheError>> {
        let name = name.to_string();
        Box::pin(async move {
            self.open_namespaces.remove(&name);
            match fs::remove_dir_all(self.root.join(&name)).await {
                Ok(()) => Ok(true),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
                Err(e) => Err(e.into()),
            }
        })
    }
}
