//! Cache backend implementations.
//!
//! Two backends are available:
//! - [`MemoryNamespaceStore`] - moka-backed, bounded, per-process
//! - [`DiskNamespaceStore`] - one directory per namespace, survives restarts

mod disk;
mod memory;

pub use disk::{DiskCacheProvider, DiskNamespaceStore};
pub use memory::{MemoryCacheProvider, MemoryNamespaceStore};
