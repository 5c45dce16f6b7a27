//! Worker configuration.
//!
//! [`WorkerConfig`] is the in-process configuration surface passed to
//! `TileWorker`; [`ConfigFile`] loads it from an INI file in the user's
//! config directory, falling back to defaults when absent.

mod file;

use std::collections::HashSet;
use std::path::PathBuf;

pub use file::{ConfigError, ConfigFile};

/// Default shared prefix for cache namespace names.
pub const DEFAULT_CACHE_PREFIX: &str = "cle-tiles";

/// Default cache version literal. Bumping this and redeploying is the sole
/// supported migration mechanism: stale namespaces are purged on the next
/// activation.
pub const DEFAULT_CACHE_VERSION: &str = "v1";

/// Tile hosts intercepted by default (Esri basemap tiles).
pub const DEFAULT_TILE_HOSTS: &[&str] = &["server.arcgisonline.com"];

/// Default memory cache budget: 256 MB of tile data.
pub const DEFAULT_MEMORY_CACHE_BYTES: u64 = 256 * 1024 * 1024;

/// Fixed set of hostnames eligible for interception.
///
/// Requests to any other host pass through untouched. The list is
/// deliberately static for a worker's lifetime; adding a tile provider
/// means updating configuration and restarting, not caching arbitrary
/// third-party traffic at runtime.
#[derive(Debug, Clone)]
pub struct HostAllowlist {
    hosts: HashSet<String>,
}

impl HostAllowlist {
    /// Build an allowlist from hostnames. Comparison is case-insensitive.
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            hosts: hosts
                .into_iter()
                .map(|h| h.as_ref().trim().to_ascii_lowercase())
                .filter(|h| !h.is_empty())
                .collect(),
        }
    }

    /// Whether the hostname is eligible for interception.
    pub fn contains(&self, hostname: &str) -> bool {
        self.hosts.contains(&hostname.to_ascii_lowercase())
    }

    /// Whether the URL's hostname is eligible for interception.
    ///
    /// URLs that fail to parse or carry no hostname are never eligible.
    pub fn allows_url(&self, url: &str) -> bool {
        match reqwest::Url::parse(url) {
            Ok(parsed) => parsed
                .host_str()
                .map(|host| self.contains(host))
                .unwrap_or(false),
            Err(_) => false,
        }
    }

    /// Number of allowlisted hosts.
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    /// Whether the allowlist is empty (nothing is ever intercepted).
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

impl Default for HostAllowlist {
    fn default() -> Self {
        Self::new(DEFAULT_TILE_HOSTS.iter().copied())
    }
}

/// Storage backend selection for the worker's namespaces.
#[derive(Debug, Clone)]
pub enum BackendConfig {
    /// Bounded in-memory cache, discarded when the worker ends.
    Memory {
        /// Maximum bytes of tile data per namespace.
        max_size_bytes: u64,
    },
    /// Directory-per-namespace disk cache, survives restarts.
    Disk {
        /// Root directory holding namespace directories.
        directory: PathBuf,
    },
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig::Memory {
            max_size_bytes: DEFAULT_MEMORY_CACHE_BYTES,
        }
    }
}

/// Top-level configuration for a tile worker.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Shared prefix for namespace names.
    pub prefix: String,

    /// Version literal of this worker deployment.
    pub version: String,

    /// Hosts eligible for interception.
    pub allowlist: HostAllowlist,

    /// Storage backend for the namespaces.
    pub backend: BackendConfig,
}

impl WorkerConfig {
    /// The current namespace name: `"<prefix>-<version>"`.
    pub fn namespace(&self) -> String {
        format!("{}-{}", self.prefix, self.version)
    }

    /// Whether a namespace name belongs to this worker's family (shares the
    /// prefix). Only family members are candidates for purging.
    pub fn owns_namespace(&self, name: &str) -> bool {
        name.starts_with(&format!("{}-", self.prefix))
    }

    /// Set the cache version literal.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set the namespace prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the host allowlist.
    pub fn with_allowlist(mut self, allowlist: HostAllowlist) -> Self {
        self.allowlist = allowlist;
        self
    }

    /// Set the storage backend.
    pub fn with_backend(mut self, backend: BackendConfig) -> Self {
        self.backend = backend;
        self
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_CACHE_PREFIX.to_string(),
            version: DEFAULT_CACHE_VERSION.to_string(),
            allowlist: HostAllowlist::default(),
            backend: BackendConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_namespace_name_format() {
        let config = WorkerConfig::default();
        assert_eq!(config.namespace(), "cle-tiles-v1");

        let bumped = config.with_version("v2");
        assert_eq!(bumped.namespace(), "cle-tiles-v2");
    }

    #[test]
    fn test_owns_namespace_requires_prefix_and_separator() {
        let config = WorkerConfig::default();
        assert!(config.owns_namespace("cle-tiles-v1"));
        assert!(config.owns_namespace("cle-tiles-v0"));
        assert!(!config.owns_namespace("cle-tilesv1"));
        assert!(!config.owns_namespace("other-cache-v1"));
    }

    #[test]
    fn test_allowlist_membership_is_case_insensitive() {
        let allowlist = HostAllowlist::default();
        assert!(allowlist.contains("server.arcgisonline.com"));
        assert!(allowlist.contains("SERVER.ARCGISONLINE.COM"));
        assert!(!allowlist.contains("tiles.example.org"));
    }

    #[test]
    fn test_allows_url_parses_hostname() {
        let allowlist = HostAllowlist::default();
        assert!(allowlist.allows_url(
            "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/3/2/1"
        ));
        assert!(!allowlist.allows_url("https://example.com/tile/3/2/1"));
        assert!(!allowlist.allows_url("not a url"));
        assert!(!allowlist.allows_url("data:image/png;base64,AAAA"));
    }

    proptest! {
        /// Any version bump produces a namespace the old config still
        /// recognizes as family, but never equal to the old name.
        #[test]
        fn prop_version_bump_stays_in_family(version in "[a-z0-9]{1,8}") {
            let current = WorkerConfig::default();
            let bumped = WorkerConfig::default().with_version(version.clone());

            prop_assert!(current.owns_namespace(&bumped.namespace()));
            if version != current.version {
                prop_assert_ne!(current.namespace(), bumped.namespace());
            }
        }
    }
}
