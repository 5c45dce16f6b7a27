//! INI config file loading.
//!
//! The worker reads `config.ini` from the user's config directory:
//!
//! ```ini
//! [cache]
//! prefix = cle-tiles
//! version = v1
//! backend = disk
//! max_size_mb = 256
//! directory = /home/me/.cache/cletiles
//!
//! [hosts]
//! allow = server.arcgisonline.com
//! ```
//!
//! Every key is optional; a missing file or section falls back to defaults.

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

use super::{BackendConfig, HostAllowlist, WorkerConfig, DEFAULT_MEMORY_CACHE_BYTES};

/// Errors loading the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read or parsed.
    #[error("Failed to read config file: {0}")]
    Read(String),

    /// A key held a value of the wrong shape.
    #[error("Invalid config value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Loaded configuration file.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    /// Worker configuration assembled from the file.
    pub worker: WorkerConfig,
}

impl ConfigFile {
    /// Default config file path: `<config_dir>/cletiles/config.ini`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cletiles").join("config.ini"))
    }

    /// Load from the default path. A missing file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::from_path(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load from an explicit path.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::Read(e.to_string()))?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut worker = WorkerConfig::default();

        if let Some(cache) = ini.section(Some("cache")) {
            if let Some(prefix) = cache.get("prefix") {
                worker.prefix = prefix.to_string();
            }
            if let Some(version) = cache.get("version") {
                worker.version = version.to_string();
            }

            let max_size_bytes = match cache.get("max_size_mb") {
                Some(raw) => {
                    let mb: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                        key: "cache.max_size_mb".to_string(),
                        value: raw.to_string(),
                    })?;
                    mb * 1024 * 1024
                }
                None => DEFAULT_MEMORY_CACHE_BYTES,
            };

            match cache.get("backend") {
                Some("disk") => {
                    let directory = cache
                        .get("directory")
                        .map(PathBuf::from)
                        .or_else(|| dirs::cache_dir().map(|d| d.join("cletiles")))
                        .ok_or_else(|| ConfigError::InvalidValue {
                            key: "cache.directory".to_string(),
                            value: "<unset>".to_string(),
                        })?;
                    worker.backend = BackendConfig::Disk { directory };
                }
                Some("memory") | None => {
                    worker.backend = BackendConfig::Memory { max_size_bytes };
                }
                Some(other) => {
                    return Err(ConfigError::InvalidValue {
                        key: "cache.backend".to_string(),
                        value: other.to_string(),
                    });
                }
            }
        }

        if let Some(hosts) = ini.section(Some("hosts")) {
            if let Some(allow) = hosts.get("allow") {
                worker.allowlist = HostAllowlist::new(allow.split(','));
            }
        }

        Ok(Self { worker })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_missing_sections_fall_back_to_defaults() {
        let file = write_config("");
        let config = ConfigFile::from_path(file.path()).unwrap();

        assert_eq!(config.worker.namespace(), "cle-tiles-v1");
        assert!(config.worker.allowlist.contains("server.arcgisonline.com"));
        assert!(matches!(config.worker.backend, BackendConfig::Memory { .. }));
    }

    #[test]
    fn test_cache_section_overrides() {
        let file = write_config(
            "[cache]\nprefix = theater-tiles\nversion = v3\nbackend = memory\nmax_size_mb = 8\n",
        );
        let config = ConfigFile::from_path(file.path()).unwrap();

        assert_eq!(config.worker.namespace(), "theater-tiles-v3");
        match config.worker.backend {
            BackendConfig::Memory { max_size_bytes } => {
                assert_eq!(max_size_bytes, 8 * 1024 * 1024)
            }
            _ => panic!("Expected memory backend"),
        }
    }

    #[test]
    fn test_disk_backend_with_directory() {
        let file = write_config("[cache]\nbackend = disk\ndirectory = /tmp/cle-test\n");
        let config = ConfigFile::from_path(file.path()).unwrap();

        match config.worker.backend {
            BackendConfig::Disk { directory } => {
                assert_eq!(directory, PathBuf::from("/tmp/cle-test"))
            }
            _ => panic!("Expected disk backend"),
        }
    }

    #[test]
    fn test_hosts_section_replaces_allowlist() {
        let file = write_config("[hosts]\nallow = a.tiles.test, b.tiles.test\n");
        let config = ConfigFile::from_path(file.path()).unwrap();

        assert!(config.worker.allowlist.contains("a.tiles.test"));
        assert!(config.worker.allowlist.contains("b.tiles.test"));
        assert!(!config.worker.allowlist.contains("server.arcgisonline.com"));
    }

    #[test]
    fn test_invalid_backend_is_an_error() {
        let file = write_config("[cache]\nbackend = s3\n");
        let result = ConfigFile::from_path(file.path());

        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_invalid_size_is_an_error() {
        let file = write_config("[cache]\nmax_size_mb = lots\n");
        assert!(ConfigFile::from_path(file.path()).is_err());
    }
}
