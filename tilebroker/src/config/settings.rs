//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file. Provider
//! definitions come from `[provider.<name>]` sections layered over the
//! built-in providers.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::cache::DEFAULT_MEMORY_STORE_SIZE;
use crate::coord::DEFAULT_MAX_ZOOM;
use crate::provider::{RegistryConfig, DEFAULT_TIMEOUT_SECS};
use crate::resolver::DEFAULT_MAX_CONCURRENT_WRITEBACKS;

/// Default bind address for the tile endpoint.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default listen port for the tile endpoint.
pub const DEFAULT_PORT: u16 = 8080;

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigFile {
    pub server: ServerSettings,
    pub cache: CacheSettings,
    pub download: DownloadSettings,
    pub writeback: WritebackSettings,
    pub tiles: TileSettings,
    /// Built-in providers plus any `[provider.<name>]` sections.
    pub providers: RegistryConfig,
}

/// `[server]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Which tile store backs the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheBackend {
    #[default]
    Disk,
    Memory,
}

impl FromStr for CacheBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "disk" => Ok(CacheBackend::Disk),
            "memory" => Ok(CacheBackend::Memory),
            other => Err(format!("unknown cache backend '{}'", other)),
        }
    }
}

impl fmt::Display for CacheBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheBackend::Disk => f.write_str("disk"),
            CacheBackend::Memory => f.write_str("memory"),
        }
    }
}

/// `[cache]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    pub backend: CacheBackend,
    /// Root of the disk store.
    pub directory: PathBuf,
    /// Size limit of the memory store in bytes.
    pub memory_size: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Disk,
            directory: super::file::config_directory().join("tiles"),
            memory_size: DEFAULT_MEMORY_STORE_SIZE,
        }
    }
}

/// `[download]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSettings {
    /// Timeout in seconds for a single origin GET.
    pub timeout: u64,
    /// Overall budget in seconds for one tile request; `None` means unbounded.
    pub request_timeout: Option<u64>,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT_SECS,
            request_timeout: None,
        }
    }
}

/// `[writeback]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WritebackSettings {
    pub max_concurrent: usize,
}

impl Default for WritebackSettings {
    fn default() -> Self {
        Self {
            max_concurrent: DEFAULT_MAX_CONCURRENT_WRITEBACKS,
        }
    }
}

/// `[tiles]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileSettings {
    /// Range-check coordinates before any I/O.
    pub validate: bool,
    pub max_zoom: u8,
}

impl Default for TileSettings {
    fn default() -> Self {
        Self {
            validate: false,
            max_zoom: DEFAULT_MAX_ZOOM,
        }
    }
}
