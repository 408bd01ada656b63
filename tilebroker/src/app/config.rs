//! Application configuration for TileBrokerApp.
//!
//! `AppConfig` gathers everything needed to bootstrap the broker: bind
//! address, tile store, provider definitions and resolver tuning.

use std::time::Duration;

use crate::cache::StoreConfig;
use crate::config::{CacheBackend, ConfigFile, DEFAULT_HOST, DEFAULT_PORT};
use crate::coord::CoordinatePolicy;
use crate::provider::{RegistryConfig, DEFAULT_TIMEOUT_SECS};
use crate::resolver::DEFAULT_MAX_CONCURRENT_WRITEBACKS;

/// How long shutdown waits for pending writebacks.
pub const DEFAULT_DRAIN_TIMEOUT_SECS: u64 = 10;

/// Application configuration combining all component configs.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub store: StoreConfig,
    pub registry: RegistryConfig,
    /// Timeout for a single origin GET, in seconds.
    pub download_timeout_secs: u64,
    /// Overall budget for one tile request.
    pub request_timeout: Option<Duration>,
    pub writeback_max_concurrent: usize,
    pub policy: CoordinatePolicy,
    pub drain_timeout: Duration,
}

impl AppConfig {
    /// Create a config with default server and resolver settings.
    pub fn new(store: StoreConfig, registry: RegistryConfig) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            store,
            registry,
            download_timeout_secs: DEFAULT_TIMEOUT_SECS,
            request_timeout: None,
            writeback_max_concurrent: DEFAULT_MAX_CONCURRENT_WRITEBACKS,
            policy: CoordinatePolicy::PassThrough,
            drain_timeout: Duration::from_secs(DEFAULT_DRAIN_TIMEOUT_SECS),
        }
    }

    /// Translate a loaded config file into an application config.
    pub fn from_config_file(config: &ConfigFile) -> Self {
        let store = match config.cache.backend {
            CacheBackend::Disk => StoreConfig::disk(config.cache.directory.clone()),
            CacheBackend::Memory => StoreConfig::memory(config.cache.memory_size),
        };
        let policy = if config.tiles.validate {
            CoordinatePolicy::Validate {
                max_zoom: config.tiles.max_zoom,
            }
        } else {
            CoordinatePolicy::PassThrough
        };

        Self {
            host: config.server.host.clone(),
            port: config.server.port,
            store,
            registry: config.providers.clone(),
            download_timeout_secs: config.download.timeout,
            request_timeout: config.download.request_timeout.map(Duration::from_secs),
            writeback_max_concurrent: config.writeback.max_concurrent,
            policy,
            drain_timeout: Duration::from_secs(DEFAULT_DRAIN_TIMEOUT_SECS),
        }
    }

    pub fn with_bind(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = host.into();
        self.port = port;
        self
    }

    pub fn with_policy(mut self, policy: CoordinatePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// `host:port` to bind the listener to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_new_uses_defaults() {
        let config = AppConfig::new(StoreConfig::memory(1024), RegistryConfig::default());
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.policy, CoordinatePolicy::PassThrough);
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.download_timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_from_config_file() {
        let mut file = ConfigFile::default();
        file.server.host = "127.0.0.1".to_string();
        file.server.port = 9000;
        file.cache.backend = CacheBackend::Disk;
        file.cache.directory = PathBuf::from("/srv/tiles");
        file.download.request_timeout = Some(15);
        file.writeback.max_concurrent = 3;
        file.tiles.validate = true;
        file.tiles.max_zoom = 18;

        let config = AppConfig::from_config_file(&file);

        assert_eq!(config.bind_address(), "127.0.0.1:9000");
        assert_eq!(config.store, StoreConfig::disk("/srv/tiles"));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(15)));
        assert_eq!(config.writeback_max_concurrent, 3);
        assert_eq!(config.policy, CoordinatePolicy::Validate { max_zoom: 18 });
        assert_eq!(config.registry, file.providers);
    }

    #[test]
    fn test_memory_backend_uses_memory_size() {
        let mut file = ConfigFile::default();
        file.cache.backend = CacheBackend::Memory;
        file.cache.memory_size = 4096;

        let config = AppConfig::from_config_file(&file);
        assert_eq!(config.store, StoreConfig::memory(4096));
    }

    #[test]
    fn test_builders() {
        let config = AppConfig::new(StoreConfig::memory(1024), RegistryConfig::default())
            .with_bind("localhost", 1234)
            .with_policy(CoordinatePolicy::Validate { max_zoom: 10 })
            .with_request_timeout(Some(Duration::from_secs(2)));
        assert_eq!(config.bind_address(), "localhost:1234");
        assert_eq!(config.policy, CoordinatePolicy::Validate { max_zoom: 10 });
        assert_eq!(config.request_timeout, Some(Duration::from_secs(2)));
    }
}
