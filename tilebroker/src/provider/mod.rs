//! Tile origin providers.
//!
//! This module resolves a (provider, theme) pair to an origin descriptor,
//! turns a coordinate into a concrete origin URL and fetches the tile over
//! HTTP.
//!
//! # Example
//!
//! ```
//! use tilebroker::coord::{ProviderId, ThemeMode, TileCoordinate};
//! use tilebroker::provider::{origin_url, ProviderDefinition, ProviderRegistry, RegistryConfig};
//!
//! let config = RegistryConfig::new(vec![ProviderDefinition::maptiler(Some("abc".into()))]);
//! let registry = ProviderRegistry::from_config(&config);
//!
//! let descriptor = registry
//!     .resolve(&ProviderId::new("maptiler"), ThemeMode::Dark)
//!     .unwrap();
//! let url = origin_url(descriptor, &TileCoordinate::new("3", "2", "5").unwrap()).unwrap();
//! assert_eq!(url, "https://api.maptiler.com/maps/streets-v2-dark/5/3/2@2x.png?key=abc");
//! ```

mod http;
mod registry;
mod template;
mod types;

pub use http::{AsyncHttpClient, AsyncReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use registry::{
    ProviderDefinition, ProviderRegistry, RegistryConfig, RegistryError,
    DEFAULT_CREDENTIAL_PARAM, MAPTILER,
};
pub use template::{
    has_blank_credential, inject_credential, origin_url, strip_query, substitute,
    CREDENTIAL_TOKEN,
};
pub use types::{ProviderDescriptor, ProviderError, ProviderSummary};

#[cfg(test)]
pub use http::tests::MockAsyncHttpClient;
