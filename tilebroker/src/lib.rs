//! TileBroker - cache-aside map tile broker
//!
//! Serves raster map tiles over HTTP. Each request is answered from a
//! persistent tile store when possible; on a miss the tile is fetched from
//! the configured origin provider, returned to the caller, and written back
//! to the store in the background.
//!
//! # High-Level API
//!
//! ```ignore
//! use tilebroker::app::{AppConfig, TileBrokerApp};
//! use tilebroker::config::ConfigFile;
//!
//! let mut file = ConfigFile::load()?;
//! file.apply_env_credentials();
//!
//! let app = TileBrokerApp::start(AppConfig::from_config_file(&file)).await?;
//! app.serve().await?;
//! app.shutdown().await;
//! ```

pub mod app;
pub mod cache;
pub mod config;
pub mod coord;
pub mod logging;
pub mod provider;
pub mod resolver;
pub mod server;
