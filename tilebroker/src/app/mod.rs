//! Application bootstrap and lifecycle management.
//!
//! ```text
//! AppConfig ──► StoreConfig::open ──────► Arc<dyn TileStore>
//!          ──► ProviderRegistry ────────► Arc<ProviderRegistry>
//!          ──► AsyncReqwestClient
//!                       │
//!                       ▼
//!                 TileResolver ──► server::serve ──► shutdown + drain
//! ```

mod bootstrap;
mod config;
mod error;

pub use bootstrap::TileBrokerApp;
pub use config::{AppConfig, DEFAULT_DRAIN_TIMEOUT_SECS};
pub use error::AppError;
