//! Application bootstrap implementation.
//!
//! `TileBrokerApp` wires the store, registry, HTTP client and resolver in
//! order, and owns the shutdown sequence: stop accepting requests, then
//! drain pending writebacks.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::config::AppConfig;
use super::error::AppError;
use crate::provider::{AsyncHttpClient, AsyncReqwestClient, ProviderRegistry};
use crate::resolver::TileResolver;
use crate::server;

/// TileBroker application with service lifecycle management.
///
/// # Example
///
/// ```ignore
/// use tilebroker::app::{AppConfig, TileBrokerApp};
///
/// let app = TileBrokerApp::start(config).await?;
/// let shutdown = app.shutdown_token();
/// // elsewhere: shutdown.cancel();
/// app.serve().await?;
/// app.shutdown().await;
/// ```
pub struct TileBrokerApp<C: AsyncHttpClient = AsyncReqwestClient> {
    resolver: Arc<TileResolver<C>>,
    config: AppConfig,
    shutdown: CancellationToken,
}

impl TileBrokerApp<AsyncReqwestClient> {
    /// Start the application with a reqwest origin client.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be opened or the HTTP client
    /// cannot be built.
    pub async fn start(config: AppConfig) -> Result<Self, AppError> {
        let client = AsyncReqwestClient::with_timeout(config.download_timeout_secs)?;
        Self::start_with_client(config, client).await
    }
}

impl<C: AsyncHttpClient + 'static> TileBrokerApp<C> {
    /// Start the application with a caller-supplied origin client.
    pub async fn start_with_client(config: AppConfig, client: C) -> Result<Self, AppError> {
        let store = config.store.open().await?;
        let registry = Arc::new(ProviderRegistry::from_config(&config.registry));
        if registry.is_empty() {
            warn!("No providers configured; every tile request will fail");
        }

        let mut resolver = TileResolver::new(registry, Arc::clone(&store), client)
            .with_policy(config.policy)
            .with_writeback_limit(config.writeback_max_concurrent);
        if let Some(timeout) = config.request_timeout {
            resolver = resolver.with_request_timeout(timeout);
        }

        info!(
            store = store.name(),
            providers = resolver.registry().len(),
            policy = ?config.policy,
            "TileBroker started"
        );

        Ok(Self {
            resolver: Arc::new(resolver),
            config,
            shutdown: CancellationToken::new(),
        })
    }

    pub fn resolver(&self) -> &Arc<TileResolver<C>> {
        &self.resolver
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Token that stops [`serve`](Self::serve) when cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Bind the configured address and serve until shutdown is requested.
    pub async fn serve(&self) -> Result<(), AppError> {
        let address = self.config.bind_address();
        let listener = TcpListener::bind(&address)
            .await
            .map_err(|source| AppError::Bind { address, source })?;
        self.serve_on(listener).await
    }

    /// Serve on an already bound listener until shutdown is requested.
    pub async fn serve_on(&self, listener: TcpListener) -> Result<(), AppError> {
        server::serve(listener, Arc::clone(&self.resolver), self.shutdown.clone())
            .await
            .map_err(AppError::Server)
    }

    /// Stop serving and wait for pending writebacks.
    ///
    /// Returns `true` if every writeback finished within the drain timeout.
    pub async fn shutdown(&self) -> bool {
        self.shutdown.cancel();

        let drained = self.resolver.writeback().drain(self.config.drain_timeout).await;
        let stats = self.resolver.writeback().stats();
        info!(
            completed = stats.completed,
            failed = stats.failed,
            drained,
            "TileBroker shut down"
        );
        drained
    }
}
