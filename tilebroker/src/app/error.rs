//! Application error types.

use std::fmt;
use std::io;

use crate::cache::StoreError;
use crate::provider::ProviderError;

/// Errors that can occur during application lifecycle.
#[derive(Debug)]
pub enum AppError {
    /// Failed to open the tile store.
    StoreOpen(StoreError),

    /// Failed to create the origin HTTP client.
    HttpClient(ProviderError),

    /// Failed to bind the listener.
    Bind { address: String, source: io::Error },

    /// The HTTP server stopped with an error.
    Server(io::Error),

    /// Configuration error.
    Config(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::StoreOpen(e) => write!(f, "Failed to open tile store: {}", e),
            AppError::HttpClient(e) => write!(f, "Failed to create HTTP client: {}", e),
            AppError::Bind { address, source } => {
                write!(f, "Failed to bind {}: {}", address, source)
            }
            AppError::Server(e) => write!(f, "Server error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::StoreOpen(e) => Some(e),
            AppError::HttpClient(e) => Some(e),
            AppError::Bind { source, .. } => Some(source),
            AppError::Server(e) => Some(e),
            AppError::Config(_) => None,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::StoreOpen(e)
    }
}

impl From<ProviderError> for AppError {
    fn from(e: ProviderError) -> Self {
        AppError::HttpClient(e)
    }
}
