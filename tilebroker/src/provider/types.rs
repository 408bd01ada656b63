//! Provider types

use std::fmt;

use serde::Serialize;

use crate::coord::{ProviderId, ThemeMode, TileScheme};

/// Errors that can occur while talking to a tile origin.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Transport-level failure (connect, timeout, body read)
    HttpError(String),
    /// Origin answered with a non-2xx status
    HttpStatus { status: u16, url: String },
}

impl ProviderError {
    /// HTTP status returned by the origin, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::HttpStatus { status, .. } => Some(*status),
            ProviderError::HttpError(_) => None,
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::HttpError(msg) => write!(f, "HTTP error: {}", msg),
            ProviderError::HttpStatus { status, url } => {
                write!(f, "HTTP {} from {}", status, url)
            }
        }
    }
}

impl std::error::Error for ProviderError {}

/// Everything needed to reach one origin for one theme.
///
/// Built once by the [`ProviderRegistry`](super::ProviderRegistry); the
/// credential has already been injected into `url_template`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderDescriptor {
    /// Normalised provider name (e.g. `maptiler`).
    pub name: ProviderId,
    /// Theme this descriptor serves.
    pub theme: ThemeMode,
    /// Base URL of the origin, informational.
    pub base_url: String,
    /// URL template with `{z}`, `{x}`, `{y}` placeholders.
    pub url_template: String,
    /// Y-axis convention of the origin.
    pub scheme: TileScheme,
    /// Query parameter carrying the credential, checked before each fetch.
    pub credential_param: Option<String>,
}

/// Public view of a descriptor, safe to expose (no template, no credential).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderSummary {
    pub name: ProviderId,
    pub theme: ThemeMode,
    pub base_url: String,
    pub has_credential: bool,
}

impl ProviderDescriptor {
    /// Summary of this descriptor without the URL template.
    pub fn summary(&self) -> ProviderSummary {
        let has_credential = match &self.credential_param {
            Some(param) => !super::template::has_blank_credential(&self.url_template, param),
            None => true,
        };
        ProviderSummary {
            name: self.name.clone(),
            theme: self.theme,
            base_url: self.base_url.clone(),
            has_credential,
        }
    }
}
