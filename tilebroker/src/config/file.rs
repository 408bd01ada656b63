//! Configuration file handling for ~/.tilebroker/config.ini.
//!
//! Settings structs live in [`super::settings`], parsing in
//! [`super::parser`].

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;
use tracing::debug;

use crate::coord::ProviderId;

use super::settings::ConfigFile;

/// Suffix of the environment variable holding a provider credential,
/// e.g. `MAPTILER_API_KEY`.
pub const CREDENTIAL_ENV_SUFFIX: &str = "_API_KEY";

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read or parse the config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

impl ConfigFile {
    /// Load configuration from the default path (~/.tilebroker/config.ini).
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Overlay provider credentials from the process environment.
    ///
    /// `MAPTILER_API_KEY` sets the credential of `maptiler`, and so on.
    /// A set variable wins over the file; blank values are ignored.
    pub fn apply_env_credentials(&mut self) {
        self.apply_credentials_from(|name| std::env::var(name).ok());
    }

    /// Overlay provider credentials from `lookup`, keyed by
    /// [`credential_env_var`].
    pub fn apply_credentials_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for definition in &mut self.providers.providers {
            let var = credential_env_var(&definition.name);
            let Some(value) = lookup(&var).filter(|v| !v.trim().is_empty()) else {
                continue;
            };
            debug!(provider = %definition.name, var = %var, "Credential taken from environment");
            let updated = definition.clone().with_credential(Some(value));
            *definition = updated;
        }
    }
}

/// Environment variable name carrying a provider's credential.
///
/// ```
/// use tilebroker::config::credential_env_var;
/// use tilebroker::coord::ProviderId;
///
/// assert_eq!(credential_env_var(&ProviderId::new("maptiler")), "MAPTILER_API_KEY");
/// assert_eq!(credential_env_var(&ProviderId::new("my-tiles")), "MY_TILES_API_KEY");
/// ```
pub fn credential_env_var(provider: &ProviderId) -> String {
    let stem: String = provider
        .as_str()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{}{}", stem, CREDENTIAL_ENV_SUFFIX)
}

/// Get the path to the config directory (~/.tilebroker).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".tilebroker")
}

/// Get the path to the config file (~/.tilebroker/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::{CacheBackend, DEFAULT_PORT};
    use crate::provider::{ProviderDefinition, MAPTILER};

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default();

        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.cache.backend, CacheBackend::Disk);
        assert!(config.cache.directory.ends_with(".tilebroker/tiles"));
        assert!(!config.tiles.validate);
        assert_eq!(config.providers.providers.len(), 1);
        assert_eq!(config.providers.providers[0].name.as_str(), MAPTILER);
        assert!(config.providers.providers[0].credential.is_none());
    }

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.ini");

        let config = ConfigFile::load_from(&config_path).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_config_file_path() {
        assert!(config_file_path().ends_with(".tilebroker/config.ini"));
    }

    #[test]
    fn test_env_credential_overrides_file() {
        let mut config = ConfigFile::default();
        config
            .providers
            .upsert(ProviderDefinition::maptiler(Some("from-file".to_string())));
        config
            .providers
            .upsert(ProviderDefinition::new("my-tiles", "https://tiles.example.com/"));

        config.apply_credentials_from(|var| match var {
            "MAPTILER_API_KEY" => Some("from-env".to_string()),
            "MY_TILES_API_KEY" => Some("   ".to_string()),
            _ => None,
        });

        let maptiler = config.providers.get(&ProviderId::new("maptiler")).unwrap();
        assert_eq!(maptiler.credential.as_deref(), Some("from-env"));
        let mine = config.providers.get(&ProviderId::new("my-tiles")).unwrap();
        assert_eq!(mine.credential, None);
    }

    #[test]
    fn test_env_absent_keeps_file_credential() {
        let mut config = ConfigFile::default();
        config
            .providers
            .upsert(ProviderDefinition::maptiler(Some("from-file".to_string())));

        config.apply_credentials_from(|_| None);

        assert_eq!(
            config.providers.providers[0].credential.as_deref(),
            Some("from-file")
        );
    }
}
