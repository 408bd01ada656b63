//! Common types and utilities shared across CLI commands.

use std::path::{Path, PathBuf};

use clap::Args;
use tilebroker::config::{config_file_path, ConfigFile};
use tilebroker::coord::{ProviderId, ThemeMode, TileCoordinate, TileRequest};

use crate::error::CliError;

/// Tile selection shared by `fetch` and `key`.
#[derive(Debug, Args)]
pub struct TileArgs {
    /// Provider name (case-insensitive)
    #[arg(long, default_value = "maptiler")]
    pub provider: String,

    /// Theme: "light" selects the light style, anything else the dark one
    #[arg(long, default_value = "dark")]
    pub theme: String,

    /// Tile column
    #[arg(long, allow_hyphen_values = true)]
    pub x: String,

    /// Tile row
    #[arg(long, allow_hyphen_values = true)]
    pub y: String,

    /// Zoom level
    #[arg(long, allow_hyphen_values = true)]
    pub z: String,
}

impl TileArgs {
    /// Build the tile request these arguments describe.
    pub fn to_request(&self) -> Result<TileRequest, CliError> {
        let coordinate = TileCoordinate::new(self.x.as_str(), self.y.as_str(), self.z.as_str())
            .map_err(|e| CliError::InvalidArgument(e.to_string()))?;
        Ok(TileRequest::new(
            ProviderId::new(&self.provider),
            ThemeMode::from_query(Some(self.theme.as_str())),
            coordinate,
        ))
    }
}

/// Load the config file (default path unless overridden) and overlay
/// credentials from the environment.
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile, CliError> {
    let path: PathBuf = path.map(Path::to_path_buf).unwrap_or_else(config_file_path);
    let mut config = ConfigFile::load_from(&path)?;
    config.apply_env_credentials();
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(provider: &str, theme: &str, x: &str, y: &str, z: &str) -> TileArgs {
        TileArgs {
            provider: provider.to_string(),
            theme: theme.to_string(),
            x: x.to_string(),
            y: y.to_string(),
            z: z.to_string(),
        }
    }

    #[test]
    fn test_to_request_normalises_provider_and_theme() {
        let request = args("MapTiler", "light", "3", "2", "5").to_request().unwrap();
        assert_eq!(request.provider().as_str(), "maptiler");
        assert_eq!(request.theme(), ThemeMode::Light);

        let request = args("maptiler", "Light", "3", "2", "5").to_request().unwrap();
        assert_eq!(request.theme(), ThemeMode::Dark);
    }

    #[test]
    fn test_to_request_rejects_malformed_coordinate() {
        let err = args("maptiler", "dark", "1e3", "2", "5").to_request().unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument(_)));
    }

    #[test]
    fn test_load_config_from_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[server]\nport = 9999\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.server.port, 9999);
    }

    #[test]
    fn test_load_config_reports_invalid_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[cache]\nbackend = tape\n").unwrap();

        assert!(matches!(load_config(Some(&path)), Err(CliError::Config(_))));
    }
}
