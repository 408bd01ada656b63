//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use std::path::PathBuf;

use ini::{Ini, Properties};

use crate::coord::{ProviderId, ThemeMode, TileScheme};
use crate::provider::ProviderDefinition;

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use super::size::parse_size;

/// Prefix of per-provider sections, e.g. `[provider.maptiler]`.
pub const PROVIDER_SECTION_PREFIX: &str = "provider.";

/// Highest zoom accepted for `[tiles] max_zoom`.
const MAX_CONFIGURABLE_ZOOM: u8 = 30;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
/// Unknown sections and keys are ignored.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [server] section
    if let Some(section) = ini.section(Some("server")) {
        if let Some(v) = section.get("host") {
            let v = v.trim();
            if v.is_empty() {
                return Err(invalid("server", "host", v, "must not be empty"));
            }
            config.server.host = v.to_string();
        }
        if let Some(v) = section.get("port") {
            config.server.port = v
                .trim()
                .parse()
                .map_err(|_| invalid("server", "port", v, "must be an integer between 0 and 65535"))?;
        }
    }

    // [cache] section
    if let Some(section) = ini.section(Some("cache")) {
        if let Some(v) = section.get("backend") {
            config.cache.backend = v
                .parse()
                .map_err(|_| invalid("cache", "backend", v, "must be 'disk' or 'memory'"))?;
        }
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.cache.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("memory_size") {
            config.cache.memory_size = parse_size(v).map_err(|_| {
                invalid(
                    "cache",
                    "memory_size",
                    v,
                    "expected format like '2GB', '500MB', or '1024KB'",
                )
            })?;
        }
    }

    // [download] section
    if let Some(section) = ini.section(Some("download")) {
        if let Some(v) = section.get("timeout") {
            config.download.timeout = parse_positive(v)
                .ok_or_else(|| invalid("download", "timeout", v, "must be a positive integer (seconds)"))?;
        }
        if let Some(v) = section.get("request_timeout") {
            let secs: u64 = v.trim().parse().map_err(|_| {
                invalid(
                    "download",
                    "request_timeout",
                    v,
                    "must be a non-negative integer (seconds, 0 disables)",
                )
            })?;
            config.download.request_timeout = (secs > 0).then_some(secs);
        }
    }

    // [writeback] section
    if let Some(section) = ini.section(Some("writeback")) {
        if let Some(v) = section.get("max_concurrent") {
            config.writeback.max_concurrent = parse_positive(v)
                .and_then(|n| usize::try_from(n).ok())
                .ok_or_else(|| invalid("writeback", "max_concurrent", v, "must be a positive integer"))?;
        }
    }

    // [tiles] section
    if let Some(section) = ini.section(Some("tiles")) {
        if let Some(v) = section.get("validate") {
            config.tiles.validate = parse_bool(v);
        }
        if let Some(v) = section.get("max_zoom") {
            config.tiles.max_zoom = v
                .trim()
                .parse::<u8>()
                .ok()
                .filter(|z| *z <= MAX_CONFIGURABLE_ZOOM)
                .ok_or_else(|| invalid("tiles", "max_zoom", v, "must be an integer between 0 and 30"))?;
        }
    }

    // [provider.<name>] sections
    for (name, section) in ini.iter() {
        let Some(name) = name else { continue };
        let Some(provider) = name.strip_prefix(PROVIDER_SECTION_PREFIX) else {
            continue;
        };
        let definition = parse_provider_section(name, provider, section, &config)?;
        config.providers.upsert(definition);
    }

    Ok(config)
}

/// Overlay one `[provider.<name>]` section onto the existing definition for
/// that provider, or onto an empty one.
fn parse_provider_section(
    section_name: &str,
    provider: &str,
    section: &Properties,
    config: &ConfigFile,
) -> Result<ProviderDefinition, ConfigFileError> {
    let id = ProviderId::new(provider);
    if !id.is_key_segment() {
        return Err(invalid(
            section_name,
            "",
            provider,
            "provider name must be non-empty and contain no path separators",
        ));
    }

    let mut definition = config
        .providers
        .get(&id)
        .cloned()
        .unwrap_or_else(|| ProviderDefinition::new(id.as_str(), ""));

    if let Some(v) = section.get("base_url") {
        definition.base_url = v.trim().to_string();
    }
    for (key, theme) in [("dark_url", ThemeMode::Dark), ("light_url", ThemeMode::Light)] {
        if let Some(v) = section.get(key) {
            let v = v.trim();
            if v.is_empty() {
                return Err(invalid(section_name, key, v, "must not be empty"));
            }
            definition = definition.with_template(theme, v);
        }
    }
    if let Some(v) = section.get("api_key") {
        definition = definition.with_credential(Some(v.to_string()));
    }
    if let Some(v) = section.get("scheme") {
        let scheme: TileScheme = v
            .parse()
            .map_err(|_| invalid(section_name, "scheme", v, "must be 'xyz' or 'tms'"))?;
        definition = definition.with_scheme(scheme);
    }
    if let Some(v) = section.get("credential_param") {
        let v = v.trim();
        let param = (!v.is_empty() && !v.eq_ignore_ascii_case("none")).then(|| v.to_string());
        definition = definition.with_credential_param(param);
    }

    Ok(definition)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_positive(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok().filter(|n| *n > 0)
}

/// Parse a boolean value from config (true/false, yes/no, 1/0, on/off).
pub(super) fn parse_bool(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::CacheBackend;
    use tempfile::TempDir;

    fn load(contents: &str) -> Result<ConfigFile, ConfigFileError> {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(&config_path, contents).unwrap();
        ConfigFile::load_from(&config_path)
    }

    #[test]
    fn test_full_config() {
        let config = load(
            r#"
[server]
host = 127.0.0.1
port = 9090

[cache]
backend = memory
directory = /var/cache/tiles
memory_size = 64MB

[download]
timeout = 10
request_timeout = 20

[writeback]
max_concurrent = 4

[tiles]
validate = yes
max_zoom = 18
"#,
        )
        .unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.cache.backend, CacheBackend::Memory);
        assert_eq!(config.cache.directory, PathBuf::from("/var/cache/tiles"));
        assert_eq!(config.cache.memory_size, 64 * 1024 * 1024);
        assert_eq!(config.download.timeout, 10);
        assert_eq!(config.download.request_timeout, Some(20));
        assert_eq!(config.writeback.max_concurrent, 4);
        assert!(config.tiles.validate);
        assert_eq!(config.tiles.max_zoom, 18);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = load("[server]\nport = 8081\n").unwrap();
        let default = ConfigFile::default();

        assert_eq!(config.server.port, 8081);
        assert_eq!(config.server.host, default.server.host);
        assert_eq!(config.cache, default.cache);
        assert_eq!(config.providers, default.providers);
    }

    #[test]
    fn test_request_timeout_zero_disables() {
        let config = load("[download]\nrequest_timeout = 0\n").unwrap();
        assert_eq!(config.download.request_timeout, None);
    }

    #[test]
    fn test_invalid_values() {
        let cases = [
            ("[server]\nport = 70000\n", "port"),
            ("[server]\nhost =\n", "host"),
            ("[cache]\nbackend = s3\n", "backend"),
            ("[cache]\nmemory_size = 2TB\n", "memory_size"),
            ("[download]\ntimeout = 0\n", "timeout"),
            ("[writeback]\nmax_concurrent = -1\n", "max_concurrent"),
            ("[tiles]\nmax_zoom = 40\n", "max_zoom"),
            ("[provider.osm]\nscheme = mercator\n", "scheme"),
        ];
        for (contents, key) in cases {
            let err = load(contents).unwrap_err();
            assert!(
                err.to_string().contains(key),
                "expected error about {key}, got: {err}"
            );
        }
    }

    #[test]
    fn test_provider_section_overrides_builtin() {
        let config = load(
            r#"
[provider.maptiler]
api_key = secret
"#,
        )
        .unwrap();

        assert_eq!(config.providers.providers.len(), 1);
        let maptiler = &config.providers.providers[0];
        assert_eq!(maptiler.credential.as_deref(), Some("secret"));
        assert_eq!(maptiler.templates.len(), 2);
    }

    #[test]
    fn test_provider_section_adds_provider() {
        let config = load(
            r#"
[provider.OSM]
base_url = https://tile.openstreetmap.org/
light_url = https://tile.openstreetmap.org/{z}/{x}/{y}.png
scheme = tms
credential_param = none
"#,
        )
        .unwrap();

        assert_eq!(config.providers.providers.len(), 2);
        let osm = &config.providers.providers[1];
        assert_eq!(osm.name.as_str(), "osm");
        assert_eq!(osm.base_url, "https://tile.openstreetmap.org/");
        assert_eq!(osm.scheme, TileScheme::Tms);
        assert_eq!(osm.credential_param, None);
        assert!(osm.templates.contains_key(&ThemeMode::Light));
        assert!(!osm.templates.contains_key(&ThemeMode::Dark));
    }

    #[test]
    fn test_provider_name_must_be_key_segment() {
        for section in ["[provider.]", "[provider...]", "[provider.a/b]"] {
            let err = load(&format!("{section}\nbase_url = https://t/\n")).unwrap_err();
            assert!(
                matches!(err, ConfigFileError::InvalidValue { .. }),
                "{section}: {err}"
            );
        }
    }

    #[test]
    fn test_empty_template_rejected() {
        let err = load("[provider.osm]\ndark_url =\n").unwrap_err();
        assert!(err.to_string().contains("dark_url"));
    }

    #[test]
    fn test_parse_bool() {
        for v in ["true", "TRUE", "1", "yes", " on "] {
            assert!(parse_bool(v), "{v}");
        }
        for v in ["false", "0", "no", "off", ""] {
            assert!(!parse_bool(v), "{v}");
        }
    }

    #[test]
    fn test_expand_tilde() {
        let path = expand_tilde("~/test/path");
        if let Some(home) = dirs::home_dir() {
            assert_eq!(path, home.join("test/path"));
        }

        let path = expand_tilde("/absolute/path");
        assert_eq!(path, PathBuf::from("/absolute/path"));
    }
}
