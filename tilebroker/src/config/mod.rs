//! Configuration file support.
//!
//! Settings are read from an INI file (default `~/.tilebroker/config.ini`).
//! A missing file yields defaults; every key is optional.
//!
//! ```ini
//! [server]
//! host = 0.0.0.0
//! port = 8080
//!
//! [cache]
//! backend = disk
//! directory = ~/.tilebroker/tiles
//! memory_size = 512MB
//!
//! [provider.maptiler]
//! api_key = your-key
//! ```

mod file;
mod parser;
mod settings;
mod size;

pub use file::{
    config_directory, config_file_path, credential_env_var, ConfigFileError,
    CREDENTIAL_ENV_SUFFIX,
};
pub use parser::PROVIDER_SECTION_PREFIX;
pub use settings::{
    CacheBackend, CacheSettings, ConfigFile, DownloadSettings, ServerSettings, TileSettings,
    WritebackSettings, DEFAULT_HOST, DEFAULT_PORT,
};
pub use size::{format_size, parse_size, SizeParseError};
