//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use tilebroker::app::AppError;
use tilebroker::config::{config_file_path, ConfigFileError};
use tilebroker::resolver::ResolveError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(std::io::Error),
    /// Failed to load the config file
    Config(ConfigFileError),
    /// Failed to start or run the broker
    App(AppError),
    /// Failed to resolve a tile
    Fetch(ResolveError),
    /// Failed to write output file
    FileWrite { path: String, error: std::io::Error },
    /// Bad command-line argument
    InvalidArgument(String),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Config(_) => {
                eprintln!();
                eprintln!("Check the config file at {}", config_file_path().display());
                eprintln!("or pass another one with --config <PATH>.");
            }
            CliError::Fetch(ResolveError::Configuration { provider, .. }) => {
                eprintln!();
                eprintln!("Provide a credential for '{}' with either:", provider);
                eprintln!(
                    "  1. the {} environment variable",
                    tilebroker::config::credential_env_var(provider)
                );
                eprintln!("  2. api_key under [provider.{}] in config.ini", provider);
            }
            CliError::Fetch(ResolveError::UnknownProvider(_)) => {
                eprintln!();
                eprintln!("Run 'tilebroker providers' to list configured providers.");
            }
            CliError::App(AppError::Bind { .. }) => {
                eprintln!();
                eprintln!("Common issues:");
                eprintln!("  1. Port already in use: pick another with --port");
                eprintln!("  2. Ports below 1024 need elevated privileges");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(e) => write!(f, "Failed to initialize logging: {}", e),
            CliError::Config(e) => write!(f, "{}", e),
            CliError::App(e) => write!(f, "{}", e),
            CliError::Fetch(e) => write!(f, "Failed to fetch tile: {}", e),
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path, error)
            }
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::LoggingInit(e) => Some(e),
            CliError::Config(e) => Some(e),
            CliError::App(e) => Some(e),
            CliError::Fetch(e) => Some(e),
            CliError::FileWrite { error, .. } => Some(error),
            CliError::InvalidArgument(_) => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<AppError> for CliError {
    fn from(e: AppError) -> Self {
        CliError::App(e)
    }
}

impl From<ResolveError> for CliError {
    fn from(e: ResolveError) -> Self {
        CliError::Fetch(e)
    }
}
