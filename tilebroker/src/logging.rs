//! Logging infrastructure for TileBroker.
//!
//! - Writes to `logs/tilebroker.log` (cleared on session start)
//! - Also prints to stdout for tailing
//! - Configurable via the `RUST_LOG` environment variable (default `info`)

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Default log directory, relative to the working directory.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "tilebroker.log";

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping this guard flushes and closes the log file writer.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
    log_path: PathBuf,
}

impl LoggingGuard {
    /// Path of the active log file.
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}

/// Initialize logging to a file and stdout.
///
/// Creates the log directory if needed and truncates any previous log file.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file cannot
/// be cleared.
pub fn init_logging(log_dir: &Path, log_file: &str) -> Result<LoggingGuard, io::Error> {
    let log_path = prepare_log_file(log_dir, log_file)?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_file);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_target(true);

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_ansi(true)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(file_layer)
        .with(stdout_layer)
        .init();

    Ok(LoggingGuard {
        _file_guard: file_guard,
        log_path,
    })
}

/// Initialize stderr-only logging for one-shot commands.
///
/// Defaults to `warn` so command output on stdout stays clean.
pub fn init_stderr_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // Ignore a second initialisation, e.g. from tests.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .try_init();
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Create `log_dir` and truncate `log_dir/log_file`, returning its path.
fn prepare_log_file(log_dir: &Path, log_file: &str) -> Result<PathBuf, io::Error> {
    fs::create_dir_all(log_dir)?;
    let log_path = log_dir.join(log_file);
    fs::write(&log_path, "")?;
    Ok(log_path)
}
