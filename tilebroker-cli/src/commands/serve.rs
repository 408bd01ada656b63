//! `tilebroker serve`: run the tile endpoint until interrupted.

use std::path::PathBuf;

use clap::Args;
use tilebroker::app::{AppConfig, TileBrokerApp};
use tilebroker::config::ConfigFile;
use tilebroker::logging::{init_logging, DEFAULT_LOG_DIR, DEFAULT_LOG_FILE};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::CliError;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to bind (overrides [server] host)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides [server] port)
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory for the log file
    #[arg(long, default_value = DEFAULT_LOG_DIR)]
    pub log_dir: PathBuf,
}

pub async fn run(args: ServeArgs, config: ConfigFile) -> Result<(), CliError> {
    let _logging = init_logging(&args.log_dir, DEFAULT_LOG_FILE).map_err(CliError::LoggingInit)?;

    let mut app_config = AppConfig::from_config_file(&config);
    if let Some(host) = args.host {
        app_config.host = host;
    }
    if let Some(port) = args.port {
        app_config.port = port;
    }

    let app = TileBrokerApp::start(app_config).await?;
    spawn_signal_handler(app.shutdown_token());

    let served = app.serve().await;
    let drained = app.shutdown().await;
    if !drained {
        warn!("Some cache writebacks did not finish before exit");
    }
    served?;
    Ok(())
}

/// Cancel `token` on Ctrl-C or SIGTERM.
fn spawn_signal_handler(token: CancellationToken) {
    tokio::spawn(async move {
        wait_for_signal().await;
        info!("Shutdown signal received");
        token.cancel();
    });
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut terminate) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = terminate.recv() => {}
            }
        }
        Err(e) => {
            warn!(error = %e, "Cannot listen for SIGTERM; Ctrl-C only");
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
