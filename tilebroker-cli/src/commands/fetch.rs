//! `tilebroker fetch`: resolve one tile through the cache and save it.

use std::path::PathBuf;

use clap::Args;
use tilebroker::app::{AppConfig, TileBrokerApp};
use tilebroker::config::ConfigFile;
use tokio_util::sync::CancellationToken;

use super::common::TileArgs;
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct FetchArgs {
    #[command(flatten)]
    pub tile: TileArgs,

    /// File to write the tile to
    #[arg(long, short)]
    pub output: PathBuf,
}

pub async fn run(args: FetchArgs, config: ConfigFile) -> Result<(), CliError> {
    let request = args.tile.to_request()?;
    let app = TileBrokerApp::start(AppConfig::from_config_file(&config)).await?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let result = app.resolver().resolve_with_cancel(&request, &cancel).await;
    // Let a scheduled writeback land so the next request hits the cache.
    app.shutdown().await;
    let tile = result?;

    std::fs::write(&args.output, &tile.data).map_err(|error| CliError::FileWrite {
        path: args.output.display().to_string(),
        error,
    })?;

    println!(
        "{} bytes from {} ({}) -> {}",
        tile.data.len(),
        tile.served_from,
        tile.key,
        args.output.display()
    );
    Ok(())
}
