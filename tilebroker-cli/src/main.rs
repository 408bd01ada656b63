//! TileBroker CLI - Command-line interface
//!
//! Runs the tile endpoint and offers one-shot helpers for inspecting
//! providers and cache keys.

mod commands;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::common::{load_config, TileArgs};
use commands::fetch::FetchArgs;
use commands::serve::ServeArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "tilebroker")]
#[command(version, about = "Cache-aside map tile broker", long_about = None)]
struct Cli {
    /// Config file (default: ~/.tilebroker/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve tiles over HTTP
    Serve(ServeArgs),
    /// List configured providers
    Providers,
    /// Resolve a single tile through the cache and write it to a file
    Fetch(FetchArgs),
    /// Print the cache key for a tile
    Key(TileArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        e.exit();
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    if !matches!(cli.command, Command::Serve(_)) {
        tilebroker::logging::init_stderr_logging();
    }

    match cli.command {
        Command::Serve(args) => commands::serve::run(args, load_config(cli.config.as_deref())?).await,
        Command::Providers => {
            commands::providers::run(&load_config(cli.config.as_deref())?);
            Ok(())
        }
        Command::Fetch(args) => commands::fetch::run(args, load_config(cli.config.as_deref())?).await,
        Command::Key(args) => commands::key::run(&args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::try_parse_from(["tilebroker", "serve", "--port", "9000", "--host", "127.0.0.1"])
            .unwrap();
        match cli.command {
            Command::Serve(args) => {
                assert_eq!(args.port, Some(9000));
                assert_eq!(args.host.as_deref(), Some("127.0.0.1"));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_fetch_with_global_config() {
        let cli = Cli::try_parse_from([
            "tilebroker", "fetch", "--x", "3", "--y", "2", "--z", "5", "--theme", "light",
            "--output", "tile.png", "--config", "/tmp/tb.ini",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/tb.ini")));
        match cli.command {
            Command::Fetch(args) => {
                assert_eq!(args.tile.provider, "maptiler");
                assert_eq!(args.tile.theme, "light");
                assert_eq!(args.output, PathBuf::from("tile.png"));
            }
            _ => panic!("expected fetch"),
        }
    }

    #[test]
    fn test_fetch_requires_coordinates() {
        assert!(Cli::try_parse_from(["tilebroker", "fetch", "--output", "t.png"]).is_err());
    }
}
