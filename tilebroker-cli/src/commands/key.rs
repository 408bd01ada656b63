//! `tilebroker key`: print the cache key for a tile.

use tilebroker::cache::CacheKey;

use super::common::TileArgs;
use crate::error::CliError;

pub fn run(args: &TileArgs) -> Result<(), CliError> {
    let request = args.to_request()?;
    println!("{}", CacheKey::for_request(&request));
    Ok(())
}
