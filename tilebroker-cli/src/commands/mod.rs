//! CLI subcommands.

pub mod common;
pub mod fetch;
pub mod key;
pub mod providers;
pub mod serve;
