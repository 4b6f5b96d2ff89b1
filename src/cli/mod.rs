//! Command-line interface for natlib_fetcher

mod args;
mod commands;

pub use args::{CheckArgs, Cli, Commands, DigestArgs, GlobalArgs, SyncArgs};
pub use commands::{handle_check, handle_digest, handle_sync};
