//! Command-line argument parsing for natlib_fetcher
//!
//! Defines the CLI structure using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::constants::logging;

/// natlib_fetcher - verify and fetch native library artifacts
#[derive(Parser, Debug)]
#[command(
    name = "natlib_fetcher",
    version,
    about = "Verify local binary artifacts against an MD5 manifest and fetch stale ones",
    long_about = "Checks every artifact listed in a JSON manifest against its expected MD5 digest,
then concurrently downloads the files that are missing or mismatched."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Log level derived from the verbosity flags
    pub fn log_level(&self) -> &'static str {
        if self.global.quiet {
            "error"
        } else if self.global.very_verbose {
            "debug"
        } else if self.global.verbose {
            "info"
        } else {
            logging::DEFAULT_LOG_LEVEL
        }
    }
}

/// Global arguments available to all subcommands
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Verify all manifest entries and fetch the stale ones
    Sync(SyncArgs),

    /// Verify only; report which entries would be fetched
    Check(CheckArgs),

    /// Print the MD5 digest of a single file
    Digest(DigestArgs),
}

/// Arguments for the sync command
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Path to the JSON artifact manifest
    #[arg(value_name = "MANIFEST")]
    pub manifest: PathBuf,

    /// Base directory for relative output locations
    /// (defaults to the manifest's directory)
    #[arg(long, value_name = "DIR")]
    pub base_dir: Option<PathBuf>,

    /// Connectivity probe timeout in milliseconds
    #[arg(long, value_name = "MS", default_value = "1000")]
    pub probe_timeout_ms: u64,
}

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the JSON artifact manifest
    #[arg(value_name = "MANIFEST")]
    pub manifest: PathBuf,

    /// Base directory for relative output locations
    /// (defaults to the manifest's directory)
    #[arg(long, value_name = "DIR")]
    pub base_dir: Option<PathBuf>,
}

/// Arguments for the digest command
#[derive(Args, Debug)]
pub struct DigestArgs {
    /// File to digest
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_from_flags() {
        let cli = Cli::parse_from(["natlib_fetcher", "check", "natives.json"]);
        assert_eq!(cli.log_level(), "warn");

        let cli = Cli::parse_from(["natlib_fetcher", "-v", "check", "natives.json"]);
        assert_eq!(cli.log_level(), "info");

        let cli = Cli::parse_from(["natlib_fetcher", "--very-verbose", "check", "natives.json"]);
        assert_eq!(cli.log_level(), "debug");

        let cli = Cli::parse_from(["natlib_fetcher", "-q", "check", "natives.json"]);
        assert_eq!(cli.log_level(), "error");
    }

    #[test]
    fn test_sync_args_parse() {
        let cli = Cli::parse_from([
            "natlib_fetcher",
            "sync",
            "natives.json",
            "--base-dir",
            "/opt/libs",
            "--probe-timeout-ms",
            "250",
        ]);

        match cli.command {
            Commands::Sync(args) => {
                assert_eq!(args.manifest, PathBuf::from("natives.json"));
                assert_eq!(args.base_dir, Some(PathBuf::from("/opt/libs")));
                assert_eq!(args.probe_timeout_ms, 250);
            }
            other => panic!("Expected sync command, got {:?}", other),
        }
    }
}
