//! natlib_fetcher CLI application
//!
//! Verifies native library artifacts against a manifest of MD5 digests and
//! concurrently fetches the ones that are missing or mismatched.

use std::process;

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use natlib_fetcher::cli::{handle_check, handle_digest, handle_sync, Cli, Commands};
use natlib_fetcher::errors::Result;

#[tokio::main]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    let cli = Cli::parse_args();

    init_logging(&cli);

    info!("natlib_fetcher v{} starting", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Sync(args) => {
            info!("Executing sync command");
            handle_sync(args, cli.global.quiet).await
        }
        Commands::Check(args) => {
            info!("Executing check command");
            handle_check(args, cli.global.quiet).await
        }
        Commands::Digest(args) => handle_digest(args).await,
    }
}

/// Initialize logging based on CLI verbosity settings
fn init_logging(cli: &Cli) {
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("natlib_fetcher={}", cli.log_level()).parse().unwrap());

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
