//! Command handlers for the natlib_fetcher CLI
//!
//! Handlers coordinate between CLI arguments and the core application
//! functionality, and own all user-facing console output.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::app::{
    file_digest, load_manifest, run, verify_all, ClientConfig, FetchClient, StaleReason,
    Verification,
};
use crate::cli::{CheckArgs, DigestArgs, SyncArgs};
use crate::errors::{AppError, Result};

/// Handle the sync command
///
/// Verifies every manifest entry and fetches the stale subset. Any artifact
/// that does not end up valid makes the whole run fail.
pub async fn handle_sync(args: SyncArgs, quiet: bool) -> Result<()> {
    let artifacts = load_manifest(&args.manifest, args.base_dir.as_deref()).await?;
    info!(
        "Syncing {} artifact(s) from {}",
        artifacts.len(),
        args.manifest.display()
    );

    let client = FetchClient::new(ClientConfig {
        probe_timeout: Duration::from_millis(args.probe_timeout_ms),
        ..Default::default()
    })?;

    let spinner = phase_spinner(quiet, format!("Syncing {} artifact(s)...", artifacts.len()));
    let summary = run(&client, artifacts).await;
    spinner.finish_and_clear();

    if summary.already_valid == summary.checked {
        println!("All files already downloaded.");
        return Ok(());
    }

    for failed in &summary.failures {
        println!(
            "Failed to download file: {}",
            failed.output_location.display()
        );
    }

    if summary.is_success() {
        println!(
            "Fetched {} file(s), {} already valid.",
            summary.fetched, summary.already_valid
        );
        Ok(())
    } else {
        Err(AppError::Incomplete {
            failed: summary.failures.len(),
        })
    }
}

/// Handle the check command
///
/// Verify-only pass with no network activity. Exits non-zero when any entry
/// needs fetching, so it can gate CI.
pub async fn handle_check(args: CheckArgs, quiet: bool) -> Result<()> {
    let artifacts = load_manifest(&args.manifest, args.base_dir.as_deref()).await?;

    let spinner = phase_spinner(quiet, format!("Checking {} artifact(s)...", artifacts.len()));
    let outcomes = verify_all(&artifacts).await;
    spinner.finish_and_clear();

    let mut stale = 0usize;
    for (artifact, outcome) in artifacts.iter().zip(&outcomes) {
        match outcome {
            Verification::Valid => {}
            Verification::NeedsFetch(reason) => {
                stale += 1;
                let cause = match reason {
                    StaleReason::Missing => "missing",
                    StaleReason::DigestMismatch => "digest mismatch",
                };
                println!("{}: {}", artifact.output_location.display(), cause);
            }
        }
    }

    if stale == 0 {
        println!("All {} file(s) valid.", artifacts.len());
        Ok(())
    } else {
        Err(AppError::generic(format!(
            "{} of {} file(s) need fetching",
            stale,
            artifacts.len()
        )))
    }
}

/// Handle the digest command: print the MD5 of one file
pub async fn handle_digest(args: DigestArgs) -> Result<()> {
    match file_digest(&args.file).await {
        Some(digest) => {
            println!("{}", digest);
            Ok(())
        }
        None => Err(AppError::generic(format!(
            "Cannot read file: {}",
            args.file.display()
        ))),
    }
}

/// Steady-tick spinner shown while a phase is in flight
fn phase_spinner(quiet: bool, message: String) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}
