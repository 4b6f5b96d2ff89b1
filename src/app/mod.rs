//! Core application logic for natlib_fetcher
//!
//! This module contains the artifact data model, the digest primitive, the
//! concurrent verifier, the HTTP fetch client and the run orchestration.
//!
//! # Examples
//!
//! ```rust,no_run
//! use natlib_fetcher::app::{load_manifest, ClientConfig, FetchClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let artifacts = load_manifest("natives.json".as_ref(), None).await?;
//! let client = FetchClient::new(ClientConfig::default())?;
//!
//! let summary = natlib_fetcher::app::run(&client, artifacts).await;
//! for failed in &summary.failures {
//!     eprintln!("failed: {}", failed.output_location.display());
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod digest;
pub mod hash;
pub mod manifest;
pub mod runner;
pub mod verify;

// Re-export main public API
pub use client::{ClientConfig, FetchClient, Reachability};
pub use digest::file_digest;
pub use hash::Md5Digest;
pub use manifest::{load_manifest, ArtifactDescriptor};
pub use runner::{run, RunSummary};
pub use verify::{verify_all, StaleReason, Verification};
