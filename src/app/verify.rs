//! Concurrent artifact verification
//!
//! All descriptors are checked independently and concurrently; a problem
//! while digesting one file never affects its siblings and never fails the
//! verify pass as a whole. Unknown correctness degrades to needs-fetch.

use futures::future::join_all;
use tracing::debug;

use crate::app::digest::file_digest;
use crate::app::manifest::ArtifactDescriptor;

/// Outcome of checking one descriptor against its expected digest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// Local file present with the expected content
    Valid,
    /// Local file absent or content differs; a fetch is required
    NeedsFetch(StaleReason),
}

/// Why a descriptor was classified as needing a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleReason {
    /// No readable file at the output location
    Missing,
    /// File present but its digest differs from the expected one
    DigestMismatch,
}

/// Verify all descriptors concurrently.
///
/// The returned vector corresponds to the input order: outcome *i* belongs
/// to descriptor *i*.
pub async fn verify_all(descriptors: &[ArtifactDescriptor]) -> Vec<Verification> {
    join_all(descriptors.iter().map(verify_one)).await
}

/// Check a single descriptor's local file against its expected digest
async fn verify_one(descriptor: &ArtifactDescriptor) -> Verification {
    match file_digest(&descriptor.output_location).await {
        None => {
            debug!(
                "{} needs fetch: no readable local file",
                descriptor.output_location.display()
            );
            Verification::NeedsFetch(StaleReason::Missing)
        }
        Some(actual) if actual == descriptor.expected_digest => Verification::Valid,
        Some(actual) => {
            debug!(
                "{} needs fetch: digest {} != expected {}",
                descriptor.output_location.display(),
                actual,
                descriptor.expected_digest
            );
            Verification::NeedsFetch(StaleReason::DigestMismatch)
        }
    }
}
