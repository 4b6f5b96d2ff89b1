//! Verify-then-fetch orchestration
//!
//! A run has exactly two sequential phases. Phase one verifies every
//! descriptor concurrently and keeps the stale subset; phase two fetches
//! that subset concurrently. Each phase is a full fan-in barrier: fetching
//! never starts until every check has finished, and the summary is not
//! assembled until every fetch has finished. One artifact's failure never
//! discards its siblings' results.
//!
//! Runs are not resumable; a re-run verifies everything from scratch.

use futures::future::join_all;
use tracing::{info, warn};

use crate::app::client::FetchClient;
use crate::app::manifest::ArtifactDescriptor;
use crate::app::verify::{verify_all, Verification};

/// Aggregate outcome of one verify-then-fetch run
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Total descriptors checked
    pub checked: usize,
    /// Descriptors whose local file was already valid
    pub already_valid: usize,
    /// Descriptors fetched successfully this run
    pub fetched: usize,
    /// Descriptors that still do not hold valid content
    pub failures: Vec<ArtifactDescriptor>,
}

impl RunSummary {
    /// True when every artifact ended up valid
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Verify all artifacts and fetch the subset that needs it.
///
/// Never returns early on per-artifact errors; the summary always reflects
/// the complete input set.
pub async fn run(client: &FetchClient, artifacts: Vec<ArtifactDescriptor>) -> RunSummary {
    let checked = artifacts.len();
    info!("Verifying {} artifact(s)", checked);

    let outcomes = verify_all(&artifacts).await;
    let stale: Vec<ArtifactDescriptor> = artifacts
        .into_iter()
        .zip(outcomes)
        .filter_map(|(artifact, outcome)| match outcome {
            Verification::Valid => None,
            Verification::NeedsFetch(_) => Some(artifact),
        })
        .collect();

    let already_valid = checked - stale.len();

    if stale.is_empty() {
        info!("All artifacts already valid, nothing to fetch");
        return RunSummary {
            checked,
            already_valid,
            ..Default::default()
        };
    }

    info!("Fetching {} stale artifact(s)", stale.len());
    let results = join_all(stale.iter().map(|artifact| client.fetch(artifact))).await;

    let mut failures = Vec::new();
    for (artifact, result) in stale.into_iter().zip(results) {
        if let Err(e) = result {
            warn!(
                "Fetch of {} failed: {}",
                artifact.output_location.display(),
                e
            );
            failures.push(artifact);
        }
    }

    let fetched = checked - already_valid - failures.len();
    RunSummary {
        checked,
        already_valid,
        fetched,
        failures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::app::client::ClientConfig;
    use crate::app::hash::Md5Digest;

    fn descriptor(site: &str, name: &str, dest: PathBuf, content: &[u8]) -> ArtifactDescriptor {
        ArtifactDescriptor {
            version: "v1".to_string(),
            site: site.to_string(),
            file_name: name.to_string(),
            output_location: dest,
            expected_digest: Md5Digest::from_bytes(md5::compute(content).0),
        }
    }

    async fn mount(server: &MockServer, name: &str, content: Vec<u8>) {
        let route = format!("/v1/{}", name);
        Mock::given(method("HEAD"))
            .and(path(route.clone()))
            .respond_with(ResponseTemplate::new(200))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(content))
            .mount(server)
            .await;
    }

    fn test_client() -> FetchClient {
        FetchClient::new(ClientConfig {
            probe_timeout: std::time::Duration::from_millis(500),
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_all_valid_skips_network_entirely() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("a.bin");
        tokio::fs::write(&dest, b"present").await.unwrap();

        // Unreachable site: the run must succeed without touching it
        let artifact = descriptor("http://127.0.0.1:9", "a.bin", dest, b"present");

        let summary = run(&test_client(), vec![artifact]).await;
        assert!(summary.is_success());
        assert_eq!(summary.checked, 1);
        assert_eq!(summary.already_valid, 1);
        assert_eq!(summary.fetched, 0);
    }

    #[tokio::test]
    async fn test_stale_artifact_is_fetched() {
        let server = MockServer::start().await;
        mount(&server, "b.bin", b"fresh".to_vec()).await;

        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("b.bin");
        let artifact = descriptor(&server.uri(), "b.bin", dest.clone(), b"fresh");

        let summary = run(&test_client(), vec![artifact]).await;
        assert!(summary.is_success());
        assert_eq!(summary.fetched, 1);
        assert_eq!(tokio::fs::read(&dest).await.unwrap(), b"fresh");
    }

    #[tokio::test]
    async fn test_single_failure_fails_run_but_not_siblings() {
        let server = MockServer::start().await;
        mount(&server, "good.bin", b"good".to_vec()).await;
        // bad.bin has no mocks: probe answers 404 -> unreachable

        let temp_dir = TempDir::new().unwrap();
        let good_dest = temp_dir.path().join("good.bin");
        let bad_dest = temp_dir.path().join("bad.bin");

        let artifacts = vec![
            descriptor(&server.uri(), "good.bin", good_dest.clone(), b"good"),
            descriptor(&server.uri(), "bad.bin", bad_dest.clone(), b"bad"),
        ];

        let summary = run(&test_client(), artifacts).await;
        assert!(!summary.is_success());
        assert_eq!(summary.checked, 2);
        assert_eq!(summary.fetched, 1);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].output_location, bad_dest);
        // The sibling still completed
        assert_eq!(tokio::fs::read(&good_dest).await.unwrap(), b"good");
    }
}
