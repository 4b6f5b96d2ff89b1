//! HTTP client: connectivity probe and artifact transfer
//!
//! The fetch path is two explicit steps so they can fail independently: a
//! short bounded probe against the resolved URL, then the full transfer.
//! The probe is best-effort only; a transfer may still fail after a probe
//! succeeds.
//!
//! Transfers write to a temporary path next to the destination and rename
//! into place on success, so a failed transfer never leaves a partial file
//! at the destination.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Client;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use url::Url;

use crate::app::manifest::ArtifactDescriptor;
use crate::constants::{files, http, probe};
use crate::errors::{DownloadError, DownloadResult};

/// Whether the remote site answered the liveness probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reachability {
    Reachable,
    Unreachable,
}

/// Configuration for the fetch client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout for full transfers
    pub request_timeout: Duration,
    /// Connection establishment timeout
    pub connect_timeout: Duration,
    /// Bound on the pre-transfer liveness probe
    pub probe_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: http::DEFAULT_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            probe_timeout: probe::PROBE_TIMEOUT,
        }
    }
}

/// HTTP client for probing and fetching artifacts
#[derive(Debug)]
pub struct FetchClient {
    http: Client,
    probe_timeout: Duration,
}

impl FetchClient {
    /// Create a client from the given configuration
    ///
    /// # Errors
    ///
    /// Returns `DownloadError::Http` if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(config: ClientConfig) -> DownloadResult<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(http::USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            probe_timeout: config.probe_timeout,
        })
    }

    /// Probe whether the remote URL is reachable within the probe timeout.
    ///
    /// A minimal HEAD request stands in for the transfer. Every failure
    /// cause (timeout, DNS, refused connection, HTTP error status) collapses
    /// to `Unreachable`; the distinction is only logged.
    pub async fn probe(&self, url: &Url) -> Reachability {
        let result = self
            .http
            .head(url.clone())
            .timeout(self.probe_timeout)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => Reachability::Reachable,
            Ok(response) => {
                debug!("Probe of {} answered HTTP {}", url, response.status());
                Reachability::Unreachable
            }
            Err(e) => {
                debug!("Probe of {} failed: {}", url, e);
                Reachability::Unreachable
            }
        }
    }

    /// Fetch one artifact to its output location.
    ///
    /// Probes the remote URL first; if the probe fails no transfer is
    /// attempted and nothing is written. On success the destination holds
    /// exactly the transferred content.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError::Unreachable` when the probe fails, or the
    /// underlying transfer error otherwise.
    pub async fn fetch(&self, artifact: &ArtifactDescriptor) -> DownloadResult<()> {
        let url = artifact.remote_url()?;

        if self.probe(&url).await == Reachability::Unreachable {
            return Err(DownloadError::Unreachable {
                url: url.to_string(),
            });
        }

        self.transfer(&url, &artifact.output_location).await?;
        info!(
            "Fetched {} -> {}",
            url,
            artifact.output_location.display()
        );
        Ok(())
    }

    /// Transfer the URL's content to `destination` atomically.
    async fn transfer(&self, url: &Url, destination: &Path) -> DownloadResult<()> {
        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let temp_path = temp_path_for(destination);
        match self.transfer_to_temp(url, &temp_path).await {
            Ok(()) => {
                tokio::fs::rename(&temp_path, destination).await.map_err(|_e| {
                    DownloadError::AtomicOperationFailed {
                        temp_path: temp_path.clone(),
                        final_path: destination.to_path_buf(),
                    }
                })?;
                Ok(())
            }
            Err(e) => {
                // Leave the previous destination content untouched
                if temp_path.exists() {
                    if let Err(cleanup) = tokio::fs::remove_file(&temp_path).await {
                        warn!(
                            "Could not remove temp file {}: {}",
                            temp_path.display(),
                            cleanup
                        );
                    }
                }
                Err(e)
            }
        }
    }

    /// Stream the response body into the temporary file.
    async fn transfer_to_temp(&self, url: &Url, temp_path: &Path) -> DownloadResult<()> {
        let mut response = self.http.get(url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(DownloadError::ServerError {
                status: response.status().as_u16(),
            });
        }

        let mut file = File::create(temp_path).await?;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        Ok(())
    }
}

/// Temporary path colocated with the destination, e.g. `lib.so` -> `lib.so.tmp`
fn temp_path_for(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(files::TEMP_FILE_SUFFIX);
    destination.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::app::hash::Md5Digest;

    fn test_client() -> FetchClient {
        FetchClient::new(ClientConfig {
            probe_timeout: Duration::from_millis(500),
            ..Default::default()
        })
        .unwrap()
    }

    fn descriptor(site: &str, dest: PathBuf, content: &[u8]) -> ArtifactDescriptor {
        ArtifactDescriptor {
            version: "v1".to_string(),
            site: site.to_string(),
            file_name: "lib.bin".to_string(),
            output_location: dest,
            expected_digest: Md5Digest::from_bytes(md5::compute(content).0),
        }
    }

    async fn mount_artifact(server: &MockServer, content: &'static [u8]) {
        Mock::given(method("HEAD"))
            .and(path("/v1/lib.bin"))
            .respond_with(ResponseTemplate::new(200))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/lib.bin"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(content))
            .mount(server)
            .await;
    }

    #[test]
    fn test_temp_path_is_colocated() {
        let temp = temp_path_for(Path::new("/opt/libs/lib.so"));
        assert_eq!(temp, PathBuf::from("/opt/libs/lib.so.tmp"));

        let temp = temp_path_for(Path::new("plain"));
        assert_eq!(temp, PathBuf::from("plain.tmp"));
    }

    #[tokio::test]
    async fn test_probe_reachable() {
        let server = MockServer::start().await;
        mount_artifact(&server, b"bytes").await;

        let client = test_client();
        let url = Url::parse(&format!("{}/v1/lib.bin", server.uri())).unwrap();
        assert_eq!(client.probe(&url).await, Reachability::Reachable);
    }

    #[tokio::test]
    async fn test_probe_http_error_is_unreachable() {
        let server = MockServer::start().await;
        // No mocks mounted: every request answers 404

        let client = test_client();
        let url = Url::parse(&format!("{}/v1/lib.bin", server.uri())).unwrap();
        assert_eq!(client.probe(&url).await, Reachability::Unreachable);
    }

    #[tokio::test]
    async fn test_probe_refused_connection_is_unreachable() {
        let client = test_client();
        // Reserved port with nothing listening
        let url = Url::parse("http://127.0.0.1:9/lib.bin").unwrap();
        assert_eq!(client.probe(&url).await, Reachability::Unreachable);
    }

    #[tokio::test]
    async fn test_fetch_writes_destination() {
        let server = MockServer::start().await;
        mount_artifact(&server, b"fresh native bytes").await;

        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("nested/dir/lib.bin");
        let artifact = descriptor(&server.uri(), dest.clone(), b"fresh native bytes");

        let client = test_client();
        client.fetch(&artifact).await.unwrap();

        let written = tokio::fs::read(&dest).await.unwrap();
        assert_eq!(written, b"fresh native bytes");
        // No temp file left behind
        assert!(!temp_path_for(&dest).exists());
    }

    #[tokio::test]
    async fn test_fetch_overwrites_stale_destination() {
        let server = MockServer::start().await;
        mount_artifact(&server, b"new content").await;

        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("lib.bin");
        tokio::fs::write(&dest, b"old content").await.unwrap();
        let artifact = descriptor(&server.uri(), dest.clone(), b"new content");

        let client = test_client();
        client.fetch(&artifact).await.unwrap();

        let written = tokio::fs::read(&dest).await.unwrap();
        assert_eq!(written, b"new content");
    }

    #[tokio::test]
    async fn test_fetch_unreachable_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("lib.bin");
        let artifact = descriptor("http://127.0.0.1:9", dest.clone(), b"unused");

        let client = test_client();
        let result = client.fetch(&artifact).await;

        assert!(matches!(result, Err(DownloadError::Unreachable { .. })));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_probe_passes_but_transfer_fails() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/v1/lib.bin"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/lib.bin"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("lib.bin");
        tokio::fs::write(&dest, b"previous content").await.unwrap();
        let artifact = descriptor(&server.uri(), dest.clone(), b"unused");

        let client = test_client();
        let result = client.fetch(&artifact).await;

        assert!(matches!(
            result,
            Err(DownloadError::ServerError { status: 500 })
        ));
        // Previous destination content untouched, no temp residue
        let content = tokio::fs::read(&dest).await.unwrap();
        assert_eq!(content, b"previous content");
        assert!(!temp_path_for(&dest).exists());
    }
}
