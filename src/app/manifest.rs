//! Artifact manifest loading and data model
//!
//! A manifest is a JSON array of records describing the expected local
//! artifacts, where each record carries the remote location parts, the local
//! destination and the expected MD5 digest:
//!
//! ```json
//! [
//!   {
//!     "Version": "v1.2.0",
//!     "Site": "https://libs.example.com/native",
//!     "FileName": "libfoo.so",
//!     "OutputLocation": "runtimes/linux-x64/libfoo.so",
//!     "MD5": "50c9d1c465f3cbff652be1509c2e2a4e"
//!   }
//! ]
//! ```
//!
//! Relative output locations are resolved against an explicit base directory
//! at load time, so nothing downstream depends on the process working
//! directory. Descriptors are immutable once loaded.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tokio::fs;
use tracing::debug;
use url::Url;

use crate::app::hash::Md5Digest;
use crate::errors::{DownloadError, ManifestError, ManifestResult};

/// One expected local artifact and where to fetch it from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDescriptor {
    /// Remote path segment identifying the release (e.g. "v1.2.0")
    pub version: String,
    /// Base remote location (e.g. "https://libs.example.com/native")
    pub site: String,
    /// Remote file name
    pub file_name: String,
    /// Resolved local destination path
    pub output_location: PathBuf,
    /// Expected content digest
    pub expected_digest: Md5Digest,
}

impl ArtifactDescriptor {
    /// Build the remote URL by joining `site`, `version` and `file_name`
    /// as path segments.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError::InvalidUrl` if the joined value is not a
    /// parseable URL.
    pub fn remote_url(&self) -> Result<Url, DownloadError> {
        let joined = format!(
            "{}/{}/{}",
            self.site.trim_end_matches('/'),
            self.version.trim_matches('/'),
            self.file_name
        );
        Url::parse(&joined).map_err(|e| DownloadError::InvalidUrl {
            url: joined,
            error: e.to_string(),
        })
    }
}

/// Raw manifest record as produced by the manifest generator (PascalCase keys)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ManifestEntry {
    version: String,
    site: String,
    file_name: String,
    output_location: String,
    #[serde(rename = "MD5")]
    md5: Md5Digest,
}

/// Load a manifest file and resolve its entries against `base_dir`.
///
/// When `base_dir` is `None`, entries resolve against the manifest's own
/// parent directory.
///
/// # Errors
///
/// Returns `ManifestError` if the file is missing, unreadable, not valid
/// JSON, or contains a malformed digest.
pub async fn load_manifest(
    path: &Path,
    base_dir: Option<&Path>,
) -> ManifestResult<Vec<ArtifactDescriptor>> {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ManifestError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) => return Err(ManifestError::Io(e)),
    };

    let entries: Vec<ManifestEntry> = serde_json::from_str(&content)?;

    let manifest_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let base = base_dir.unwrap_or(manifest_dir);

    let descriptors = entries
        .into_iter()
        .map(|entry| {
            let output = resolve_output(base, &entry.output_location);
            ArtifactDescriptor {
                version: entry.version,
                site: entry.site,
                file_name: entry.file_name,
                output_location: output,
                expected_digest: entry.md5,
            }
        })
        .collect::<Vec<_>>();

    debug!(
        "Loaded {} manifest entries from {}",
        descriptors.len(),
        path.display()
    );
    Ok(descriptors)
}

/// Resolve a manifest output location against the base directory.
/// Absolute paths pass through untouched.
fn resolve_output(base: &Path, output_location: &str) -> PathBuf {
    let output = Path::new(output_location);
    if output.is_absolute() {
        output.to_path_buf()
    } else {
        base.join(output)
    }
}
