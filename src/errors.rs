//! Error types for natlib_fetcher
//!
//! Errors are split by domain: manifest loading and download/transfer.
//! Per-artifact failures are recoverable at the item level and never abort
//! a batch; only manifest problems are fatal to a run.

use std::path::PathBuf;

use thiserror::Error;

/// Manifest loading and parsing errors
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest file not found
    #[error("Manifest file not found: {path}")]
    NotFound { path: PathBuf },

    /// JSON parsing error
    #[error("JSON parsing error in manifest")]
    JsonParse(#[from] serde_json::Error),

    /// I/O error reading manifest
    #[error("I/O error reading manifest")]
    Io(#[from] std::io::Error),

    /// Invalid digest format
    #[error("Invalid digest in manifest: {value}. Expected 32-character MD5 hex string")]
    InvalidDigest { value: String },
}

/// Download and HTTP client errors
#[derive(Error, Debug)]
pub enum DownloadError {
    /// HTTP request error
    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),

    /// I/O error during file operations
    #[error("File I/O error")]
    Io(#[from] std::io::Error),

    /// Invalid URL built from manifest fields
    #[error("Invalid URL: {url} - {error}")]
    InvalidUrl { url: String, error: String },

    /// Server returned error status
    #[error("Server error: HTTP {status}")]
    ServerError { status: u16 },

    /// Connectivity probe failed within its timeout
    #[error("Remote site unreachable: {url}")]
    Unreachable { url: String },

    /// Atomic file operation failed
    #[error("Atomic file operation failed: could not rename {temp_path} to {final_path}")]
    AtomicOperationFailed {
        temp_path: PathBuf,
        final_path: PathBuf,
    },
}

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    /// Manifest error
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Download error
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// One or more artifacts could not be brought up to date
    #[error("{failed} file(s) failed to download")]
    Incomplete { failed: usize },

    /// Generic application error with context
    #[error("{message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Manifest(_) => "manifest",
            AppError::Download(_) => "download",
            AppError::Io(_) => "io",
            AppError::Incomplete { .. } => "sync",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Manifest result type alias
pub type ManifestResult<T> = std::result::Result<T, ManifestError>;

/// Download result type alias
pub type DownloadResult<T> = std::result::Result<T, DownloadError>;
