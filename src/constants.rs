//! Application constants for natlib_fetcher
//!
//! Constants are organized by functional domain for maintainability.

use std::time::Duration;

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = "natlib-fetcher/0.1.0";

    /// Default HTTP request timeout for transfers
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
}

/// Connectivity probe configuration
pub mod probe {
    use super::Duration;

    /// Bound on the pre-transfer liveness check
    pub const PROBE_TIMEOUT: Duration = Duration::from_millis(1000);
}

/// File operation constants
pub mod files {
    /// Temporary file suffix for atomic operations
    pub const TEMP_FILE_SUFFIX: &str = ".tmp";

    /// Read chunk size for streaming digest computation (8KB)
    pub const READ_CHUNK_SIZE: usize = 8 * 1024;
}

/// Logging constants
pub mod logging {
    /// Default log level
    pub const DEFAULT_LOG_LEVEL: &str = "warn";
}

// Re-export commonly used constants for convenience
pub use files::TEMP_FILE_SUFFIX;
pub use http::{DEFAULT_TIMEOUT as HTTP_TIMEOUT, USER_AGENT};
pub use probe::PROBE_TIMEOUT;
