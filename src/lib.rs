//! natlib_fetcher library
//!
//! Verifies a set of locally expected binary artifacts against known MD5
//! digests and concurrently fetches replacements for any that are missing
//! or mismatched.

pub mod app;
pub mod cli;
pub mod constants;
pub mod errors;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};
