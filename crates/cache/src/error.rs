//! Cache Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A cache error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for cache operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Cache root is not an absolute path, or exists but is not a directory.
    #[display("invalid cache directory: {}", _0.display())]
    InvalidRoot(#[error(not(source))] PathBuf),
    /// File name cannot be used as a cache key.
    #[display("invalid cache key: {_0}")]
    InvalidKey(#[error(not(source))] String),
    /// Reading the source stream or writing the cache file failed.
    #[display("failed to write cache entry: {}", _0.display())]
    Write(#[error(not(source))] PathBuf),
    /// Checking the cache directory failed.
    #[display("failed to read cache entry: {}", _0.display())]
    Read(#[error(not(source))] PathBuf),
    /// The blocking copy task panicked or was cancelled by the runtime.
    #[display("cache write task did not complete")]
    Interrupted,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Write(_) | Self::Read(_) | Self::Interrupted)
    }
}
