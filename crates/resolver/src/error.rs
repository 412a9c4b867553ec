//! Resolver Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A resolver error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for resolver operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Terminal outcomes of a failed resolution.
///
/// Per-source problems never show up here directly; they are logged and the
/// next source is tried. Only when every source has been exhausted does one
/// of these surface to the caller.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// No source produced the file.
    #[display("file {_0} not found in asset pack or embedded assets")]
    MissingFile(#[error(not(source))] String),
    /// The last source tried failed unexpectedly (I/O, platform, timeout).
    /// The source's own error is attached as a child.
    #[display("asset error while resolving {_0}")]
    AssetError(#[error(not(source))] String),
    /// The requested name is not a plain file name.
    #[display("invalid asset file name: {_0}")]
    InvalidFileName(#[error(not(source))] String),
    /// The local cache directory could not be inspected.
    #[display("local cache unavailable")]
    Cache,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    ///
    /// A missing file is retryable: the asset pack may finish installing
    /// between two resolutions.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::MissingFile(_) | Self::AssetError(_) | Self::Cache)
    }
}
