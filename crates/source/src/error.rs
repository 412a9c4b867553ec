//! Content Source Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::io::Error as IoError;
use std::path::PathBuf;
use std::time::Duration;

/// A content source error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for content source operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
/// Only [`NotFound`](Self::NotFound) is an expected outcome; everything else
/// is an unexpected failure of an otherwise-available source.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The source does not (currently) hold the requested file.
    #[display("file not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// The asset pack has not been installed on this device (yet).
    #[display("asset pack not installed: {_0}")]
    PackNotInstalled(#[error(not(source))] String),
    /// Access denied by the platform or filesystem.
    #[display("permission denied: {}", _0.display())]
    PermissionDenied(#[error(not(source))] PathBuf),
    /// File name is empty, contains separators, or tries to escape its directory.
    #[display("invalid file name: {_0}")]
    InvalidFileName(#[error(not(source))] String),
    /// Underlying I/O error
    #[display("I/O error: {_0}")]
    Io(IoError),
    /// Platform service (pack manager, bundled resource reader) failure.
    #[display("platform error: {_0}")]
    Platform(#[error(not(source))] String),
    /// The source did not answer within the configured deadline.
    #[display("source timed out after {}ms", _0.as_millis())]
    Timeout(#[error(not(source))] Duration),
}
impl From<IoError> for ErrorKind {
    fn from(err: IoError) -> Self {
        Self::Io(err)
    }
}

impl ErrorKind {
    /// Convert an I/O error for `path` into the matching error kind.
    pub fn from_io(err: IoError, path: impl Into<PathBuf>) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.into()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.into()),
            _ => Self::Io(err),
        }
    }

    /// Returns `true` when the source simply lacks the file, meaning the
    /// resolver should quietly move on to the next source.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::PackNotInstalled(_))
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::PackNotInstalled(_) | Self::Io(_) | Self::Platform(_) | Self::Timeout(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_not_found_maps_to_not_found() {
        let err = IoError::new(std::io::ErrorKind::NotFound, "gone");
        assert!(matches!(ErrorKind::from_io(err, "videos/a.mp4"), ErrorKind::NotFound(_)));
    }

    #[test]
    fn io_other_maps_to_io() {
        let err = IoError::other("disk on fire");
        let kind = ErrorKind::from_io(err, "videos/a.mp4");
        assert!(matches!(kind, ErrorKind::Io(_)));
        assert!(!kind.is_not_found());
    }

    #[test]
    fn pack_not_installed_is_a_miss() {
        let kind = ErrorKind::PackNotInstalled("fbtvideos".to_string());
        assert!(kind.is_not_found());
        assert!(kind.is_retryable());
        assert_eq!(kind.to_string(), "asset pack not installed: fbtvideos");
    }
}
