//! Generator Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A generator error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for generator operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// Anything other than [`Io`](Self::Io) means the project or its configuration
/// needs fixing before generation can succeed.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The project cannot be provisioned as described. Nothing has been written.
    #[display("project misconfigured: {_0}")]
    Misconfiguration(#[error(not(source))] String),
    /// The application manifest has no `<application>` element to register with.
    #[display("application manifest has no <application> element")]
    Manifest,
    /// A build script line that generated code is placed relative to is missing.
    #[display("anchor not found: `{_0}`")]
    AnchorNotFound(#[error(not(source))] String),
    /// An embedded template failed to compile or render.
    #[display("template error: {_0}")]
    Template(#[error(not(source))] String),
    /// Reading or writing a project file failed.
    #[display("I/O error: {}", _0.display())]
    Io(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
