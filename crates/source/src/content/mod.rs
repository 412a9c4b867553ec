//! Content source trait and implementations.
//!
//! A content source is anywhere an asset file might come from at run time.
//! There are exactly two in production: the [`DeliveredPack`] installed by the
//! platform's asset delivery service, and the [`EmbeddedBundle`] packaged
//! directly into (development) builds. Sources only ever *open* files; the
//! resolver decides the order they are asked in and where the bytes end up.

mod delivered;
mod embedded;
#[cfg(feature = "mock")]
mod mock;
mod timeout;

pub use self::delivered::DeliveredPack;
pub use self::embedded::EmbeddedBundle;
#[cfg(feature = "mock")]
pub use self::mock::{MockBundle, MockLocator, MockSource};
pub use self::timeout::TimeoutSource;
use crate::BoxSyncRead;
use crate::error::Result;
use async_trait::async_trait;

/// Unified interface for content sources.
///
/// # Examples
///
/// ```no_run
/// use std::io::Read;
/// # use assetpack_source::{ContentSource, error::Result};
/// # async fn example(source: &dyn ContentSource) -> Result<()> {
/// let reader = source.open("lesson-1.mp4").await?;
/// let bytes = tokio::task::spawn_blocking(move || {
///     let mut buf = Vec::new();
///     let mut reader = reader;
///     reader.read_to_end(&mut buf).map(|_| buf)
/// })
/// .await
/// .unwrap()
/// .unwrap();
/// println!("{} bytes", bytes.len());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Short name of the source, used for logging only.
    fn name(&self) -> &str;

    /// Open an asset file for streaming reads.
    ///
    /// Returns a `'static` boxed [`Read`](std::io::Read) suitable for use
    /// inside [`spawn_blocking`](tokio::task::spawn_blocking). Returns
    /// [`NotFound`](crate::error::ErrorKind::NotFound) (or
    /// [`PackNotInstalled`](crate::error::ErrorKind::PackNotInstalled)) when
    /// the source does not hold the file; any other error kind is an
    /// unexpected failure.
    async fn open(&self, file_name: &str) -> Result<BoxSyncRead>;
}
