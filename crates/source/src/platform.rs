//! Platform capabilities consumed by the content sources.
//!
//! On a device these are the asset-pack manager and the bundled resource
//! reader. They are injected as trait objects so the resolver can run against
//! plain directories (desktop, diagnostics) or in-memory fakes (tests).

use crate::BoxSyncRead;
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;

pub type LocatorHandle = Arc<dyn PackLocator + Send + Sync>;
pub type BundleHandle = Arc<dyn BundleReader + Send + Sync>;

/// Looks up where an asset pack has been installed.
#[async_trait]
pub trait PackLocator: Send + Sync {
    /// Absolute path of the installed pack's assets directory.
    ///
    /// Returns `Ok(None)` when the pack is not installed, is still
    /// downloading, or its location is otherwise unknown. Implementations
    /// must not wait for an in-progress download.
    async fn location(&self, pack: &str) -> Result<Option<PathBuf>>;
}

/// Reads resources bundled inside the application itself.
#[async_trait]
pub trait BundleReader: Send + Sync {
    /// Open a bundled resource by its bundle-relative path. Returns
    /// [`NotFound`](ErrorKind::NotFound) if no such resource was packaged.
    async fn open(&self, path: &Path) -> Result<BoxSyncRead>;
}

/// Pack locator backed by a directory containing one sub-directory per
/// installed pack (`<root>/<pack>/...`).
#[derive(Clone, Debug)]
pub struct DirectoryLocator {
    root: PathBuf,
}
impl DirectoryLocator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl PackLocator for DirectoryLocator {
    async fn location(&self, pack: &str) -> Result<Option<PathBuf>> {
        let candidate = self.root.join(crate::validate_file_name(pack)?);
        match fs::metadata(&candidate).await {
            Ok(meta) if meta.is_dir() => Ok(Some(candidate)),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => exn::bail!(ErrorKind::from_io(e, candidate)),
        }
    }
}

/// Bundled resource reader backed by a plain directory, e.g. the `assets/`
/// folder of a development build.
#[derive(Clone, Debug)]
pub struct DirectoryBundle {
    root: PathBuf,
}
impl DirectoryBundle {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl BundleReader for DirectoryBundle {
    async fn open(&self, path: &Path) -> Result<BoxSyncRead> {
        open_file(&self.root.join(path)).await
    }
}

/// Open a file on the local filesystem as a `'static` blocking reader.
pub(crate) async fn open_file(path: &Path) -> Result<BoxSyncRead> {
    let file = fs::File::open(path).await.map_err(|e| ErrorKind::from_io(e, path))?;
    // A directory opens fine on Unix and only fails on the first read.
    let metadata = file.metadata().await.map_err(|e| ErrorKind::from_io(e, path))?;
    if !metadata.is_file() {
        exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
    }
    Ok(Box::new(file.into_std().await))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[tokio::test]
    async fn test_directory_locator_finds_installed_pack() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(temp_dir.path().join("fbtvideos")).unwrap();
        let locator = DirectoryLocator::new(temp_dir.path());
        assert_eq!(locator.location("fbtvideos").await.unwrap(), Some(temp_dir.path().join("fbtvideos")));
        assert_eq!(locator.location("otherpack").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_directory_locator_ignores_plain_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(temp_dir.path().join("fbtvideos"), b"not a pack").unwrap();
        let locator = DirectoryLocator::new(temp_dir.path());
        assert_eq!(locator.location("fbtvideos").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_directory_bundle_open() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(temp_dir.path().join("videos")).unwrap();
        std::fs::write(temp_dir.path().join("videos/a.mp4"), b"EMBEDDED").unwrap();
        let bundle = DirectoryBundle::new(temp_dir.path());

        let mut reader = bundle.open(Path::new("videos/a.mp4")).await.unwrap();
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).unwrap();
        assert_eq!(buf, b"EMBEDDED");

        let err = bundle.open(Path::new("videos/missing.mp4")).await.err().unwrap();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
        let err = bundle.open(Path::new("videos")).await.err().unwrap();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }
}
