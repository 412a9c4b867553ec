//! In-memory content sources and platform capabilities for testing.

use crate::error::{ErrorKind, Result};
use crate::path::validate as validate_file_name;
use crate::platform::{BundleReader, PackLocator};
use crate::{BoxSyncRead, ContentSource};
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// In-memory content source for testing.
///
/// Files are stored in a `HashMap` behind a [`RwLock`] so they can be added
/// or removed while a resolver holds the source. Every call to
/// [`open()`](ContentSource::open) is counted, whether it succeeds or not.
///
/// # Examples
///
/// ```
/// use assetpack_source::{ContentSource, MockSource};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let source = MockSource::with_files([("a.mp4", b"PACK")]);
/// assert!(source.open("a.mp4").await.is_ok());
/// assert!(source.open("b.mp4").await.is_err());
/// assert_eq!(source.calls(), 2);
/// # }
/// ```
pub struct MockSource {
    name: String,
    files: RwLock<HashMap<String, Vec<u8>>>,
    failure: Option<String>,
    calls: AtomicUsize,
}

impl MockSource {
    /// Create a mock source pre-populated with files.
    ///
    /// Panics if any file name fails validation. If test setup is wrong, then
    /// test should not pass.
    pub fn with_files(files: impl IntoIterator<Item = (impl Into<String>, impl Into<Vec<u8>>)>) -> Self {
        let mut map = HashMap::new();
        for (name, data) in files {
            let name = name.into();
            if validate_file_name(&name).is_err() {
                // The panic here is DELIBERATE. MockSource is intended to be
                // used in tests; panics are expected. There is no error result.
                panic!("MockSource::with_files: invalid file name {name}");
            }
            map.insert(name, data.into());
        }
        Self {
            name: "mock".to_string(),
            files: RwLock::new(map),
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Change the name of the mock source.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Make every subsequent `open()` fail with an unexpected
    /// [`Platform`](ErrorKind::Platform) error instead of consulting the files.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    pub async fn insert(&self, name: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.files.write().await.insert(name.into(), data.into());
    }

    /// Number of `open()` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}
impl Default for MockSource {
    fn default() -> Self {
        let files: [(&str, &[u8]); 0] = [];
        Self::with_files(files)
    }
}

#[async_trait]
impl ContentSource for MockSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn open(&self, file_name: &str) -> Result<BoxSyncRead> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.failure {
            exn::bail!(ErrorKind::Platform(message.clone()));
        }
        let file_name = validate_file_name(file_name)?;
        let data = self
            .files
            .read()
            .await
            .get(file_name)
            .cloned()
            .ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(PathBuf::from(file_name))))?;
        Ok(Box::new(Cursor::new(data)))
    }
}

/// In-memory pack locator for testing.
///
/// Maps pack names to install locations; unknown packs are "not installed".
#[derive(Default)]
pub struct MockLocator {
    locations: RwLock<HashMap<String, PathBuf>>,
    calls: AtomicUsize,
}
impl MockLocator {
    pub fn with_pack(pack: impl Into<String>, location: impl Into<PathBuf>) -> Self {
        Self {
            locations: RwLock::new(HashMap::from([(pack.into(), location.into())])),
            calls: AtomicUsize::new(0),
        }
    }

    /// Simulate the platform finishing an install.
    pub async fn install(&self, pack: impl Into<String>, location: impl Into<PathBuf>) {
        self.locations.write().await.insert(pack.into(), location.into());
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PackLocator for MockLocator {
    async fn location(&self, pack: &str) -> Result<Option<PathBuf>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.locations.read().await.get(pack).cloned())
    }
}

/// In-memory bundled resource reader for testing, keyed by bundle-relative path.
#[derive(Default)]
pub struct MockBundle {
    resources: HashMap<PathBuf, Vec<u8>>,
    calls: AtomicUsize,
}
impl MockBundle {
    pub fn with_resources(resources: impl IntoIterator<Item = (impl Into<PathBuf>, impl Into<Vec<u8>>)>) -> Self {
        Self {
            resources: resources.into_iter().map(|(p, d)| (p.into(), d.into())).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BundleReader for MockBundle {
    async fn open(&self, path: &Path) -> Result<BoxSyncRead> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let data = self.resources.get(path).cloned().ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(path.into())))?;
        Ok(Box::new(Cursor::new(data)))
    }
}
