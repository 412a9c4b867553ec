//! Application-private cache of resolved asset files.
//!
//! Content sources hand out streams, but the player needs a path. The first
//! successful resolution of a file copies its stream into
//! `<private dir>/<pack>/<file name>`, and every later resolution is answered
//! from there without touching any source.
//!
//! Entries are never invalidated, evicted or size-capped: they live as long
//! as the application's private storage does. The cache is not the source of
//! truth, so clearing that storage externally is always safe; files are
//! simply copied again on next use.

pub mod error;

use crate::error::{ErrorKind, Result};
use assetpack_source::{BoxSyncRead, validate_file_name};
use exn::ResultExt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::instrument;

/// Prefix of in-progress cache writes; they are renamed into place once the
/// whole stream has been copied.
const PARTIAL_PREFIX: &str = ".partial-";

/// Per-pack cache directory.
#[derive(Clone, Debug)]
pub struct LocalCache {
    root: PathBuf,
}
impl LocalCache {
    /// Cache for `pack` inside the application's private directory.
    ///
    /// The directory itself is created lazily on first write.
    ///
    /// # Errors
    ///
    /// Returns an error if `private_dir` is not absolute or `pack` is not a
    /// single path component.
    pub fn new(private_dir: impl AsRef<Path>, pack: &str) -> Result<Self> {
        let private_dir = private_dir.as_ref();
        if !private_dir.is_absolute() {
            exn::bail!(ErrorKind::InvalidRoot(private_dir.to_path_buf()));
        }
        let pack = validate_file_name(pack).or_raise(|| ErrorKind::InvalidKey(pack.to_string()))?;
        Ok(Self { root: private_dir.join(pack) })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where `file_name` lives (or would live) in the cache.
    pub fn entry_path(&self, file_name: &str) -> Result<PathBuf> {
        let file_name = validate_file_name(file_name).or_raise(|| ErrorKind::InvalidKey(file_name.to_string()))?;
        Ok(self.root.join(file_name))
    }

    /// Path of the cached copy of `file_name`, if there is one.
    pub async fn lookup(&self, file_name: &str) -> Result<Option<PathBuf>> {
        let path = self.entry_path(file_name)?;
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(Some(path)),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).or_raise(|| ErrorKind::Read(path)),
        }
    }

    /// Copy a source stream into the cache and return the entry's path.
    ///
    /// The stream is copied into a temporary file next to the destination
    /// and renamed into place only after the copy completed, so the entry
    /// either holds the full contents or does not exist. Any failure part way
    /// through removes the temporary file. An existing entry is replaced.
    #[instrument(skip_all, fields(cache = %self.root.display(), file = file_name))]
    pub async fn store(&self, file_name: &str, reader: BoxSyncRead) -> Result<PathBuf> {
        let destination = self.entry_path(file_name)?;
        let root = self.root.clone();
        let target = destination.clone();
        let copied = tokio::task::spawn_blocking(move || copy_into(&root, reader, &target))
            .await
            .or_raise(|| ErrorKind::Interrupted)??;
        tracing::debug!(bytes = copied, "Cached asset file");
        Ok(destination)
    }
}

fn copy_into(root: &Path, mut reader: BoxSyncRead, destination: &Path) -> Result<u64> {
    let failed = || ErrorKind::Write(destination.to_path_buf());
    std::fs::create_dir_all(root).or_raise(failed)?;
    // Dropping the temporary file (on any early return) deletes it.
    let mut partial = tempfile::Builder::new().prefix(PARTIAL_PREFIX).tempfile_in(root).or_raise(failed)?;
    let copied = io::copy(&mut reader, &mut partial).or_raise(failed)?;
    partial.flush().or_raise(failed)?;
    partial.as_file().sync_all().or_raise(failed)?;
    partial.persist(destination).or_raise(failed)?;
    Ok(copied)
}
