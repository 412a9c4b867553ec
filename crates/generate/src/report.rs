use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::path::{Path, PathBuf};
use tokio::fs;

/// What happened to one generated artifact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Written,
    /// The file already had the expected contents and was not touched.
    Unchanged,
}

/// Summary of one [`Pipeline::apply`](crate::Pipeline::apply) run.
#[derive(Debug, Default)]
pub struct Report {
    artifacts: Vec<(PathBuf, Outcome)>,
    media_files: usize,
}
impl Report {
    pub(crate) fn record(&mut self, path: PathBuf, outcome: Outcome) {
        tracing::debug!(path = %path.display(), ?outcome, "Artifact");
        self.artifacts.push((path, outcome));
    }

    pub(crate) fn set_media_files(&mut self, count: usize) {
        self.media_files = count;
    }

    /// Every artifact in the order it was produced.
    pub fn artifacts(&self) -> &[(PathBuf, Outcome)] {
        &self.artifacts
    }

    pub fn outcome(&self, path: impl AsRef<Path>) -> Option<Outcome> {
        self.artifacts.iter().find(|(p, _)| p == path.as_ref()).map(|(_, outcome)| *outcome)
    }

    pub fn written(&self) -> impl Iterator<Item = &Path> {
        self.artifacts.iter().filter(|(_, o)| *o == Outcome::Written).map(|(p, _)| p.as_path())
    }

    /// Number of media files shipped in the pack.
    pub fn media_files(&self) -> usize {
        self.media_files
    }
}

/// Write `contents` to `path` unless it already holds exactly those bytes.
/// Parent directories are created as needed.
pub(crate) async fn write_if_changed(path: &Path, contents: &[u8]) -> Result<Outcome> {
    match fs::read(path).await {
        Ok(existing) if existing == contents => return Ok(Outcome::Unchanged),
        Ok(_) => {},
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {},
        Err(e) => return Err(e).or_raise(|| ErrorKind::Io(path.to_path_buf())),
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await.or_raise(|| ErrorKind::Io(parent.to_path_buf()))?;
    }
    fs::write(path, contents).await.or_raise(|| ErrorKind::Io(path.to_path_buf()))?;
    Ok(Outcome::Written)
}
