//! Embedded bundle content source.

use crate::content::ContentSource;
use crate::error::Result;
use crate::path::asset_path;
use crate::platform::BundleHandle;
use crate::BoxSyncRead;
use async_trait::async_trait;
use tracing::instrument;

/// Reads assets packaged directly inside the application.
///
/// Only development builds are expected to carry the full media set this way;
/// in production the bundle usually lacks the file and this source reports
/// [`NotFound`](crate::error::ErrorKind::NotFound).
pub struct EmbeddedBundle {
    name: String,
    asset_directory: String,
    bundle: BundleHandle,
}
impl EmbeddedBundle {
    pub fn new(asset_directory: impl Into<String>, bundle: BundleHandle) -> Self {
        Self {
            name: "embedded".to_string(),
            asset_directory: asset_directory.into(),
            bundle,
        }
    }
}

#[async_trait]
impl ContentSource for EmbeddedBundle {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip_all, fields(file = file_name))]
    async fn open(&self, file_name: &str) -> Result<BoxSyncRead> {
        let relative = asset_path(&self.asset_directory, file_name)?;
        self.bundle.open(&relative).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::platform::DirectoryBundle;
    use std::io::Read;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_open_uses_asset_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(temp_dir.path().join("videos")).unwrap();
        std::fs::write(temp_dir.path().join("videos/a.mp4"), b"EMBEDDED").unwrap();
        std::fs::write(temp_dir.path().join("b.mp4"), b"WRONG PLACE").unwrap();
        let source = EmbeddedBundle::new("videos", Arc::new(DirectoryBundle::new(temp_dir.path())));

        let mut reader = source.open("a.mp4").await.unwrap();
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).unwrap();
        assert_eq!(buf, b"EMBEDDED");

        // Files outside the asset directory are not visible.
        let err = source.open("b.mp4").await.err().unwrap();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }
}
