use assetpack_source::PackLocator;
use assetpack_source::error::{ErrorKind, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;

/// Finds packs in a prepared project tree, where a pack's assets live at
/// `android/app/src/main/assetpacks/<pack>/src/main/assets`.
#[derive(Clone, Debug)]
pub struct ProjectPackLocator {
    assetpacks: PathBuf,
}
impl ProjectPackLocator {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        let assetpacks = project_root.into().join("android").join("app").join("src").join("main").join("assetpacks");
        Self { assetpacks }
    }
}

#[async_trait]
impl PackLocator for ProjectPackLocator {
    async fn location(&self, pack: &str) -> Result<Option<PathBuf>> {
        let assets = self.assetpacks.join(assetpack_source::validate_file_name(pack)?).join("src").join("main").join("assets");
        match fs::metadata(&assets).await {
            Ok(meta) if meta.is_dir() => Ok(Some(assets)),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => exn::bail!(ErrorKind::from_io(e, assets)),
        }
    }
}
