//! Asset pack content source.

use crate::content::ContentSource;
use crate::error::{ErrorKind, Result};
use crate::path::asset_path;
use crate::platform::{LocatorHandle, open_file};
use crate::BoxSyncRead;
use async_trait::async_trait;
use tracing::instrument;

/// Reads assets out of an installed (platform-delivered) asset pack.
///
/// Every call asks the [`PackLocator`](crate::platform::PackLocator) afresh.
/// If the pack is not installed yet the call fails with
/// [`PackNotInstalled`](ErrorKind::PackNotInstalled) immediately: there is no
/// retry, no waiting for a download in progress and no backoff. Callers pick
/// up a freshly installed pack simply by resolving again later.
pub struct DeliveredPack {
    name: String,
    pack: String,
    asset_directory: String,
    locator: LocatorHandle,
}
impl DeliveredPack {
    /// # Arguments
    /// * `pack` - Name of the asset pack (also the Gradle module name)
    /// * `asset_directory` - Sub-directory inside the pack's assets holding the media
    /// * `locator` - Platform pack-location capability
    pub fn new(pack: impl Into<String>, asset_directory: impl Into<String>, locator: LocatorHandle) -> Self {
        Self {
            name: "asset-pack".to_string(),
            pack: pack.into(),
            asset_directory: asset_directory.into(),
            locator,
        }
    }
}

#[async_trait]
impl ContentSource for DeliveredPack {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip_all, fields(pack = %self.pack, file = file_name))]
    async fn open(&self, file_name: &str) -> Result<BoxSyncRead> {
        let relative = asset_path(&self.asset_directory, file_name)?;
        let Some(location) = self.locator.location(&self.pack).await? else {
            exn::bail!(ErrorKind::PackNotInstalled(self.pack.clone()));
        };
        tracing::trace!(location = %location.display(), "Asset pack located");
        open_file(&location.join(relative)).await
    }
}
