pub mod content;
pub mod error;
mod path;
pub mod platform;

pub use crate::content::{ContentSource, DeliveredPack, EmbeddedBundle, TimeoutSource};
#[cfg(feature = "mock")]
pub use crate::content::{MockBundle, MockLocator, MockSource};
pub use crate::path::{asset_path, validate as validate_file_name};
pub use crate::platform::{BundleHandle, BundleReader, DirectoryBundle, DirectoryLocator, LocatorHandle, PackLocator};
use std::io::Read;
use std::sync::Arc;

pub type SourceHandle = Arc<dyn ContentSource + Send + Sync>;
pub type BoxSyncRead = Box<dyn Read + Send + 'static>;
