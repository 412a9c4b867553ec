//! Build preparation for a delivered asset pack.
//!
//! [`Pipeline::apply`] patches the host Android project so that it builds an
//! install-time asset pack holding the lesson videos:
//!
//! 1. registers the pack in the application manifest,
//! 2. declares it (and the delivery library) in the app build script,
//! 3. includes its Gradle module in the settings script,
//! 4. registers the generated native package with the application,
//! 5. copies the media into the pack and writes the pack module and native
//!    sources.
//!
//! ```no_run
//! # async fn run() -> assetpack_generate::error::Result<()> {
//! use assetpack_config::PackConfig;
//! use assetpack_generate::{Pipeline, ProjectDescriptor};
//!
//! let descriptor = ProjectDescriptor::discover(".", PackConfig::default()).await?;
//! let report = Pipeline::new()?.apply(&descriptor).await?;
//! println!("{} files written", report.written().count());
//! # Ok(())
//! # }
//! ```

mod consts;
mod descriptor;
mod document;
pub mod error;
pub mod merge;
mod pipeline;
mod provision;
mod report;
pub mod steps;
mod template;

pub use crate::consts::ASSET_PACK_META_DATA;
pub use crate::descriptor::{ProjectDescriptor, namespace_from_build_script};
pub use crate::document::{ConfigDocument, EntryPoint};
pub use crate::pipeline::Pipeline;
pub use crate::provision::{MAX_COPY_CONCURRENCY, copy_all, media_files};
pub use crate::report::{Outcome, Report};
pub use crate::template::Templates;
