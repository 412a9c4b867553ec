//! Document steps.
//!
//! Each step makes one part of the [`ConfigDocument`] match what the asset
//! pack needs, leaving unrelated content alone. Steps are idempotent: applying
//! one to its own output returns the output unchanged.

mod build_script;
mod entry_point;
mod manifest;
mod settings;

pub use self::build_script::BuildScriptStep;
pub use self::entry_point::EntryPointStep;
pub use self::manifest::ManifestStep;
pub use self::settings::SettingsStep;

use crate::descriptor::ProjectDescriptor;
use crate::document::ConfigDocument;
use crate::error::Result;

pub trait Step {
    fn name(&self) -> &'static str;

    fn apply(&self, document: ConfigDocument, descriptor: &ProjectDescriptor) -> Result<ConfigDocument>;
}

/// The document steps, in the order they run.
pub fn all() -> Vec<Box<dyn Step + Send + Sync>> {
    vec![Box::new(ManifestStep), Box::new(BuildScriptStep), Box::new(SettingsStep), Box::new(EntryPointStep)]
}
