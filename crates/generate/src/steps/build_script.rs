use super::Step;
use crate::consts::{ASSET_PACKS_TAG, DEPENDENCY_TAG};
use crate::descriptor::ProjectDescriptor;
use crate::document::ConfigDocument;
use crate::error::Result;
use crate::merge::{Block, merge};

/// Declares the asset pack on the app module and adds the delivery library.
pub struct BuildScriptStep;
impl Step for BuildScriptStep {
    fn name(&self) -> &'static str {
        "build-script"
    }

    fn apply(&self, mut document: ConfigDocument, descriptor: &ProjectDescriptor) -> Result<ConfigDocument> {
        let asset_packs = format!("    assetPacks = [\":{}\"]", descriptor.pack_name());
        let merged = merge(
            &document.build_script,
            &Block { tag: ASSET_PACKS_TAG, contents: &asset_packs, anchor: "android {", offset: 1, comment: "//" },
        )?;
        document.build_script = merged.contents;

        let dependency = &descriptor.config().delivery_dependency;
        if document.build_script.contains(dependency.as_str()) {
            tracing::debug!(%dependency, "Delivery dependency already declared");
            return Ok(document);
        }
        let implementation = format!("    implementation \"{dependency}\"");
        let merged = merge(
            &document.build_script,
            &Block { tag: DEPENDENCY_TAG, contents: &implementation, anchor: "dependencies {", offset: 1, comment: "//" },
        )?;
        document.build_script = merged.contents;
        Ok(document)
    }
}
