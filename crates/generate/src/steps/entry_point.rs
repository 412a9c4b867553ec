use super::Step;
use crate::descriptor::ProjectDescriptor;
use crate::document::ConfigDocument;
use crate::error::Result;

const IMPORT_ANCHOR: &str = "import expo.modules.ApplicationLifecycleDispatcher";
const PACKAGES_ANCHOR: &str = "return PackageList(this).packages.apply {";

/// Registers the generated package with the application's package list.
///
/// Best effort: a project without an entry point, or whose entry point lacks
/// the expected lines, is left as it is.
pub struct EntryPointStep;
impl Step for EntryPointStep {
    fn name(&self) -> &'static str {
        "entry-point"
    }

    fn apply(&self, mut document: ConfigDocument, descriptor: &ProjectDescriptor) -> Result<ConfigDocument> {
        let Some(mut entry_point) = document.entry_point.take() else {
            return Ok(document);
        };
        let package_class = format!("{}Package", descriptor.config().module_name);
        let contents = &mut entry_point.contents;

        let import = format!("import {}.assetpack.{package_class}", descriptor.namespace()?);
        if !contents.contains(&import) {
            if contents.contains(IMPORT_ANCHOR) {
                *contents = contents.replacen(IMPORT_ANCHOR, &format!("{import}\n{IMPORT_ANCHOR}"), 1);
            } else {
                tracing::warn!(path = %entry_point.path.display(), anchor = IMPORT_ANCHOR, "Import anchor not found");
            }
        }

        if !contents.contains(&format!("{package_class}()")) {
            if contents.contains(PACKAGES_ANCHOR) {
                let registration = format!("{PACKAGES_ANCHOR}\n      add({package_class}())");
                *contents = contents.replacen(PACKAGES_ANCHOR, &registration, 1);
            } else {
                tracing::warn!(
                    path = %entry_point.path.display(),
                    anchor = PACKAGES_ANCHOR,
                    "Package list anchor not found"
                );
            }
        }
        document.entry_point = Some(entry_point);
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures;
    use super::*;
    use crate::document::EntryPoint;
    use std::path::PathBuf;

    fn apply(source: Option<&str>) -> Option<String> {
        let entry_point =
            source.map(|s| EntryPoint { path: PathBuf::from("/project/MainApplication.kt"), contents: s.to_string() });
        let document = ConfigDocument { entry_point, ..fixtures::document() };
        EntryPointStep.apply(document, &fixtures::descriptor()).unwrap().entry_point.map(|e| e.contents)
    }

    #[test]
    fn inserts_import_and_registration() {
        let source = apply(Some(fixtures::MAIN_APPLICATION)).unwrap();
        assert!(source.contains(
            "import com.unfoldingword.fbtapp.assetpack.FbtAssetPackPackage\n\
             import expo.modules.ApplicationLifecycleDispatcher\n"
        ));
        assert!(source.contains("return PackageList(this).packages.apply {\n      add(FbtAssetPackPackage())\n"));
    }

    #[test]
    fn is_idempotent() {
        let once = apply(Some(fixtures::MAIN_APPLICATION)).unwrap();
        assert_eq!(apply(Some(&once)).unwrap(), once);
        assert_eq!(once.matches("FbtAssetPackPackage()").count(), 1);
    }

    #[test]
    fn missing_anchors_are_not_an_error() {
        let source = "package com.unfoldingword.fbtapp\n\nclass MainApplication : Application()\n";
        assert_eq!(apply(Some(source)).unwrap(), source);
    }

    #[test]
    fn missing_entry_point_is_skipped() {
        assert_eq!(apply(None), None);
    }
}
