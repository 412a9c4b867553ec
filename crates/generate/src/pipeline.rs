use crate::descriptor::ProjectDescriptor;
use crate::document::ConfigDocument;
use crate::error::{ErrorKind, Result};
use crate::provision::provision;
use crate::report::Report;
use crate::steps::{self, Step};
use crate::template::Templates;
use tracing::instrument;

/// Makes a host project ready to build with the asset pack.
///
/// Running it again over its own output changes nothing. A run that fails part
/// way is not rolled back, but every precondition is checked before the first
/// write.
pub struct Pipeline {
    steps: Vec<Box<dyn Step + Send + Sync>>,
    templates: Templates,
}
impl Pipeline {
    pub fn new() -> Result<Self> {
        Ok(Self { steps: steps::all(), templates: Templates::new()? })
    }

    #[instrument(skip_all, fields(root = %descriptor.root().display(), pack = descriptor.pack_name()))]
    pub async fn apply(&self, descriptor: &ProjectDescriptor) -> Result<Report> {
        Self::preflight(descriptor).await?;

        let mut document = ConfigDocument::load(descriptor).await?;
        for step in &self.steps {
            document = step.apply(document, descriptor)?;
            tracing::debug!(step = step.name(), "Applied");
        }

        let mut report = Report::default();
        provision(descriptor, &self.templates, &mut report).await?;
        document.save(descriptor, &mut report).await?;

        let written = report.written().count();
        let unchanged = report.artifacts().len() - written;
        tracing::info!(written, unchanged, media = report.media_files(), "Prepared");
        Ok(report)
    }

    /// Everything that would make the run fail for a reason other than I/O.
    async fn preflight(descriptor: &ProjectDescriptor) -> Result<()> {
        descriptor.namespace()?;
        let source = descriptor.source_media_dir();
        let is_dir = tokio::fs::metadata(&source).await.map(|m| m.is_dir()).unwrap_or(false);
        if !is_dir {
            exn::bail!(ErrorKind::Misconfiguration(format!(
                "asset pack source directory missing: {}",
                source.display()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Outcome;
    use crate::steps::fixtures;
    use assetpack_config::PackConfig;
    use std::collections::BTreeMap;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    const MAIN_APPLICATION: &str = "android/app/src/main/java/com/unfoldingword/fbtapp/MainApplication.kt";

    /// An Expo-style Android project with two lessons and an unrelated file.
    fn project() -> TempDir {
        let temp_dir = tempfile::tempdir().unwrap();
        let files = [
            ("android/app/src/main/AndroidManifest.xml", fixtures::MANIFEST),
            ("android/app/build.gradle", fixtures::BUILD_SCRIPT),
            ("android/settings.gradle", fixtures::SETTINGS),
            (MAIN_APPLICATION, fixtures::MAIN_APPLICATION),
            ("assetpack/videos/lesson-1.mp4", "first lesson"),
            ("assetpack/videos/lesson-2.mp4", "second lesson"),
            ("assetpack/videos/README.txt", "not a video"),
        ];
        for (path, contents) in files {
            let path = temp_dir.path().join(path);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, contents).unwrap();
        }
        temp_dir
    }

    fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
        fn walk(dir: &Path, root: &Path, files: &mut BTreeMap<PathBuf, Vec<u8>>) {
            for entry in std::fs::read_dir(dir).unwrap() {
                let path = entry.unwrap().path();
                if path.is_dir() {
                    walk(&path, root, files);
                } else {
                    files.insert(path.strip_prefix(root).unwrap().to_path_buf(), std::fs::read(&path).unwrap());
                }
            }
        }
        let mut files = BTreeMap::new();
        walk(root, root, &mut files);
        files
    }

    async fn apply(root: &Path) -> Result<Report> {
        let descriptor = ProjectDescriptor::discover(root, PackConfig::default()).await?;
        Pipeline::new()?.apply(&descriptor).await
    }

    #[tokio::test]
    async fn provisions_project() {
        let project = project();
        let root = project.path();
        let report = apply(root).await.unwrap();
        let files = snapshot(root);
        let text = |path: &str| String::from_utf8(files[Path::new(path)].clone()).unwrap();

        assert_eq!(report.media_files(), 2);
        let pack_assets = "android/app/src/main/assetpacks/fbtvideos/src/main/assets/videos";
        for dir in [pack_assets, "android/app/src/dev/assets/videos"] {
            assert_eq!(text(&format!("{dir}/lesson-1.mp4")), "first lesson");
            assert_eq!(text(&format!("{dir}/lesson-2.mp4")), "second lesson");
            assert!(!files.contains_key(Path::new(dir).join("README.txt").as_path()));
        }

        assert!(text("android/app/src/main/AndroidManifest.xml").contains(
            r#"<meta-data android:name="com.android.vending.asset-pack" android:value="fbtvideos"/>"#
        ));
        assert!(text("android/app/build.gradle").contains("    assetPacks = [\":fbtvideos\"]\n"));
        assert!(text("android/settings.gradle").ends_with(
            "include ':fbtvideos'\n\
             project(':fbtvideos').projectDir = new File(rootProject.projectDir, 'app/src/main/assetpacks/fbtvideos')"
        ));
        assert!(text(MAIN_APPLICATION).contains("      add(FbtAssetPackPackage())\n"));
        assert!(text("android/app/src/main/assetpacks/fbtvideos/build.gradle").contains("packName = 'fbtvideos'"));
        assert!(
            text("android/app/src/main/assetpacks/fbtvideos/src/main/manifest/AndroidManifest.xml")
                .contains("<manifest package=\"com.unfoldingword.fbtapp.fbtvideos\">")
        );
        let native = "android/app/src/main/java/com/unfoldingword/fbtapp/assetpack";
        assert!(text(&format!("{native}/FbtAssetPackModule.kt")).contains("class FbtAssetPackModule("));
        assert!(text(&format!("{native}/FbtAssetPackPackage.kt")).contains("class FbtAssetPackPackage : ReactPackage"));

        assert_eq!(report.artifacts().len(), 8);
        assert!(report.artifacts().iter().all(|(_, outcome)| *outcome == Outcome::Written));
    }

    #[tokio::test]
    async fn second_run_changes_nothing() {
        let project = project();
        let root = project.path();
        apply(root).await.unwrap();
        let first = snapshot(root);

        let report = apply(root).await.unwrap();
        assert_eq!(snapshot(root), first);
        assert!(report.artifacts().iter().all(|(_, outcome)| *outcome == Outcome::Unchanged));
        assert_eq!(report.written().count(), 0);

        let settings = String::from_utf8(first[Path::new("android/settings.gradle")].clone()).unwrap();
        assert_eq!(settings.matches("include ':fbtvideos'").count(), 1);
    }

    #[tokio::test]
    async fn missing_namespace_writes_nothing() {
        let project = project();
        let root = project.path();
        let build_script = fixtures::BUILD_SCRIPT
            .replace("    namespace 'com.unfoldingword.fbtapp'\n", "")
            .replace("        applicationId 'com.unfoldingword.fbtapp'\n", "");
        std::fs::write(root.join("android/app/build.gradle"), build_script).unwrap();
        let before = snapshot(root);

        let err = apply(root).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Misconfiguration(_)));
        assert_eq!(snapshot(root), before);
    }

    #[tokio::test]
    async fn missing_media_directory_writes_nothing() {
        let project = project();
        let root = project.path();
        std::fs::remove_dir_all(root.join("assetpack")).unwrap();
        let before = snapshot(root);

        let err = apply(root).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Misconfiguration(message) if message.contains("assetpack")));
        assert_eq!(snapshot(root), before);
    }

    #[tokio::test]
    async fn empty_media_directory_skips_dev_fallback() {
        let project = project();
        let root = project.path();
        for name in ["lesson-1.mp4", "lesson-2.mp4"] {
            std::fs::remove_file(root.join("assetpack/videos").join(name)).unwrap();
        }

        let report = apply(root).await.unwrap();
        assert_eq!(report.media_files(), 0);
        assert!(root.join("android/app/src/main/assetpacks/fbtvideos/src/main/assets/videos").is_dir());
        assert!(!root.join("android/app/src/dev").exists());
    }

    #[tokio::test]
    async fn missing_anchor_fails_before_provisioning() {
        let project = project();
        let root = project.path();
        std::fs::write(root.join("android/app/build.gradle"), "namespace 'com.unfoldingword.fbtapp'\n").unwrap();

        let err = apply(root).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::AnchorNotFound(anchor) if anchor == "android {"));
        assert!(!root.join("android/app/src/main/assetpacks").exists());
    }

    #[tokio::test]
    async fn many_media_files_are_all_copied() {
        let project = project();
        let root = project.path();
        let count = crate::provision::MAX_COPY_CONCURRENCY * 2 + 5;
        for i in 0..count {
            std::fs::write(root.join(format!("assetpack/videos/extra-{i:03}.mp4")), format!("extra {i}")).unwrap();
        }

        let report = apply(root).await.unwrap();
        assert_eq!(report.media_files(), count + 2);
        let pack = root.join("android/app/src/main/assetpacks/fbtvideos/src/main/assets/videos");
        for i in 0..count {
            let copied = std::fs::read_to_string(pack.join(format!("extra-{i:03}.mp4"))).unwrap();
            assert_eq!(copied, format!("extra {i}"));
        }
    }
}
