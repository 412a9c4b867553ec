use crate::descriptor::ProjectDescriptor;
use crate::error::{ErrorKind, Result};
use crate::report::{Report, write_if_changed};
use exn::ResultExt;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Application entry-point source, e.g. `MainApplication.kt`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryPoint {
    pub path: PathBuf,
    pub contents: String,
}

/// In-memory copy of the project files the document steps patch.
///
/// Steps take the document by value and return the patched one; nothing
/// touches the disk until [`save`](Self::save).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigDocument {
    /// `AndroidManifest.xml` of the app module.
    pub manifest: String,
    /// `build.gradle` of the app module.
    pub build_script: String,
    /// `settings.gradle` of the Android project.
    pub settings: String,
    /// Absent when the project has no recognisable application class.
    pub entry_point: Option<EntryPoint>,
}
impl ConfigDocument {
    pub async fn load(descriptor: &ProjectDescriptor) -> Result<Self> {
        let manifest = read(&descriptor.manifest_path()).await?;
        let build_script = read(&descriptor.build_script_path()).await?;
        let settings = read(&descriptor.settings_path()).await?;
        let mut entry_point = None;
        for path in descriptor.entry_point_candidates()? {
            if let Some(contents) = read_optional(&path).await? {
                entry_point = Some(EntryPoint { path, contents });
                break;
            }
        }
        if entry_point.is_none() {
            tracing::warn!("No application entry point found, module registration will be skipped");
        }
        Ok(Self { manifest, build_script, settings, entry_point })
    }

    /// Write every part back to where it was loaded from, skipping unchanged files.
    pub async fn save(&self, descriptor: &ProjectDescriptor, report: &mut Report) -> Result<()> {
        let mut targets = vec![
            (descriptor.manifest_path(), self.manifest.as_str()),
            (descriptor.build_script_path(), self.build_script.as_str()),
            (descriptor.settings_path(), self.settings.as_str()),
        ];
        if let Some(entry_point) = &self.entry_point {
            targets.push((entry_point.path.clone(), entry_point.contents.as_str()));
        }
        for (path, contents) in targets {
            let outcome = write_if_changed(&path, contents.as_bytes()).await?;
            report.record(path, outcome);
        }
        Ok(())
    }
}

async fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).await.or_raise(|| ErrorKind::Io(path.to_path_buf()))
}

async fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path).await {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).or_raise(|| ErrorKind::Io(path.to_path_buf())),
    }
}
