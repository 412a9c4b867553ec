use crate::consts::{APPLICATION_ID_REGEX, NAMESPACE_REGEX};
use crate::error::{ErrorKind, Result};
use assetpack_config::{PackConfig, is_namespace};
use exn::ResultExt;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Everything one generation run needs to know about the host project.
///
/// Immutable once built; every path is derived from the project root, the
/// pack configuration and the application namespace.
#[derive(Clone, Debug)]
pub struct ProjectDescriptor {
    root: PathBuf,
    config: PackConfig,
    namespace: Option<String>,
}
impl ProjectDescriptor {
    /// Describe the project at `root` using the namespace from `config`, if any.
    pub fn new(root: impl Into<PathBuf>, config: PackConfig) -> Self {
        let namespace = config.namespace.clone();
        Self { root: root.into(), config, namespace }
    }

    /// Like [`new`](Self::new), but falls back to the `namespace` (then
    /// `applicationId`) declared in the app build script.
    ///
    /// A missing build script is not an error here; the namespace is then
    /// left unresolved and the pipeline refuses to run.
    pub async fn discover(root: impl Into<PathBuf>, config: PackConfig) -> Result<Self> {
        let mut descriptor = Self::new(root, config);
        if descriptor.namespace.is_none() {
            let path = descriptor.build_script_path();
            match fs::read_to_string(&path).await {
                Ok(script) => descriptor.namespace = namespace_from_build_script(&script),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {},
                Err(e) => return Err(e).or_raise(|| ErrorKind::Io(path)),
            }
        }
        tracing::debug!(namespace = ?descriptor.namespace, root = %descriptor.root.display(), "Described project");
        Ok(descriptor)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &PackConfig {
        &self.config
    }

    /// The application namespace, e.g. `com.unfoldingword.fbtapp`.
    pub fn namespace(&self) -> Result<&str> {
        match self.namespace.as_deref() {
            Some(namespace) if is_namespace(namespace) => Ok(namespace),
            Some(namespace) => exn::bail!(ErrorKind::Misconfiguration(format!("invalid namespace `{namespace}`"))),
            None => exn::bail!(ErrorKind::Misconfiguration("Android package name is required".to_string())),
        }
    }

    pub fn pack_name(&self) -> &str {
        &self.config.pack_name
    }

    fn android_dir(&self) -> PathBuf {
        self.root.join("android")
    }

    fn app_main_dir(&self) -> PathBuf {
        self.android_dir().join("app").join("src").join("main")
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.app_main_dir().join("AndroidManifest.xml")
    }

    pub fn build_script_path(&self) -> PathBuf {
        self.android_dir().join("app").join("build.gradle")
    }

    pub fn settings_path(&self) -> PathBuf {
        self.android_dir().join("settings.gradle")
    }

    fn namespace_dir(&self) -> Result<PathBuf> {
        let namespace = self.namespace()?;
        Ok(namespace.split('.').fold(self.app_main_dir().join("java"), |dir, segment| dir.join(segment)))
    }

    /// Candidate application entry-point sources, in order of preference.
    pub fn entry_point_candidates(&self) -> Result<[PathBuf; 2]> {
        let dir = self.namespace_dir()?;
        Ok([dir.join("MainApplication.kt"), dir.join("MainApplication.java")])
    }

    /// Where the generated native module sources go.
    pub fn native_source_dir(&self) -> Result<PathBuf> {
        Ok(self.namespace_dir()?.join("assetpack"))
    }

    pub fn native_module_path(&self) -> Result<PathBuf> {
        Ok(self.native_source_dir()?.join(format!("{}Module.kt", self.config.module_name)))
    }

    pub fn native_package_path(&self) -> Result<PathBuf> {
        Ok(self.native_source_dir()?.join(format!("{}Package.kt", self.config.module_name)))
    }

    /// Root of the asset pack's Gradle module.
    pub fn pack_dir(&self) -> PathBuf {
        self.app_main_dir().join("assetpacks").join(&self.config.pack_name)
    }

    pub fn pack_assets_dir(&self) -> PathBuf {
        self.pack_dir().join("src").join("main").join("assets").join(&self.config.asset_directory)
    }

    pub fn pack_build_script_path(&self) -> PathBuf {
        self.pack_dir().join("build.gradle")
    }

    pub fn pack_manifest_path(&self) -> PathBuf {
        self.pack_dir().join("src").join("main").join("manifest").join("AndroidManifest.xml")
    }

    /// Assets bundled into development builds, used when the pack is unavailable.
    pub fn dev_assets_dir(&self) -> PathBuf {
        self.android_dir().join("app").join("src").join("dev").join("assets").join(&self.config.asset_directory)
    }

    pub fn source_media_dir(&self) -> PathBuf {
        self.config.source_directory_in(&self.root)
    }
}

/// First `namespace` declaration in the script, else the first `applicationId`.
pub fn namespace_from_build_script(script: &str) -> Option<String> {
    [&*NAMESPACE_REGEX, &*APPLICATION_ID_REGEX]
        .into_iter()
        .find_map(|pattern| pattern.captures(script))
        .map(|captures| captures[1].to_string())
}
