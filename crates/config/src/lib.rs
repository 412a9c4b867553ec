//! Configuration for asset pack provisioning and resolution.
//!
//! Values are layered with [`figment`], later layers overriding earlier ones:
//!
//! 1. built-in defaults ([`PackConfig::default`]),
//! 2. the user's config file (`config.toml` in the platform config directory),
//! 3. `assetpack.toml`, then `assetpack.yaml`, in the project root,
//! 4. `ASSETPACK_*` environment variables (e.g. `ASSETPACK_PACK_NAME`).
//!
//! ```toml
//! # assetpack.toml
//! pack_name = "fbtvideos"
//! asset_directory = "videos"
//! namespace = "com.unfoldingword.fbtapp"
//! media_extensions = ["mp4"]
//! ```

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const PROJECT_FILE_TOML: &str = "assetpack.toml";
pub const PROJECT_FILE_YAML: &str = "assetpack.yaml";
pub const ENV_PREFIX: &str = "ASSETPACK_";

/// Everything that names or locates the asset pack.
///
/// The pack name is fixed per application build; it is not something the
/// running app can change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackConfig {
    /// Asset pack name. Doubles as the Gradle module name and the cache
    /// sub-directory, so it must be a plain identifier.
    pub pack_name: String,
    /// Directory inside the pack's (and the bundle's) assets holding the media.
    pub asset_directory: String,
    /// Base name of the generated native module (`<name>Module`, `<name>Package`).
    pub module_name: String,
    /// Maven coordinates of the platform asset delivery library.
    pub delivery_dependency: String,
    /// Where the media to ship lives, relative to the project root.
    pub source_directory: PathBuf,
    /// Extensions (without the dot) of the files copied into the pack.
    pub media_extensions: Vec<String>,
    /// Android application namespace. Read from the app build script when unset.
    pub namespace: Option<String>,
    /// Optional per-source deadline for resolutions, in milliseconds.
    pub resolve_timeout_ms: Option<u64>,
}
impl Default for PackConfig {
    fn default() -> Self {
        Self {
            pack_name: "fbtvideos".to_string(),
            asset_directory: "videos".to_string(),
            module_name: "FbtAssetPack".to_string(),
            delivery_dependency: "com.google.android.play:asset-delivery:2.2.1".to_string(),
            source_directory: PathBuf::from("assetpack/videos"),
            media_extensions: vec!["mp4".to_string()],
            namespace: None,
            resolve_timeout_ms: None,
        }
    }
}

impl PackConfig {
    /// Load and validate the configuration for the project at `project_root`.
    pub fn load(project_root: impl AsRef<Path>) -> Result<Self> {
        Self::from_figment(Self::figment(project_root, user_config_file()))
    }

    /// The layered configuration sources, without extracting them.
    pub fn figment(project_root: impl AsRef<Path>, user_config: Option<PathBuf>) -> Figment {
        let root = project_root.as_ref();
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(user_config) = user_config {
            figment = figment.merge(Toml::file(user_config));
        }
        figment
            .merge(Toml::file(root.join(PROJECT_FILE_TOML)))
            .merge(Yaml::file(root.join(PROJECT_FILE_YAML)))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        tracing::debug!(pack = %config.pack_name, module = %config.module_name, "Configuration loaded");
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !is_identifier(&self.pack_name) {
            exn::bail!(ErrorKind::Invalid("pack_name", self.pack_name.clone()));
        }
        if !is_identifier(&self.module_name) {
            exn::bail!(ErrorKind::Invalid("module_name", self.module_name.clone()));
        }
        if self.asset_directory.is_empty() || self.asset_directory.contains(['/', '\\']) || self.asset_directory == ".."
        {
            exn::bail!(ErrorKind::Invalid("asset_directory", self.asset_directory.clone()));
        }
        if self.delivery_dependency.split(':').count() != 3 {
            exn::bail!(ErrorKind::Invalid("delivery_dependency", self.delivery_dependency.clone()));
        }
        if self.media_extensions.is_empty() || self.media_extensions.iter().any(|e| e.is_empty() || e.starts_with('.')) {
            exn::bail!(ErrorKind::Invalid("media_extensions", self.media_extensions.join(",")));
        }
        if let Some(namespace) = &self.namespace
            && !is_namespace(namespace)
        {
            exn::bail!(ErrorKind::Invalid("namespace", namespace.clone()));
        }
        Ok(())
    }

    /// Absolute source media directory for the project at `project_root`.
    pub fn source_directory_in(&self, project_root: impl AsRef<Path>) -> PathBuf {
        project_root.as_ref().join(&self.source_directory)
    }

    /// Whether a file in the source directory should be shipped in the pack.
    pub fn is_media(&self, file_name: impl AsRef<Path>) -> bool {
        file_name
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.media_extensions.iter().any(|m| m == ext))
    }
}

/// `<config dir>/assetpack/config.toml`, when the platform has a config directory.
pub fn user_config_file() -> Option<PathBuf> {
    ProjectDirs::from("", "", "assetpack").map(|dirs| dirs.config_dir().join("config.toml"))
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic()) && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Dot-separated Java package name, e.g. `com.unfoldingword.fbtapp`.
pub fn is_namespace(s: &str) -> bool {
    s.split('.').all(|segment| {
        let mut chars = segment.chars();
        chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use rstest::rstest;

    #[test]
    fn test_defaults_are_valid() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = PackConfig::from_figment(PackConfig::figment(temp_dir.path(), None)).unwrap();
        assert_eq!(config, PackConfig::default());
    }

    #[test]
    fn test_project_file_and_env_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                PROJECT_FILE_TOML,
                r#"
                pack_name = "lessons"
                namespace = "org.example.app"
                media_extensions = ["mp4", "webm"]
                "#,
            )?;
            jail.set_env("ASSETPACK_MODULE_NAME", "LessonPack");
            let config = PackConfig::from_figment(PackConfig::figment(jail.directory(), None)).unwrap();
            assert_eq!(config.pack_name, "lessons");
            assert_eq!(config.namespace.as_deref(), Some("org.example.app"));
            assert_eq!(config.module_name, "LessonPack");
            assert_eq!(config.media_extensions, vec!["mp4", "webm"]);
            // Untouched values keep their defaults.
            assert_eq!(config.asset_directory, "videos");
            Ok(())
        });
    }

    #[test]
    fn test_yaml_overrides_toml() {
        Jail::expect_with(|jail| {
            jail.create_file(PROJECT_FILE_TOML, "pack_name = \"fromtoml\"")?;
            jail.create_file(PROJECT_FILE_YAML, "pack_name: fromyaml")?;
            let config = PackConfig::from_figment(PackConfig::figment(jail.directory(), None)).unwrap();
            assert_eq!(config.pack_name, "fromyaml");
            Ok(())
        });
    }

    #[test]
    fn test_user_config_is_lowest_file_layer() {
        Jail::expect_with(|jail| {
            jail.create_file("user.toml", "pack_name = \"fromuser\"\nasset_directory = \"clips\"")?;
            jail.create_file(PROJECT_FILE_TOML, "pack_name = \"fromproject\"")?;
            let user = jail.directory().join("user.toml");
            let config = PackConfig::from_figment(PackConfig::figment(jail.directory(), Some(user))).unwrap();
            assert_eq!(config.pack_name, "fromproject");
            assert_eq!(config.asset_directory, "clips");
            Ok(())
        });
    }

    #[rstest]
    #[case("pack_name = \"fbt-videos\"", "pack_name")]
    #[case("pack_name = \"\"", "pack_name")]
    #[case("module_name = \"1Pack\"", "module_name")]
    #[case("asset_directory = \"a/b\"", "asset_directory")]
    #[case("delivery_dependency = \"asset-delivery\"", "delivery_dependency")]
    #[case("media_extensions = []", "media_extensions")]
    #[case("media_extensions = [\".mp4\"]", "media_extensions")]
    #[case("namespace = \"com..app\"", "namespace")]
    fn test_invalid_values(#[case] toml: &str, #[case] field: &str) {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(temp_dir.path().join(PROJECT_FILE_TOML), toml).unwrap();
        let err = PackConfig::from_figment(PackConfig::figment(temp_dir.path(), None)).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Invalid(f, _) if *f == field));
    }

    #[test]
    fn test_malformed_file_fails_to_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(temp_dir.path().join(PROJECT_FILE_TOML), "pack_name = [").unwrap();
        let err = PackConfig::from_figment(PackConfig::figment(temp_dir.path(), None)).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Load));
    }

    #[rstest]
    #[case("lesson.mp4", true)]
    #[case("lesson.MP4", false)]
    #[case("lesson.mp4.part", false)]
    #[case("notes.txt", false)]
    #[case("mp4", false)]
    fn test_is_media(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(PackConfig::default().is_media(name), expected);
    }

    #[rstest]
    #[case("com.unfoldingword.fbtapp", true)]
    #[case("app", true)]
    #[case("com.example_1.app", true)]
    #[case("", false)]
    #[case("com.", false)]
    #[case("com.1app", false)]
    #[case("com/example", false)]
    fn test_is_namespace(#[case] namespace: &str, #[case] expected: bool) {
        assert_eq!(is_namespace(namespace), expected);
    }
}
