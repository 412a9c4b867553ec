//! Generated file contents.
//!
//! The sources are [upon] templates embedded into the binary with
//! [`rust-embed`](rust_embed) and compiled once, when [`Templates`] is built.
//!
//! | Variable          | Example                      |
//! |-------------------|------------------------------|
//! | `namespace`       | `com.unfoldingword.fbtapp`   |
//! | `pack_name`       | `fbtvideos`                  |
//! | `asset_directory` | `videos`                     |
//! | `module_name`     | `FbtAssetPack`               |

use crate::descriptor::ProjectDescriptor;
use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use rust_embed::Embed;
use upon::{Engine, Template};

#[derive(Embed)]
#[folder = "templates/"]
struct Sources;
impl Sources {
    fn load(name: &'static str) -> Result<String> {
        let file = Self::get(name).ok_or_raise(|| ErrorKind::Template(format!("{name} is not embedded")))?;
        String::from_utf8(file.data.into_owned()).or_raise(|| ErrorKind::Template(format!("{name} is not UTF-8")))
    }
}

/// Compiled templates for every file the pipeline writes from scratch.
pub struct Templates {
    engine: Engine<'static>,
    native_module: Template<'static>,
    native_package: Template<'static>,
    pack_manifest: Template<'static>,
    pack_build_script: Template<'static>,
}
impl Templates {
    pub fn new() -> Result<Self> {
        let engine = Engine::new();
        let compile = |name: &'static str| -> Result<Template<'static>> {
            engine.compile(Sources::load(name)?).or_raise(|| ErrorKind::Template(name.to_string()))
        };
        let native_module = compile("AssetPackModule.kt")?;
        let native_package = compile("AssetPackPackage.kt")?;
        let pack_manifest = compile("pack/AndroidManifest.xml")?;
        let pack_build_script = compile("pack/build.gradle")?;
        Ok(Self { engine, native_module, native_package, pack_manifest, pack_build_script })
    }

    /// Resolution module exposing `getAssetUri` to the JavaScript side.
    pub fn native_module(&self, descriptor: &ProjectDescriptor) -> Result<String> {
        self.render(&self.native_module, "native module", descriptor)
    }

    /// `ReactPackage` registering the native module.
    pub fn native_package(&self, descriptor: &ProjectDescriptor) -> Result<String> {
        self.render(&self.native_package, "native package", descriptor)
    }

    pub fn pack_manifest(&self, descriptor: &ProjectDescriptor) -> Result<String> {
        self.render(&self.pack_manifest, "pack manifest", descriptor)
    }

    pub fn pack_build_script(&self, descriptor: &ProjectDescriptor) -> Result<String> {
        self.render(&self.pack_build_script, "pack build script", descriptor)
    }

    fn render(&self, template: &Template<'static>, what: &str, descriptor: &ProjectDescriptor) -> Result<String> {
        let namespace = descriptor.namespace()?;
        let config = descriptor.config();
        let parameters = upon::value! {
            namespace: namespace,
            pack_name: &config.pack_name,
            asset_directory: &config.asset_directory,
            module_name: &config.module_name,
        };
        template.render(&self.engine, parameters).to_string().or_raise(|| ErrorKind::Template(what.to_string()))
    }
}
