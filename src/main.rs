mod error;
mod locator;
mod logging;

use crate::error::{ErrorKind, Result};
use crate::locator::ProjectPackLocator;
use assetpack_cache::LocalCache;
use assetpack_config::PackConfig;
use assetpack_generate::{Outcome, Pipeline, ProjectDescriptor};
use assetpack_resolver::{AssetResolver, BuildVariant, file_uri};
use assetpack_source::{DeliveredPack, DirectoryBundle, DirectoryLocator, EmbeddedBundle, LocatorHandle};
use clap::{Parser, Subcommand};
use exn::ResultExt;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Root of the host project, where `assetpack.toml` is looked up.
    #[arg(long, global = true, value_name = "DIR", default_value = ".")]
    project_root: PathBuf,

    /// Log at debug level unless `RUST_LOG` is set.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Provision the Android project for the asset pack (safe to repeat)
    Prepare {
        /// Application namespace; read from the app build script by default
        #[arg(long)]
        namespace: Option<String>,
    },
    /// Resolve a media file to a local path, as the app would at run time
    Resolve {
        /// File name inside the asset directory, e.g. `lesson-1.mp4`
        #[arg(value_name = "FILE")]
        file: String,

        /// Private directory the resolved files are cached in
        #[arg(long, value_name = "DIR")]
        cache_dir: PathBuf,

        /// Directory of installed packs (`<DIR>/<pack>/<asset directory>/...`);
        /// defaults to the packs of the prepared project
        #[arg(long, value_name = "DIR")]
        pack_root: Option<PathBuf>,

        /// Bundled assets directory; defaults to the project's development assets
        #[arg(long, value_name = "DIR")]
        bundle_dir: Option<PathBuf>,

        /// Prefer the delivered pack over the bundle, as release builds do
        #[arg(long)]
        release: bool,

        /// Give up on a source after this many milliseconds
        #[arg(long, value_name = "MS")]
        timeout_ms: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Command::Prepare { namespace } => prepare(&cli.project_root, namespace).await,
        Command::Resolve { file, cache_dir, pack_root, bundle_dir, release, timeout_ms } => {
            let options = ResolveOptions { cache_dir, pack_root, bundle_dir, release, timeout_ms };
            resolve(&cli.project_root, &file, options).await
        },
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = ?e, "{}", &*e);
            ExitCode::FAILURE
        },
    }
}

fn load_config(project_root: &Path) -> Result<PackConfig> {
    PackConfig::load(project_root).or_raise(|| ErrorKind::Config)
}

async fn prepare(project_root: &Path, namespace: Option<String>) -> Result<()> {
    let mut config = load_config(project_root)?;
    if namespace.is_some() {
        config.namespace = namespace;
    }
    let descriptor = ProjectDescriptor::discover(project_root, config).await.or_raise(|| ErrorKind::Prepare)?;
    let pipeline = Pipeline::new().or_raise(|| ErrorKind::Prepare)?;
    let report = pipeline.apply(&descriptor).await.or_raise(|| ErrorKind::Prepare)?;
    for (path, outcome) in report.artifacts() {
        match outcome {
            Outcome::Written => tracing::info!(path = %path.display(), "Written"),
            Outcome::Unchanged => tracing::debug!(path = %path.display(), "Unchanged"),
        }
    }
    Ok(())
}

struct ResolveOptions {
    cache_dir: PathBuf,
    pack_root: Option<PathBuf>,
    bundle_dir: Option<PathBuf>,
    release: bool,
    timeout_ms: Option<u64>,
}

async fn resolve(project_root: &Path, file: &str, options: ResolveOptions) -> Result<()> {
    let config = load_config(project_root)?;
    let cache_dir = std::path::absolute(&options.cache_dir).or_raise(|| ErrorKind::Resolve)?;
    let cache = LocalCache::new(cache_dir, &config.pack_name).or_raise(|| ErrorKind::Resolve)?;

    let locator: LocatorHandle = match options.pack_root {
        Some(root) => Arc::new(DirectoryLocator::new(root)),
        None => Arc::new(ProjectPackLocator::new(project_root)),
    };
    let bundle_dir = options
        .bundle_dir
        .unwrap_or_else(|| project_root.join("android").join("app").join("src").join("dev").join("assets"));
    let delivered = DeliveredPack::new(&config.pack_name, &config.asset_directory, locator);
    let embedded = EmbeddedBundle::new(&config.asset_directory, Arc::new(DirectoryBundle::new(bundle_dir)));

    let variant = if options.release { BuildVariant::Release } else { BuildVariant::Debug };
    let mut resolver = AssetResolver::new(cache, Arc::new(delivered), Arc::new(embedded)).with_variant(variant);
    if let Some(ms) = options.timeout_ms.or(config.resolve_timeout_ms) {
        resolver = resolver.with_timeout(Duration::from_millis(ms));
    }

    let path = resolver.resolve(file).await.or_raise(|| ErrorKind::Resolve)?;
    println!("{}", file_uri(&path));
    Ok(())
}
