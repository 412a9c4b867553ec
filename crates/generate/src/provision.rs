//! Filesystem provisioning: media copies and generated sources.

use crate::descriptor::ProjectDescriptor;
use crate::error::{ErrorKind, Result};
use crate::report::{Report, write_if_changed};
use crate::template::Templates;
use assetpack_config::PackConfig;
use async_stream::stream;
use exn::{OptionExt, ResultExt};
use futures::stream::FuturesUnordered;
use futures::{Stream, StreamExt, TryStreamExt};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::instrument;

/// Upper bound on simultaneous file copies.
pub const MAX_COPY_CONCURRENCY: usize = 16;

/// Streams the media files directly inside `dir`, in directory order.
pub fn media_files<'a>(dir: &'a Path, config: &'a PackConfig) -> impl Stream<Item = Result<PathBuf>> + 'a {
    stream! {
        let mut entries = match fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) => {
                yield Err(e).or_raise(|| ErrorKind::Io(dir.to_path_buf()));
                return;
            },
        };
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    yield Err(e).or_raise(|| ErrorKind::Io(dir.to_path_buf()));
                    return;
                },
            };
            if !config.is_media(entry.file_name()) {
                continue;
            }
            match entry.file_type().await {
                Ok(file_type) if file_type.is_file() => yield Ok(entry.path()),
                Ok(_) => {},
                Err(e) => yield Err(e).or_raise(|| ErrorKind::Io(entry.path())),
            }
        }
    }
}

/// Copy every file in `files` into `destination`, keeping file names.
///
/// Copies run concurrently, at most [`MAX_COPY_CONCURRENCY`] at a time. The
/// first failure is returned once the copies already started have finished.
#[instrument(skip_all, fields(destination = %destination.display(), files = files.len()))]
pub async fn copy_all(files: &[PathBuf], destination: &Path) -> Result<()> {
    fs::create_dir_all(destination).await.or_raise(|| ErrorKind::Io(destination.to_path_buf()))?;
    let mut pending = files.iter().map(|from| copy_one(from, destination));
    let mut processing = FuturesUnordered::new();
    processing.extend(pending.by_ref().take(MAX_COPY_CONCURRENCY));
    let mut failure = None;
    while let Some(result) = processing.next().await {
        match result {
            Ok(()) if failure.is_none() => processing.extend(pending.next()),
            Ok(()) => {},
            Err(e) => {
                failure.get_or_insert(e);
            },
        }
    }
    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

async fn copy_one(from: &Path, destination: &Path) -> Result<()> {
    let name = from.file_name().ok_or_raise(|| ErrorKind::Io(from.to_path_buf()))?;
    let to = destination.join(name);
    fs::copy(from, &to).await.or_raise(|| ErrorKind::Io(to.clone()))?;
    tracing::trace!(from = %from.display(), to = %to.display(), "Copied");
    Ok(())
}

/// Ship the media in the pack (and the development fallback), then write the
/// pack module and native sources.
#[instrument(skip_all, fields(pack = descriptor.pack_name()))]
pub(crate) async fn provision(descriptor: &ProjectDescriptor, templates: &Templates, report: &mut Report) -> Result<()> {
    let source = descriptor.source_media_dir();
    let mut media: Vec<PathBuf> = media_files(&source, descriptor.config()).try_collect().await?;
    media.sort();

    copy_all(&media, &descriptor.pack_assets_dir()).await?;
    if !media.is_empty() {
        copy_all(&media, &descriptor.dev_assets_dir()).await?;
    }
    report.set_media_files(media.len());
    tracing::info!(count = media.len(), source = %source.display(), "Copied media into asset pack");

    let artifacts = [
        (descriptor.pack_build_script_path(), templates.pack_build_script(descriptor)?),
        (descriptor.pack_manifest_path(), templates.pack_manifest(descriptor)?),
        (descriptor.native_module_path()?, templates.native_module(descriptor)?),
        (descriptor.native_package_path()?, templates.native_package(descriptor)?),
    ];
    for (path, contents) in artifacts {
        let outcome = write_if_changed(&path, contents.as_bytes()).await?;
        report.record(path, outcome);
    }
    Ok(())
}
