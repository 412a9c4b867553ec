use crate::BuildVariant;
use crate::error::{Error, ErrorKind, Result};
use assetpack_cache::LocalCache;
use assetpack_source::{SourceHandle, TimeoutSource, validate_file_name};
use exn::ResultExt;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex as SyncMutex};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::instrument;

/// Resolves logical asset file names to usable local file paths.
///
/// Resolution checks the [`LocalCache`] first; on a miss it asks the content
/// sources in [`BuildVariant`] order and copies the first hit into the cache.
///
/// Concurrent resolutions of *different* files run independently.
/// Concurrent resolutions of the *same* uncached file are de-duplicated: the
/// first caller runs the source chain while the others wait on a per-file
/// lock and are then answered from the cache. Dropping a pending `resolve()`
/// future is the only form of cancellation.
pub struct AssetResolver {
    cache: LocalCache,
    delivered: SourceHandle,
    embedded: SourceHandle,
    variant: BuildVariant,
    in_flight: SyncMutex<HashMap<String, Arc<Mutex<()>>>>,
}
impl AssetResolver {
    /// Create a resolver for the current [`BuildVariant`].
    ///
    /// # Arguments
    /// * `cache` - Application-private cache for the asset pack
    /// * `delivered` - Source reading from the installed asset pack
    /// * `embedded` - Source reading from the application's bundled assets
    pub fn new(cache: LocalCache, delivered: SourceHandle, embedded: SourceHandle) -> Self {
        Self {
            cache,
            delivered,
            embedded,
            variant: BuildVariant::current(),
            in_flight: SyncMutex::new(HashMap::new()),
        }
    }

    /// Override the build variant (and with it the source order).
    pub fn with_variant(mut self, variant: BuildVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Bound every source lookup by `timeout`. A source that does not answer
    /// in time counts as a failed attempt and the next source is tried.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.delivered = Arc::new(TimeoutSource::new(self.delivered, timeout));
        self.embedded = Arc::new(TimeoutSource::new(self.embedded, timeout));
        self
    }

    pub fn cache(&self) -> &LocalCache {
        &self.cache
    }

    /// Sources in the order they are consulted.
    fn sources(&self) -> [&SourceHandle; 2] {
        match self.variant.prefers_embedded() {
            true => [&self.embedded, &self.delivered],
            false => [&self.delivered, &self.embedded],
        }
    }

    /// Returns a local file-system path holding the complete contents of
    /// `file_name`.
    ///
    /// The path is bare; formatting it as a URI (see
    /// [`file_uri`](crate::file_uri)) is up to the caller.
    ///
    /// # Errors
    /// - [`MissingFile`](ErrorKind::MissingFile) when no source has the file
    ///   (nothing is written to the cache).
    /// - [`AssetError`](ErrorKind::AssetError) when the last source tried
    ///   failed unexpectedly.
    /// - [`InvalidFileName`](ErrorKind::InvalidFileName) when `file_name` is
    ///   not a single path component.
    #[instrument(skip(self), fields(variant = %self.variant))]
    pub async fn resolve(&self, file_name: &str) -> Result<PathBuf> {
        validate_file_name(file_name).or_raise(|| ErrorKind::InvalidFileName(file_name.to_string()))?;
        if let Some(path) = self.cached(file_name).await? {
            return Ok(path);
        }

        let in_flight = self.acquire(file_name);
        let _guard = in_flight.lock.lock().await;
        // Another caller may have populated the cache while we waited.
        match self.cached(file_name).await? {
            Some(path) => Ok(path),
            None => self.fetch(file_name).await,
        }
    }

    async fn cached(&self, file_name: &str) -> Result<Option<PathBuf>> {
        let hit = self.cache.lookup(file_name).await.or_raise(|| ErrorKind::Cache)?;
        if let Some(path) = &hit {
            tracing::trace!(path = %path.display(), "Asset served from local cache");
        }
        Ok(hit)
    }

    /// Walk the sources in variant order, copying the first hit into the cache.
    async fn fetch(&self, file_name: &str) -> Result<PathBuf> {
        // Outcome of the most recent attempt: `None` for a plain miss.
        let mut last_failure: Option<Error> = None;
        for source in self.sources() {
            let reader = match source.open(file_name).await {
                Ok(reader) => reader,
                Err(e) if e.is_not_found() => {
                    tracing::debug!(source = source.name(), "Asset not available from source");
                    last_failure = None;
                    continue;
                },
                Err(e) => {
                    tracing::warn!(source = source.name(), error = ?e, "Content source failed; falling back");
                    last_failure = Some(e.raise(ErrorKind::AssetError(file_name.to_string())));
                    continue;
                },
            };
            match self.cache.store(file_name, reader).await {
                Ok(path) => {
                    tracing::info!(source = source.name(), path = %path.display(), "Asset copied into local cache");
                    return Ok(path);
                },
                Err(e) => {
                    tracing::warn!(source = source.name(), error = ?e, "Copying asset into cache failed; falling back");
                    last_failure = Some(e.raise(ErrorKind::AssetError(file_name.to_string())));
                },
            }
        }
        match last_failure {
            Some(e) => Err(e),
            None => exn::bail!(ErrorKind::MissingFile(file_name.to_string())),
        }
    }

    fn acquire<'a>(&'a self, file_name: &'a str) -> InFlight<'a> {
        // Poisoning only happens if another thread panicked while holding the
        // map lock; the map itself is still consistent.
        let mut in_flight = self.in_flight.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let lock = in_flight.entry(file_name.to_string()).or_default().clone();
        InFlight { map: &self.in_flight, file_name, lock }
    }
}

/// Claim on a file's entry in the in-flight map. The entry is removed when the
/// last claim goes away, whether the resolution finished or was dropped.
struct InFlight<'a> {
    map: &'a SyncMutex<HashMap<String, Arc<Mutex<()>>>>,
    file_name: &'a str,
    lock: Arc<Mutex<()>>,
}
impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut in_flight = self.map.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        // One reference held by the map, one by us: nobody else is waiting.
        if Arc::strong_count(&self.lock) <= 2 {
            in_flight.remove(self.file_name);
        }
    }
}
