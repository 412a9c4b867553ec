//! Deadline-bounded content source.
//!
//! Wraps another source and fails its `open` calls with
//! [`Timeout`](ErrorKind::Timeout) when they do not complete in time. The
//! platform pack manager can hang indefinitely; without this decorator so
//! does the resolution that asked it.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::{ErrorKind, Result};
use crate::{BoxSyncRead, ContentSource, SourceHandle};

/// Content source with a per-call deadline.
#[derive(Clone)]
pub struct TimeoutSource {
    inner: SourceHandle,
    timeout: Duration,
}
impl TimeoutSource {
    pub fn new(inner: SourceHandle, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait]
impl ContentSource for TimeoutSource {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn open(&self, file_name: &str) -> Result<BoxSyncRead> {
        match tokio::time::timeout(self.timeout, self.inner.open(file_name)).await {
            Ok(result) => result,
            Err(_elapsed) => {
                tracing::info!(source = self.inner.name(), file = file_name, "Content source timed out");
                exn::bail!(ErrorKind::Timeout(self.timeout))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::Arc;

    struct Hanging;

    #[async_trait]
    impl ContentSource for Hanging {
        fn name(&self) -> &str {
            "hanging"
        }

        async fn open(&self, _file_name: &str) -> Result<BoxSyncRead> {
            sleep_forever().await;
            Ok(Box::new(Cursor::new(Vec::new())))
        }
    }

    async fn sleep_forever() {
        tokio::time::sleep(Duration::from_secs(3600)).await;
    }

    struct Instant;

    #[async_trait]
    impl ContentSource for Instant {
        fn name(&self) -> &str {
            "instant"
        }

        async fn open(&self, _file_name: &str) -> Result<BoxSyncRead> {
            Ok(Box::new(Cursor::new(b"DATA".to_vec())))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out() {
        let source = TimeoutSource::new(Arc::new(Hanging), Duration::from_secs(5));
        let err = source.open("a.mp4").await.err().unwrap();
        assert!(matches!(&*err, ErrorKind::Timeout(d) if *d == Duration::from_secs(5)));
        assert!(!err.is_not_found());
    }

    #[tokio::test(start_paused = true)]
    async fn test_passes_through() {
        let source = TimeoutSource::new(Arc::new(Instant), Duration::from_secs(5));
        assert_eq!(source.name(), "instant");
        assert!(source.open("a.mp4").await.is_ok());
    }
}
