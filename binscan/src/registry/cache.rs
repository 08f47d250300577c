//! TTL-bounded snapshot cache over a registry client.
//!
//! Replaces re-fetch-on-every-view with an explicit freshness contract:
//! [`CachedRegistry::bins`] serves the last snapshot while it is younger than
//! the TTL, [`CachedRegistry::refresh`] always fetches, and any successful
//! mutation through the cache invalidates the snapshot.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use super::error::RegistryResult;
use super::traits::{AdminCredential, BinRegistry};
use crate::bins::{Bin, BinDraft};
use crate::BoxFuture;

/// Default snapshot lifetime.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

/// Cache settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryCacheConfig {
    /// How long a fetched snapshot is served. Zero disables caching.
    pub ttl: Duration,
}

impl Default for RegistryCacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_CACHE_TTL,
        }
    }
}

impl RegistryCacheConfig {
    /// Create a config with the given TTL.
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }
}

struct Snapshot {
    bins: Arc<Vec<Bin>>,
    fetched_at: Instant,
}

/// Registry client wrapper that caches the bin set.
///
/// Snapshots are shared as `Arc<Vec<Bin>>`: a proximity query holds an
/// immutable view for its whole duration even if a refresh lands meanwhile.
pub struct CachedRegistry<R> {
    inner: R,
    config: RegistryCacheConfig,
    snapshot: Mutex<Option<Snapshot>>,
}

impl<R: BinRegistry> CachedRegistry<R> {
    /// Wrap a registry client.
    pub fn new(inner: R, config: RegistryCacheConfig) -> Self {
        Self {
            inner,
            config,
            snapshot: Mutex::new(None),
        }
    }

    /// The wrapped client.
    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Current bin set, fetching only if the snapshot is missing or stale.
    pub async fn bins(&self) -> RegistryResult<Arc<Vec<Bin>>> {
        if let Some(bins) = self.fresh_snapshot() {
            tracing::debug!(count = bins.len(), "Serving cached bin snapshot");
            return Ok(bins);
        }
        self.refresh().await
    }

    /// Fetch the bin set unconditionally and replace the snapshot.
    ///
    /// On failure the previous snapshot, if any, is kept.
    pub async fn refresh(&self) -> RegistryResult<Arc<Vec<Bin>>> {
        let bins = Arc::new(self.inner.fetch_bins().await?);
        tracing::debug!(count = bins.len(), "Refreshed bin snapshot");
        *self.snapshot.lock() = Some(Snapshot {
            bins: Arc::clone(&bins),
            fetched_at: Instant::now(),
        });
        Ok(bins)
    }

    /// Drop the snapshot so the next `bins()` call fetches.
    pub fn invalidate(&self) {
        *self.snapshot.lock() = None;
    }

    /// Age of the current snapshot, if one exists.
    pub fn snapshot_age(&self) -> Option<Duration> {
        self.snapshot.lock().as_ref().map(|s| s.fetched_at.elapsed())
    }

    fn fresh_snapshot(&self) -> Option<Arc<Vec<Bin>>> {
        if self.config.ttl.is_zero() {
            return None;
        }
        let guard = self.snapshot.lock();
        guard
            .as_ref()
            .filter(|s| s.fetched_at.elapsed() < self.config.ttl)
            .map(|s| Arc::clone(&s.bins))
    }
}

impl<R: BinRegistry> BinRegistry for CachedRegistry<R> {
    fn fetch_bins(&self) -> BoxFuture<'_, RegistryResult<Vec<Bin>>> {
        Box::pin(async move { self.bins().await.map(|bins| bins.as_ref().clone()) })
    }

    fn create_bin<'a>(
        &'a self,
        draft: &'a BinDraft,
        credential: &'a AdminCredential,
    ) -> BoxFuture<'a, RegistryResult<Bin>> {
        Box::pin(async move {
            let bin = self.inner.create_bin(draft, credential).await?;
            self.invalidate();
            Ok(bin)
        })
    }

    fn update_bin<'a>(
        &'a self,
        bin_id: &'a str,
        draft: &'a BinDraft,
        credential: &'a AdminCredential,
    ) -> BoxFuture<'a, RegistryResult<()>> {
        Box::pin(async move {
            self.inner.update_bin(bin_id, draft, credential).await?;
            self.invalidate();
            Ok(())
        })
    }

    fn delete_bin<'a>(
        &'a self,
        bin_id: &'a str,
        credential: &'a AdminCredential,
    ) -> BoxFuture<'a, RegistryResult<()>> {
        Box::pin(async move {
            self.inner.delete_bin(bin_id, credential).await?;
            self.invalidate();
            Ok(())
        })
    }
}
