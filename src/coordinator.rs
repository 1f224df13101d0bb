//! Cache coordinator - read-through and bulk rebuild over the profile cache.

use crate::aggregator::Aggregator;
use crate::backend::CacheBackend;
use crate::error::{Error, Result};
use crate::key::{parse_profile_key, profile_key, profile_prefix};
use crate::observability::{CacheMetrics, NoOpMetrics};
use crate::profile::{ConsolidatedProfile, CustomerId, Origin};
use crate::serialization::{decode_from_cache, encode_for_cache};
use crate::sources::{DocumentSource, GraphSource, RelationalSource};
use crate::views::{self, ProjectedProfile, ViewKind};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::time::Instant;

/// Default cap on concurrent per-customer aggregations during a rebuild.
///
/// A full rebuild fans out to all three source stores for every customer;
/// the cap is backpressure so the rebuild cannot overwhelm them.
const DEFAULT_REBUILD_CONCURRENCY: usize = 8;

/// Outcome of a bulk rebuild.
///
/// Per-customer aggregation failures are recorded, never silently dropped:
/// `succeeded + failed.len()` equals the number of customers enumerated
/// from the relational store.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct RebuildReport {
    /// Customers whose profile was aggregated and cached.
    pub succeeded: usize,
    /// Customers skipped because their aggregation failed, sorted by id.
    pub failed: Vec<CustomerId>,
}

impl RebuildReport {
    /// True when every enumerated customer was cached.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Coordinates the profile cache and the aggregator.
///
/// Implements the two policies of the subsystem:
///
/// - **Read-through** ([`ProfileCoordinator::get_profile`]): serve from
///   cache, else aggregate-and-populate. The cache is never proactively
///   invalidated by source writes; once populated, an entry is
///   authoritative until the next rebuild or explicit deletion. That is a
///   deliberate simplicity/consistency trade-off, not an oversight.
/// - **Bulk rebuild** ([`ProfileCoordinator::rebuild_all`]): flush the
///   namespace, then re-aggregate every customer the relational store
///   knows about.
///
/// Backend and sources are injected at construction; the hosting service
/// owns the underlying connections. All cache writes are whole-value
/// replacements of freshly aggregated snapshots, so last-writer-wins
/// between concurrent requests is acceptable and no locking is needed.
///
/// # Example
///
/// ```ignore
/// use profile_kit::{Aggregator, ProfileCoordinator, backend::InMemoryBackend};
///
/// let aggregator = Aggregator::new(relational, documents, graph);
/// let coordinator = ProfileCoordinator::new(InMemoryBackend::new(), aggregator);
///
/// let profile = coordinator.get_profile(42).await?;
/// ```
pub struct ProfileCoordinator<B, R, D, G> {
    backend: B,
    aggregator: Aggregator<R, D, G>,
    metrics: Box<dyn CacheMetrics>,
    rebuild_concurrency: usize,
}

impl<B, R, D, G> ProfileCoordinator<B, R, D, G>
where
    B: CacheBackend,
    R: RelationalSource,
    D: DocumentSource,
    G: GraphSource,
{
    /// Create a coordinator over the given backend and aggregator.
    pub fn new(backend: B, aggregator: Aggregator<R, D, G>) -> Self {
        ProfileCoordinator {
            backend,
            aggregator,
            metrics: Box::new(NoOpMetrics),
            rebuild_concurrency: DEFAULT_REBUILD_CONCURRENCY,
        }
    }

    /// Set custom metrics handler.
    pub fn with_metrics(mut self, metrics: Box<dyn CacheMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Cap concurrent per-customer aggregations during rebuild (min 1).
    pub fn with_rebuild_concurrency(mut self, concurrency: usize) -> Self {
        self.rebuild_concurrency = concurrency.max(1);
        self
    }

    /// Read-through profile lookup.
    ///
    /// 1. Cache hit: decode, tag `origin = Cache`, return.
    /// 2. Undecodable entry: evict it and fall through to a miss.
    /// 3. Cache unreachable: aggregate directly and return uncached - the
    ///    cache is an optimization, not a correctness dependency.
    /// 4. Miss: aggregate, cache the encoded snapshot, return with
    ///    `origin = Sources`.
    ///
    /// # Errors
    ///
    /// - `Error::NotFound` if the customer has no relational row. Nothing
    ///   is cached in that case.
    /// - `Error::SourceUnavailable` if a mandatory relational query fails.
    pub async fn get_profile(&self, id: CustomerId) -> Result<ConsolidatedProfile> {
        let key = profile_key(id);
        let timer = Instant::now();

        match self.backend.get(&key).await {
            Ok(Some(bytes)) => match decode_from_cache::<ConsolidatedProfile>(&bytes) {
                Ok(mut profile) => {
                    profile.origin = Origin::Cache;
                    self.metrics.record_hit(&key, timer.elapsed());
                    return Ok(profile);
                }
                Err(e) if e.is_miss_equivalent() => {
                    warn!("Evicting undecodable cache entry {}: {}", key, e);
                    if let Err(del_err) = self.backend.delete(&key).await {
                        warn!("Failed to evict {}: {}", key, del_err);
                    }
                }
                Err(e) => return Err(e),
            },
            Ok(None) => {}
            Err(e) => {
                // Degraded mode: serve straight from the sources, uncached.
                warn!("Cache read for {} failed, serving from sources: {}", key, e);
                self.metrics.record_error(&key, &e.to_string());
                return self.aggregator.aggregate(id).await;
            }
        }

        self.metrics.record_miss(&key, timer.elapsed());

        let profile = self.aggregator.aggregate(id).await?;
        let bytes = encode_for_cache(&profile)?;
        match self.backend.set(&key, bytes).await {
            Ok(()) => self.metrics.record_set(&key, timer.elapsed()),
            Err(e) => {
                // Still a successful read; the next request re-aggregates.
                warn!("Failed to cache profile {}: {}", key, e);
                self.metrics.record_error(&key, &e.to_string());
            }
        }

        Ok(profile)
    }

    /// Flush the profile namespace and re-derive the entire cache from the
    /// sources.
    ///
    /// Customers are processed through a bounded worker pool
    /// ([`ProfileCoordinator::with_rebuild_concurrency`]). A per-customer
    /// aggregation failure is recorded in the report and skipped; a cache
    /// backend failure aborts the rebuild, since populating the cache is
    /// the whole point.
    ///
    /// Not transactional across customers: an aborted rebuild leaves the
    /// profiles written so far. Rerunning flushes and starts clean, so the
    /// operation is idempotent by rerun.
    ///
    /// # Errors
    ///
    /// - `Error::CacheUnavailable` if the backend cannot be reached.
    /// - `Error::SourceUnavailable` if the customer id enumeration fails.
    pub async fn rebuild_all(&self) -> Result<RebuildReport> {
        let timer = Instant::now();

        let flushed = self.backend.flush_prefix(&profile_prefix()).await?;
        info!("» Rebuild started: flushed {} cached profiles", flushed);

        let ids = self.aggregator.customer_ids().await?;
        let total = ids.len();

        let results: Vec<(CustomerId, Result<()>)> = stream::iter(ids)
            .map(|id| async move { (id, self.rebuild_one(id).await) })
            .buffer_unordered(self.rebuild_concurrency)
            .collect()
            .await;

        let mut succeeded = 0usize;
        let mut failed = Vec::new();
        for (id, result) in results {
            match result {
                Ok(()) => succeeded += 1,
                // Backend or encoding trouble kills the rebuild outright.
                Err(e) if matches!(
                    e,
                    Error::CacheUnavailable(_) | Error::SerializationError(_)
                ) =>
                {
                    return Err(e);
                }
                Err(e) => {
                    warn!("Rebuild skipped customer {}: {}", id, e);
                    failed.push(id);
                }
            }
        }
        failed.sort_unstable();

        self.metrics
            .record_rebuild(succeeded, failed.len(), timer.elapsed());
        info!(
            "✓ Rebuild complete: {}/{} profiles cached in {:?}",
            succeeded,
            total,
            timer.elapsed()
        );

        Ok(RebuildReport { succeeded, failed })
    }

    /// Aggregate one customer and cache the encoded snapshot.
    async fn rebuild_one(&self, id: CustomerId) -> Result<()> {
        let profile = self.aggregator.aggregate(id).await?;
        let bytes = encode_for_cache(&profile)?;
        self.backend.set(&profile_key(id), bytes).await
    }

    /// Materialize every cached profile, ordered by customer id.
    ///
    /// Undecodable entries are skipped with a warning; they will be
    /// replaced on their next read-through or rebuild.
    ///
    /// # Errors
    /// Returns `Error::CacheUnavailable` if the backend cannot be reached.
    pub async fn cached_profiles(&self) -> Result<Vec<ConsolidatedProfile>> {
        let mut keys = self.backend.scan_prefix(&profile_prefix()).await?;
        keys.sort_by_key(|k| parse_profile_key(k));

        let refs: Vec<&str> = keys.iter().map(String::as_str).collect();
        let values = self.backend.mget(&refs).await?;

        let mut profiles = Vec::with_capacity(values.len());
        for (key, value) in keys.iter().zip(values) {
            // A key can disappear between scan and mget; that's fine.
            let Some(bytes) = value else { continue };
            match decode_from_cache::<ConsolidatedProfile>(&bytes) {
                Ok(mut profile) => {
                    profile.origin = Origin::Cache;
                    profiles.push(profile);
                }
                Err(e) => warn!("Skipping undecodable cache entry {}: {}", key, e),
            }
        }
        Ok(profiles)
    }

    /// Apply one read view over all cached profiles.
    ///
    /// The projection itself is pure; the only I/O is the cache
    /// enumeration feeding it.
    ///
    /// # Errors
    /// Returns `Error::CacheUnavailable` if the backend cannot be reached.
    pub async fn list_view(&self, kind: ViewKind) -> Result<Vec<ProjectedProfile>> {
        let profiles = self.cached_profiles().await?;
        debug!("View {} over {} cached profiles", kind, profiles.len());
        Ok(views::project(kind, &profiles))
    }

    /// Explicitly evict one customer's cached profile.
    ///
    /// # Errors
    /// Returns `Error::CacheUnavailable` if the backend cannot be reached.
    pub async fn delete_profile(&self, id: CustomerId) -> Result<()> {
        let key = profile_key(id);
        let timer = Instant::now();
        self.backend.delete(&key).await?;
        self.metrics.record_delete(&key, timer.elapsed());
        Ok(())
    }

    /// Enumerate every known customer identifier from the relational store.
    pub async fn customer_ids(&self) -> Result<Vec<CustomerId>> {
        self.aggregator.customer_ids().await
    }

    /// Get backend reference (for advanced use).
    pub fn backend(&self) -> &B {
        &self.backend
    }
}
