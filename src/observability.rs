//! Metrics hooks for cache operations.
//!
//! Implement the `CacheMetrics` trait to feed cache statistics into your
//! monitoring system:
//!
//! ```ignore
//! use profile_kit::observability::CacheMetrics;
//! use std::time::Duration;
//!
//! struct PrometheusMetrics;
//!
//! impl CacheMetrics for PrometheusMetrics {
//!     fn record_hit(&self, _key: &str, _duration: Duration) {
//!         // counter!("profile_cache_hits").inc();
//!     }
//!     // ... implement other methods
//! }
//!
//! // let coordinator = ProfileCoordinator::new(backend, aggregator)
//! //     .with_metrics(Box::new(PrometheusMetrics));
//! ```
//!
//! Default behavior (if not overridden) logs via the `log` crate. The
//! injected default is `NoOpMetrics`, which records nothing.

use std::time::Duration;

/// Trait for cache metrics collection.
pub trait CacheMetrics: Send + Sync {
    /// Record a cache hit.
    fn record_hit(&self, key: &str, duration: Duration) {
        debug!("Cache HIT: {} took {:?}", key, duration);
    }

    /// Record a cache miss.
    fn record_miss(&self, key: &str, duration: Duration) {
        debug!("Cache MISS: {} took {:?}", key, duration);
    }

    /// Record a cache set operation.
    fn record_set(&self, key: &str, duration: Duration) {
        debug!("Cache SET: {} took {:?}", key, duration);
    }

    /// Record a cache delete operation.
    fn record_delete(&self, key: &str, duration: Duration) {
        debug!("Cache DELETE: {} took {:?}", key, duration);
    }

    /// Record a completed rebuild.
    fn record_rebuild(&self, succeeded: usize, failed: usize, duration: Duration) {
        info!(
            "Cache REBUILD: {} succeeded, {} failed, took {:?}",
            succeeded, failed, duration
        );
    }

    /// Record an error.
    fn record_error(&self, key: &str, error: &str) {
        warn!("Cache ERROR for {}: {}", key, error);
    }
}

/// Default metrics implementation (no-op).
#[derive(Clone, Default)]
pub struct NoOpMetrics;

impl CacheMetrics for NoOpMetrics {
    fn record_hit(&self, _key: &str, _duration: Duration) {}
    fn record_miss(&self, _key: &str, _duration: Duration) {}
    fn record_set(&self, _key: &str, _duration: Duration) {}
    fn record_delete(&self, _key: &str, _duration: Duration) {}
    fn record_rebuild(&self, _succeeded: usize, _failed: usize, _duration: Duration) {}
    fn record_error(&self, _key: &str, _error: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_metrics() {
        let metrics = NoOpMetrics;
        metrics.record_hit("customer:1", Duration::from_secs(1));
        metrics.record_miss("customer:1", Duration::from_secs(2));
        metrics.record_rebuild(10, 0, Duration::from_secs(3));
    }
}
