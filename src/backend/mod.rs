//! Cache backend implementations.

use crate::error::Result;

pub mod inmemory;
#[cfg(feature = "redis")]
pub mod redis;

pub use inmemory::InMemoryBackend;
#[cfg(feature = "redis")]
pub use redis::{PoolStats, RedisBackend, RedisConfig};

/// Trait for profile cache backend implementations.
///
/// Abstracts the key-value store holding serialized profiles, allowing
/// swappable backends: InMemory (default, deterministic test double), Redis,
/// or anything else that can store bytes under string keys.
///
/// Entries have no TTL. Staleness is bounded by explicit rebuilds and
/// deletions only, so a populated entry stays authoritative until one of
/// those happens.
///
/// **IMPORTANT:** All methods use `&self` instead of `&mut self` to allow
/// concurrent access. Backend implementations should use interior mutability
/// (DashMap, connection pool, or external storage).
///
/// **ASYNC:** All methods are async and must be awaited.
#[allow(async_fn_in_trait)]
pub trait CacheBackend: Send + Sync + Clone {
    /// Retrieve value from cache by key.
    ///
    /// # Returns
    /// - `Ok(Some(bytes))` - Value found in cache
    /// - `Ok(None)` - Cache miss (key not found)
    ///
    /// # Errors
    /// Returns `Error::CacheUnavailable` if the backend cannot be reached.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store value in cache. Whole-value replacement, last writer wins.
    ///
    /// # Errors
    /// Returns `Error::CacheUnavailable` if the backend cannot be reached.
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Remove value from cache.
    ///
    /// # Errors
    /// Returns `Error::CacheUnavailable` if the backend cannot be reached.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Check if key exists in cache (optional optimization).
    ///
    /// # Errors
    /// Returns `Error::CacheUnavailable` if the backend cannot be reached.
    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// List every key starting with `prefix`.
    ///
    /// Used by the read views (enumerate all cached profiles) and by
    /// [`CacheBackend::flush_prefix`]. Ordering is backend-defined.
    ///
    /// # Errors
    /// Returns `Error::CacheUnavailable` if the backend cannot be reached.
    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<String>>;

    /// Bulk get operation (optional optimization).
    ///
    /// Default implementation calls `get()` for each key.
    /// Override for batch efficiency (e.g., Redis MGET).
    ///
    /// # Errors
    /// Returns `Error::CacheUnavailable` if the backend cannot be reached.
    async fn mget(&self, keys: &[&str]) -> Result<Vec<Option<Vec<u8>>>> {
        let mut results = Vec::with_capacity(keys.len());
        for key in keys {
            results.push(self.get(key).await?);
        }
        Ok(results)
    }

    /// Bulk delete operation (optional optimization).
    ///
    /// # Errors
    /// Returns `Error::CacheUnavailable` if the backend cannot be reached.
    async fn mdelete(&self, keys: &[&str]) -> Result<()> {
        for key in keys {
            self.delete(key).await?;
        }
        Ok(())
    }

    /// Remove every key starting with `prefix`, returning the count removed.
    ///
    /// Only the subsystem's own namespace is flushed, never the whole cache
    /// database; unrelated cache users sharing the store are untouched.
    ///
    /// Default implementation scans then bulk-deletes. Override if the
    /// backend can do better.
    ///
    /// # Errors
    /// Returns `Error::CacheUnavailable` if the backend cannot be reached.
    async fn flush_prefix(&self, prefix: &str) -> Result<usize> {
        let keys = self.scan_prefix(prefix).await?;
        let refs: Vec<&str> = keys.iter().map(String::as_str).collect();
        self.mdelete(&refs).await?;
        Ok(keys.len())
    }

    /// Health check - verify backend is accessible.
    ///
    /// Used for readiness probes.
    ///
    /// # Errors
    /// Returns `Error::CacheUnavailable` if the backend is not accessible.
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}
