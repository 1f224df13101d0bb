//! In-memory cache backend (default, thread-safe, async).
//!
//! Uses DashMap for lock-free concurrent access with per-key sharding.
//! Doubles as the deterministic test backend: same narrow interface as the
//! networked backends, no external process required.

use super::CacheBackend;
use crate::error::Result;
use dashmap::DashMap;
use std::sync::Arc;

/// Thread-safe async in-memory cache backend.
///
/// Uses DashMap for lock-free concurrent access with fine-grained per-key
/// sharding. No async locks required - operations are non-blocking.
///
/// # Example
///
/// ```no_run
/// use profile_kit::backend::{CacheBackend, InMemoryBackend};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let backend = InMemoryBackend::new();
///
///     backend.set("customer:1", b"value".to_vec()).await?;
///     let value = backend.get("customer:1").await?;
///     assert!(value.is_some());
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct InMemoryBackend {
    store: Arc<DashMap<String, Vec<u8>>>,
}

impl InMemoryBackend {
    /// Create a new in-memory cache backend.
    pub fn new() -> Self {
        InMemoryBackend {
            store: Arc::new(DashMap::new()),
        }
    }

    /// Get the current number of entries in cache.
    pub async fn len(&self) -> usize {
        self.store.len()
    }

    /// Check if cache is empty.
    pub async fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Get memory statistics.
    pub async fn stats(&self) -> CacheStats {
        let total_bytes: usize = self.store.iter().map(|entry| entry.value().len()).sum();

        CacheStats {
            total_entries: self.store.len(),
            total_bytes,
        }
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheBackend for InMemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        if let Some(entry) = self.store.get(key) {
            debug!("✓ InMemory GET {} -> HIT", key);
            return Ok(Some(entry.value().clone()));
        }

        debug!("✓ InMemory GET {} -> MISS", key);
        Ok(None)
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.store.insert(key.to_string(), value);
        debug!("✓ InMemory SET {}", key);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.store.remove(key);
        debug!("✓ InMemory DELETE {}", key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.store.contains_key(key))
    }

    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        let keys: Vec<String> = self
            .store
            .iter()
            .map(|entry| entry.key().clone())
            .filter(|k| k.starts_with(prefix))
            .collect();

        debug!("✓ InMemory SCAN {}* -> {} keys", prefix, keys.len());
        Ok(keys)
    }

    async fn mget(&self, keys: &[&str]) -> Result<Vec<Option<Vec<u8>>>> {
        let results: Vec<Option<Vec<u8>>> = keys
            .iter()
            .map(|k| self.store.get(*k).map(|entry| entry.value().clone()))
            .collect();

        debug!("✓ InMemory MGET {} keys", keys.len());
        Ok(results)
    }

    async fn mdelete(&self, keys: &[&str]) -> Result<()> {
        for key in keys {
            self.store.remove(*key);
        }

        debug!("✓ InMemory MDELETE {} keys", keys.len());
        Ok(())
    }

    async fn health_check(&self) -> Result<bool> {
        // In-memory backend is always healthy
        Ok(true)
    }
}

/// Cache statistics.
#[derive(Clone, Debug)]
pub struct CacheStats {
    pub total_entries: usize,
    pub total_bytes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_inmemory_backend_set_get() {
        let backend = InMemoryBackend::new();

        backend
            .set("customer:1", b"value1".to_vec())
            .await
            .expect("Failed to set");

        let result = backend.get("customer:1").await.expect("Failed to get");
        assert_eq!(result, Some(b"value1".to_vec()));
    }

    #[tokio::test]
    async fn test_inmemory_backend_miss() {
        let backend = InMemoryBackend::new();

        let result = backend.get("nonexistent").await.expect("Failed to get");
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_inmemory_backend_delete() {
        let backend = InMemoryBackend::new();

        backend
            .set("customer:1", b"value1".to_vec())
            .await
            .expect("Failed to set");
        assert!(backend
            .exists("customer:1")
            .await
            .expect("Failed to check exists"));

        backend.delete("customer:1").await.expect("Failed to delete");
        assert!(!backend
            .exists("customer:1")
            .await
            .expect("Failed to check exists"));
    }

    #[tokio::test]
    async fn test_inmemory_backend_set_replaces_whole_value() {
        let backend = InMemoryBackend::new();

        backend
            .set("customer:1", b"old".to_vec())
            .await
            .expect("Failed to set");
        backend
            .set("customer:1", b"new".to_vec())
            .await
            .expect("Failed to set");

        let result = backend.get("customer:1").await.expect("Failed to get");
        assert_eq!(result, Some(b"new".to_vec()));
        assert_eq!(backend.len().await, 1);
    }

    #[tokio::test]
    async fn test_inmemory_backend_scan_prefix() {
        let backend = InMemoryBackend::new();

        backend
            .set("customer:1", b"a".to_vec())
            .await
            .expect("Failed to set");
        backend
            .set("customer:10", b"b".to_vec())
            .await
            .expect("Failed to set");
        backend
            .set("session:1", b"c".to_vec())
            .await
            .expect("Failed to set");

        let mut keys = backend
            .scan_prefix("customer:")
            .await
            .expect("Failed to scan");
        keys.sort();

        assert_eq!(keys, vec!["customer:1", "customer:10"]);
    }

    #[tokio::test]
    async fn test_inmemory_backend_mget() {
        let backend = InMemoryBackend::new();

        backend
            .set("customer:1", b"value1".to_vec())
            .await
            .expect("Failed to set");
        backend
            .set("customer:2", b"value2".to_vec())
            .await
            .expect("Failed to set");

        let results = backend
            .mget(&["customer:1", "customer:2", "customer:3"])
            .await
            .expect("Failed to mget");

        assert_eq!(results.len(), 3);
        assert_eq!(results[0], Some(b"value1".to_vec()));
        assert_eq!(results[1], Some(b"value2".to_vec()));
        assert_eq!(results[2], None);
    }

    #[tokio::test]
    async fn test_inmemory_backend_mdelete() {
        let backend = InMemoryBackend::new();

        backend
            .set("customer:1", b"a".to_vec())
            .await
            .expect("Failed to set");
        backend
            .set("customer:2", b"b".to_vec())
            .await
            .expect("Failed to set");
        backend
            .set("customer:3", b"c".to_vec())
            .await
            .expect("Failed to set");

        assert_eq!(backend.len().await, 3);

        backend
            .mdelete(&["customer:1", "customer:2"])
            .await
            .expect("Failed to mdelete");

        assert_eq!(backend.len().await, 1);
        assert!(backend
            .get("customer:3")
            .await
            .expect("Failed to get")
            .is_some());
    }

    #[tokio::test]
    async fn test_inmemory_backend_stats() {
        let backend = InMemoryBackend::new();

        backend
            .set("customer:1", b"value_with_data".to_vec())
            .await
            .expect("Failed to set");
        backend
            .set("customer:2", b"data".to_vec())
            .await
            .expect("Failed to set");

        let stats = backend.stats().await;
        assert_eq!(stats.total_entries, 2);
        assert!(stats.total_bytes > 0);
    }

    #[tokio::test]
    async fn test_inmemory_backend_clone_shares_store() {
        let backend1 = InMemoryBackend::new();
        backend1
            .set("customer:1", b"value".to_vec())
            .await
            .expect("Failed to set");

        let backend2 = backend1.clone();

        let value = backend2
            .get("customer:1")
            .await
            .expect("Failed to get");
        assert_eq!(value, Some(b"value".to_vec()));
    }

    #[tokio::test]
    async fn test_inmemory_backend_thread_safe() {
        let backend = InMemoryBackend::new();
        let mut handles = vec![];

        for i in 0..10 {
            let b = backend.clone();
            let handle = tokio::spawn(async move {
                let key = format!("customer:{}", i);
                b.set(&key, format!("value_{}", i).into_bytes())
                    .await
                    .expect("Failed to set");
            });
            handles.push(handle);
        }

        for handle in handles {
            handle.await.expect("Task failed");
        }

        assert_eq!(backend.len().await, 10);
    }
}
