//! A single in-memory key-value namespace.
//!
//! Uses a plain `RwLock<HashMap<..>>` rather than a sharded concurrent map:
//! every mutation here is a single-key read-modify-write that the registry
//! above already serializes per key through its schedule lock, so sharding
//! would add complexity with no measurable benefit at this namespace's
//! expected cardinality.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::error::StorageError;

/// Concurrent-safe map of `key -> value` for one logical namespace.
///
/// Reads may proceed concurrently; writes are exclusive. `increment`
/// zero-initializes missing keys before adding one, matching the original
/// `Increment` semantics (`server/internal/service/storage/service.go`).
#[derive(Default)]
pub struct KvNamespace {
    entries: RwLock<HashMap<String, u64>>,
}

impl KvNamespace {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set(&self, key: &str, value: u64) {
        self.entries.write().await.insert(key.to_string(), value);
    }

    pub async fn get(&self, key: &str) -> Result<u64, StorageError> {
        self.entries
            .read()
            .await
            .get(key)
            .copied()
            .ok_or(StorageError::NotFound)
    }

    pub async fn delete(&self, key: &str) {
        self.entries.write().await.remove(key);
    }

    /// Increments `key`, initializing it to 1 if absent. Returns the new value.
    pub async fn increment(&self, key: &str) -> u64 {
        let mut guard = self.entries.write().await;
        let entry = guard.entry(key.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_on_missing_key_is_not_found() {
        let ns = KvNamespace::new();
        assert!(matches!(ns.get("missing").await, Err(StorageError::NotFound)));
    }

    #[tokio::test]
    async fn increment_zero_initializes() {
        let ns = KvNamespace::new();
        assert_eq!(ns.increment("a").await, 1);
        assert_eq!(ns.increment("a").await, 2);
    }

    #[tokio::test]
    async fn get_distinguishes_zero_from_absent() {
        let ns = KvNamespace::new();
        ns.set("z", 0).await;
        assert_eq!(ns.get("z").await.unwrap(), 0);
        assert!(ns.get("y").await.is_err());
    }

    #[tokio::test]
    async fn delete_removes_key() {
        let ns = KvNamespace::new();
        ns.set("k", 5).await;
        ns.delete("k").await;
        assert!(ns.get("k").await.is_err());
    }
}
