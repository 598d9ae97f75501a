//! Multi-namespace storage registry with per-namespace TTLs and a
//! background expirer.
//!
//! The expiration schedule is keyed by `(NamespaceId, key)` rather than by
//! expiration time, using a `KeyedPriorityQueue` ordered by expiry. Keying
//! by time instead lets a stale schedule entry outlive a key's later
//! write-refresh and delete a value that was never meant to expire yet;
//! keying by the thing that expires gives every key exactly one pending
//! expiration, which a `push` with the same key naturally replaces.

use std::cmp::Reverse;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use keyed_priority_queue::KeyedPriorityQueue;
use log::{debug, trace};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::StorageError;
use crate::kv::KvNamespace;

/// Dense, process-lifetime-stable id of a namespace within a
/// [`StorageRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NamespaceId(usize);

type ScheduleKey = (NamespaceId, String);

/// Owns an ordered list of namespaces and the expiration schedule for any
/// namespace created with a TTL.
///
/// Namespace creation (`create_namespace`/`create_namespace_with_ttl`) is
/// not safe to call concurrently with itself and is only ever invoked
/// during startup, before the registry is shared; every other method is
/// safe under concurrent callers.
pub struct StorageRegistry {
    namespaces: Vec<Arc<KvNamespace>>,
    ttls: Vec<Option<Duration>>,
    schedule: Mutex<KeyedPriorityQueue<ScheduleKey, Reverse<DateTime<Utc>>>>,
}

impl Default for StorageRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageRegistry {
    pub fn new() -> Self {
        Self {
            namespaces: Vec::new(),
            ttls: Vec::new(),
            schedule: Mutex::new(KeyedPriorityQueue::new()),
        }
    }

    /// Allocates a namespace with no expiration. Startup-only.
    pub fn create_namespace(&mut self) -> NamespaceId {
        let id = NamespaceId(self.namespaces.len());
        self.namespaces.push(Arc::new(KvNamespace::new()));
        self.ttls.push(None);
        id
    }

    /// Allocates a namespace whose keys expire `ttl` after their last
    /// mutating write. Startup-only.
    pub fn create_namespace_with_ttl(&mut self, ttl: StdDuration) -> NamespaceId {
        let id = self.create_namespace();
        self.ttls[id.0] = Some(Duration::from_std(ttl).expect("ttl fits in chrono::Duration"));
        id
    }

    pub async fn set(&self, ns: NamespaceId, key: &str, value: u64) {
        self.namespace(ns).set(key, value).await;
        self.schedule_expiry(ns, key).await;
    }

    /// Increments `key` in `ns`, zero-initializing it if absent, and
    /// returns the new value.
    pub async fn increment(&self, ns: NamespaceId, key: &str) -> u64 {
        let value = self.namespace(ns).increment(key).await;
        self.schedule_expiry(ns, key).await;
        value
    }

    pub async fn get(&self, ns: NamespaceId, key: &str) -> Result<u64, StorageError> {
        self.namespace(ns).get(key).await
    }

    pub async fn delete(&self, ns: NamespaceId, key: &str) {
        self.namespace(ns).delete(key).await;
    }

    fn namespace(&self, ns: NamespaceId) -> &Arc<KvNamespace> {
        &self.namespaces[ns.0]
    }

    async fn schedule_expiry(&self, ns: NamespaceId, key: &str) {
        let Some(ttl) = self.ttls[ns.0] else {
            return;
        };
        let expires_at = Utc::now() + ttl;
        let mut schedule = self.schedule.lock().await;
        schedule.push((ns, key.to_string()), Reverse(expires_at));
    }

    /// Deletes every `(namespace, key)` whose scheduled expiration has
    /// elapsed. Called once per expirer tick.
    pub async fn expire_due(&self) {
        let now = Utc::now();
        let due = {
            let mut schedule = self.schedule.lock().await;
            let mut due = Vec::new();
            while let Some((_, Reverse(expires_at))) = schedule.peek() {
                if *expires_at > now {
                    break;
                }
                // peek() confirmed an entry exists and is due; pop() cannot
                // return None here.
                let (key, _) = schedule.pop().expect("peeked entry must be poppable");
                due.push(key);
            }
            due
        };

        for (ns, key) in &due {
            self.namespace(*ns).delete(key).await;
        }
        if !due.is_empty() {
            trace!("expirer reclaimed {} entries", due.len());
        }
    }

    /// Spawns the background expirer task on a fixed tick, stopping when
    /// `cancel` is triggered.
    pub fn spawn_expirer(
        self: &Arc<Self>,
        tick: StdDuration,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        let registry = Arc::clone(self);
        tokio::spawn(async move {
            debug!("storage expirer started, tick={:?}", tick);
            let mut interval = tokio::time::interval(tick);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!("storage expirer shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        registry.expire_due().await;
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_and_get_roundtrip() {
        let mut registry = StorageRegistry::new();
        let ns = registry.create_namespace();
        registry.set(ns, "k", 42).await;
        assert_eq!(registry.get(ns, "k").await.unwrap(), 42);
    }

    #[tokio::test]
    async fn ttl_expiry_reclaims_key() {
        let mut registry = StorageRegistry::new();
        let ns = registry.create_namespace_with_ttl(StdDuration::from_millis(10));
        registry.set(ns, "k", 1).await;
        assert!(registry.get(ns, "k").await.is_ok());

        tokio::time::sleep(StdDuration::from_millis(20)).await;
        registry.expire_due().await;

        assert!(matches!(
            registry.get(ns, "k").await,
            Err(StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn rewrite_refreshes_expiration_without_premature_delete() {
        let mut registry = StorageRegistry::new();
        let ns = registry.create_namespace_with_ttl(StdDuration::from_millis(30));
        registry.set(ns, "k", 1).await;

        tokio::time::sleep(StdDuration::from_millis(20)).await;
        registry.set(ns, "k", 2).await; // refresh: new expiry ~30ms out
        registry.expire_due().await; // stale schedule entry, if any, would fire around here

        assert_eq!(registry.get(ns, "k").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn namespaces_without_ttl_never_expire() {
        let mut registry = StorageRegistry::new();
        let ns = registry.create_namespace();
        registry.set(ns, "k", 7).await;
        registry.expire_due().await;
        assert_eq!(registry.get(ns, "k").await.unwrap(), 7);
    }
}
