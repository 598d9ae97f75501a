//! Per-IP requests-per-second counter.
//!
//! A thin specialization of [`wisdom_fort_core::StorageRegistry`] over one
//! TTL=1s namespace: a narrow, single-purpose service built on top of the
//! shared storage/registry abstraction.

use std::sync::Arc;

use wisdom_fort_core::{NamespaceId, StorageRegistry};

#[derive(Clone)]
pub struct RpsCounter {
    registry: Arc<StorageRegistry>,
    namespace: NamespaceId,
}

impl RpsCounter {
    pub fn new(registry: Arc<StorageRegistry>, namespace: NamespaceId) -> Self {
        Self { registry, namespace }
    }

    /// Increments `ip`'s bucket, refreshing its 1-second expiration.
    pub async fn inc(&self, ip: &str) -> u64 {
        self.registry.increment(self.namespace, ip).await
    }

    /// Current request count for `ip` over the trailing ~1-second window,
    /// or 0 if no bucket exists (never incremented, or expired).
    pub async fn get(&self, ip: &str) -> u64 {
        self.registry.get(self.namespace, ip).await.unwrap_or(0)
    }
}
