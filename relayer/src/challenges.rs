//! Challenge registry: assigns and validates per-token proof-of-work
//! targets whose difficulty scales with the issuer's observed RPS.
//!
//! A single-purpose, shared challenge store layered over the storage
//! registry; the expiration bookkeeping itself lives one level down in
//! `wisdom_fort_core::StorageRegistry` rather than in a dedicated priority
//! queue here.

use std::sync::Arc;

use wisdom_fort_core::{NamespaceId, StorageError, StorageRegistry};
use wisdom_fort_wire::{pow, Token};

use crate::rps::RpsCounter;

#[derive(Clone)]
pub struct ChallengeRegistry {
    registry: Arc<StorageRegistry>,
    namespace: NamespaceId,
    rps: RpsCounter,
    diff_mult: u8,
}

impl ChallengeRegistry {
    pub fn new(
        registry: Arc<StorageRegistry>,
        namespace: NamespaceId,
        rps: RpsCounter,
        diff_mult: u8,
    ) -> Self {
        Self {
            registry,
            namespace,
            rps,
            diff_mult,
        }
    }

    /// Computes and stores a fresh difficulty for `token`, derived from
    /// the issuer's current RPS: `uint8(rps) * diff_mult`, wrapping in
    /// 8 bits. `diff_mult = 0` yields trivial challenges; `= 1` matches
    /// difficulty to the client's current RPS.
    pub async fn compute(&self, token: &Token) -> u8 {
        let rps = self.rps.get(token.ip()).await;
        let difficulty = (rps as u8).wrapping_mul(self.diff_mult);
        self.registry
            .set(self.namespace, token.as_str(), difficulty as u64)
            .await;
        difficulty
    }

    /// The difficulty currently recorded for `token`, if any unexpired
    /// challenge exists.
    pub async fn current(&self, token: &Token) -> Result<u8, StorageError> {
        self.registry
            .get(self.namespace, token.as_str())
            .await
            .map(|v| v as u8)
    }

    /// Verifies `nonce` against `token`'s recorded difficulty — *not* a
    /// freshly recomputed one. On success the challenge is deleted
    /// (single-use); on failure it remains, retryable until TTL.
    pub async fn verify(&self, token: &Token, nonce: u64) -> Result<bool, StorageError> {
        let difficulty = self.current(token).await?;
        let ok = pow::meets_difficulty(token.as_str(), nonce, difficulty);
        if ok {
            self.registry.delete(self.namespace, token.as_str()).await;
        }
        Ok(ok)
    }
}
