//! Storage primitives shared by every other crate in this workspace: a
//! concurrent key-value namespace and a multi-namespace registry that
//! layers per-namespace TTLs and a background expirer on top of it.
//!
//! Domain-agnostic infrastructure: higher-level crates (here,
//! `wisdom-fort-relayer`) specialize it into RPS counting and challenge
//! tracking.

pub mod error;
pub mod kv;
pub mod registry;

pub use error::StorageError;
pub use kv::KvNamespace;
pub use registry::{NamespaceId, StorageRegistry};
