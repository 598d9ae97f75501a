use thiserror::Error;

/// Errors surfaced by the key-value and storage-registry layers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("key not found")]
    NotFound,
}
