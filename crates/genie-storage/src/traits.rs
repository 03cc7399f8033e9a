//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use genie_core::AppError;
use std::sync::Arc;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UploadFailed(msg) => AppError::Storage(msg),
            StorageError::BackendError(msg) => AppError::Storage(msg),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            StorageError::IoError(err) => AppError::Storage(format!("IO error: {}", err)),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
        }
    }
}

/// Storage abstraction trait
///
/// A backend is bound to one bucket (or root directory) for its lifetime;
/// [`Storage::for_bucket`] derives a backend for another bucket.
/// Keys are produced by the `keys` module; backends only validate them.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write `data` under `storage_key`, overwriting any existing object.
    ///
    /// Returns only after the write is durable on the backend.
    async fn put(
        &self,
        storage_key: &str,
        data: Bytes,
        content_type: Option<&str>,
    ) -> StorageResult<()>;

    /// Check if an object exists
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Bucket (or logical root) this backend writes to
    fn bucket(&self) -> &str;

    /// Public URL of an object, computed from bucket and key alone
    fn object_url(&self, storage_key: &str) -> String;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;

    /// Same backend and credentials, writing to `bucket` instead.
    fn for_bucket(&self, bucket: &str) -> StorageResult<Arc<dyn Storage>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_failure_maps_to_storage_error() {
        let err: AppError = StorageError::UploadFailed("timeout".to_string()).into();
        match err {
            AppError::Storage(msg) => assert_eq!(msg, "timeout"),
            other => panic!("Expected Storage variant, got {:?}", other),
        }
    }

    #[test]
    fn invalid_key_maps_to_invalid_input() {
        let err: AppError = StorageError::InvalidKey("../etc".to_string()).into();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
