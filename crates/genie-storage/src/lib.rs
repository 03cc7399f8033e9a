//! Genie Storage Library
//!
//! Object store gateway for the upload pipeline: the [`Storage`] trait with S3
//! and local filesystem backends, the key conventions shared with the
//! extraction function and the flow, and [`ObjectStoreGateway`] which turns
//! uploaded files and extracted text into [`StoredObjectReference`]s.
//!
//! # Storage key format
//!
//! - **Uploaded file**: `uploads/{epochMillis}-{originalName}`
//! - **Extracted text**: `input/{originalName}-extracted.txt`
//!
//! Key generation is centralized in the `keys` module so all backends stay
//! consistent.
//!
//! [`StoredObjectReference`]: genie_core::StoredObjectReference

pub mod factory;
pub mod gateway;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use gateway::ObjectStoreGateway;
pub use genie_core::StorageBackend;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
