//! Genie Core Library
//!
//! This crate provides the configuration, error taxonomy, domain models and
//! constants shared by the storage, services and API crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{FlowSummary, FlowWorkItem, PipelineStage, StoredObjectReference, UploadedFile};
pub use storage_types::StorageBackend;
