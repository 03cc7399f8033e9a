//! Genie API Library
//!
//! HTTP handlers, the upload pipeline orchestrator and application setup.

mod handlers;
mod services;
mod telemetry;
mod utils;

pub mod error;
pub mod setup;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use services::pipeline::{PipelineOutcome, UploadPipeline};
