//! Genie Services Library
//!
//! Clients for the remote collaborators of the upload pipeline: the text
//! extraction function, the managed generative flow and the flow catalog,
//! plus the parser for extraction results.
//!
//! Every remote service sits behind a trait (`FunctionInvoker`, `FlowRuntime`,
//! `FlowCatalog`) so the pipeline can run against test doubles. The AWS
//! implementations are behind the `aws` feature.

#[cfg(feature = "aws")]
pub mod aws;
pub mod catalog;
pub mod extraction;
pub mod flow;
pub mod parser;

// Re-export commonly used types
#[cfg(feature = "aws")]
pub use aws::load_sdk_config;
#[cfg(feature = "aws")]
pub use catalog::BedrockFlowCatalog;
pub use catalog::FlowCatalog;
#[cfg(feature = "aws")]
pub use extraction::LambdaInvoker;
pub use extraction::{ExtractionError, ExtractionInvoker, ExtractionResponse, FunctionInvoker};
#[cfg(feature = "aws")]
pub use flow::BedrockFlowRuntime;
pub use flow::{
    collect_work_items, ChunkError, FlowError, FlowEvent, FlowEventStream, FlowInvoker,
    FlowRequest, FlowRun, FlowRuntime,
};
pub use parser::parse_extracted_texts;
