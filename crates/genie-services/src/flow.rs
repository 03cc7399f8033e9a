//! Managed flow invocation and stream accumulation.
//!
//! A flow run is a stream of events. Output events carry a `document` holding
//! JSON (usually as text); arrays contribute every element to the run, objects
//! contribute themselves. A chunk that cannot be used is recorded in
//! [`FlowRun::chunk_errors`] and the stream keeps being consumed.

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use genie_core::{AppError, FlowWorkItem};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
    /// Bad identifiers, auth failure, or a broken event stream
    #[error("Flow invocation failed: {0}")]
    Invocation(String),

    #[error("{0}")]
    Catalog(String),
}

impl From<FlowError> for AppError {
    fn from(err: FlowError) -> Self {
        match err {
            FlowError::Invocation(msg) => AppError::FlowInvocation(msg),
            FlowError::Catalog(msg) => AppError::FlowCatalog(msg),
        }
    }
}

/// One invocation of a flow version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowRequest {
    pub flow_identifier: String,
    pub flow_alias_identifier: String,
    /// Object-store key of the extracted text, bound to the flow input node
    pub input_ref: String,
}

/// Event received from a running flow.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowEvent {
    Output { document: Option<Value> },
    Completion { reason: String },
    Other,
}

pub type FlowEventStream = BoxStream<'static, Result<FlowEvent, FlowError>>;

/// Starts flow runs.
#[async_trait]
pub trait FlowRuntime: Send + Sync {
    /// Start the flow and return its event stream. Fails before any event is
    /// produced when the invocation itself is rejected.
    async fn invoke(&self, request: &FlowRequest) -> Result<FlowEventStream, FlowError>;
}

/// A chunk that was dropped during accumulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkError {
    /// Position of the output event in the stream, counting output events only
    pub index: usize,
    pub message: String,
}

/// Everything collected from one flow run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowRun {
    pub items: Vec<FlowWorkItem>,
    pub chunk_errors: Vec<ChunkError>,
}

impl FlowRun {
    /// True when output arrived but none of it could be used.
    pub fn is_total_failure(&self) -> bool {
        self.items.is_empty() && !self.chunk_errors.is_empty()
    }
}

/// Turn one output document into work items.
fn chunk_items(document: Value) -> Result<Vec<FlowWorkItem>, String> {
    let parsed = match document {
        Value::String(raw) => serde_json::from_str::<Value>(&raw)
            .map_err(|e| format!("document is not valid JSON: {}", e))?,
        other => other,
    };

    match parsed {
        Value::Array(items) => Ok(items),
        Value::Object(_) => Ok(vec![parsed]),
        other => Err(format!("unexpected document shape: {}", shape_name(&other))),
    }
}

fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Consume `stream` to the end, accumulating work items in arrival order.
///
/// Unusable chunks are logged and recorded; a stream error aborts the run.
pub async fn collect_work_items(mut stream: FlowEventStream) -> Result<FlowRun, FlowError> {
    let mut run = FlowRun::default();
    let mut output_index = 0usize;

    while let Some(event) = stream.next().await {
        match event? {
            FlowEvent::Output { document } => {
                let index = output_index;
                output_index += 1;

                let Some(document) = document else {
                    continue;
                };

                match chunk_items(document) {
                    Ok(items) => run.items.extend(items),
                    Err(message) => {
                        tracing::warn!(
                            stage = "INVOKE_FLOW",
                            chunk = index,
                            error = %message,
                            "Failed to parse flow output chunk"
                        );
                        run.chunk_errors.push(ChunkError { index, message });
                    }
                }
            }
            FlowEvent::Completion { reason } => {
                tracing::debug!(stage = "INVOKE_FLOW", reason = %reason, "Flow completed");
            }
            FlowEvent::Other => {}
        }
    }

    Ok(run)
}

/// Runs the configured flow against an extracted text key.
#[derive(Clone)]
pub struct FlowInvoker {
    runtime: Arc<dyn FlowRuntime>,
    flow_identifier: Option<String>,
    flow_alias_identifier: Option<String>,
}

impl FlowInvoker {
    pub fn new(
        runtime: Arc<dyn FlowRuntime>,
        flow_identifier: Option<String>,
        flow_alias_identifier: Option<String>,
    ) -> Self {
        Self {
            runtime,
            flow_identifier,
            flow_alias_identifier,
        }
    }

    /// Run the flow named by configuration.
    pub async fn invoke_configured(&self, input_ref: &str) -> Result<FlowRun, FlowError> {
        let (Some(flow_identifier), Some(flow_alias_identifier)) =
            (&self.flow_identifier, &self.flow_alias_identifier)
        else {
            return Err(FlowError::Invocation(
                "FLOW_IDENTIFIER and FLOW_ALIAS_IDENTIFIER must be configured".to_string(),
            ));
        };

        self.invoke(flow_identifier, flow_alias_identifier, input_ref)
            .await
    }

    /// Run a specific flow version and collect its output.
    pub async fn invoke(
        &self,
        flow_identifier: &str,
        flow_alias_identifier: &str,
        input_ref: &str,
    ) -> Result<FlowRun, FlowError> {
        let request = FlowRequest {
            flow_identifier: flow_identifier.to_string(),
            flow_alias_identifier: flow_alias_identifier.to_string(),
            input_ref: input_ref.to_string(),
        };

        tracing::info!(
            stage = "INVOKE_FLOW",
            flow_identifier = %request.flow_identifier,
            flow_alias_identifier = %request.flow_alias_identifier,
            input_ref = %request.input_ref,
            "Invoking flow"
        );

        let stream = self.runtime.invoke(&request).await.inspect_err(|e| {
            tracing::error!(stage = "INVOKE_FLOW", error = %e, "Error invoking flow");
        })?;

        let run = collect_work_items(stream).await.inspect_err(|e| {
            tracing::error!(stage = "INVOKE_FLOW", error = %e, "Flow stream failed");
        })?;

        tracing::info!(
            stage = "INVOKE_FLOW",
            items = run.items.len(),
            chunk_errors = run.chunk_errors.len(),
            "Flow output collected"
        );

        Ok(run)
    }
}

#[cfg(feature = "aws")]
pub use bedrock::BedrockFlowRuntime;

#[cfg(feature = "aws")]
mod bedrock {
    use super::{FlowError, FlowEvent, FlowEventStream, FlowRequest, FlowRuntime};
    use async_trait::async_trait;
    use aws_sdk_bedrockagentruntime::error::DisplayErrorContext;
    use aws_sdk_bedrockagentruntime::types::{
        FlowInput, FlowInputContent, FlowOutputContent, FlowResponseStream,
    };
    use aws_sdk_bedrockagentruntime::Client as AgentRuntimeClient;
    use aws_smithy_types::{Document, Number};
    use futures::StreamExt;
    use genie_core::constants::{FLOW_INPUT_NODE, FLOW_INPUT_OUTPUT_NAME};
    use serde_json::Value;

    /// [`FlowRuntime`] backed by Bedrock Agents `InvokeFlow`.
    #[derive(Clone, Debug)]
    pub struct BedrockFlowRuntime {
        client: AgentRuntimeClient,
    }

    impl BedrockFlowRuntime {
        pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
            Self {
                client: AgentRuntimeClient::new(sdk_config),
            }
        }
    }

    fn document_to_json(document: &Document) -> Value {
        match document {
            Document::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), document_to_json(v)))
                    .collect(),
            ),
            Document::Array(items) => Value::Array(items.iter().map(document_to_json).collect()),
            Document::Number(Number::PosInt(n)) => Value::from(*n),
            Document::Number(Number::NegInt(n)) => Value::from(*n),
            Document::Number(Number::Float(f)) => Value::from(*f),
            Document::String(s) => Value::String(s.clone()),
            Document::Bool(b) => Value::Bool(*b),
            Document::Null => Value::Null,
        }
    }

    fn convert_event(event: FlowResponseStream) -> FlowEvent {
        match event {
            FlowResponseStream::FlowOutputEvent(output) => {
                let document = match output.content() {
                    Some(FlowOutputContent::Document(document)) => Some(document_to_json(document)),
                    _ => None,
                };
                FlowEvent::Output { document }
            }
            FlowResponseStream::FlowCompletionEvent(completion) => FlowEvent::Completion {
                reason: completion.completion_reason().as_str().to_string(),
            },
            _ => FlowEvent::Other,
        }
    }

    #[async_trait]
    impl FlowRuntime for BedrockFlowRuntime {
        async fn invoke(&self, request: &FlowRequest) -> Result<FlowEventStream, FlowError> {
            let input = FlowInput::builder()
                .node_name(FLOW_INPUT_NODE)
                .node_output_name(FLOW_INPUT_OUTPUT_NAME)
                .content(FlowInputContent::Document(Document::String(
                    request.input_ref.clone(),
                )))
                .build()
                .map_err(|e| FlowError::Invocation(e.to_string()))?;

            let output = self
                .client
                .invoke_flow()
                .flow_identifier(&request.flow_identifier)
                .flow_alias_identifier(&request.flow_alias_identifier)
                .inputs(input)
                .send()
                .await
                .map_err(|e| FlowError::Invocation(DisplayErrorContext(&e).to_string()))?;

            let stream = futures::stream::unfold(
                Some(output.response_stream),
                |receiver| async move {
                    let mut receiver = receiver?;
                    match receiver.recv().await {
                        Ok(Some(event)) => Some((Ok(convert_event(event)), Some(receiver))),
                        Ok(None) => None,
                        // Yield the error once, then end the stream.
                        Err(e) => Some((
                            Err(FlowError::Invocation(DisplayErrorContext(&e).to_string())),
                            None,
                        )),
                    }
                },
            );

            Ok(stream.boxed())
        }
    }

}
