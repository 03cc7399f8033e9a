//! Remote text extraction.
//!
//! The extraction function receives `{"fileUrls": [...]}` and answers with an
//! envelope `{"statusCode": 200, "body": ...}`. Only the envelope is checked
//! here; the body is handed to [`crate::parser`] unchanged.

use async_trait::async_trait;
use genie_core::AppError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Transport failure, function crash, or an unreadable envelope
    #[error("Extraction invocation failed: {0}")]
    Invocation(String),

    /// The function answered with a non-200 status; carries its message verbatim
    #[error("{0}")]
    Service(String),

    #[error("Invalid body format: {0}")]
    MalformedBody(String),
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::Invocation(msg) => AppError::ExtractionInvocation(msg),
            ExtractionError::Service(msg) => AppError::ExtractionService(msg),
            ExtractionError::MalformedBody(msg) => AppError::MalformedExtractionBody(msg),
        }
    }
}

/// Synchronous invocation of a remote function.
#[async_trait]
pub trait FunctionInvoker: Send + Sync {
    /// Invoke `function_name` with a JSON payload and wait for its response payload.
    async fn invoke(&self, function_name: &str, payload: Vec<u8>)
        -> Result<Vec<u8>, ExtractionError>;
}

#[derive(Debug, Serialize)]
struct ExtractionRequest<'a> {
    #[serde(rename = "fileUrls")]
    file_urls: &'a [String],
}

/// Envelope returned by the extraction function.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionResponse {
    #[serde(rename = "statusCode")]
    pub status_code: i64,
    /// Either a JSON-encoded string or an already decoded object
    #[serde(default)]
    pub body: Value,
    #[serde(default)]
    pub message: Option<String>,
}

/// Sends object URLs to the extraction function.
#[derive(Clone)]
pub struct ExtractionInvoker {
    invoker: Arc<dyn FunctionInvoker>,
    function_name: String,
}

impl ExtractionInvoker {
    pub fn new(invoker: Arc<dyn FunctionInvoker>, function_name: impl Into<String>) -> Self {
        Self {
            invoker,
            function_name: function_name.into(),
        }
    }

    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    /// Invoke the extraction function for `file_urls` and return the envelope
    /// when it reports status 200.
    pub async fn extract(
        &self,
        file_urls: &[String],
    ) -> Result<ExtractionResponse, ExtractionError> {
        if file_urls.is_empty() {
            return Err(ExtractionError::Invocation(
                "at least one file URL is required".to_string(),
            ));
        }

        tracing::info!(
            stage = "INVOKE_LAMBDA_FUNCTION",
            function_name = %self.function_name,
            file_urls = ?file_urls,
            "Starting Lambda invocation"
        );

        let payload = serde_json::to_vec(&ExtractionRequest { file_urls })
            .map_err(|e| ExtractionError::Invocation(e.to_string()))?;

        let raw = self
            .invoker
            .invoke(&self.function_name, payload)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    stage = "INVOKE_LAMBDA_FUNCTION",
                    error = %e,
                    "Error invoking Lambda function"
                );
            })?;

        let response: ExtractionResponse = serde_json::from_slice(&raw).map_err(|e| {
            tracing::error!(
                stage = "INVOKE_LAMBDA_FUNCTION",
                error = %e,
                "Unreadable response from Lambda function"
            );
            ExtractionError::Invocation(format!("unreadable response envelope: {}", e))
        })?;

        tracing::debug!(
            stage = "INVOKE_LAMBDA_FUNCTION",
            status_code = response.status_code,
            "Received response from Lambda function"
        );

        if response.status_code == 200 {
            return Ok(response);
        }

        let message = response.message.clone().unwrap_or_else(|| {
            format!(
                "Extraction function returned status {}",
                response.status_code
            )
        });
        tracing::error!(
            stage = "INVOKE_LAMBDA_FUNCTION",
            status_code = response.status_code,
            message = %message,
            "Error response from Lambda function"
        );
        Err(ExtractionError::Service(message))
    }
}

#[cfg(feature = "aws")]
pub use lambda::LambdaInvoker;

#[cfg(feature = "aws")]
mod lambda {
    use super::{ExtractionError, FunctionInvoker};
    use async_trait::async_trait;
    use aws_sdk_lambda::error::DisplayErrorContext;
    use aws_sdk_lambda::primitives::Blob;
    use aws_sdk_lambda::types::InvocationType;
    use aws_sdk_lambda::Client as LambdaClient;

    /// [`FunctionInvoker`] backed by AWS Lambda `RequestResponse` invocations.
    #[derive(Clone, Debug)]
    pub struct LambdaInvoker {
        client: LambdaClient,
    }

    impl LambdaInvoker {
        pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
            Self {
                client: LambdaClient::new(sdk_config),
            }
        }
    }

    #[async_trait]
    impl FunctionInvoker for LambdaInvoker {
        async fn invoke(
            &self,
            function_name: &str,
            payload: Vec<u8>,
        ) -> Result<Vec<u8>, ExtractionError> {
            let output = self
                .client
                .invoke()
                .function_name(function_name)
                .invocation_type(InvocationType::RequestResponse)
                .payload(Blob::new(payload))
                .send()
                .await
                .map_err(|e| ExtractionError::Invocation(DisplayErrorContext(&e).to_string()))?;

            let body = output
                .payload()
                .map(|blob| blob.as_ref().to_vec())
                .unwrap_or_default();

            // Unhandled exceptions inside the function still return 200 from the
            // Invoke API; the error kind is reported separately.
            if let Some(kind) = output.function_error() {
                let detail = serde_json::from_slice::<serde_json::Value>(&body)
                    .ok()
                    .and_then(|v| v.get("errorMessage").and_then(|m| m.as_str()).map(String::from))
                    .unwrap_or_else(|| String::from_utf8_lossy(&body).into_owned());
                return Err(ExtractionError::Invocation(format!(
                    "function error ({}): {}",
                    kind, detail
                )));
            }

            Ok(body)
        }
    }
}
