//! Error types module
//!
//! All pipeline failures are unified under [`AppError`]. Each stage crate keeps
//! its own error enum (`StorageError`, `ExtractionError`, `FlowError`) and
//! converts into one of the variants below, so handlers render a consistent
//! response regardless of which stage failed.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "STORAGE_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Object store write or read failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// The extraction function could not be invoked or returned garbage
    #[error("Extraction invocation error: {0}")]
    ExtractionInvocation(String),

    /// The extraction function reported a non-200 status
    #[error("Extraction service error: {0}")]
    ExtractionService(String),

    #[error("Malformed extraction body: {0}")]
    MalformedExtractionBody(String),

    #[error("Flow invocation error: {0}")]
    FlowInvocation(String),

    #[error("Flow catalog error: {0}")]
    FlowCatalog(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::Storage(_) => (
            500,
            "STORAGE_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::ExtractionInvocation(_) => (
            502,
            "EXTRACTION_INVOCATION_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::ExtractionService(_) => (
            502,
            "EXTRACTION_SERVICE_ERROR",
            false,
            Some("Check the uploaded file can be read and try again"),
            false,
            LogLevel::Error,
        ),
        AppError::MalformedExtractionBody(_) => (
            502,
            "MALFORMED_EXTRACTION_BODY",
            false,
            Some("Contact support if this error persists"),
            false,
            LogLevel::Error,
        ),
        AppError::FlowInvocation(_) => (
            502,
            "FLOW_INVOCATION_ERROR",
            true,
            Some("Check flow configuration and retry"),
            true,
            LogLevel::Error,
        ),
        AppError::FlowCatalog(_) => (
            400,
            "FLOW_CATALOG_ERROR",
            true,
            Some("Retry after a short delay"),
            false,
            LogLevel::Warn,
        ),
        AppError::InvalidInput(_) => (
            400,
            "INVALID_INPUT",
            false,
            Some("Check request parameters and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::PayloadTooLarge(_) => (
            413,
            "PAYLOAD_TOO_LARGE",
            false,
            Some("Reduce file size"),
            false,
            LogLevel::Debug,
        ),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::Storage(_) => "Storage",
            AppError::ExtractionInvocation(_) => "ExtractionInvocation",
            AppError::ExtractionService(_) => "ExtractionService",
            AppError::MalformedExtractionBody(_) => "MalformedExtractionBody",
            AppError::FlowInvocation(_) => "FlowInvocation",
            AppError::FlowCatalog(_) => "FlowCatalog",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Storage(_) => "Failed to access storage".to_string(),
            AppError::ExtractionInvocation(_) => "Failed to reach text extraction".to_string(),
            // The remote message is the whole point of this variant, pass it through verbatim.
            AppError::ExtractionService(ref msg) => msg.clone(),
            AppError::MalformedExtractionBody(ref msg) => msg.clone(),
            AppError::FlowInvocation(_) => "Failed to run generation flow".to_string(),
            AppError::FlowCatalog(ref msg) => msg.clone(),
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::PayloadTooLarge(ref msg) => msg.clone(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::InternalWithSource { .. } => "Internal server error".to_string(),
        }
    }
}
