//! Domain models passed between pipeline stages.
//!
//! Nothing here is persisted by the service; every value lives for a single
//! request.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// One inbound file taken from the multipart request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl UploadedFile {
    pub fn new(
        original_name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            original_name: original_name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Location of an object after the store write has completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObjectReference {
    pub bucket: String,
    pub key: String,
    pub url: String,
}

/// One structured unit emitted by the managed flow.
pub type FlowWorkItem = serde_json::Value;

/// An available managed flow, as returned by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowSummary {
    pub name: String,
    pub id: String,
}

/// Stages of the upload pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    AwaitingFile,
    Uploading,
    Extracting,
    ParsingText,
    StoringText,
    InvokingFlow,
    Done,
    Failed,
}

impl PipelineStage {
    /// Stable tag attached to every log line emitted by the stage
    pub fn tag(&self) -> &'static str {
        match self {
            PipelineStage::AwaitingFile => "AWAITING_FILE",
            PipelineStage::Uploading => "UPLOAD_FILES_TO_S3",
            PipelineStage::Extracting => "INVOKE_LAMBDA_FUNCTION",
            PipelineStage::ParsingText => "PARSE_EXTRACTED_TEXT",
            PipelineStage::StoringText => "UPLOAD_TXT_TO_S3",
            PipelineStage::InvokingFlow => "INVOKE_FLOW",
            PipelineStage::Done => "DONE",
            PipelineStage::Failed => "FAILED",
        }
    }

    /// Next stage on success. `Done` and `Failed` are terminal.
    pub fn next(&self) -> Option<PipelineStage> {
        match self {
            PipelineStage::AwaitingFile => Some(PipelineStage::Uploading),
            PipelineStage::Uploading => Some(PipelineStage::Extracting),
            PipelineStage::Extracting => Some(PipelineStage::ParsingText),
            PipelineStage::ParsingText => Some(PipelineStage::StoringText),
            PipelineStage::StoringText => Some(PipelineStage::InvokingFlow),
            PipelineStage::InvokingFlow => Some(PipelineStage::Done),
            PipelineStage::Done | PipelineStage::Failed => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineStage::Done | PipelineStage::Failed)
    }
}

impl Display for PipelineStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.tag())
    }
}
