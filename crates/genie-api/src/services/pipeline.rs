//! Upload pipeline orchestration.
//!
//! Runs one uploaded file through storage, extraction, text storage and the
//! managed flow, strictly in that order. The first failing stage ends the run;
//! objects already written are left in place. A flow whose output chunks all
//! failed to parse counts as a failed flow stage.

use crate::state::AppState;
use genie_core::{AppError, PipelineStage, StoredObjectReference, UploadedFile};
use genie_services::{parse_extracted_texts, ExtractionInvoker, FlowInvoker, FlowRun};
use genie_storage::ObjectStoreGateway;

/// Everything produced by a successful pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub upload: StoredObjectReference,
    pub extracted_text: StoredObjectReference,
    pub flow_run: FlowRun,
}

/// Tracks the current stage and tags log lines with it.
struct StageTracker {
    stage: PipelineStage,
}

impl StageTracker {
    fn new() -> Self {
        Self {
            stage: PipelineStage::AwaitingFile,
        }
    }

    fn advance(&mut self) {
        if let Some(next) = self.stage.next() {
            tracing::debug!(from = %self.stage, to = %next, "Pipeline stage transition");
            self.stage = next;
        }
    }

    fn fail(&mut self, err: impl Into<AppError>) -> AppError {
        let err = err.into();
        tracing::error!(stage = %self.stage, error = %err, "Pipeline stage failed");
        self.stage = PipelineStage::Failed;
        err
    }
}

pub struct UploadPipeline<'a> {
    gateway: &'a ObjectStoreGateway,
    extraction: &'a ExtractionInvoker,
    flow: &'a FlowInvoker,
}

impl<'a> UploadPipeline<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            gateway: &state.gateway,
            extraction: &state.extraction,
            flow: &state.flow,
        }
    }

    pub async fn run(&self, file: UploadedFile) -> Result<PipelineOutcome, AppError> {
        let mut tracker = StageTracker::new();

        tracker.advance();
        let upload = self
            .gateway
            .store_file(&file)
            .await
            .map_err(|e| tracker.fail(e))?;

        tracker.advance();
        let response = self
            .extraction
            .extract(std::slice::from_ref(&upload.url))
            .await
            .map_err(|e| tracker.fail(e))?;

        tracker.advance();
        let texts = parse_extracted_texts(&response.body).map_err(|e| tracker.fail(e))?;
        if texts.len() > 1 {
            tracing::warn!(
                stage = %PipelineStage::ParsingText,
                count = texts.len(),
                "Extraction returned more than one text; using the first"
            );
        }
        let Some(text) = texts.into_iter().next() else {
            return Err(tracker.fail(AppError::MalformedExtractionBody(
                "no extracted text".to_string(),
            )));
        };

        tracker.advance();
        let extracted_text = self
            .gateway
            .store_text(&file.original_name, &text)
            .await
            .map_err(|e| tracker.fail(e))?;

        tracker.advance();
        let flow_run = self
            .flow
            .invoke_configured(&extracted_text.key)
            .await
            .map_err(|e| tracker.fail(e))?;
        if flow_run.is_total_failure() {
            return Err(tracker.fail(AppError::FlowInvocation(format!(
                "flow produced no usable output ({} chunk errors)",
                flow_run.chunk_errors.len()
            ))));
        }

        tracker.advance();
        tracing::info!(
            stage = %PipelineStage::Done,
            upload_key = %upload.key,
            text_key = %extracted_text.key,
            items = flow_run.items.len(),
            chunk_errors = flow_run.chunk_errors.len(),
            "Upload pipeline completed"
        );

        Ok(PipelineOutcome {
            upload,
            extracted_text,
            flow_run,
        })
    }
}
