use crate::error::HttpAppError;
use crate::services::pipeline::UploadPipeline;
use crate::state::AppState;
use crate::utils::upload::{extract_multipart_file, validate_file_size};
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    response::IntoResponse,
};
use genie_core::constants::{NO_FILE_UPLOADED_MESSAGE, UPLOAD_SUCCESS_MESSAGE};
use std::sync::Arc;

/// `POST /api/upload`
///
/// Runs the whole pipeline before answering. A request without a `file`
/// field (or without a multipart body at all) gets a plain-text 400 and
/// nothing is written.
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let file = match multipart {
        Ok(multipart) => extract_multipart_file(multipart).await?,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Upload request is not multipart");
            None
        }
    };

    let Some(file) = file else {
        return Ok((StatusCode::BAD_REQUEST, NO_FILE_UPLOADED_MESSAGE));
    };

    validate_file_size(file.size(), state.config.max_file_size_bytes())?;

    tracing::info!(
        file_name = %file.original_name,
        content_type = %file.content_type,
        size_bytes = file.size(),
        "Upload received"
    );

    UploadPipeline::new(&state).run(file).await?;

    Ok((StatusCode::OK, UPLOAD_SUCCESS_MESSAGE))
}
