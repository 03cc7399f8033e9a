use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// `GET /api/list-flow`
///
/// Catalog failures answer 400 with `{"error": <message>}`, the shape the
/// web client expects from this endpoint.
pub async fn list_flows(State(state): State<Arc<AppState>>) -> Response {
    match state.catalog.list_flows().await {
        Ok(flows) => {
            tracing::debug!(count = flows.len(), "Listed flows");
            Json(flows).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Error fetching flows");
            (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() }))).into_response()
        }
    }
}
