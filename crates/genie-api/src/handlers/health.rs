use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use std::time::Duration;

/// Key probed by the readiness check. It does not need to exist.
const READINESS_PROBE_KEY: &str = "uploads/.readiness-probe";

/// Liveness probe - simple check that process is running
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "alive"
        })),
    )
}

/// Readiness probe - checks that the object store answers
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    const TIMEOUT: Duration = Duration::from_secs(5);

    let storage = state.gateway.storage();
    let mut response = serde_json::json!({
        "status": "ready",
        "storage": "unknown",
        "backend": storage.backend_type().to_string(),
    });

    let ready = match tokio::time::timeout(TIMEOUT, storage.exists(READINESS_PROBE_KEY)).await {
        Ok(Ok(_)) => {
            response["storage"] = serde_json::json!("ready");
            true
        }
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Storage readiness check failed");
            response["storage"] = serde_json::json!(format!("not_ready: {}", e));
            false
        }
        Err(_) => {
            tracing::error!("Storage readiness check timed out");
            response["storage"] = serde_json::json!("timeout");
            false
        }
    };

    let status_code = if ready {
        StatusCode::OK
    } else {
        response["status"] = serde_json::json!("not_ready");
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
