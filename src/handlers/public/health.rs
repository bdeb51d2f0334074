use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::app::AppState;

/// GET /health - liveness plus a ping of the configured store
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();
    let backend = state.health.backend();

    match state.health.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "UP",
                "timestamp": now,
                "storage": backend,
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed for {} storage: {}", backend, e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "DOWN",
                    "timestamp": now,
                    "storage": backend,
                })),
            )
        }
    }
}
