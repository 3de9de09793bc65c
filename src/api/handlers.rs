use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use crate::api::state::AppState;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub mode: String,
    pub dependencies: HealthDependencies,
}

#[derive(Serialize)]
pub struct HealthDependencies {
    pub data_source: String,
}

/// Liveness/readiness probe. Degraded (503) when the upstream data
/// provider does not answer the ping.
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let source_status = match state.data_source.ping().await {
        Ok(()) => "healthy",
        Err(_) => "unavailable",
    };

    let overall_status = if source_status == "healthy" {
        "ok"
    } else {
        "degraded"
    };

    let response = HealthResponse {
        status: overall_status.to_string(),
        version: VERSION.to_string(),
        mode: "read-only".to_string(),
        dependencies: HealthDependencies {
            data_source: source_status.to_string(),
        },
    };

    if overall_status == "ok" {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Prometheus text exposition of the process metrics.
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    state.metrics.render()
}
