use crate::api::handlers::{health_handler, metrics_handler};
use crate::api::state::AppState;
use crate::mcp::server::mcp_handler;
use axum::http::HeaderValue;
use axum::{
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::Level;

pub fn create_router(state: AppState, allowed_origins: String) -> Router {
    // CORS from configuration: "*" means permissive, otherwise a
    // comma-separated origin list (invalid entries are dropped).
    let cors = if allowed_origins == "*" {
        CorsLayer::permissive()
    } else {
        let origin_values: Vec<HeaderValue> = allowed_origins
            .split(',')
            .filter_map(|s| {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    trimmed.parse::<HeaderValue>().ok()
                }
            })
            .collect();

        if origin_values.is_empty() {
            tracing::warn!("no valid CORS origins configured, falling back to permissive CORS");
            CorsLayer::permissive()
        } else {
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origin_values))
                .allow_methods(Any)
                .allow_headers(Any)
        }
    };

    let middleware = ServiceBuilder::new()
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::span!(
                        Level::INFO,
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        let status = response.status().as_u16().to_string();
                        metrics::counter!("http_requests_total", "status" => status.clone())
                            .increment(1);
                        metrics::histogram!("http_request_duration_seconds", "status" => status)
                            .record(latency.as_secs_f64());
                        if latency.as_millis() > 1000 {
                            tracing::warn!("slow HTTP request: {}ms", latency.as_millis());
                        }
                    },
                ),
        )
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(60),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            axum::http::header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            axum::http::header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(cors);

    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        // RPC endpoint plus the aliases some clients use.
        .route("/mcp", post(mcp_handler))
        .route("/message", post(mcp_handler))
        .route("/messages", post(mcp_handler))
        .layer(middleware)
        .with_state(state)
}
