//! System endpoints: health check and listener-status probe.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::dto::ListenerStatusResponse;
use crate::app_state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// `GET /actions/system/status` — Event listener status probe.
#[utoipa::path(
    get,
    path = "/actions/system/status",
    tag = "System",
    summary = "Listener status",
    description = "Reports whether the blockchain event listener is active and which handlers are registered. Pure read, no side effects.",
    responses(
        (status = 200, description = "Listener status", body = ListenerStatusResponse),
    )
)]
pub async fn listener_status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let status = state.listener.status().await;
    let message = if status.is_active {
        "blockchain listener active".to_string()
    } else {
        "blockchain listener inactive; restart required".to_string()
    };

    (
        StatusCode::OK,
        Json(ListenerStatusResponse {
            message,
            is_listening: status.is_active,
            active_listeners: status.handler_count,
            listener_names: status.handler_names,
            timestamp: Utc::now().to_rfc3339(),
        }),
    )
}

/// System routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/actions/system/status", get(listener_status_handler))
}
