use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router, extract::State};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Serialize)]
struct DetailedHealthResponse {
    status: String,
    version: String,
    database: String,
}

/// `GET /health` — lightweight liveness probe.
async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    (StatusCode::OK, Json(response))
}

/// `GET /api/v1/health` — health check including database connectivity.
async fn detailed_health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = match state.db.ping().await {
        Ok(()) => "connected",
        Err(_) => "disconnected",
    };

    let status = if database == "connected" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = DetailedHealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
    };

    (status, Json(response))
}

/// Root-level health route.
pub fn root_router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// API-versioned health route.
pub fn api_router() -> Router<AppState> {
    Router::new().route("/health", get(detailed_health_check))
}
