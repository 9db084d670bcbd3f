//! Health check endpoints.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use telemetry::{health, metrics};

use crate::response::HealthResponse;
use crate::state::AppState;

/// GET /api/health - Service health with auth counters.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let report = health().report();
    let store_healthy = state.sessions.store().is_healthy() && report.status.is_healthy();

    Json(HealthResponse {
        status: if store_healthy { "ok" } else { "degraded" }.to_string(),
        timestamp: Utc::now(),
        environment: state.environment.to_string(),
        session_store_healthy: store_healthy,
        components: report.components,
        auth: metrics().snapshot(),
    })
}

/// GET /health/ready - Readiness probe (can accept traffic).
pub async fn ready_handler(State(state): State<AppState>) -> StatusCode {
    if health().is_ready() && state.sessions.store().is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /health/live - Liveness probe (service is running).
pub async fn live_handler() -> StatusCode {
    if health().is_alive() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
