use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` when every configured pool answers, `degraded` otherwise.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the service (admin) database is reachable.
    pub db_healthy: bool,
    /// Whether the public database is reachable.
    pub public_db_healthy: bool,
}

/// GET /health -- returns service and database health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = match &state.service_pool {
        Some(pool) => archsite_db::health_check(pool).await.is_ok(),
        None => false,
    };
    let public_db_healthy = match &state.public_pool {
        Some(pool) => archsite_db::health_check(pool).await.is_ok(),
        None => false,
    };

    let status = if db_healthy && public_db_healthy {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        public_db_healthy,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
