//! Liveness and readiness probes

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use sqlx::PgPool;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

impl HealthResponse {
    fn new(database_up: bool) -> Self {
        Self {
            status: if database_up { "ok" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

async fn database_reachable(pool: &PgPool) -> bool {
    sqlx::query("SELECT 1").execute(pool).await.is_ok()
}

/// Overall health: the process is up and the database answers
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database_up = database_reachable(&state.pool).await;
    let status = if database_up {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(HealthResponse::new(database_up)))
}

/// Liveness probe; answers as long as the process serves requests
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// Readiness probe; gates traffic on database connectivity
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    if database_reachable(&state.pool).await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
