//! `GET /health`, served outside `/api` so probes need no credentials.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthStatus {
    /// `ok`, or `degraded` while Postgres is unreachable.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
}

/// Always answers 200; a dead database only flips `status`.
async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    let db_healthy = vitrine_db::health_check(&state.pool).await.is_ok();
    if !db_healthy {
        tracing::warn!("Health probe could not reach the database");
    }

    Json(HealthStatus {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
