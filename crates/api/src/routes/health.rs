//! `GET /health`: liveness plus the board's schema and timer figures.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

const SERVICE: &str = "taskboard";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub service: &'static str,
    /// `"ok"`, or `"degraded"` when the database cannot be queried.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Newest applied migration; `None` while the database is unreachable.
    pub schema_version: Option<i64>,
    pub running_timers: Option<i64>,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let board = match taskboard_db::board_status(&state.pool).await {
        Ok(board) => Some(board),
        Err(err) => {
            tracing::warn!(error = %err, "Health check could not reach the database");
            None
        }
    };

    Json(HealthResponse {
        service: SERVICE,
        status: if board.is_some() { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy: board.is_some(),
        schema_version: board.map(|b| b.schema_version),
        running_timers: board.map(|b| b.running_timers),
    })
}

/// Served at the root, outside `/api` and its auth.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
