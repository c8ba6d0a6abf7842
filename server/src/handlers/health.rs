//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;
use crate::check::score::SCORE_TABLE_VERSION;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    database: bool,
    score_table_version: u32,
    timestamp: i64,
}

/// Liveness plus a cheap database probe. Breach sources are not probed.
pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = sqlx::query("SELECT 1")
        .execute(&state.pool)
        .await
        .is_ok();

    Json(HealthResponse {
        status: if database { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database,
        score_table_version: SCORE_TABLE_VERSION,
        timestamp: chrono::Utc::now().timestamp(),
    })
}
