use axum::{extract::State, Json};
use serde::Serialize;

use crate::http::server::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub roles_cached: bool,
    pub role_count: usize,
}

/// `GET /health`. Unauthenticated; never calls upstream.
pub async fn get_health(State(state): State<AppState>) -> Json<HealthStatus> {
    let cache = state.ranking.cache();
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        roles_cached: cache.is_populated(),
        role_count: cache.len(),
    })
}
