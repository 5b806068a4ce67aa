//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;
use shared::SnapshotId;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Snapshot the dispatch guard is currently armed for
    pub armed_snapshot: Option<SnapshotId>,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        armed_snapshot: state.weather.armed_snapshot().await,
    })
}
