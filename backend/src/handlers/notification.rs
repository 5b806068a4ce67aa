//! HTTP handlers for the in-app notification feed

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::services::Notification;
use crate::AppState;

/// Query parameters for listing notifications
#[derive(Debug, Deserialize)]
pub struct ListNotificationsQuery {
    pub limit: Option<usize>,
}

/// Get recent notifications, newest first
pub async fn get_notifications(
    State(state): State<AppState>,
    Query(query): Query<ListNotificationsQuery>,
) -> Json<Vec<Notification>> {
    Json(state.notifications.list(query.limit))
}

#[derive(Debug, Serialize)]
pub struct ClearNotificationsResponse {
    pub cleared: usize,
}

/// Dismiss every notification in the feed
pub async fn clear_notifications(State(state): State<AppState>) -> Json<ClearNotificationsResponse> {
    Json(ClearNotificationsResponse {
        cleared: state.notifications.clear(),
    })
}
