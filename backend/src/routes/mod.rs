//! Route definitions for the Farming Master API

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/weather", weather_routes())
        .nest("/thresholds", threshold_routes())
        .nest("/notifications", notification_routes())
        .nest("/advisories", advisory_routes())
        .nest("/articles", article_routes())
}

/// Weather fetch and alert evaluation routes
fn weather_routes() -> Router<AppState> {
    Router::new()
        // POST starts a new fetch cycle; GET returns the last evaluated snapshot
        .route("/current", get(handlers::get_current_snapshot).post(handlers::refresh_weather))
        .route("/reevaluate", post(handlers::reevaluate_alerts))
        .route("/forecast", get(handlers::get_forecast))
}

/// Alert threshold settings routes
fn threshold_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_thresholds).put(handlers::update_thresholds))
        .route("/reset", post(handlers::reset_thresholds))
}

/// In-app notification feed routes
fn notification_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(handlers::get_notifications).delete(handlers::clear_notifications),
    )
}

/// Advisory routes
fn advisory_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_advisories))
        .route("/:advisory_id", get(handlers::get_advisory))
}

/// Advisory hub article routes
fn article_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_articles))
        .route("/categories", get(handlers::list_article_categories))
}
