//! Farming Master server
//!
//! Weather-threshold alerting for farmers: fetches current conditions,
//! evaluates them against user-configured thresholds, and surfaces each
//! alert at most once per weather snapshot.

use std::sync::Arc;

use axum::{routing::get, Router};
use shared::ThresholdStore;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod services;
pub mod storage;

pub use config::Config;

use external::{GeocodingClient, OpenWeatherMapClient, WeatherFetcher};
use services::{AdvisoryService, ArticleService, NotificationService, WeatherService};
use storage::JsonFileStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub weather: WeatherService,
    pub notifications: NotificationService,
    pub advisories: AdvisoryService,
    pub articles: ArticleService,
}

impl AppState {
    /// Build the state from configuration, loading persisted thresholds
    pub fn from_config(config: Config) -> Self {
        let fetcher: Arc<dyn WeatherFetcher> = Arc::new(OpenWeatherMapClient::with_base_url(
            config.weather.api_key.clone(),
            config.weather.api_endpoint.clone(),
        ));
        let store = JsonFileStore::open(&config.storage.thresholds_path);
        Self::with_fetcher(config, fetcher, store)
    }

    /// Build the state around an explicit weather source and threshold store
    pub fn with_fetcher(config: Config, fetcher: Arc<dyn WeatherFetcher>, store: JsonFileStore) -> Self {
        let geocoder = (!config.weather.geocoding_api_key.is_empty()).then(|| {
            GeocodingClient::with_base_url(
                config.weather.geocoding_api_key.clone(),
                config.weather.geocoding_endpoint.clone(),
            )
        });
        let notifications = NotificationService::new(config.notifications.capacity);
        let weather = WeatherService::new(
            fetcher,
            geocoder,
            ThresholdStore::load(store),
            notifications.clone(),
        );

        Self {
            config: Arc::new(config),
            weather,
            notifications,
            advisories: AdvisoryService::new(),
            articles: ArticleService::new(),
        }
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Farming Master Weather Alerts API v1.0"
}
