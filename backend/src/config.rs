//! Configuration management for the Farming Master server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with FM_ prefix

use config::{ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::GpsCoordinates;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Weather and geocoding API configuration
    pub weather: WeatherConfig,

    /// Threshold persistence
    pub storage: StorageConfig,

    /// In-app notification feed
    pub notifications: NotificationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// OpenWeatherMap API base URL
    pub api_endpoint: String,

    /// OpenWeatherMap API key
    pub api_key: String,

    /// Google Geocoding API base URL
    pub geocoding_endpoint: String,

    /// Google Maps API key; reverse geocoding is skipped when empty
    #[serde(default)]
    pub geocoding_api_key: String,

    /// Location used when the client sends no coordinates
    pub default_latitude: Decimal,
    pub default_longitude: Decimal,
}

impl WeatherConfig {
    pub fn default_location(&self) -> GpsCoordinates {
        GpsCoordinates::new(self.default_latitude, self.default_longitude)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// JSON file holding the alert thresholds
    pub thresholds_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotificationConfig {
    /// Maximum notifications kept in the feed
    pub capacity: usize,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("FM_ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let fallback = GpsCoordinates::fallback();

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("weather.api_endpoint", "https://api.openweathermap.org/data/2.5")?
            .set_default("weather.api_key", "")?
            .set_default("weather.geocoding_endpoint", "https://maps.googleapis.com/maps/api")?
            .set_default("weather.geocoding_api_key", "")?
            .set_default("weather.default_latitude", fallback.latitude.to_string())?
            .set_default("weather.default_longitude", fallback.longitude.to_string())?
            .set_default("storage.thresholds_path", "data/thresholds.json")?
            .set_default("notifications.capacity", 100)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (FM_ prefix)
            .add_source(
                Environment::with_prefix("FM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}
