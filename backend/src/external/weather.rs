//! Weather API client for fetching weather data
//!
//! Integrates with OpenWeatherMap API for current conditions and the daily
//! forecast. Readings are normalized to °C and km/h.

use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use shared::{ForecastCondition, ForecastDay, GpsCoordinates, WeatherReading};
use thiserror::Error;

/// m/s to km/h
const MPS_TO_KPH: f64 = 3.6;

/// Weather fetch failures
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Weather API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Weather API error: {status} - {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse weather response: {0}")]
    Decode(String),

    #[error("Weather API key not configured")]
    NotConfigured,
}

/// Source of weather readings
#[async_trait]
pub trait WeatherFetcher: Send + Sync {
    async fn fetch_current(&self, coords: &GpsCoordinates) -> Result<WeatherReading, FetchError>;

    async fn fetch_forecast(&self, coords: &GpsCoordinates) -> Result<Vec<ForecastDay>, FetchError>;
}

/// OpenWeatherMap API client
#[derive(Clone)]
pub struct OpenWeatherMapClient {
    client: Client,
    api_key: String,
    base_url: String,
}

/// OpenWeatherMap API response for current weather
#[derive(Debug, Deserialize)]
struct OWMCurrentResponse {
    #[serde(default)]
    weather: Vec<OWMWeather>,
    #[serde(default)]
    main: OWMMain,
    #[serde(default)]
    wind: OWMWind,
    #[serde(default)]
    sys: OWMSys,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct OWMWeather {
    main: String,
    description: String,
}

#[derive(Debug, Default, Deserialize)]
struct OWMMain {
    temp: Option<f64>,
    humidity: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
struct OWMWind {
    speed: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct OWMSys {
    country: Option<String>,
}

/// OpenWeatherMap API response for the daily forecast
#[derive(Debug, Deserialize)]
struct OWMDailyResponse {
    list: Vec<OWMDailyItem>,
}

#[derive(Debug, Deserialize)]
struct OWMDailyItem {
    dt: i64,
    temp: OWMDailyTemp,
    #[serde(default)]
    weather: Vec<OWMWeather>,
}

#[derive(Debug, Deserialize)]
struct OWMDailyTemp {
    day: f64,
}

impl OpenWeatherMapClient {
    /// Create a new OpenWeatherMapClient
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, "https://api.openweathermap.org/data/2.5".to_string())
    }

    /// Create a new OpenWeatherMapClient with custom base URL (for testing)
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        coords: &GpsCoordinates,
        extra: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        if self.api_key.is_empty() {
            return Err(FetchError::NotConfigured);
        }

        let latitude = coords.latitude.to_string();
        let longitude = coords.longitude.to_string();
        let mut query = vec![
            ("lat", latitude.as_str()),
            ("lon", longitude.as_str()),
            ("appid", self.api_key.as_str()),
            ("units", "metric"),
        ];
        query.extend_from_slice(extra);

        let response = self
            .client
            .get(format!("{}/{}", self.base_url, path))
            .query(&query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body });
        }

        response
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }

    /// Convert OpenWeatherMap current response to our format
    fn convert_current_response(data: OWMCurrentResponse) -> WeatherReading {
        let weather = data.weather.first();
        let location_name = match (data.name.is_empty(), data.sys.country) {
            (false, Some(country)) => Some(format!("{}, {}", data.name, country)),
            (false, None) => Some(data.name),
            (true, _) => None,
        };

        WeatherReading {
            temperature_c: data.main.temp,
            wind_speed_kph: data.wind.speed.map(|mps| mps * MPS_TO_KPH),
            condition_text: weather.map(|w| w.description.clone()).unwrap_or_default(),
            condition_code: weather.map(|w| w.main.clone()),
            humidity_percent: data.main.humidity,
            location_name,
        }
    }

    /// Convert OpenWeatherMap daily response to our format
    fn convert_daily_response(data: OWMDailyResponse) -> Vec<ForecastDay> {
        data.list
            .into_iter()
            .filter_map(|item| {
                let date = DateTime::from_timestamp(item.dt, 0)?.date_naive();
                let description = item.weather.first().map(|w| w.description.as_str()).unwrap_or_default();
                Some(ForecastDay {
                    date,
                    day: date.format("%a").to_string(),
                    temp_c: item.temp.day.round() as i32,
                    condition: ForecastCondition::from_description(description),
                })
            })
            .collect()
    }
}

#[async_trait]
impl WeatherFetcher for OpenWeatherMapClient {
    /// Fetch current weather conditions by GPS coordinates
    async fn fetch_current(&self, coords: &GpsCoordinates) -> Result<WeatherReading, FetchError> {
        let data: OWMCurrentResponse = self.get_json("weather", coords, &[]).await?;
        Ok(Self::convert_current_response(data))
    }

    /// Fetch 7-day forecast by GPS coordinates
    async fn fetch_forecast(&self, coords: &GpsCoordinates) -> Result<Vec<ForecastDay>, FetchError> {
        let data: OWMDailyResponse = self.get_json("forecast/daily", coords, &[("cnt", "7")]).await?;
        Ok(Self::convert_daily_response(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_convert_current_response() {
        let data: OWMCurrentResponse = serde_json::from_value(json!({
            "weather": [{ "main": "Thunderstorm", "description": "thunderstorm with heavy rain" }],
            "main": { "temp": 29.4, "humidity": 88 },
            "wind": { "speed": 12.5 },
            "sys": { "country": "IN" },
            "name": "Nagpur"
        }))
        .unwrap();

        let reading = OpenWeatherMapClient::convert_current_response(data);
        assert_eq!(reading.temperature_c, Some(29.4));
        assert!((reading.wind_speed_kph.unwrap() - 45.0).abs() < 1e-9);
        assert_eq!(reading.condition_text, "thunderstorm with heavy rain");
        assert_eq!(reading.condition_code.as_deref(), Some("Thunderstorm"));
        assert_eq!(reading.location_name.as_deref(), Some("Nagpur, IN"));
    }

    #[test]
    fn test_convert_current_response_missing_fields() {
        let data: OWMCurrentResponse = serde_json::from_value(json!({ "name": "" })).unwrap();
        let reading = OpenWeatherMapClient::convert_current_response(data);

        assert_eq!(reading.temperature_c, None);
        assert_eq!(reading.wind_speed_kph, None);
        assert_eq!(reading.condition_text, "");
        assert_eq!(reading.location_name, None);
    }

    #[test]
    fn test_convert_daily_response() {
        let data: OWMDailyResponse = serde_json::from_value(json!({
            "list": [
                { "dt": 1721606400, "temp": { "day": 31.6 }, "weather": [{ "main": "Rain", "description": "rain" }] },
                { "dt": 1721692800, "temp": { "day": 27.2 }, "weather": [{ "main": "Clear", "description": "clear sky" }] }
            ]
        }))
        .unwrap();

        let days = OpenWeatherMapClient::convert_daily_response(data);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].day, "Mon");
        assert_eq!(days[0].temp_c, 32);
        assert_eq!(days[0].condition, ForecastCondition::Rainy);
        assert_eq!(days[1].condition, ForecastCondition::Sunny);
    }
}
