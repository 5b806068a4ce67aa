//! Weather data models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of one fetched weather snapshot
///
/// Issued in strictly increasing order, one per fetch, so two fetches with
/// identical readings still get distinct ids.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct SnapshotId(u64);

impl SnapshotId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Normalized reading returned by a weather fetcher, before it is stamped
/// with a snapshot id
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WeatherReading {
    pub temperature_c: Option<f64>,
    pub wind_speed_kph: Option<f64>,
    /// Free-form description, e.g. "thunderstorm with heavy rain"
    pub condition_text: String,
    /// Short provider condition code, e.g. "Rain"
    #[serde(default)]
    pub condition_code: Option<String>,
    #[serde(default)]
    pub humidity_percent: Option<i32>,
    #[serde(default)]
    pub location_name: Option<String>,
}

/// The current weather snapshot; immutable once constructed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherSnapshot {
    id: SnapshotId,
    temperature_c: Option<f64>,
    wind_speed_kph: Option<f64>,
    condition_text: String,
    fetched_at: DateTime<Utc>,
}

impl WeatherSnapshot {
    pub fn new(
        id: SnapshotId,
        temperature_c: Option<f64>,
        wind_speed_kph: Option<f64>,
        condition_text: impl Into<String>,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            temperature_c,
            wind_speed_kph,
            condition_text: condition_text.into(),
            fetched_at,
        }
    }

    /// Stamp a fetched reading with its snapshot id
    pub fn from_reading(id: SnapshotId, reading: &WeatherReading, fetched_at: DateTime<Utc>) -> Self {
        Self::new(
            id,
            reading.temperature_c,
            reading.wind_speed_kph,
            reading.condition_text.clone(),
            fetched_at,
        )
    }

    pub fn id(&self) -> SnapshotId {
        self.id
    }

    pub fn temperature_c(&self) -> Option<f64> {
        self.temperature_c
    }

    pub fn wind_speed_kph(&self) -> Option<f64> {
        self.wind_speed_kph
    }

    pub fn condition_text(&self) -> &str {
        &self.condition_text
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }
}

/// Coarse daily forecast condition shown on the dashboard
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ForecastCondition {
    Sunny,
    Cloudy,
    Rainy,
    Clear,
}

impl ForecastCondition {
    /// Map a provider description to a dashboard condition
    pub fn from_description(description: &str) -> Self {
        match description.trim().to_lowercase().as_str() {
            "clear sky" => ForecastCondition::Sunny,
            "few clouds" | "scattered clouds" | "broken clouds" | "mist" => ForecastCondition::Cloudy,
            "shower rain" | "rain" | "thunderstorm" | "snow" => ForecastCondition::Rainy,
            _ => ForecastCondition::Cloudy,
        }
    }
}

/// One day of the 7-day forecast
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastDay {
    pub date: NaiveDate,
    /// Short weekday label, e.g. "Mon"
    pub day: String,
    pub temp_c: i32,
    pub condition: ForecastCondition,
}
