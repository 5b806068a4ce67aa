//! HTTP handlers for weather and alert evaluation endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{validate_coordinates, ForecastDay, GpsCoordinates, WeatherSnapshot};

use crate::error::{AppError, AppResult};
use crate::services::{Reevaluation, WeatherUpdate};
use crate::AppState;

/// Query parameters for a weather location; both or neither must be given
#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
}

impl LocationQuery {
    fn resolve(&self, state: &AppState) -> AppResult<GpsCoordinates> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => {
                validate_coordinates(latitude, longitude).map_err(|message| AppError::Validation {
                    field: "coordinates".to_string(),
                    message: message.to_string(),
                    message_hi: "अमान्य निर्देशांक".to_string(),
                })?;
                Ok(GpsCoordinates::new(latitude, longitude))
            }
            (None, None) => Ok(state.config.weather.default_location()),
            _ => Err(AppError::Validation {
                field: "coordinates".to_string(),
                message: "latitude and longitude must be given together".to_string(),
                message_hi: "अक्षांश और देशांतर दोनों आवश्यक हैं".to_string(),
            }),
        }
    }
}

/// Fetch current weather and raise any alerts it triggers
pub async fn refresh_weather(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> AppResult<Json<WeatherUpdate>> {
    let coords = query.resolve(&state)?;
    let update = state.weather.refresh(coords).await?;
    Ok(Json(update))
}

/// Latest evaluated snapshot, if any
pub async fn get_current_snapshot(State(state): State<AppState>) -> AppResult<Json<WeatherSnapshot>> {
    state
        .weather
        .current_snapshot()
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Weather snapshot".to_string()))
}

/// Re-run the alert rules against the current snapshot
pub async fn reevaluate_alerts(State(state): State<AppState>) -> Json<Reevaluation> {
    Json(state.weather.reevaluate().await)
}

/// 7-day forecast
pub async fn get_forecast(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> AppResult<Json<Vec<ForecastDay>>> {
    let coords = query.resolve(&state)?;
    Ok(Json(state.weather.forecast(coords).await))
}
