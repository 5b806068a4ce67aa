//! HTTP handlers for alert threshold settings

use axum::{extract::State, Json};
use serde::Deserialize;
use shared::{validate_threshold, ThresholdKind, ThresholdSet, ThresholdUpdate};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::{AppError, AppResult};
use crate::AppState;

/// Partial threshold change; omitted fields keep their current value
#[derive(Debug, Deserialize)]
pub struct UpdateThresholdsRequest {
    pub wind_kph: Option<f64>,
    pub heat_c: Option<f64>,
    pub cold_c: Option<f64>,
}

impl Validate for UpdateThresholdsRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let fields = [
            ("wind_kph", ThresholdKind::Wind, self.wind_kph),
            ("heat_c", ThresholdKind::Heat, self.heat_c),
            ("cold_c", ThresholdKind::Cold, self.cold_c),
        ];
        for (field, kind, value) in fields {
            if let Some(Err(message)) = value.map(|v| validate_threshold(kind, v)) {
                let mut error = ValidationError::new("range");
                error.message = Some(message.into());
                errors.add(field, error);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl From<UpdateThresholdsRequest> for ThresholdUpdate {
    fn from(req: UpdateThresholdsRequest) -> Self {
        ThresholdUpdate {
            wind_kph: req.wind_kph,
            heat_c: req.heat_c,
            cold_c: req.cold_c,
        }
    }
}

/// Get the current alert thresholds
pub async fn get_thresholds(State(state): State<AppState>) -> Json<ThresholdSet> {
    Json(state.weather.thresholds().await)
}

/// Update one or more alert thresholds
pub async fn update_thresholds(
    State(state): State<AppState>,
    Json(input): Json<UpdateThresholdsRequest>,
) -> AppResult<Json<ThresholdSet>> {
    input.validate()?;
    let update = ThresholdUpdate::from(input);
    if update.is_empty() {
        return Err(AppError::Validation {
            field: "thresholds".to_string(),
            message: "At least one threshold must be provided".to_string(),
            message_hi: "कम से कम एक सीमा मान आवश्यक है".to_string(),
        });
    }

    let thresholds = state.weather.update_thresholds(&update).await?;
    Ok(Json(thresholds))
}

/// Restore the default thresholds
pub async fn reset_thresholds(State(state): State<AppState>) -> AppResult<Json<ThresholdSet>> {
    Ok(Json(state.weather.reset_thresholds().await?))
}
