//! Error handling for the Farming Master server
//!
//! Provides consistent error responses in English and Hindi

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::{StoreError, ThresholdError};
use thiserror::Error;

use crate::external::FetchError;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_hi: String,
    },

    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Fetch cycle errors
    #[error("Weather fetch superseded by a newer request")]
    SupersededFetch,

    // External service errors
    #[error("Weather service unavailable")]
    WeatherServiceUnavailable(#[source] FetchError),

    #[error("Storage error: {0}")]
    StorageError(#[from] StoreError),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<ThresholdError> for AppError {
    fn from(err: ThresholdError) -> Self {
        match err {
            ThresholdError::InvalidThreshold { .. } => AppError::InvalidThreshold(err.to_string()),
            ThresholdError::Storage(e) => AppError::StorageError(e),
        }
    }
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        AppError::WeatherServiceUnavailable(err)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field_errors = errors.field_errors();
        let first = field_errors.iter().next();
        let field = first.map(|(f, _)| f.to_string()).unwrap_or_default();
        let message = first
            .and_then(|(_, errs)| errs.first())
            .and_then(|e| e.message.as_ref())
            .map(|m| m.to_string())
            .unwrap_or_else(|| format!("Invalid value for {}", field));
        AppError::Validation {
            message,
            message_hi: format!("{} के लिए अमान्य मान", field),
            field,
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_hi: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    fn status_and_detail(&self) -> (StatusCode, ErrorDetail) {
        match self {
            AppError::Validation { field, message, message_hi } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: message.clone(),
                    message_hi: message_hi.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::InvalidThreshold(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "INVALID_THRESHOLD".to_string(),
                    message_en: msg.clone(),
                    message_hi: "सीमा मान अनुमत दायरे से बाहर है".to_string(),
                    field: None,
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message_en: format!("{} not found", resource),
                    message_hi: format!("{} नहीं मिला", resource),
                    field: None,
                },
            ),
            AppError::SupersededFetch => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "FETCH_SUPERSEDED".to_string(),
                    message_en: "A newer weather request replaced this one".to_string(),
                    message_hi: "इस अनुरोध को नए मौसम अनुरोध ने बदल दिया".to_string(),
                    field: None,
                },
            ),
            AppError::WeatherServiceUnavailable(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail {
                    code: "WEATHER_SERVICE_UNAVAILABLE".to_string(),
                    message_en: "Could not fetch weather data. Please try again.".to_string(),
                    message_hi: "मौसम डेटा प्राप्त नहीं हो सका। कृपया पुनः प्रयास करें।".to_string(),
                    field: None,
                },
            ),
            AppError::StorageError(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail {
                    code: "STORAGE_ERROR".to_string(),
                    message_en: format!("Storage error: {}", msg),
                    message_hi: "सेटिंग्स सहेजी नहीं जा सकीं".to_string(),
                    field: None,
                },
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message_en: "An internal server error occurred".to_string(),
                    message_hi: "आंतरिक सर्वर त्रुटि".to_string(),
                    field: None,
                },
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = self.status_and_detail();

        // Log the error for debugging
        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::warn!("Request rejected: {}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_threshold_maps_to_bad_request() {
        let err: AppError = ThresholdError::InvalidThreshold {
            kind: shared::ThresholdKind::Wind,
            value: 100.0,
            min: 0.0,
            max: 80.0,
        }
        .into();

        let (status, detail) = err.status_and_detail();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(detail.code, "INVALID_THRESHOLD");
        assert!(detail.message_en.contains("wind"));
    }

    #[test]
    fn test_fetch_failure_maps_to_unavailable() {
        let err: AppError = FetchError::NotConfigured.into();
        let (status, detail) = err.status_and_detail();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(detail.code, "WEATHER_SERVICE_UNAVAILABLE");
    }

    #[test]
    fn test_validation_errors_keep_field_and_message() {
        let mut errors = validator::ValidationErrors::new();
        let mut error = validator::ValidationError::new("range");
        error.message = Some("Heat threshold must be between 25 and 50 °C".into());
        errors.add("heat_c", error);

        let (status, detail) = AppError::from(errors).status_and_detail();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(detail.field.as_deref(), Some("heat_c"));
        assert!(detail.message_en.contains("between 25 and 50"));
    }

    #[test]
    fn test_internal_error_hides_detail() {
        let (status, detail) = AppError::Internal("join failed".to_string()).status_and_detail();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!detail.message_en.contains("join failed"));
    }

    #[test]
    fn test_superseded_is_conflict() {
        let (status, _) = AppError::SupersededFetch.status_and_detail();
        assert_eq!(status, StatusCode::CONFLICT);
    }
}
