//! Validation utilities for the weather alerting core

use rust_decimal::Decimal;

use crate::models::ThresholdKind;

// ============================================================================
// Threshold Validations
// ============================================================================

/// Validate a threshold value is finite and inside its domain
pub fn validate_threshold(kind: ThresholdKind, value: f64) -> Result<(), &'static str> {
    if !value.is_finite() {
        return Err("Threshold must be a finite number");
    }
    if !kind.contains(value) {
        return Err(match kind {
            ThresholdKind::Wind => "Wind threshold must be between 0 and 80 km/h",
            ThresholdKind::Heat => "Heat threshold must be between 25 and 50 °C",
            ThresholdKind::Cold => "Cold threshold must be between -10 and 15 °C",
        });
    }
    Ok(())
}

// ============================================================================
// Reading Validations
// ============================================================================

/// Treat NaN and infinite readings as missing
pub fn finite_reading(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Validate latitude/longitude ranges
pub fn validate_coordinates(latitude: Decimal, longitude: Decimal) -> Result<(), &'static str> {
    if latitude < Decimal::from(-90) || latitude > Decimal::from(90) {
        return Err("Latitude must be between -90 and 90");
    }
    if longitude < Decimal::from(-180) || longitude > Decimal::from(180) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_validate_threshold_valid() {
        assert!(validate_threshold(ThresholdKind::Wind, 40.0).is_ok());
        assert!(validate_threshold(ThresholdKind::Heat, 25.0).is_ok());
        assert!(validate_threshold(ThresholdKind::Cold, -10.0).is_ok());
    }

    #[test]
    fn test_validate_threshold_invalid() {
        assert!(validate_threshold(ThresholdKind::Wind, -5.0).is_err());
        assert!(validate_threshold(ThresholdKind::Wind, 100.0).is_err());
        assert!(validate_threshold(ThresholdKind::Heat, 24.9).is_err());
        assert!(validate_threshold(ThresholdKind::Cold, f64::NAN).is_err());
    }

    #[test]
    fn test_finite_reading() {
        assert_eq!(finite_reading(Some(12.5)), Some(12.5));
        assert_eq!(finite_reading(Some(f64::NAN)), None);
        assert_eq!(finite_reading(Some(f64::NEG_INFINITY)), None);
        assert_eq!(finite_reading(None), None);
    }

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates(dec("28.6139"), dec("77.2090")).is_ok());
        assert!(validate_coordinates(dec("-90"), dec("180")).is_ok());
        assert!(validate_coordinates(dec("91.0"), dec("77.0")).is_err());
        assert!(validate_coordinates(dec("28.0"), dec("-180.5")).is_err());
    }
}
