//! Alert threshold models

use serde::{Deserialize, Serialize};

use crate::error::ThresholdError;

/// One of the three user-adjustable alert thresholds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdKind {
    /// High wind threshold in km/h
    Wind,
    /// Heatwave threshold in °C
    Heat,
    /// Cold snap threshold in °C
    Cold,
}

impl ThresholdKind {
    pub const ALL: [ThresholdKind; 3] = [ThresholdKind::Wind, ThresholdKind::Heat, ThresholdKind::Cold];

    /// Key used in the client key-value store
    pub fn storage_key(&self) -> &'static str {
        match self {
            ThresholdKind::Wind => "windThreshold",
            ThresholdKind::Heat => "heatThreshold",
            ThresholdKind::Cold => "coldThreshold",
        }
    }

    /// Inclusive (min, max) domain
    pub fn domain(&self) -> (f64, f64) {
        match self {
            ThresholdKind::Wind => (0.0, 80.0),
            ThresholdKind::Heat => (25.0, 50.0),
            ThresholdKind::Cold => (-10.0, 15.0),
        }
    }

    pub fn default_value(&self) -> f64 {
        match self {
            ThresholdKind::Wind => 30.0,
            ThresholdKind::Heat => 35.0,
            ThresholdKind::Cold => 5.0,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        let (min, max) = self.domain();
        value.is_finite() && value >= min && value <= max
    }

    pub fn unit(&self) -> &'static str {
        match self {
            ThresholdKind::Wind => "km/h",
            ThresholdKind::Heat | ThresholdKind::Cold => "°C",
        }
    }
}

impl std::fmt::Display for ThresholdKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThresholdKind::Wind => write!(f, "wind"),
            ThresholdKind::Heat => write!(f, "heat"),
            ThresholdKind::Cold => write!(f, "cold"),
        }
    }
}

/// Current alert thresholds
///
/// Every value lies within its [`ThresholdKind::domain`]. Deserializing checks
/// each value, so thresholds arriving as JSON are rejected rather than
/// evaluated when out of domain.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "UncheckedThresholds")]
pub struct ThresholdSet {
    pub wind_kph: f64,
    pub heat_c: f64,
    pub cold_c: f64,
}

#[derive(Deserialize)]
struct UncheckedThresholds {
    wind_kph: f64,
    heat_c: f64,
    cold_c: f64,
}

impl TryFrom<UncheckedThresholds> for ThresholdSet {
    type Error = ThresholdError;

    fn try_from(raw: UncheckedThresholds) -> Result<Self, Self::Error> {
        ThresholdSet::new(raw.wind_kph, raw.heat_c, raw.cold_c)
    }
}

impl ThresholdSet {
    /// Build a set, rejecting the first value outside its domain
    pub fn new(wind_kph: f64, heat_c: f64, cold_c: f64) -> Result<Self, ThresholdError> {
        let set = Self { wind_kph, heat_c, cold_c };
        match ThresholdKind::ALL.into_iter().find(|kind| !kind.contains(set.value(*kind))) {
            Some(kind) => Err(ThresholdError::invalid(kind, set.value(kind))),
            None => Ok(set),
        }
    }

    pub fn value(&self, kind: ThresholdKind) -> f64 {
        match kind {
            ThresholdKind::Wind => self.wind_kph,
            ThresholdKind::Heat => self.heat_c,
            ThresholdKind::Cold => self.cold_c,
        }
    }

    pub(crate) fn set_value(&mut self, kind: ThresholdKind, value: f64) {
        match kind {
            ThresholdKind::Wind => self.wind_kph = value,
            ThresholdKind::Heat => self.heat_c = value,
            ThresholdKind::Cold => self.cold_c = value,
        }
    }
}

impl Default for ThresholdSet {
    fn default() -> Self {
        Self {
            wind_kph: ThresholdKind::Wind.default_value(),
            heat_c: ThresholdKind::Heat.default_value(),
            cold_c: ThresholdKind::Cold.default_value(),
        }
    }
}

/// Partial threshold update; omitted fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ThresholdUpdate {
    pub wind_kph: Option<f64>,
    pub heat_c: Option<f64>,
    pub cold_c: Option<f64>,
}

impl ThresholdUpdate {
    /// Supplied values in fixed kind order
    pub fn entries(&self) -> Vec<(ThresholdKind, f64)> {
        [
            (ThresholdKind::Wind, self.wind_kph),
            (ThresholdKind::Heat, self.heat_c),
            (ThresholdKind::Cold, self.cold_c),
        ]
        .into_iter()
        .filter_map(|(kind, value)| value.map(|v| (kind, v)))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.wind_kph.is_none() && self.heat_c.is_none() && self.cold_c.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_within_domain() {
        for kind in ThresholdKind::ALL {
            assert!(kind.contains(kind.default_value()), "{kind} default out of domain");
        }
        let set = ThresholdSet::default();
        assert_eq!(set.wind_kph, 30.0);
        assert_eq!(set.heat_c, 35.0);
        assert_eq!(set.cold_c, 5.0);
    }

    #[test]
    fn test_domain_edges_inclusive() {
        assert!(ThresholdKind::Wind.contains(0.0));
        assert!(ThresholdKind::Wind.contains(80.0));
        assert!(!ThresholdKind::Wind.contains(80.5));
        assert!(ThresholdKind::Cold.contains(-10.0));
        assert!(!ThresholdKind::Cold.contains(f64::NAN));
        assert!(!ThresholdKind::Heat.contains(f64::INFINITY));
    }

    #[test]
    fn test_update_entries_skip_missing() {
        let update = ThresholdUpdate {
            wind_kph: Some(40.0),
            heat_c: None,
            cold_c: Some(0.0),
        };
        assert_eq!(
            update.entries(),
            vec![(ThresholdKind::Wind, 40.0), (ThresholdKind::Cold, 0.0)]
        );
        assert!(ThresholdUpdate::default().is_empty());
    }

    #[test]
    fn test_deserialize_rejects_out_of_domain() {
        let err = serde_json::from_str::<ThresholdSet>(r#"{"wind_kph":1000,"heat_c":-40,"cold_c":99}"#).unwrap_err();
        assert!(err.to_string().contains("wind"));

        assert!(serde_json::from_str::<ThresholdSet>(r#"{"wind_kph":30,"heat_c":35,"cold_c":16}"#).is_err());
    }

    #[test]
    fn test_deserialize_accepts_domain_values() {
        let set: ThresholdSet = serde_json::from_str(r#"{"wind_kph":80,"heat_c":25,"cold_c":-10}"#).unwrap();
        assert_eq!(set, ThresholdSet::new(80.0, 25.0, -10.0).unwrap());
    }

    #[test]
    fn test_new_names_offending_kind() {
        assert!(matches!(
            ThresholdSet::new(30.0, 51.0, 5.0),
            Err(ThresholdError::InvalidThreshold { kind: ThresholdKind::Heat, .. })
        ));
    }
}
