//! Alert rule evaluation
//!
//! Maps one snapshot and the current thresholds to alert events. Rules are
//! independent and always reported in [`AlertKind::ALL`] order. A rule whose
//! input is missing or NaN is skipped rather than evaluated.

use serde::Serialize;

use crate::models::{AlertEvent, AlertKind, ThresholdSet, WeatherSnapshot};
use crate::validation::finite_reading;

/// Condition substrings that raise a heavy rain alert (matched lower-case)
pub const HEAVY_RAIN_MARKERS: &[&str] = &["heavy rain", "thunderstorm"];

/// Result of applying one rule
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RuleOutcome {
    Fired(AlertEvent),
    NotFired,
    /// Input was missing or not a number
    Skipped,
}

/// Apply every rule and report each outcome, in rule order
pub fn evaluate_rules(snapshot: &WeatherSnapshot, thresholds: &ThresholdSet) -> Vec<(AlertKind, RuleOutcome)> {
    AlertKind::ALL
        .into_iter()
        .map(|kind| {
            let outcome = apply_rule(kind, snapshot, thresholds);
            if outcome == RuleOutcome::Skipped {
                tracing::debug!(snapshot_id = %snapshot.id(), rule = %kind, "Rule skipped: reading unavailable");
            }
            (kind, outcome)
        })
        .collect()
}

/// Alerts fired by `snapshot` under `thresholds`, in rule order
pub fn evaluate(snapshot: &WeatherSnapshot, thresholds: &ThresholdSet) -> Vec<AlertEvent> {
    evaluate_rules(snapshot, thresholds)
        .into_iter()
        .filter_map(|(_, outcome)| match outcome {
            RuleOutcome::Fired(event) => Some(event),
            RuleOutcome::NotFired | RuleOutcome::Skipped => None,
        })
        .collect()
}

fn apply_rule(kind: AlertKind, snapshot: &WeatherSnapshot, thresholds: &ThresholdSet) -> RuleOutcome {
    let id = snapshot.id();
    match kind {
        AlertKind::HighWind => threshold_rule(kind, snapshot, snapshot.wind_speed_kph(), thresholds.wind_kph, |m, t| m > t),
        AlertKind::Heatwave => threshold_rule(kind, snapshot, snapshot.temperature_c(), thresholds.heat_c, |m, t| m > t),
        AlertKind::ColdSnap => threshold_rule(kind, snapshot, snapshot.temperature_c(), thresholds.cold_c, |m, t| m < t),
        AlertKind::HeavyRain if is_heavy_rain(snapshot.condition_text()) => {
            RuleOutcome::Fired(AlertEvent::heavy_rain(id))
        }
        AlertKind::HeavyRain => RuleOutcome::NotFired,
    }
}

fn threshold_rule(
    kind: AlertKind,
    snapshot: &WeatherSnapshot,
    measured: Option<f64>,
    threshold: f64,
    crosses: fn(f64, f64) -> bool,
) -> RuleOutcome {
    match finite_reading(measured) {
        None => RuleOutcome::Skipped,
        Some(m) if crosses(m, threshold) => {
            RuleOutcome::Fired(AlertEvent::threshold(kind, snapshot.id(), m, threshold))
        }
        Some(_) => RuleOutcome::NotFired,
    }
}

/// Case-insensitive match against [`HEAVY_RAIN_MARKERS`]
pub fn is_heavy_rain(condition_text: &str) -> bool {
    let text = condition_text.to_lowercase();
    HEAVY_RAIN_MARKERS.iter().any(|marker| text.contains(marker))
}
