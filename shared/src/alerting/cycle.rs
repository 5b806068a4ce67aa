//! Fetch cycle coordination
//!
//! One cycle is: allocate a snapshot id, arm the dispatch guard for it, wait
//! for the fetch to resolve, then evaluate and admit. Arming happens before
//! the fetch resolves, so a slower earlier fetch that lands afterwards no
//! longer matches the armed id and is discarded.

use chrono::Utc;
use serde::Serialize;

use super::evaluator::evaluate;
use super::guard::DispatchGuard;
use crate::models::{AlertEvent, SnapshotId, WeatherReading, WeatherSnapshot};
use crate::thresholds::{KeyValueStore, ThresholdStore};

/// Monotonic snapshot id source, starting at 1
#[derive(Debug, Clone, Default)]
pub struct SnapshotSequence {
    last: u64,
}

impl SnapshotSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self) -> SnapshotId {
        self.last += 1;
        SnapshotId::new(self.last)
    }
}

/// Result of completing a fetch
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CycleOutcome {
    /// The fetch was current; `admitted` holds the alerts to surface
    Evaluated {
        snapshot: WeatherSnapshot,
        admitted: Vec<AlertEvent>,
    },
    /// A newer fetch was started before this one resolved
    Superseded { snapshot_id: SnapshotId },
}

/// Threshold store, dispatch guard and snapshot sequence for one client session
#[derive(Debug)]
pub struct AlertCycle<S> {
    thresholds: ThresholdStore<S>,
    guard: DispatchGuard,
    sequence: SnapshotSequence,
    current: Option<WeatherSnapshot>,
}

impl<S: KeyValueStore> AlertCycle<S> {
    pub fn new(thresholds: ThresholdStore<S>) -> Self {
        Self {
            thresholds,
            guard: DispatchGuard::new(),
            sequence: SnapshotSequence::new(),
            current: None,
        }
    }

    /// Start a fetch. Supersedes any fetch still in flight.
    pub fn begin_fetch(&mut self) -> SnapshotId {
        let id = self.sequence.next();
        self.guard.reset_for_new_snapshot(id);
        self.current = None;
        tracing::debug!(snapshot_id = %id, "Weather fetch started");
        id
    }

    /// Complete the fetch started as `id`
    pub fn complete_fetch(&mut self, id: SnapshotId, reading: &WeatherReading) -> CycleOutcome {
        if self.guard.armed_snapshot() != Some(id) {
            tracing::info!(snapshot_id = %id, "Discarding result of superseded fetch");
            return CycleOutcome::Superseded { snapshot_id: id };
        }

        let snapshot = WeatherSnapshot::from_reading(id, reading, Utc::now());
        let admitted = self.guard.admit(evaluate(&snapshot, &self.thresholds.get()));
        tracing::info!(
            snapshot_id = %id,
            alerts = admitted.len(),
            "Weather snapshot evaluated"
        );

        self.current = Some(snapshot.clone());
        CycleOutcome::Evaluated { snapshot, admitted }
    }

    /// Evaluate the current snapshot again, returning only alerts not yet
    /// surfaced for it
    pub fn reevaluate(&mut self) -> Vec<AlertEvent> {
        match &self.current {
            Some(snapshot) => self.guard.admit(evaluate(snapshot, &self.thresholds.get())),
            None => Vec::new(),
        }
    }

    pub fn current_snapshot(&self) -> Option<&WeatherSnapshot> {
        self.current.as_ref()
    }

    pub fn guard(&self) -> &DispatchGuard {
        &self.guard
    }

    pub fn thresholds(&self) -> &ThresholdStore<S> {
        &self.thresholds
    }

    pub fn thresholds_mut(&mut self) -> &mut ThresholdStore<S> {
        &mut self.thresholds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AlertKind, ThresholdSet};
    use crate::thresholds::MemoryStore;

    fn cycle() -> AlertCycle<MemoryStore> {
        AlertCycle::new(ThresholdStore::load(MemoryStore::new()))
    }

    fn reading(temp: f64, wind: f64, condition: &str) -> WeatherReading {
        WeatherReading {
            temperature_c: Some(temp),
            wind_speed_kph: Some(wind),
            condition_text: condition.to_string(),
            ..Default::default()
        }
    }

    fn admitted_kinds(outcome: &CycleOutcome) -> Vec<AlertKind> {
        match outcome {
            CycleOutcome::Evaluated { admitted, .. } => admitted.iter().map(|e| e.kind).collect(),
            CycleOutcome::Superseded { .. } => panic!("unexpected superseded outcome"),
        }
    }

    #[test]
    fn test_sequence_is_monotonic() {
        let mut seq = SnapshotSequence::new();
        let a = seq.next();
        let b = seq.next();
        assert_eq!(a, SnapshotId::new(1));
        assert!(b > a);
    }

    #[test]
    fn test_repeat_evaluation_is_idempotent() {
        let mut cycle = cycle();
        let id = cycle.begin_fetch();
        let outcome = cycle.complete_fetch(id, &reading(38.0, 10.0, "clear sky"));

        assert_eq!(admitted_kinds(&outcome), vec![AlertKind::Heatwave]);
        assert!(cycle.reevaluate().is_empty());
        assert!(cycle.reevaluate().is_empty());
    }

    #[test]
    fn test_identical_values_new_fetch_readmits() {
        let mut cycle = cycle();
        let first = cycle.begin_fetch();
        cycle.complete_fetch(first, &reading(38.0, 10.0, "clear sky"));

        let second = cycle.begin_fetch();
        let outcome = cycle.complete_fetch(second, &reading(38.0, 10.0, "clear sky"));

        assert_ne!(first, second);
        assert_eq!(admitted_kinds(&outcome), vec![AlertKind::Heatwave]);
    }

    #[test]
    fn test_superseded_fetch_discarded() {
        let mut cycle = cycle();
        let slow = cycle.begin_fetch();
        let fast = cycle.begin_fetch();

        let outcome = cycle.complete_fetch(fast, &reading(20.0, 45.0, "heavy rain"));
        assert_eq!(admitted_kinds(&outcome), vec![AlertKind::HighWind, AlertKind::HeavyRain]);

        let late = cycle.complete_fetch(slow, &reading(38.0, 10.0, "clear sky"));
        assert_eq!(late, CycleOutcome::Superseded { snapshot_id: slow });
        assert_eq!(cycle.current_snapshot().map(|s| s.id()), Some(fast));
    }

    #[test]
    fn test_threshold_change_surfaces_new_kind_once() {
        let mut cycle = cycle();
        let id = cycle.begin_fetch();
        let outcome = cycle.complete_fetch(id, &reading(33.0, 10.0, "clear sky"));
        assert!(admitted_kinds(&outcome).is_empty());

        cycle.thresholds_mut().set_heat(30.0).unwrap();
        let admitted = cycle.reevaluate();
        assert_eq!(admitted.len(), 1);
        assert_eq!(admitted[0].kind, AlertKind::Heatwave);
        assert!(cycle.reevaluate().is_empty());
    }

    #[test]
    fn test_reevaluate_before_any_snapshot() {
        let mut cycle = cycle();
        assert!(cycle.reevaluate().is_empty());

        cycle.begin_fetch();
        assert!(cycle.reevaluate().is_empty());
        assert_eq!(cycle.thresholds().get(), ThresholdSet::default());
    }
}
