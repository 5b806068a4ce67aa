//! Alert dispatch de-duplication
//!
//! Ensures each `(snapshot, kind)` pair is surfaced at most once, however many
//! times the same snapshot is evaluated.

use std::collections::HashSet;

use crate::models::{AlertEvent, AlertKind, SnapshotId};

/// Guard state
#[derive(Debug, Clone, Default, PartialEq)]
pub enum GuardState {
    /// No snapshot armed yet
    #[default]
    Idle,
    /// Admitting alerts for `snapshot_id`
    Armed {
        snapshot_id: SnapshotId,
        notified: HashSet<AlertKind>,
    },
}

/// Dispatch guard
///
/// `reset_for_new_snapshot` must be called once per fetch before the first
/// `admit` for that snapshot. Events for any other snapshot id, or arriving
/// while idle, are dropped as stale.
#[derive(Debug, Clone, Default)]
pub struct DispatchGuard {
    state: GuardState,
}

impl DispatchGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm for `snapshot_id`, forgetting everything notified before
    pub fn reset_for_new_snapshot(&mut self, snapshot_id: SnapshotId) {
        if let GuardState::Armed { snapshot_id: previous, .. } = &self.state {
            tracing::debug!(%previous, next = %snapshot_id, "Dispatch guard superseded");
        }
        self.state = GuardState::Armed {
            snapshot_id,
            notified: HashSet::new(),
        };
    }

    /// Return the events not yet surfaced for the armed snapshot, recording
    /// them as notified. Input order is preserved.
    pub fn admit(&mut self, events: impl IntoIterator<Item = AlertEvent>) -> Vec<AlertEvent> {
        let GuardState::Armed { snapshot_id, notified } = &mut self.state else {
            let dropped = events.into_iter().count();
            if dropped > 0 {
                tracing::debug!(dropped, "Dispatch guard idle, dropping alerts");
            }
            return Vec::new();
        };

        let mut admitted = Vec::new();
        for event in events {
            if event.snapshot_id != *snapshot_id {
                tracing::debug!(
                    stale = %event.snapshot_id,
                    armed = %snapshot_id,
                    kind = %event.kind,
                    "Dropping alert for superseded snapshot"
                );
                continue;
            }
            if notified.insert(event.kind) {
                admitted.push(event);
            }
        }
        admitted
    }

    pub fn armed_snapshot(&self) -> Option<SnapshotId> {
        match &self.state {
            GuardState::Idle => None,
            GuardState::Armed { snapshot_id, .. } => Some(*snapshot_id),
        }
    }

    pub fn is_notified(&self, snapshot_id: SnapshotId, kind: AlertKind) -> bool {
        match &self.state {
            GuardState::Armed {
                snapshot_id: armed,
                notified,
            } => *armed == snapshot_id && notified.contains(&kind),
            GuardState::Idle => false,
        }
    }

    pub fn state(&self) -> &GuardState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerting::evaluate;
    use crate::models::{ThresholdSet, WeatherSnapshot};
    use chrono::Utc;
    use proptest::prelude::*;

    fn heat_snapshot(id: u64) -> WeatherSnapshot {
        WeatherSnapshot::new(SnapshotId::new(id), Some(38.0), Some(10.0), "clear sky", Utc::now())
    }

    #[test]
    fn test_second_admit_is_empty() {
        let mut guard = DispatchGuard::new();
        let snapshot = heat_snapshot(1);
        let thresholds = ThresholdSet::default();
        guard.reset_for_new_snapshot(snapshot.id());

        let first = guard.admit(evaluate(&snapshot, &thresholds));
        let second = guard.admit(evaluate(&snapshot, &thresholds));

        assert_eq!(first.len(), 1);
        assert_eq!(first[0].kind, AlertKind::Heatwave);
        assert!(second.is_empty());
        assert!(guard.is_notified(snapshot.id(), AlertKind::Heatwave));
    }

    #[test]
    fn test_new_snapshot_readmits() {
        let mut guard = DispatchGuard::new();
        let thresholds = ThresholdSet::default();

        let first = heat_snapshot(1);
        guard.reset_for_new_snapshot(first.id());
        assert_eq!(guard.admit(evaluate(&first, &thresholds)).len(), 1);

        let second = heat_snapshot(2);
        guard.reset_for_new_snapshot(second.id());
        let admitted = guard.admit(evaluate(&second, &thresholds));

        assert_eq!(admitted.len(), 1);
        assert_eq!(admitted[0].kind, AlertKind::Heatwave);
        assert_eq!(admitted[0].snapshot_id, SnapshotId::new(2));
        assert!(!guard.is_notified(first.id(), AlertKind::Heatwave));
    }

    #[test]
    fn test_idle_guard_admits_nothing() {
        let mut guard = DispatchGuard::new();
        let snapshot = heat_snapshot(1);

        assert!(guard.admit(evaluate(&snapshot, &ThresholdSet::default())).is_empty());
        assert_eq!(guard.armed_snapshot(), None);
        assert_eq!(guard.state(), &GuardState::Idle);
    }

    #[test]
    fn test_stale_snapshot_dropped() {
        let mut guard = DispatchGuard::new();
        let stale = heat_snapshot(1);
        guard.reset_for_new_snapshot(SnapshotId::new(2));

        assert!(guard.admit(evaluate(&stale, &ThresholdSet::default())).is_empty());
        assert_eq!(guard.armed_snapshot(), Some(SnapshotId::new(2)));
    }

    #[test]
    fn test_duplicate_kinds_in_one_batch() {
        let mut guard = DispatchGuard::new();
        let id = SnapshotId::new(5);
        guard.reset_for_new_snapshot(id);

        let admitted = guard.admit(vec![
            AlertEvent::heavy_rain(id),
            AlertEvent::threshold(AlertKind::HighWind, id, 50.0, 30.0),
            AlertEvent::heavy_rain(id),
        ]);

        let kinds: Vec<_> = admitted.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![AlertKind::HeavyRain, AlertKind::HighWind]);
    }

    /// Build an event of any kind for `id`
    fn event_for(id: SnapshotId) -> impl Fn(AlertKind) -> AlertEvent {
        move |kind| match kind {
            AlertKind::HeavyRain => AlertEvent::heavy_rain(id),
            other => AlertEvent::threshold(other, id, 1.0, 0.0),
        }
    }

    fn kinds_strategy() -> impl Strategy<Value = Vec<AlertKind>> {
        prop::collection::vec(prop::sample::select(AlertKind::ALL.to_vec()), 0..12)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: a pair is never admitted twice for one snapshot
        #[test]
        fn prop_never_readmits(batches in prop::collection::vec(kinds_strategy(), 1..6)) {
            let mut guard = DispatchGuard::new();
            let id = SnapshotId::new(9);
            guard.reset_for_new_snapshot(id);

            let mut seen = HashSet::new();
            for batch in batches {
                let events = batch.into_iter().map(event_for(id));
                for event in guard.admit(events) {
                    prop_assert!(seen.insert(event.key()));
                }
            }
        }

        /// Property: after a reset every kind can be admitted again
        #[test]
        fn prop_reset_clears_state(kinds in kinds_strategy(), first in 1u64..1000, gap in 1u64..1000) {
            let mut guard = DispatchGuard::new();
            let id1 = SnapshotId::new(first);
            let id2 = SnapshotId::new(first + gap);

            guard.reset_for_new_snapshot(id1);
            let before = guard.admit(kinds.iter().copied().map(event_for(id1)));

            guard.reset_for_new_snapshot(id2);
            let after = guard.admit(kinds.iter().copied().map(event_for(id2)));

            let before: Vec<_> = before.iter().map(|e| e.kind).collect();
            let after: Vec<_> = after.iter().map(|e| e.kind).collect();
            prop_assert_eq!(before, after);
        }
    }
}
