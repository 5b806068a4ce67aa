//! Weather alert event models

use serde::{Deserialize, Serialize};

use super::weather::SnapshotId;

/// Types of weather alerts, in evaluation order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    HighWind,
    Heatwave,
    ColdSnap,
    HeavyRain,
}

impl AlertKind {
    pub const ALL: [AlertKind; 4] = [
        AlertKind::HighWind,
        AlertKind::Heatwave,
        AlertKind::ColdSnap,
        AlertKind::HeavyRain,
    ];
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertKind::HighWind => write!(f, "High Wind"),
            AlertKind::Heatwave => write!(f, "Heatwave"),
            AlertKind::ColdSnap => write!(f, "Cold Snap"),
            AlertKind::HeavyRain => write!(f, "Heavy Rain"),
        }
    }
}

/// Measured value against the threshold it crossed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AlertPayload {
    pub measured_value: f64,
    pub threshold_value: f64,
}

/// An alert produced for one snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlertEvent {
    pub kind: AlertKind,
    pub snapshot_id: SnapshotId,
    /// `None` for [`AlertKind::HeavyRain`]
    pub payload: Option<AlertPayload>,
}

impl AlertEvent {
    pub fn threshold(kind: AlertKind, snapshot_id: SnapshotId, measured_value: f64, threshold_value: f64) -> Self {
        Self {
            kind,
            snapshot_id,
            payload: Some(AlertPayload {
                measured_value,
                threshold_value,
            }),
        }
    }

    pub fn heavy_rain(snapshot_id: SnapshotId) -> Self {
        Self {
            kind: AlertKind::HeavyRain,
            snapshot_id,
            payload: None,
        }
    }

    /// De-duplication key
    pub fn key(&self) -> (SnapshotId, AlertKind) {
        (self.snapshot_id, self.kind)
    }
}
