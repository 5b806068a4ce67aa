//! Notification service for surfacing weather alerts in-app
//!
//! Turns admitted alert events into user-facing notifications and keeps a
//! bounded feed of the most recent ones.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::{AlertEvent, AlertKind, SnapshotId};
use uuid::Uuid;

/// In-app notification
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub kind: AlertKind,
    pub snapshot_id: SnapshotId,
    pub title: String,
    pub message: String,
    /// How long the client should show the toast
    pub duration_ms: u32,
    pub created_at: DateTime<Utc>,
}

/// Bounded in-memory notification feed, newest first
#[derive(Clone)]
pub struct NotificationService {
    feed: Arc<Mutex<VecDeque<Notification>>>,
    capacity: usize,
}

impl NotificationService {
    pub fn new(capacity: usize) -> Self {
        Self {
            feed: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity: capacity.max(1),
        }
    }

    /// Render and record notifications for newly admitted alerts
    pub fn publish(&self, events: &[AlertEvent]) -> Vec<Notification> {
        let notifications: Vec<Notification> = events.iter().map(create_weather_alert_notification).collect();

        let mut feed = self.lock();
        for notification in &notifications {
            tracing::info!(
                kind = ?notification.kind,
                snapshot_id = %notification.snapshot_id,
                "{}",
                notification.title
            );
            feed.push_front(notification.clone());
        }
        feed.truncate(self.capacity);

        notifications
    }

    /// Most recent notifications, newest first
    pub fn list(&self, limit: Option<usize>) -> Vec<Notification> {
        let feed = self.lock();
        feed.iter().take(limit.unwrap_or(self.capacity)).cloned().collect()
    }

    /// Drop every notification, returning how many were removed
    pub fn clear(&self) -> usize {
        let mut feed = self.lock();
        let removed = feed.len();
        feed.clear();
        removed
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Notification>> {
        // The feed holds plain data, so a poisoned lock is still usable
        self.feed.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

// ============================================================================
// Notification Builders
// ============================================================================

/// Create a notification for one weather alert
pub fn create_weather_alert_notification(event: &AlertEvent) -> Notification {
    let measured = event.payload.map(|p| p.measured_value).unwrap_or_default();
    let (title, message) = match event.kind {
        AlertKind::HighWind => (
            "High Wind Alert".to_string(),
            format!(
                "Strong winds of {:.0} km/h detected. This may cause damage to tall crops or lightweight structures.",
                measured
            ),
        ),
        AlertKind::Heatwave => (
            "Heatwave Alert".to_string(),
            format!(
                "Extreme heat of {:.0}°C expected. Ensure crops are well-irrigated to prevent heat stress.",
                measured
            ),
        ),
        AlertKind::ColdSnap => (
            "Cold Snap Alert".to_string(),
            format!(
                "Low temperatures of {:.0}°C detected. Protect sensitive crops from potential frost damage.",
                measured
            ),
        ),
        AlertKind::HeavyRain => (
            "Heavy Rain Warning".to_string(),
            "Heavy rainfall is occurring. Be aware of potential for waterlogging in fields and plan drainage accordingly."
                .to_string(),
        ),
    };

    Notification {
        id: Uuid::new_v4(),
        kind: event.kind,
        snapshot_id: event.snapshot_id,
        title,
        message,
        duration_ms: 8000,
        created_at: Utc::now(),
    }
}
