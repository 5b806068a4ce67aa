//! Weather service driving the alert cycle
//!
//! Each refresh stamps a new snapshot id, fetches current conditions, and
//! evaluates the alert rules once the reading arrives. A refresh that
//! completes after a newer one has started is discarded.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc, Weekday};
use serde::Serialize;
use shared::{
    AlertCycle, AlertEvent, CycleOutcome, ForecastCondition, ForecastDay, GpsCoordinates, SnapshotId,
    ThresholdError, ThresholdSet, ThresholdStore, ThresholdUpdate, WeatherSnapshot,
};
use tokio::sync::Mutex;

use crate::error::{AppError, AppResult};
use crate::external::{GeocodingClient, WeatherFetcher};
use crate::services::notification::{Notification, NotificationService};
use crate::storage::JsonFileStore;

const UNKNOWN_LOCATION: &str = "Unknown Location";

/// Result of a completed weather refresh
#[derive(Debug, Clone, Serialize)]
pub struct WeatherUpdate {
    pub snapshot: WeatherSnapshot,
    pub location: String,
    pub humidity_percent: Option<i32>,
    pub condition_code: Option<String>,
    pub alerts: Vec<AlertEvent>,
    pub notifications: Vec<Notification>,
}

/// Alerts raised by re-running the rules on the current snapshot
#[derive(Debug, Clone, Serialize)]
pub struct Reevaluation {
    pub snapshot_id: Option<SnapshotId>,
    pub alerts: Vec<AlertEvent>,
    pub notifications: Vec<Notification>,
}

#[derive(Clone)]
pub struct WeatherService {
    fetcher: Arc<dyn WeatherFetcher>,
    geocoder: Option<GeocodingClient>,
    cycle: Arc<Mutex<AlertCycle<JsonFileStore>>>,
    notifications: NotificationService,
}

impl WeatherService {
    pub fn new(
        fetcher: Arc<dyn WeatherFetcher>,
        geocoder: Option<GeocodingClient>,
        thresholds: ThresholdStore<JsonFileStore>,
        notifications: NotificationService,
    ) -> Self {
        Self {
            fetcher,
            geocoder,
            cycle: Arc::new(Mutex::new(AlertCycle::new(thresholds))),
            notifications,
        }
    }

    /// Fetch current conditions and raise alerts for them
    pub async fn refresh(&self, coords: GpsCoordinates) -> AppResult<WeatherUpdate> {
        let snapshot_id = self.cycle.lock().await.begin_fetch();
        tracing::debug!(%snapshot_id, %coords, "Fetching current weather");

        let reading = match self.fetcher.fetch_current(&coords).await {
            Ok(reading) => reading,
            Err(e) => {
                tracing::error!(%snapshot_id, error = %e, "Weather fetch failed");
                return Err(e.into());
            }
        };

        let outcome = self.cycle.lock().await.complete_fetch(snapshot_id, &reading);
        let (snapshot, alerts) = match outcome {
            CycleOutcome::Evaluated { snapshot, admitted } => (snapshot, admitted),
            CycleOutcome::Superseded { .. } => return Err(AppError::SupersededFetch),
        };

        let notifications = self.notifications.publish(&alerts);

        let geocoded = match &self.geocoder {
            Some(geocoder) => geocoder.city_name(&coords).await,
            None => None,
        };
        let location = geocoded
            .or_else(|| reading.location_name.clone())
            .unwrap_or_else(|| UNKNOWN_LOCATION.to_string());

        Ok(WeatherUpdate {
            snapshot,
            location,
            humidity_percent: reading.humidity_percent,
            condition_code: reading.condition_code,
            alerts,
            notifications,
        })
    }

    /// Run the rules again against the current snapshot
    pub async fn reevaluate(&self) -> Reevaluation {
        let mut cycle = self.cycle.lock().await;
        let alerts = cycle.reevaluate();
        let snapshot_id = cycle.current_snapshot().map(WeatherSnapshot::id);
        drop(cycle);

        let notifications = self.notifications.publish(&alerts);
        Reevaluation {
            snapshot_id,
            alerts,
            notifications,
        }
    }

    /// 7-day forecast, or a placeholder week when the provider fails
    pub async fn forecast(&self, coords: GpsCoordinates) -> Vec<ForecastDay> {
        match self.fetcher.fetch_forecast(&coords).await {
            Ok(days) => days,
            Err(e) => {
                tracing::error!(%coords, error = %e, "Forecast fetch failed, serving placeholder forecast");
                placeholder_forecast(Utc::now().date_naive())
            }
        }
    }

    pub async fn current_snapshot(&self) -> Option<WeatherSnapshot> {
        self.cycle.lock().await.current_snapshot().cloned()
    }

    pub async fn armed_snapshot(&self) -> Option<SnapshotId> {
        self.cycle.lock().await.guard().armed_snapshot()
    }

    pub async fn thresholds(&self) -> ThresholdSet {
        self.cycle.lock().await.thresholds().get()
    }

    /// Apply a threshold change; later evaluations see the new values
    pub async fn update_thresholds(&self, update: &ThresholdUpdate) -> AppResult<ThresholdSet> {
        let update = update.clone();
        let thresholds = self
            .with_thresholds_blocking(move |thresholds| thresholds.update(&update))
            .await?;
        tracing::info!(?thresholds, "Alert thresholds updated");
        Ok(thresholds)
    }

    pub async fn reset_thresholds(&self) -> AppResult<ThresholdSet> {
        let thresholds = self.with_thresholds_blocking(|thresholds| thresholds.reset()).await?;
        tracing::info!(?thresholds, "Alert thresholds reset to defaults");
        Ok(thresholds)
    }

    /// Run a threshold write on the blocking pool; the file store writes
    /// synchronously. The cycle stays locked until the write finishes.
    async fn with_thresholds_blocking<F>(&self, write: F) -> AppResult<ThresholdSet>
    where
        F: FnOnce(&mut ThresholdStore<JsonFileStore>) -> Result<ThresholdSet, ThresholdError> + Send + 'static,
    {
        let mut cycle = self.cycle.clone().lock_owned().await;
        let result = tokio::task::spawn_blocking(move || write(cycle.thresholds_mut()))
            .await
            .map_err(|e| AppError::Internal(format!("Threshold write task failed: {e}")))?;
        Ok(result?)
    }
}

/// Fixed week starting on the Monday of `today`'s week
fn placeholder_forecast(today: NaiveDate) -> Vec<ForecastDay> {
    use ForecastCondition::*;

    let monday = today.week(Weekday::Mon).first_day();
    [
        ("Mon", 26, Sunny),
        ("Tue", 27, Sunny),
        ("Wed", 25, Cloudy),
        ("Thu", 24, Rainy),
        ("Fri", 24, Rainy),
        ("Sat", 26, Cloudy),
        ("Sun", 27, Sunny),
    ]
    .into_iter()
    .enumerate()
    .map(|(offset, (day, temp_c, condition))| ForecastDay {
        date: monday + Duration::days(offset as i64),
        day: day.to_string(),
        temp_c,
        condition,
    })
    .collect()
}
