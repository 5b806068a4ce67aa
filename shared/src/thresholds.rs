//! Threshold store
//!
//! Holds the three user-adjustable alert thresholds and persists each
//! successful write to a key-value store under its logical key
//! (`windThreshold`, `heatThreshold`, `coldThreshold`) as a JSON number.
//!
//! Out-of-domain writes are rejected with [`ThresholdError::InvalidThreshold`];
//! nothing is clamped.

use std::collections::HashMap;

use crate::error::{StoreError, ThresholdError};
use crate::models::{ThresholdKind, ThresholdSet, ThresholdUpdate};
use crate::validation::validate_threshold;

/// String key-value persistence used for thresholds
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory key-value store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// User thresholds backed by a key-value store
#[derive(Debug)]
pub struct ThresholdStore<S> {
    store: S,
    current: ThresholdSet,
}

impl<S: KeyValueStore> ThresholdStore<S> {
    /// Load thresholds from `store`, falling back to the default for any key
    /// that is missing, unreadable or out of domain
    pub fn load(store: S) -> Self {
        let mut current = ThresholdSet::default();
        for kind in ThresholdKind::ALL {
            if let Some(value) = read_stored(&store, kind) {
                current.set_value(kind, value);
            }
        }
        tracing::debug!(?current, "Loaded alert thresholds");
        Self { store, current }
    }

    pub fn get(&self) -> ThresholdSet {
        self.current
    }

    pub fn set_wind(&mut self, value: f64) -> Result<(), ThresholdError> {
        self.set(ThresholdKind::Wind, value)
    }

    pub fn set_heat(&mut self, value: f64) -> Result<(), ThresholdError> {
        self.set(ThresholdKind::Heat, value)
    }

    pub fn set_cold(&mut self, value: f64) -> Result<(), ThresholdError> {
        self.set(ThresholdKind::Cold, value)
    }

    /// Validate and persist one threshold. The in-memory value only changes
    /// once the write has been persisted.
    pub fn set(&mut self, kind: ThresholdKind, value: f64) -> Result<(), ThresholdError> {
        if validate_threshold(kind, value).is_err() {
            tracing::warn!(%kind, value, "Rejected out-of-domain threshold");
            return Err(ThresholdError::invalid(kind, value));
        }

        let encoded = serde_json::to_string(&value).map_err(StoreError::from)?;
        self.store.set(kind.storage_key(), &encoded)?;
        self.current.set_value(kind, value);

        tracing::info!(%kind, value, "Threshold updated");
        Ok(())
    }

    /// Apply a partial update. Every supplied value is validated before any
    /// of them is written.
    pub fn update(&mut self, update: &ThresholdUpdate) -> Result<ThresholdSet, ThresholdError> {
        let entries = update.entries();
        if let Some((kind, value)) = entries.iter().find(|(kind, value)| !kind.contains(*value)) {
            return Err(ThresholdError::invalid(*kind, *value));
        }
        for (kind, value) in entries {
            self.set(kind, value)?;
        }
        Ok(self.current)
    }

    /// Restore and persist the defaults
    pub fn reset(&mut self) -> Result<ThresholdSet, ThresholdError> {
        for kind in ThresholdKind::ALL {
            self.set(kind, kind.default_value())?;
        }
        Ok(self.current)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

fn read_stored<S: KeyValueStore>(store: &S, kind: ThresholdKind) -> Option<f64> {
    let raw = match store.get(kind.storage_key()) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(%kind, error = %e, "Failed to read stored threshold, using default");
            return None;
        }
    };

    match serde_json::from_str::<f64>(&raw) {
        Ok(value) if kind.contains(value) => Some(value),
        Ok(value) => {
            tracing::warn!(%kind, value, "Stored threshold out of domain, using default");
            None
        }
        Err(e) => {
            tracing::warn!(%kind, raw = %raw, error = %e, "Stored threshold is not a number, using default");
            None
        }
    }
}
