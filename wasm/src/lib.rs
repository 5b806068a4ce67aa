//! WebAssembly module for Farming Master
//!
//! Runs the weather alert cycle in the browser:
//! - Thresholds persisted to `localStorage`
//! - Snapshot-scoped alert de-duplication
//! - Stateless rule evaluation for previews

use shared::{
    evaluate, AlertCycle, KeyValueStore, MemoryStore, SnapshotId, StoreError, ThresholdSet, ThresholdStore,
    WeatherReading, WeatherSnapshot,
};
use wasm_bindgen::prelude::*;

/// Threshold persistence available to the page
pub enum BrowserStore {
    Local(web_sys::Storage),
    /// Used when `localStorage` is blocked; thresholds last for the page only
    Memory(MemoryStore),
}

impl BrowserStore {
    /// `localStorage` if the page may use it, otherwise an in-memory store
    pub fn detect() -> Self {
        match web_sys::window().map(|w| w.local_storage()) {
            Some(Ok(Some(storage))) => BrowserStore::Local(storage),
            _ => {
                web_sys::console::warn_1(&"localStorage unavailable, thresholds will not persist".into());
                BrowserStore::Memory(MemoryStore::new())
            }
        }
    }
}

fn storage_error(err: JsValue) -> StoreError {
    StoreError::Unavailable(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self {
            BrowserStore::Local(storage) => storage.get_item(key).map_err(storage_error),
            BrowserStore::Memory(store) => store.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        match self {
            BrowserStore::Local(storage) => storage.set_item(key, value).map_err(storage_error),
            BrowserStore::Memory(store) => store.set(key, value),
        }
    }
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Alert cycle for one page session
#[wasm_bindgen]
pub struct AlertEngine {
    cycle: AlertCycle<BrowserStore>,
}

#[wasm_bindgen]
impl AlertEngine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> AlertEngine {
        AlertEngine::with_store(BrowserStore::detect())
    }

    /// Current thresholds as JSON
    pub fn thresholds(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.cycle.thresholds().get()).map_err(js_error)
    }

    pub fn set_wind(&mut self, value: f64) -> Result<(), JsValue> {
        self.cycle.thresholds_mut().set_wind(value).map_err(js_error)
    }

    pub fn set_heat(&mut self, value: f64) -> Result<(), JsValue> {
        self.cycle.thresholds_mut().set_heat(value).map_err(js_error)
    }

    pub fn set_cold(&mut self, value: f64) -> Result<(), JsValue> {
        self.cycle.thresholds_mut().set_cold(value).map_err(js_error)
    }

    /// Start a weather fetch, returning the id to complete it with
    pub fn begin_fetch(&mut self) -> u64 {
        self.cycle.begin_fetch().value()
    }

    /// Complete a fetch with the reading JSON; returns the cycle outcome JSON
    pub fn complete_fetch(&mut self, snapshot_id: u64, reading_json: &str) -> Result<String, JsValue> {
        let reading: WeatherReading = serde_json::from_str(reading_json).map_err(js_error)?;
        let outcome = self.cycle.complete_fetch(SnapshotId::new(snapshot_id), &reading);
        serde_json::to_string(&outcome).map_err(js_error)
    }

    /// Re-run the rules after a threshold change; returns newly admitted alerts
    pub fn reevaluate(&mut self) -> Result<String, JsValue> {
        serde_json::to_string(&self.cycle.reevaluate()).map_err(js_error)
    }
}

impl AlertEngine {
    pub fn with_store(store: BrowserStore) -> AlertEngine {
        AlertEngine {
            cycle: AlertCycle::new(ThresholdStore::load(store)),
        }
    }
}

impl Default for AlertEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Evaluate a snapshot against thresholds without de-duplication.
/// Thresholds outside their domains are rejected.
#[wasm_bindgen]
pub fn evaluate_weather(snapshot_json: &str, thresholds_json: &str) -> Result<String, JsValue> {
    evaluate_json(snapshot_json, thresholds_json).map_err(js_error)
}

fn evaluate_json(snapshot_json: &str, thresholds_json: &str) -> Result<String, serde_json::Error> {
    let snapshot: WeatherSnapshot = serde_json::from_str(snapshot_json)?;
    let thresholds: ThresholdSet = serde_json::from_str(thresholds_json)?;
    serde_json::to_string(&evaluate(&snapshot, &thresholds))
}
