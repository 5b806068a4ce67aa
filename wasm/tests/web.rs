//! Browser tests for threshold persistence in `localStorage`

use farming_master_wasm::{AlertEngine, BrowserStore};
use shared::KeyValueStore;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn thresholds_survive_new_engine() {
    let mut engine = AlertEngine::new();
    engine.set_heat(44.0).unwrap();

    let store = BrowserStore::detect();
    assert_eq!(store.get("heatThreshold").unwrap().as_deref(), Some("44.0"));

    let reloaded = AlertEngine::new();
    assert!(reloaded.thresholds().unwrap().contains("\"heat_c\":44.0"));
}

#[wasm_bindgen_test]
fn out_of_range_threshold_rejected() {
    let mut engine = AlertEngine::new();
    assert!(engine.set_wind(120.0).is_err());
}
