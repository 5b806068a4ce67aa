//! JSON file key-value store for persisting alert thresholds
//!
//! The whole store is one JSON object (`{"windThreshold": 40, ...}`). Every
//! write replaces the file through a temp file and rename.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use shared::{KeyValueStore, StoreError};

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, Value>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing or unreadable file is an empty
    /// store; a malformed one is moved aside and the store starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Stored thresholds are malformed, using defaults");
                    quarantine(&path);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "No stored thresholds, starting with defaults");
                BTreeMap::new()
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read stored thresholds, using defaults");
                BTreeMap::new()
            }
        };
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&self.entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Keep a malformed file next to the store for inspection
fn quarantine(path: &Path) {
    let aside = path.with_extension("json.corrupt");
    match fs::rename(path, &aside) {
        Ok(()) => tracing::warn!(moved_to = %aside.display(), "Moved malformed thresholds file aside"),
        Err(e) => tracing::warn!(error = %e, "Failed to move malformed thresholds file aside"),
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).map(Value::to_string))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let value: Value = serde_json::from_str(value)?;
        let previous = self.entries.insert(key.to_string(), value);
        if let Err(e) = self.persist() {
            match previous {
                Some(old) => self.entries.insert(key.to_string(), old),
                None => self.entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{ThresholdSet, ThresholdStore};

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("thresholds.json"));
        assert_eq!(store.get("windThreshold").unwrap(), None);
    }

    #[test]
    fn test_set_writes_json_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("thresholds.json");
        let mut store = JsonFileStore::open(&path);
        store.set("windThreshold", "40.0").unwrap();

        let contents: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(contents["windThreshold"], serde_json::json!(40.0));
    }

    #[test]
    fn test_thresholds_survive_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("thresholds.json");

        let mut thresholds = ThresholdStore::load(JsonFileStore::open(&path));
        thresholds.set_wind(55.0).unwrap();
        thresholds.set_cold(-2.0).unwrap();
        drop(thresholds);

        let reloaded = ThresholdStore::load(JsonFileStore::open(&path));
        assert_eq!(
            reloaded.get(),
            ThresholdSet {
                wind_kph: 55.0,
                heat_c: 35.0,
                cold_c: -2.0,
            }
        );
    }

    #[test]
    fn test_reads_values_written_by_browser() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("thresholds.json");
        fs::write(&path, r#"{"heatThreshold": 41}"#).unwrap();

        let thresholds = ThresholdStore::load(JsonFileStore::open(&path));
        assert_eq!(thresholds.get().heat_c, 41.0);
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("thresholds.json");

        for contents in ["not json", "[30, 35, 5]", "42"] {
            fs::write(&path, contents).unwrap();

            let thresholds = ThresholdStore::load(JsonFileStore::open(&path));
            assert_eq!(thresholds.get(), ThresholdSet::default());
            assert!(!path.exists());
            assert_eq!(
                fs::read_to_string(path.with_extension("json.corrupt")).unwrap(),
                contents
            );
        }
    }

    #[test]
    fn test_writes_after_malformed_file_replace_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("thresholds.json");
        fs::write(&path, "{\"windThreshold\": ").unwrap();

        let mut thresholds = ThresholdStore::load(JsonFileStore::open(&path));
        thresholds.set_wind(25.0).unwrap();

        let reloaded = ThresholdStore::load(JsonFileStore::open(&path));
        assert_eq!(reloaded.get().wind_kph, 25.0);
    }
}
