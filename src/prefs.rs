//! Persisted playback settings: volume and active playlist index.
//!
//! Settings live in a key-value store with string values ("volume" as a
//! decimal string, "index" as an integer string), mirroring the flat
//! browser-store shape hosts expect. A JSON-file-backed store ships for the
//! desktop shell; embedders can supply their own.
//!
//! Missing keys mean "use default" (volume 1.0, index 0). A value that does
//! not parse also falls back to the default: a corrupt settings file must
//! never crash startup.

use anyhow::{Context, Result};
use log::warn;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const KEY_VOLUME: &str = "volume";
pub const KEY_INDEX: &str = "index";

const DEFAULT_VOLUME: f32 = 1.0;
const DEFAULT_INDEX: usize = 0;

/// Key-value settings store. Writes are expected to persist promptly; the
/// transport saves on every volume/index mutation.
pub trait SettingsStore: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// Load the persisted volume, defaulting on absence or parse failure.
pub fn load_volume(store: &dyn SettingsStore) -> f32 {
    match store.get(KEY_VOLUME).map(|v| v.parse::<f32>()) {
        Some(Ok(v)) => v.clamp(0.0, 1.0),
        Some(Err(_)) => {
            warn!("Persisted volume is not a number, using default");
            DEFAULT_VOLUME
        }
        None => DEFAULT_VOLUME,
    }
}

/// Load the persisted playlist index, defaulting on absence or parse failure.
/// Range validation against the playlist length is the transport's job.
pub fn load_index(store: &dyn SettingsStore) -> usize {
    match store.get(KEY_INDEX).map(|v| v.parse::<usize>()) {
        Some(Ok(i)) => i,
        Some(Err(_)) => {
            warn!("Persisted index is not an integer, using default");
            DEFAULT_INDEX
        }
        None => DEFAULT_INDEX,
    }
}

/// In-memory store for tests and embedders without persistence.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// JSON-file-backed store: a flat string map, saved on every set.
///
/// Unknown keys round-trip untouched, so older builds can read files
/// written by newer ones.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open or create the store at `path`. A present-but-corrupt file is
    /// logged and treated as empty.
    pub fn open(path: &Path) -> Result<Self> {
        let values = match std::fs::read_to_string(path) {
            Ok(body) => match serde_json::from_str::<BTreeMap<String, String>>(&body) {
                Ok(map) => map,
                Err(e) => {
                    warn!("Settings file {} unreadable ({}), starting fresh", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };
        Ok(Self { path: path.to_path_buf(), values })
    }

    fn save(&self) -> Result<()> {
        let body = serde_json::to_string_pretty(&self.values)?;
        // Write-then-rename so a crash mid-save never truncates the file
        let tmp = self.path.with_extension(format!("tmp-{}", uuid::Uuid::new_v4()));
        std::fs::write(&tmp, body)
            .with_context(|| format!("write settings {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("replace settings {}", self.path.display()))?;
        Ok(())
    }
}

impl SettingsStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
        if let Err(e) = self.save() {
            warn!("Settings save failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_yield_defaults() {
        let store = MemoryStore::new();
        assert_eq!(load_volume(&store), 1.0);
        assert_eq!(load_index(&store), 0);
    }

    #[test]
    fn test_parse_failure_yields_defaults() {
        let mut store = MemoryStore::new();
        store.set(KEY_VOLUME, "loud");
        store.set(KEY_INDEX, "-3");
        assert_eq!(load_volume(&store), 1.0);
        assert_eq!(load_index(&store), 0);
    }

    #[test]
    fn test_round_trip_values() {
        let mut store = MemoryStore::new();
        store.set(KEY_VOLUME, "0.4");
        store.set(KEY_INDEX, "2");
        assert_eq!(load_volume(&store), 0.4);
        assert_eq!(load_index(&store), 2);
    }

    #[test]
    fn test_volume_clamped_to_unit_range() {
        let mut store = MemoryStore::new();
        store.set(KEY_VOLUME, "3.5");
        assert_eq!(load_volume(&store), 1.0);
    }

    #[test]
    fn test_json_store_persists_and_tolerates_corruption() {
        let dir = std::env::temp_dir().join(format!("vidget-prefs-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("vidget.json");

        {
            let mut store = JsonFileStore::open(&path).unwrap();
            store.set(KEY_VOLUME, "0.6");
        }
        {
            let store = JsonFileStore::open(&path).unwrap();
            assert_eq!(load_volume(&store), 0.6);
        }

        std::fs::write(&path, "{not json").unwrap();
        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(load_volume(&store), 1.0);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unknown_keys_survive_saves() {
        let dir = std::env::temp_dir().join(format!("vidget-prefs-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("vidget.json");
        std::fs::write(&path, r#"{"future_key": "kept"}"#).unwrap();

        let mut store = JsonFileStore::open(&path).unwrap();
        store.set(KEY_INDEX, "1");

        let reread = JsonFileStore::open(&path).unwrap();
        assert_eq!(reread.get("future_key").as_deref(), Some("kept"));
        assert_eq!(reread.get(KEY_INDEX).as_deref(), Some("1"));
        std::fs::remove_dir_all(&dir).ok();
    }
}
