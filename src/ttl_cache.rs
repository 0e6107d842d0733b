use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const CACHE_VERSION: u32 = 1;
const CACHE_DIR: &str = "sportsdb_terminal";
const CACHE_FILE: &str = "store.json";

/// File-backed key-value store with wall-clock expiry, the persisted layer
/// behind the in-memory caches. Entries expire by comparing a stored expiry
/// timestamp against now; a malformed payload counts as a miss and is
/// removed. When no usable cache path exists every operation degrades to a
/// no-op instead of erroring.
#[derive(Debug)]
pub struct TtlCache {
    path: Option<PathBuf>,
    file: StoreFile,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct StoreFile {
    version: u32,
    entries: HashMap<String, StoredEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredEntry {
    data: serde_json::Value,
    expiry: u64,
}

impl TtlCache {
    /// Opens the store at the default XDG cache location.
    pub fn open_default() -> Self {
        Self::open(cache_path())
    }

    pub fn open(path: Option<PathBuf>) -> Self {
        let file = path
            .as_ref()
            .map(|p| load_store_file(p))
            .unwrap_or_default();
        Self { path, file }
    }

    pub fn set<T: Serialize>(&mut self, key: &str, value: &T, ttl: Duration) {
        let Ok(data) = serde_json::to_value(value) else {
            return;
        };
        let expiry = now_millis().saturating_add(ttl.as_millis() as u64);
        self.file.version = CACHE_VERSION;
        self.file
            .entries
            .insert(key.to_string(), StoredEntry { data, expiry });
        self.save();
    }

    /// Returns the stored value, or `None` for a miss. Expired and
    /// malformed entries are removed on the way out.
    pub fn get<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        let entry = self.file.entries.get(key)?;
        if now_millis() > entry.expiry {
            self.file.entries.remove(key);
            self.save();
            return None;
        }
        match serde_json::from_value(entry.data.clone()) {
            Ok(value) => Some(value),
            Err(_) => {
                self.file.entries.remove(key);
                self.save();
                None
            }
        }
    }

    pub fn remove(&mut self, key: &str) {
        if self.file.entries.remove(key).is_some() {
            self.save();
        }
    }

    pub fn clear_expired(&mut self) {
        let now = now_millis();
        let before = self.file.entries.len();
        self.file.entries.retain(|_, entry| entry.expiry >= now);
        if self.file.entries.len() != before {
            self.save();
        }
    }

    pub fn len(&self) -> usize {
        self.file.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.file.entries.is_empty()
    }

    fn save(&self) {
        let Some(path) = self.path.as_ref() else {
            return;
        };
        let Some(dir) = path.parent() else {
            return;
        };
        let _ = fs::create_dir_all(dir);
        let Ok(json) = serde_json::to_string(&self.file) else {
            return;
        };
        let tmp = path.with_extension("json.tmp");
        if fs::write(&tmp, json).is_ok() {
            let _ = fs::rename(&tmp, path);
        }
    }
}

fn load_store_file(path: &PathBuf) -> StoreFile {
    let Ok(raw) = fs::read_to_string(path) else {
        return StoreFile::default();
    };
    let file = serde_json::from_str::<StoreFile>(&raw).unwrap_or_default();
    if file.version != CACHE_VERSION {
        return StoreFile::default();
    }
    file
}

fn cache_path() -> Option<PathBuf> {
    // Prefer XDG cache, fall back to ~/.cache.
    if let Ok(base) = std::env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(CACHE_DIR).join(CACHE_FILE));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".cache")
            .join(CACHE_DIR)
            .join(CACHE_FILE),
    )
}

pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(dir: &tempfile::TempDir) -> TtlCache {
        TtlCache::open(Some(dir.path().join("store.json")))
    }

    #[test]
    fn set_get_round_trip_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = temp_store(&dir);
        cache.set("k", &vec!["a".to_string(), "b".to_string()], Duration::from_secs(60));
        assert_eq!(
            cache.get::<Vec<String>>("k"),
            Some(vec!["a".to_string(), "b".to_string()])
        );

        let mut reopened = temp_store(&dir);
        assert_eq!(
            reopened.get::<Vec<String>>("k"),
            Some(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn expired_entries_miss_and_are_removed() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = temp_store(&dir);
        cache.set("k", &1u32, Duration::from_millis(0));
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(cache.get::<u32>("k"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn malformed_payload_is_a_miss_and_gets_removed() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = temp_store(&dir);
        cache.set("k", &"not a number", Duration::from_secs(60));
        assert_eq!(cache.get::<u32>("k"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn remove_and_clear_expired() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = temp_store(&dir);
        cache.set("keep", &1u32, Duration::from_secs(60));
        cache.set("drop", &2u32, Duration::from_millis(0));
        cache.set("gone", &3u32, Duration::from_secs(60));
        cache.remove("gone");
        std::thread::sleep(Duration::from_millis(5));
        cache.clear_expired();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get::<u32>("keep"), Some(1));
    }

    #[test]
    fn missing_path_degrades_to_noop() {
        let mut cache = TtlCache::open(None);
        cache.set("k", &1u32, Duration::from_secs(60));
        assert_eq!(cache.get::<u32>("k"), Some(1));
        cache.remove("k");
        assert!(cache.is_empty());
    }

    #[test]
    fn corrupt_store_file_resets_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{ not json").unwrap();
        let cache = TtlCache::open(Some(path));
        assert!(cache.is_empty());
    }
}
