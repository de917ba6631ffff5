//! # Storage Connection
//!
//! A cheap, clonable handle bundling a [`KeyValueStore`] with the logical
//! keys every repository reads and writes. All repositories built from the
//! same connection share the same substrate.

use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

use super::error::{StorageError, StorageResult};
use super::file::FileStore;
use super::memory_store::MemoryStore;
use super::traits::KeyValueStore;

/// Prefix used when no configuration overrides it
pub const DEFAULT_KEY_PREFIX: &str = "coffee_shop";

/// The logical keys, all derived from one prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub employees: String,
    pub shifts: String,
    pub schedules: String,
    pub stores: String,
    pub initialized: String,
    pub backup_data: String,
}

impl StorageKeys {
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            employees: format!("{prefix}_employees"),
            shifts: format!("{prefix}_shifts"),
            schedules: format!("{prefix}_schedules"),
            stores: format!("{prefix}_stores"),
            initialized: format!("{prefix}_initialized"),
            backup_data: format!("{prefix}_backup_data"),
        }
    }

    /// Every key owned by the scheduler
    pub fn all(&self) -> [&str; 6] {
        [
            &self.employees,
            &self.shifts,
            &self.schedules,
            &self.stores,
            &self.initialized,
            &self.backup_data,
        ]
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_KEY_PREFIX)
    }
}

#[derive(Clone)]
pub struct StorageConnection {
    store: Arc<dyn KeyValueStore>,
    keys: StorageKeys,
}

impl StorageConnection {
    pub fn new(store: Arc<dyn KeyValueStore>, keys: StorageKeys) -> Self {
        Self { store, keys }
    }

    /// Open a file-backed connection rooted at `data_dir`, creating it if needed
    pub fn open_directory<P: AsRef<Path>>(
        data_dir: P,
        keys: StorageKeys,
        quota_bytes: Option<usize>,
    ) -> StorageResult<Self> {
        let store = FileStore::open(data_dir, quota_bytes)?;
        info!("📁 Opened storage at {}", store.location());
        Ok(Self::new(Arc::new(store), keys))
    }

    /// Unbounded in-memory connection with the default keys
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), StorageKeys::default())
    }

    /// In-memory connection that rejects writes beyond `quota_bytes`
    pub fn in_memory_with_quota(quota_bytes: usize) -> Self {
        Self::new(
            Arc::new(MemoryStore::with_quota(quota_bytes)),
            StorageKeys::default(),
        )
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn location(&self) -> String {
        self.store.location()
    }

    /// Read and parse the JSON value under `key`.
    ///
    /// Never fails: an unreadable or corrupt value is logged and treated as absent.
    pub fn load_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No value stored under '{}'", key);
                return None;
            }
            Err(e) => {
                warn!("⚠️ Failed to read '{}', treating as empty: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("⚠️ Corrupt data under '{}', treating as empty: {}", key, e);
                None
            }
        }
    }

    /// Serialize `value` and store it under `key`
    pub fn save_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StorageResult<()> {
        let raw = serde_json::to_string(value).map_err(|source| StorageError::Serialization {
            key: key.to_string(),
            source,
        })?;
        self.store.set(key, &raw)
    }

    pub fn read_raw(&self, key: &str) -> StorageResult<Option<String>> {
        self.store.get(key)
    }

    pub fn write_raw(&self, key: &str, value: &str) -> StorageResult<()> {
        self.store.set(key, value)
    }

    pub fn remove(&self, key: &str) -> StorageResult<()> {
        self.store.remove(key)
    }

    /// Remove every key owned by the scheduler, including the init flag and backup
    pub fn clear_all(&self) -> StorageResult<()> {
        for key in self.keys.all() {
            self.store.remove(key)?;
        }
        info!("🧹 Cleared all scheduler keys in {}", self.location());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_follow_prefix() {
        let keys = StorageKeys::default();
        assert_eq!(keys.employees, "coffee_shop_employees");
        assert_eq!(keys.shifts, "coffee_shop_shifts");
        assert_eq!(keys.schedules, "coffee_shop_schedules");
        assert_eq!(keys.stores, "coffee_shop_stores");
        assert_eq!(keys.initialized, "coffee_shop_initialized");
        assert_eq!(keys.backup_data, "coffee_shop_backup_data");

        let custom = StorageKeys::with_prefix("demo");
        assert_eq!(custom.stores, "demo_stores");
    }

    #[test]
    fn test_load_json_treats_corrupt_value_as_absent() {
        let connection = StorageConnection::in_memory();
        connection.write_raw("broken", "{not json").unwrap();

        let value: Option<Vec<String>> = connection.load_json("broken");
        assert!(value.is_none());
    }

    #[test]
    fn test_save_and_load_json() {
        let connection = StorageConnection::in_memory();
        connection.save_json("list", &vec!["a", "b"]).unwrap();

        let value: Option<Vec<String>> = connection.load_json("list");
        assert_eq!(value, Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn test_clear_all_removes_every_key() {
        let connection = StorageConnection::in_memory();
        for key in connection.keys().all() {
            connection.write_raw(key, "[]").unwrap();
        }
        connection.write_raw("unrelated", "1").unwrap();

        connection.clear_all().unwrap();

        for key in connection.keys().all() {
            assert!(connection.read_raw(key).unwrap().is_none());
        }
        assert_eq!(connection.read_raw("unrelated").unwrap().as_deref(), Some("1"));
    }
}
