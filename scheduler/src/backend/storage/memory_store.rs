//! In-memory key-value store. Used by tests and to simulate a full storage
//! area through its optional byte quota.

use log::debug;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::error::{StorageError, StorageResult};
use super::traits::KeyValueStore;

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose total size (keys plus values, in bytes) may not exceed `quota_bytes`
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Total bytes currently held
    pub fn used_bytes(&self) -> usize {
        self.lock().iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut values = self.lock();

        if let Some(quota) = self.quota_bytes {
            let used: usize = values.iter().map(|(k, v)| k.len() + v.len()).sum();
            let replaced = values.get(key).map(|old| key.len() + old.len()).unwrap_or(0);
            let available = quota.saturating_sub(used - replaced);
            let required = key.len() + value.len();
            if required > available {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    required,
                    available,
                });
            }
        }

        values.insert(key.to_string(), value.to_string());
        debug!("Stored {} bytes under '{}' in memory", value.len(), key);
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.lock().remove(key);
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
