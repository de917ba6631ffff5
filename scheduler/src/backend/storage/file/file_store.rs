use log::{debug, info};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::backend::storage::error::{StorageError, StorageResult};
use crate::backend::storage::traits::KeyValueStore;

const VALUE_EXTENSION: &str = "json";

/// Key-value store keeping one `<key>.json` file per key
#[derive(Debug)]
pub struct FileStore {
    base_dir: PathBuf,
    quota_bytes: Option<usize>,
    // Serializes writers so the quota check and the rename see a stable directory
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open a store rooted at `base_dir`, creating the directory if needed
    pub fn open<P: AsRef<Path>>(base_dir: P, quota_bytes: Option<usize>) -> StorageResult<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        if !base_dir.exists() {
            fs::create_dir_all(&base_dir)
                .map_err(|e| StorageError::io(base_dir.display().to_string(), e))?;
            info!("Created data directory: {:?}", base_dir);
        }
        Ok(Self {
            base_dir,
            quota_bytes,
            write_lock: Mutex::new(()),
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_dir
    }

    /// Map a key to its file. Anything outside `[A-Za-z0-9_-]` becomes `_`
    /// so a key can never escape the data directory.
    fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.base_dir.join(format!("{safe}.{VALUE_EXTENSION}"))
    }

    /// Bytes currently held by value files
    pub fn used_bytes(&self) -> StorageResult<usize> {
        let entries = fs::read_dir(&self.base_dir)
            .map_err(|e| StorageError::io(self.base_dir.display().to_string(), e))?;

        let mut total = 0usize;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(VALUE_EXTENSION) {
                continue;
            }
            if let Ok(metadata) = entry.metadata() {
                total += metadata.len() as usize;
            }
        }
        Ok(total)
    }

    fn file_len(path: &Path) -> usize {
        fs::metadata(path).map(|m| m.len() as usize).unwrap_or(0)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(key, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let path = self.path_for(key);

        if let Some(quota) = self.quota_bytes {
            let used = self.used_bytes()?;
            let replaced = Self::file_len(&path);
            let available = quota.saturating_sub(used - replaced.min(used));
            if value.len() > available {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    required: value.len(),
                    available,
                });
            }
        }

        // Atomic write: temp file, then rename over the old value
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, value).map_err(|e| StorageError::io(key, e))?;
        fs::rename(&temp_path, &path).map_err(|e| StorageError::io(key, e))?;

        debug!("Saved {} bytes to {:?}", value.len(), path);
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Removed {:?}", path);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io(key, e)),
        }
    }

    fn location(&self) -> String {
        self.base_dir.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_values_persist_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        {
            let store = FileStore::open(temp_dir.path(), None).unwrap();
            store.set("coffee_shop_stores", "[]").unwrap();
        }

        let reopened = FileStore::open(temp_dir.path(), None).unwrap();
        assert_eq!(reopened.get("coffee_shop_stores").unwrap().as_deref(), Some("[]"));
        assert!(temp_dir.path().join("coffee_shop_stores.json").exists());
        assert!(!temp_dir.path().join("coffee_shop_stores.tmp").exists());
    }

    #[test]
    fn test_open_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        let store = FileStore::open(&nested, None).unwrap();
        assert!(nested.is_dir());
        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn test_keys_cannot_escape_directory() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::open(temp_dir.path(), None).unwrap();
        store.set("../evil", "x").unwrap();
        assert!(temp_dir.path().join("___evil.json").exists());
        assert_eq!(store.get("../evil").unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::open(temp_dir.path(), None).unwrap();
        store.set("k", "v").unwrap();
        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_quota_exceeded_keeps_previous_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::open(temp_dir.path(), Some(8)).unwrap();
        store.set("k", "12345").unwrap();

        // Replacing counts the old value as free space
        store.set("k", "12345678").unwrap();

        let err = store.set("k", "123456789").unwrap_err();
        assert!(err.is_quota_exceeded());
        assert_eq!(store.get("k").unwrap().as_deref(), Some("12345678"));
        assert_eq!(store.used_bytes().unwrap(), 8);
    }
}
