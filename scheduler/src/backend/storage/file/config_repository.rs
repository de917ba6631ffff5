//! # Scheduler Config Repository
//!
//! Manages the YAML configuration file `config.yaml` at the root of the data
//! directory. The file is created with defaults on first load.
//!
//! ## YAML Format
//!
//! ```yaml
//! data_format_version: "1.0"
//! key_prefix: coffee_shop
//! backup_interval_secs: 5
//! storage_quota_bytes: 5242880
//! created_at: "2025-01-21T19:30:00Z"
//! updated_at: "2025-01-21T19:35:00Z"
//! ```

use anyhow::{Context, Result};
use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::backend::storage::connection::{StorageKeys, DEFAULT_KEY_PREFIX};

pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Roughly the 5 MiB a browser grants one origin's local storage
pub const DEFAULT_STORAGE_QUOTA_BYTES: usize = 5 * 1024 * 1024;

pub const DEFAULT_BACKUP_INTERVAL_SECS: u64 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Data format version for future migrations
    pub data_format_version: String,
    /// Prefix of every storage key
    pub key_prefix: String,
    /// Seconds between automatic backup snapshots
    pub backup_interval_secs: u64,
    /// Upper bound on stored bytes; `null` disables the limit
    pub storage_quota_bytes: Option<usize>,
    pub created_at: String,
    pub updated_at: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            data_format_version: shared::DATASET_VERSION.to_string(),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            backup_interval_secs: DEFAULT_BACKUP_INTERVAL_SECS,
            storage_quota_bytes: Some(DEFAULT_STORAGE_QUOTA_BYTES),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

impl SchedulerConfig {
    pub fn storage_keys(&self) -> StorageKeys {
        StorageKeys::with_prefix(&self.key_prefix)
    }

    /// The snapshot interval, never shorter than one second
    pub fn backup_interval(&self) -> Duration {
        Duration::from_secs(self.backup_interval_secs.max(1))
    }
}

/// Loads and saves [`SchedulerConfig`] in a data directory
#[derive(Debug, Clone)]
pub struct ConfigRepository {
    base_dir: PathBuf,
}

impl ConfigRepository {
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.base_dir.join(CONFIG_FILE_NAME)
    }

    /// Load the config file, creating it with defaults if it doesn't exist
    pub fn load_or_create(&self) -> Result<SchedulerConfig> {
        let config_path = self.config_path();

        if config_path.exists() {
            let yaml_content = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file {:?}", config_path))?;
            let config: SchedulerConfig = serde_yaml::from_str(&yaml_content)
                .with_context(|| format!("Failed to parse config file {:?}", config_path))?;
            debug!("Loaded config from {:?}", config_path);
            Ok(config)
        } else {
            let config = SchedulerConfig::default();
            self.save(&config)?;
            info!("Created default config at {:?}", config_path);
            Ok(config)
        }
    }

    /// Save the config, stamping `updated_at`
    pub fn save(&self, config: &SchedulerConfig) -> Result<()> {
        if !self.base_dir.exists() {
            fs::create_dir_all(&self.base_dir)
                .with_context(|| format!("Failed to create data directory {:?}", self.base_dir))?;
            info!("Created data directory: {:?}", self.base_dir);
        }

        let mut config = config.clone();
        config.updated_at = Utc::now().to_rfc3339();
        let yaml_content = serde_yaml::to_string(&config)?;

        // Atomic write pattern: write to temp file, then rename
        let config_path = self.config_path();
        let temp_path = config_path.with_extension("tmp");
        fs::write(&temp_path, yaml_content)?;
        fs::rename(&temp_path, &config_path)?;

        debug!("Saved config to {:?}", config_path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_or_create_writes_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let repo = ConfigRepository::new(temp_dir.path());

        let config = repo.load_or_create().unwrap();
        assert_eq!(config.data_format_version, "1.0");
        assert_eq!(config.key_prefix, "coffee_shop");
        assert_eq!(config.backup_interval_secs, 5);
        assert_eq!(config.storage_quota_bytes, Some(5_242_880));
        assert!(repo.config_path().exists());
    }

    #[test]
    fn test_saved_config_is_reloaded() {
        let temp_dir = TempDir::new().unwrap();
        let repo = ConfigRepository::new(temp_dir.path());

        let mut config = repo.load_or_create().unwrap();
        config.key_prefix = "tea_house".to_string();
        config.backup_interval_secs = 30;
        config.storage_quota_bytes = None;
        repo.save(&config).unwrap();

        let reloaded = repo.load_or_create().unwrap();
        assert_eq!(reloaded.key_prefix, "tea_house");
        assert_eq!(reloaded.backup_interval(), Duration::from_secs(30));
        assert_eq!(reloaded.storage_quota_bytes, None);
        assert_eq!(reloaded.storage_keys().stores, "tea_house_stores");
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let config = SchedulerConfig {
            backup_interval_secs: 0,
            ..SchedulerConfig::default()
        };
        assert_eq!(config.backup_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let repo = ConfigRepository::new(temp_dir.path());
        fs::write(repo.config_path(), "key_prefix: [unclosed").unwrap();
        assert!(repo.load_or_create().is_err());
    }
}
