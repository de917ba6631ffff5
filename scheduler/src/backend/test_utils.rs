//! Test utilities with automatic cleanup and consistent test infrastructure
//!
//! The temporary data directory lives as long as the environment, so test
//! data is removed even if a test panics.

use anyhow::Result;
use chrono::{TimeZone, Utc};
use std::sync::Arc;
use tempfile::TempDir;

use super::domain::clock::ManualClock;
use super::storage::{CollectionRepository, ScheduleRepository, StorageConnection, StorageKeys};
use super::Backend;
use shared::Store;

/// Test environment with a storage connection, file-backed by a temporary
/// directory unless built in memory
pub struct TestEnvironment {
    pub connection: StorageConnection,
    /// Base directory path for manual inspection if needed
    pub base_path: Option<std::path::PathBuf>,
    _temp_dir: Option<TempDir>, // Keep alive to prevent cleanup
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let connection = StorageConnection::open_directory(temp_dir.path(), StorageKeys::default(), None)?;
        Ok(Self {
            connection,
            base_path: Some(temp_dir.path().to_path_buf()),
            _temp_dir: Some(temp_dir),
        })
    }

    pub fn in_memory_with_quota(quota_bytes: usize) -> Self {
        Self {
            connection: StorageConnection::in_memory_with_quota(quota_bytes),
            base_path: None,
            _temp_dir: None,
        }
    }
}

/// Test helper bundling an environment, a pinned clock and a backend over both
pub struct TestHelper {
    pub env: TestEnvironment,
    pub clock: Arc<ManualClock>,
    pub backend: Backend,
    pub store_repo: CollectionRepository<Store>,
    pub schedule_repo: ScheduleRepository,
}

impl TestHelper {
    /// Fresh, empty, file-backed data directory
    pub fn new() -> Result<Self> {
        Ok(Self::from_env(TestEnvironment::new()?))
    }

    /// Fresh data directory with the default catalogs seeded
    pub fn seeded() -> Result<Self> {
        let helper = Self::new()?;
        helper.backend.seeder().seed_if_empty()?;
        Ok(helper)
    }

    pub fn in_memory_with_quota(quota_bytes: usize) -> Self {
        Self::from_env(TestEnvironment::in_memory_with_quota(quota_bytes))
    }

    pub fn from_env(env: TestEnvironment) -> Self {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 6, 10, 8, 0, 0).single().unwrap_or_default(),
        ));
        let backend = Backend::new(env.connection.clone(), clock.clone());
        let store_repo = CollectionRepository::new(env.connection.clone());
        let schedule_repo = ScheduleRepository::new(env.connection.clone());

        Self {
            env,
            clock,
            backend,
            store_repo,
            schedule_repo,
        }
    }

    /// A second backend over the same data directory, as after a restart
    pub fn reopen(&self) -> Result<Backend> {
        let path = self
            .env
            .base_path
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("in-memory environments cannot be reopened"))?;
        let connection = StorageConnection::open_directory(path, StorageKeys::default(), None)?;
        Ok(Backend::new(connection, self.clock.clone()))
    }
}
