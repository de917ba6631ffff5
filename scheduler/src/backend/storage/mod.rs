//! # Storage Layer
//!
//! A synchronous key-value substrate with file and in-memory implementations,
//! plus typed repositories for each persisted collection.
//!
//! ## Keys
//!
//! All keys share one prefix (default `coffee_shop`):
//!
//! | key                     | value                              |
//! |-------------------------|------------------------------------|
//! | `<prefix>_stores`       | JSON array of stores               |
//! | `<prefix>_employees`    | JSON array of employees            |
//! | `<prefix>_shifts`       | JSON array of shifts               |
//! | `<prefix>_schedules`    | JSON object, date → entries        |
//! | `<prefix>_initialized`  | the string `true` once seeded      |
//! | `<prefix>_backup_data`  | the last exported dataset          |

pub mod connection;
pub mod error;
pub mod file;
pub mod memory_store;
pub mod repositories;
pub mod traits;

pub use connection::{StorageConnection, StorageKeys, DEFAULT_KEY_PREFIX};
pub use error::{StorageError, StorageResult};
pub use file::{ConfigRepository, FileStore, SchedulerConfig};
pub use memory_store::MemoryStore;
pub use repositories::{
    CollectionRepository, ScheduleRepository, SettingsRepository, SnapshotRepository,
    StoredSnapshot,
};
pub use traits::{CollectionStorage, Entity, KeyValueStore, ScheduleStorage};
