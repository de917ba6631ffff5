//! Typed repositories over a [`StorageConnection`](super::StorageConnection).
//!
//! Every collection is stored as one JSON value under one key and rewritten
//! whole on each mutation.

pub mod collection_repository;
pub mod schedule_repository;
pub mod settings_repository;
pub mod snapshot_repository;

pub use collection_repository::CollectionRepository;
pub use schedule_repository::ScheduleRepository;
pub use settings_repository::SettingsRepository;
pub use snapshot_repository::{SnapshotRepository, StoredSnapshot};
