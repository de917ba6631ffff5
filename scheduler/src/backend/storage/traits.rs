//! # Storage Traits
//!
//! The seams between the domain layer and persistence. Everything below the
//! domain goes through a [`KeyValueStore`]; the repositories layer typed
//! collections on top of it.
//!
//! All operations are synchronous. Implementations must be `Send + Sync` so
//! the periodic backup task can share a connection with the caller.

use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::Schedule;

use super::connection::StorageKeys;
use super::error::StorageResult;

/// A flat string key-value substrate
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    /// On failure the previous value must be left intact.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// Human readable description of where values live
    fn location(&self) -> String;
}

/// A record persisted as one element of a JSON array under a single key
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Lowercase name used in log lines ("store", "employee", ...)
    const KIND: &'static str;

    /// The key the whole collection is stored under
    fn collection_key(keys: &StorageKeys) -> &str;

    fn id(&self) -> &str;
}

/// Typed whole-collection persistence for one entity kind
pub trait CollectionStorage<E: Entity>: Send + Sync {
    /// All entities in stored order. Absent or corrupt data reads as empty.
    fn list(&self) -> Vec<E>;

    fn get(&self, id: &str) -> Option<E>;

    /// Append an entity and persist the collection
    fn insert(&self, entity: &E) -> StorageResult<()>;

    /// Replace the entity with the same id. Returns false if no entity has that id.
    fn replace(&self, entity: &E) -> StorageResult<bool>;

    /// Returns true iff an entity was removed
    fn remove(&self, id: &str) -> StorageResult<bool>;

    /// Overwrite the whole collection
    fn replace_all(&self, entities: &[E]) -> StorageResult<()>;

    fn clear(&self) -> StorageResult<()>;
}

/// Persistence of the date-keyed schedule mapping
pub trait ScheduleStorage: Send + Sync {
    /// The whole mapping. Absent or corrupt data reads as empty.
    fn load(&self) -> Schedule;

    fn save(&self, schedule: &Schedule) -> StorageResult<()>;

    fn clear(&self) -> StorageResult<()>;
}
