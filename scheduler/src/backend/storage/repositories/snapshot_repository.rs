use log::warn;
use serde_json::Value;
use shared::Dataset;

use crate::backend::storage::connection::StorageConnection;
use crate::backend::storage::error::StorageResult;

/// What the backup key currently holds
#[derive(Debug, Clone, PartialEq)]
pub enum StoredSnapshot {
    Missing,
    /// Present but not JSON; carries the parse error
    Unreadable(String),
    Present(Value),
}

/// The secondary copy of the exported dataset
#[derive(Clone)]
pub struct SnapshotRepository {
    connection: StorageConnection,
}

impl SnapshotRepository {
    pub fn new(connection: StorageConnection) -> Self {
        Self { connection }
    }

    fn key(&self) -> &str {
        &self.connection.keys().backup_data
    }

    /// Read the snapshot as loose JSON so partially valid documents can still be adopted
    pub fn load(&self) -> StoredSnapshot {
        let raw = match self.connection.read_raw(self.key()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return StoredSnapshot::Missing,
            Err(e) => {
                warn!("⚠️ Failed to read backup snapshot: {}", e);
                return StoredSnapshot::Unreadable(e.to_string());
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => StoredSnapshot::Present(value),
            Err(e) => StoredSnapshot::Unreadable(e.to_string()),
        }
    }

    pub fn save(&self, dataset: &Dataset) -> StorageResult<()> {
        self.connection.save_json(self.key(), dataset)
    }

    pub fn clear(&self) -> StorageResult<()> {
        self.connection.remove(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use shared::Schedule;

    #[test]
    fn test_load_distinguishes_missing_unreadable_present() {
        let connection = StorageConnection::in_memory();
        let repo = SnapshotRepository::new(connection.clone());
        assert_eq!(repo.load(), StoredSnapshot::Missing);

        connection.write_raw(&connection.keys().backup_data, "not json").unwrap();
        assert!(matches!(repo.load(), StoredSnapshot::Unreadable(_)));

        let dataset = Dataset {
            version: "1.0".to_string(),
            export_date: Utc.with_ymd_and_hms(2024, 6, 10, 8, 0, 0).unwrap(),
            employees: vec![],
            shifts: vec![],
            schedules: Schedule::new(),
            stores: vec![],
        };
        repo.save(&dataset).unwrap();
        match repo.load() {
            StoredSnapshot::Present(value) => {
                assert_eq!(value["version"], "1.0");
                assert_eq!(value["exportDate"], "2024-06-10T08:00:00Z");
            }
            other => panic!("unexpected snapshot: {other:?}"),
        }
    }
}
