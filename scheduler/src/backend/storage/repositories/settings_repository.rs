use log::debug;

use crate::backend::storage::connection::StorageConnection;
use crate::backend::storage::error::StorageResult;

const FLAG_SET: &str = "true";

/// The first-run initialization flag
#[derive(Clone)]
pub struct SettingsRepository {
    connection: StorageConnection,
}

impl SettingsRepository {
    pub fn new(connection: StorageConnection) -> Self {
        Self { connection }
    }

    /// True when the flag holds the literal string "true"
    pub fn is_initialized(&self) -> bool {
        let key = &self.connection.keys().initialized;
        let flag = self.connection.read_raw(key).ok().flatten();
        debug!("Initialization flag: {:?}", flag);
        flag.as_deref() == Some(FLAG_SET)
    }

    pub fn mark_initialized(&self) -> StorageResult<()> {
        self.connection
            .write_raw(&self.connection.keys().initialized, FLAG_SET)
    }

    pub fn clear(&self) -> StorageResult<()> {
        self.connection.remove(&self.connection.keys().initialized)
    }
}
