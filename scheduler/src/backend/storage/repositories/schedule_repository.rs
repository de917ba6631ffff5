use log::debug;
use shared::Schedule;

use crate::backend::storage::connection::StorageConnection;
use crate::backend::storage::error::StorageResult;
use crate::backend::storage::traits::ScheduleStorage;

/// Stores the whole date → entries mapping under the schedules key
#[derive(Clone)]
pub struct ScheduleRepository {
    connection: StorageConnection,
}

impl ScheduleRepository {
    pub fn new(connection: StorageConnection) -> Self {
        Self { connection }
    }

    fn key(&self) -> &str {
        &self.connection.keys().schedules
    }
}

impl ScheduleStorage for ScheduleRepository {
    fn load(&self) -> Schedule {
        let schedule: Schedule = self.connection.load_json(self.key()).unwrap_or_default();
        debug!("Loaded schedule with {} dates", schedule.len());
        schedule
    }

    fn save(&self, schedule: &Schedule) -> StorageResult<()> {
        self.connection.save_json(self.key(), schedule)
    }

    fn clear(&self) -> StorageResult<()> {
        self.connection.remove(self.key())
    }
}
