use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{minutes_since_midnight, Shift, DEFAULT_SHIFT_COLOR};

use super::{validate_name, EntityDraft};
use crate::backend::storage::{Entity, StorageKeys};
use crate::error::{Result, SchedulerError};

impl Entity for Shift {
    const KIND: &'static str = "shift";

    fn collection_key(keys: &StorageKeys) -> &str {
        &keys.shifts
    }

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShiftDraft {
    pub name: String,
    /// Zero-padded 24-hour "HH:MM"
    pub start_time: String,
    pub end_time: String,
    pub color: Option<String>,
}

impl ShiftDraft {
    pub fn new(name: impl Into<String>, start_time: impl Into<String>, end_time: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start_time: start_time.into(),
            end_time: end_time.into(),
            color: None,
        }
    }
}

impl EntityDraft<Shift> for ShiftDraft {
    fn validate(&self) -> Result<()> {
        validate_name("Shift", &self.name)?;

        let start = minutes_since_midnight(&self.start_time).ok_or_else(|| {
            SchedulerError::validation(format!("Invalid start time '{}', expected HH:MM", self.start_time))
        })?;
        let end = minutes_since_midnight(&self.end_time).ok_or_else(|| {
            SchedulerError::validation(format!("Invalid end time '{}', expected HH:MM", self.end_time))
        })?;
        if start >= end {
            return Err(SchedulerError::validation(format!(
                "Shift must start before it ends ({} >= {})",
                self.start_time, self.end_time
            )));
        }
        Ok(())
    }

    fn into_new(self, id: String, now: DateTime<Utc>) -> Shift {
        Shift {
            id,
            name: self.name.trim().to_string(),
            start_time: self.start_time,
            end_time: self.end_time,
            color: self.color.unwrap_or_else(|| DEFAULT_SHIFT_COLOR.to_string()),
            created_at: Some(now),
            updated_at: None,
        }
    }

    fn apply_to(self, existing: Shift, now: DateTime<Utc>) -> Shift {
        Shift {
            name: self.name.trim().to_string(),
            start_time: self.start_time,
            end_time: self.end_time,
            color: self.color.unwrap_or(existing.color),
            updated_at: Some(now),
            ..existing
        }
    }
}
