use serde::{Deserialize, Serialize};
use shared::{ScheduleEntry, DEFAULT_ENTRY_STATUS};

use crate::error::{Result, SchedulerError};

/// Fields of an assignment before it has an id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewScheduleEntry {
    pub store_id: String,
    pub shift_id: String,
    pub employee_id: String,
    /// Defaults to "confirmed"
    pub status: Option<String>,
}

impl NewScheduleEntry {
    pub fn new(store_id: impl Into<String>, shift_id: impl Into<String>, employee_id: impl Into<String>) -> Self {
        Self {
            store_id: store_id.into(),
            shift_id: shift_id.into(),
            employee_id: employee_id.into(),
            status: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("storeId", &self.store_id),
            ("shiftId", &self.shift_id),
            ("employeeId", &self.employee_id),
        ] {
            if value.trim().is_empty() {
                return Err(SchedulerError::validation(format!("{field} cannot be empty")));
            }
        }
        Ok(())
    }

    pub fn into_entry(self, id: String) -> ScheduleEntry {
        ScheduleEntry {
            id,
            store_id: self.store_id,
            shift_id: self.shift_id,
            employee_id: self.employee_id,
            status: self
                .status
                .unwrap_or_else(|| DEFAULT_ENTRY_STATUS.to_string()),
        }
    }
}

/// Field-merge update of one entry. The entry id is never touched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntryPatch {
    pub store_id: Option<String>,
    pub shift_id: Option<String>,
    pub employee_id: Option<String>,
    pub status: Option<String>,
}

impl ScheduleEntryPatch {
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("storeId", &self.store_id),
            ("shiftId", &self.shift_id),
            ("employeeId", &self.employee_id),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(SchedulerError::validation(format!("{field} cannot be empty")));
            }
        }
        Ok(())
    }

    pub fn apply(self, entry: &mut ScheduleEntry) {
        if let Some(store_id) = self.store_id {
            entry.store_id = store_id;
        }
        if let Some(shift_id) = self.shift_id {
            entry.shift_id = shift_id;
        }
        if let Some(employee_id) = self.employee_id {
            entry.employee_id = employee_id;
        }
        if let Some(status) = self.status {
            entry.status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry_defaults_status() {
        let entry = NewScheduleEntry::new("store1", "s1", "e1").into_entry("id1".to_string());
        assert_eq!(entry.status, "confirmed");
        assert_eq!(entry.id, "id1");
    }

    #[test]
    fn test_new_entry_rejects_blank_references() {
        assert!(NewScheduleEntry::new("store1", " ", "e1").validate().is_err());
        assert!(NewScheduleEntry::new("store1", "s1", "e1").validate().is_ok());
    }

    #[test]
    fn test_patch_merges_only_supplied_fields() {
        let mut entry = NewScheduleEntry::new("store1", "s1", "e1").into_entry("id1".to_string());
        ScheduleEntryPatch {
            employee_id: Some("e2".to_string()),
            status: Some("tentative".to_string()),
            ..ScheduleEntryPatch::default()
        }
        .apply(&mut entry);

        assert_eq!(entry.id, "id1");
        assert_eq!(entry.store_id, "store1");
        assert_eq!(entry.shift_id, "s1");
        assert_eq!(entry.employee_id, "e2");
        assert_eq!(entry.status, "tentative");
    }
}
