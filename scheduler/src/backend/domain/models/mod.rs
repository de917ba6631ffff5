//! Domain models: the input drafts accepted by the services and the
//! storage bindings of the shared wire types.

pub mod employee;
pub mod schedule;
pub mod shift;
pub mod store;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::backend::storage::Entity;
use crate::error::{Result, SchedulerError};

pub use employee::EmployeeDraft;
pub use schedule::{NewScheduleEntry, ScheduleEntryPatch};
pub use shared::{DEFAULT_EMPLOYEE_COLOR, DEFAULT_SHIFT_COLOR};
pub use shift::ShiftDraft;
pub use store::StoreDraft;

const MAX_NAME_LENGTH: usize = 100;

/// Generate a fresh entity id: a UUID v7 as 32 lowercase hex characters.
/// Ids sort by creation time and are never reused.
pub fn generate_id() -> String {
    Uuid::now_v7().simple().to_string()
}

/// Caller-supplied fields for creating or updating an entity of type `E`
pub trait EntityDraft<E: Entity> {
    fn validate(&self) -> Result<()>;

    /// Build a new entity with a generated id and `created_at` stamp
    fn into_new(self, id: String, now: DateTime<Utc>) -> E;

    /// Overwrite the writable fields of `existing`. Optional fields left as
    /// `None` keep their current value.
    fn apply_to(self, existing: E, now: DateTime<Utc>) -> E;
}

pub(crate) fn validate_name(kind: &str, name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(SchedulerError::validation(format!("{kind} name cannot be empty")));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(SchedulerError::validation(format!(
            "{kind} name cannot be longer than {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_ids_are_unique_hex() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_id()).collect();
        assert_eq!(ids.len(), 1000);
        for id in &ids {
            assert_eq!(id.len(), 32);
            assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn test_generated_ids_sort_by_creation() {
        let first = generate_id();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = generate_id();
        assert!(first < second);
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Store", "联庄").is_ok());
        assert!(validate_name("Store", "   ").is_err());
        assert!(validate_name("Store", &"x".repeat(101)).is_err());
        assert!(validate_name("Store", &"咖".repeat(100)).is_ok());
    }
}
