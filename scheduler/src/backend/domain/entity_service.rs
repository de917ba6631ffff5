//! CRUD over the store, employee and shift catalogs.
//!
//! The three collections share one contract, so one generic service backs
//! all of them. Reads never fail: missing or corrupt data reads as empty.

use log::{info, warn};
use shared::{Employee, Shift, Store};
use std::sync::Arc;

use crate::backend::domain::clock::Clock;
use crate::backend::domain::models::{generate_id, EntityDraft};
use crate::backend::storage::{CollectionRepository, CollectionStorage, Entity, StorageConnection};
use crate::error::Result;

pub type StoreService = EntityService<Store>;
pub type EmployeeService = EntityService<Employee>;
pub type ShiftService = EntityService<Shift>;

pub struct EntityService<E: Entity> {
    repository: CollectionRepository<E>,
    clock: Arc<dyn Clock>,
}

impl<E: Entity> Clone for EntityService<E> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<E: Entity> EntityService<E> {
    pub fn new(connection: StorageConnection, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository: CollectionRepository::new(connection),
            clock,
        }
    }

    /// Every entity in stored order
    pub fn get_all(&self) -> Vec<E> {
        self.repository.list()
    }

    pub fn get_by_id(&self, id: &str) -> Option<E> {
        self.repository.get(id)
    }

    pub fn count(&self) -> usize {
        self.repository.list().len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Validate the draft, assign a fresh id and append it.
    /// Nothing is persisted if validation or the write fails.
    pub fn add<D: EntityDraft<E>>(&self, draft: D) -> Result<E> {
        draft.validate()?;

        let entity = draft.into_new(generate_id(), self.clock.now());
        self.repository.insert(&entity)?;

        info!("Added {} with ID: {}", E::KIND, entity.id());
        Ok(entity)
    }

    /// Replace the writable fields of the entity with `id`.
    /// Returns `None` if there is no such entity.
    pub fn update<D: EntityDraft<E>>(&self, id: &str, draft: D) -> Result<Option<E>> {
        draft.validate()?;

        let Some(existing) = self.repository.get(id) else {
            warn!("Cannot update {} {}: not found", E::KIND, id);
            return Ok(None);
        };

        let updated = draft.apply_to(existing, self.clock.now());
        self.repository.replace(&updated)?;

        info!("Updated {} {}", E::KIND, id);
        Ok(Some(updated))
    }

    /// Hard delete. Returns true iff something was removed.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let removed = self.repository.remove(id)?;
        if removed {
            info!("Deleted {} {}", E::KIND, id);
        } else {
            warn!("Cannot delete {} {}: not found", E::KIND, id);
        }
        Ok(removed)
    }

    /// Overwrite the whole collection, used by import and seeding
    pub fn replace_all(&self, entities: &[E]) -> Result<()> {
        self.repository.replace_all(entities)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.repository.clear()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::models::{EmployeeDraft, ShiftDraft, StoreDraft};
    use crate::backend::test_utils::TestHelper;
    use crate::error::SchedulerError;
    use chrono::Duration;

    #[test]
    fn test_add_then_get_returns_input_fields() {
        let helper = TestHelper::new().unwrap();
        let shifts = helper.backend.shifts();

        let mut draft = ShiftDraft::new("早班", "07:00", "14:00");
        draft.color = Some("#3498db".to_string());
        let shift = shifts.add(draft).unwrap();

        let stored = shifts.get_by_id(&shift.id).unwrap();
        assert_eq!(stored, shift);
        assert_eq!(stored.name, "早班");
        assert_eq!(stored.start_time, "07:00");
        assert_eq!(stored.end_time, "14:00");
        assert_eq!(stored.color, "#3498db");
        assert_eq!(stored.created_at, Some(helper.clock.now()));
        assert_eq!(stored.updated_at, None);
    }

    #[test]
    fn test_invalid_shift_is_rejected_before_persistence() {
        let helper = TestHelper::new().unwrap();
        let shifts = helper.backend.shifts();

        let result = shifts.add(ShiftDraft::new("倒班", "14:00", "07:00"));
        assert!(matches!(result, Err(SchedulerError::Validation(_))));
        assert!(shifts.get_all().is_empty());
    }

    #[test]
    fn test_defaults_applied_on_add() {
        let helper = TestHelper::new().unwrap();

        let employee = helper
            .backend
            .employees()
            .add(EmployeeDraft {
                name: "欣怡".to_string(),
                position: "咖啡师".to_string(),
                ..EmployeeDraft::default()
            })
            .unwrap();
        assert_eq!(employee.color, "#3498db");
        assert_eq!(employee.phone, "");
        assert_eq!(employee.email, "");

        let shift = helper.backend.shifts().add(ShiftDraft::new("中班", "14:00", "21:00")).unwrap();
        assert_eq!(shift.color, "#2ecc71");
    }

    #[test]
    fn test_update_preserves_unsupplied_fields() {
        let helper = TestHelper::new().unwrap();
        let employees = helper.backend.employees();

        let original = employees
            .add(EmployeeDraft {
                name: "小酒".to_string(),
                position: "咖啡师".to_string(),
                phone: Some("123".to_string()),
                email: None,
                color: Some("#e74c3c".to_string()),
            })
            .unwrap();

        helper.clock.advance(Duration::minutes(5));
        let updated = employees
            .update(
                &original.id,
                EmployeeDraft {
                    name: "小酒 ".to_string(),
                    position: "店长".to_string(),
                    ..EmployeeDraft::default()
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.name, "小酒");
        assert_eq!(updated.position, "店长");
        assert_eq!(updated.phone, "123");
        assert_eq!(updated.color, "#e74c3c");
        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(updated.updated_at, Some(helper.clock.now()));
        assert_eq!(employees.get_by_id(&original.id).unwrap(), updated);
    }

    #[test]
    fn test_update_unknown_id_returns_none() {
        let helper = TestHelper::new().unwrap();
        let result = helper
            .backend
            .stores()
            .update("missing", StoreDraft::named("星光"))
            .unwrap();
        assert!(result.is_none());
        assert!(helper.backend.stores().get_all().is_empty());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let helper = TestHelper::new().unwrap();
        let stores = helper.backend.stores();
        let kept = stores.add(StoreDraft::named("联庄")).unwrap();
        let doomed = stores.add(StoreDraft::named("余杭")).unwrap();

        assert!(stores.delete(&doomed.id).unwrap());
        assert!(!stores.delete(&doomed.id).unwrap());
        assert_eq!(stores.count(), 1);
        assert_eq!(stores.get_all()[0].id, kept.id);
    }

    #[test]
    fn test_record_without_color_survives_load_and_add() {
        let helper = TestHelper::new().unwrap();
        let key = helper.env.connection.keys().employees.clone();
        helper
            .env
            .connection
            .write_raw(
                &key,
                r##"[{"id":"e1","name":"欣怡","position":"咖啡师","color":"#e74c3c"},
                    {"id":"e2","name":"小酒","position":"咖啡师"}]"##,
            )
            .unwrap();

        let employees = helper.backend.employees();
        let loaded = employees.get_all();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[1].color, shared::DEFAULT_EMPLOYEE_COLOR);

        employees
            .add(EmployeeDraft {
                name: "新人".to_string(),
                position: "咖啡师".to_string(),
                ..EmployeeDraft::default()
            })
            .unwrap();
        let names: Vec<_> = employees.get_all().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["欣怡", "小酒", "新人"]);
    }

    #[test]
    fn test_quota_exhaustion_leaves_collection_unchanged() {
        let helper = TestHelper::in_memory_with_quota(400);
        let stores = helper.backend.stores();
        let first = stores.add(StoreDraft::named("联庄")).unwrap();

        let huge = StoreDraft {
            name: "余杭".to_string(),
            address: Some("x".repeat(1000)),
            phone: None,
        };
        let err = stores.add(huge).unwrap_err();
        assert!(matches!(err, SchedulerError::Storage(ref e) if e.is_quota_exceeded()));

        assert_eq!(stores.get_all(), vec![first]);
    }
}
