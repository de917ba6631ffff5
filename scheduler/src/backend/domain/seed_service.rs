//! First-run population of the store, shift and employee catalogs.
//!
//! Seeding runs whenever all three catalogs are empty. The initialization
//! flag is recorded afterwards but never consulted as a gate.

use log::info;
use serde::Serialize;
use shared::{Employee, Shift, Store};
use std::sync::Arc;

use crate::backend::domain::clock::Clock;
use crate::backend::domain::entity_service::{EmployeeService, ShiftService, StoreService};
use crate::backend::domain::models::generate_id;
use crate::backend::storage::{SettingsRepository, StorageConnection};
use crate::error::Result;

const DEFAULT_STORES: [&str; 9] = [
    "联庄", "余杭", "开元", "浣纱", "山泽里", "泰隆", "城西", "工厂", "星光",
];

/// (name, start, end, color)
const DEFAULT_SHIFTS: [(&str, &str, &str, &str); 3] = [
    ("早班", "07:00", "14:00", "#3498db"),
    ("中班", "14:00", "21:00", "#2ecc71"),
    ("晚班", "21:00", "23:00", "#9b59b6"),
];

const DEFAULT_POSITION: &str = "咖啡师";

/// (name, color)
const DEFAULT_EMPLOYEES: [(&str, &str); 17] = [
    ("欣怡", "#e74c3c"),
    ("小酒", "#3498db"),
    ("等等", "#2ecc71"),
    ("怡彤", "#9b59b6"),
    ("小周", "#c0392b"),
    ("梦婷", "#f39c12"),
    ("小雷", "#8e44ad"),
    ("丹尼", "#1abc9c"),
    ("小辞", "#d35400"),
    ("一筒", "#16a085"),
    ("阿乐", "#7f8c8d"),
    ("梁瑞", "#e67e22"),
    ("爱玲", "#27ae60"),
    ("小宇", "#34495e"),
    ("塔塔", "#8B4513"),
    ("立思", "#2c3e50"),
    ("曲曲", "#e84393"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum SeedOutcome {
    Seeded {
        stores: usize,
        shifts: usize,
        employees: usize,
    },
    /// At least one catalog already had data; nothing was written
    AlreadyPopulated,
}

#[derive(Clone)]
pub struct SeedService {
    stores: StoreService,
    employees: EmployeeService,
    shifts: ShiftService,
    settings: SettingsRepository,
    clock: Arc<dyn Clock>,
}

impl SeedService {
    pub fn new(connection: StorageConnection, clock: Arc<dyn Clock>) -> Self {
        Self {
            stores: StoreService::new(connection.clone(), Arc::clone(&clock)),
            employees: EmployeeService::new(connection.clone(), Arc::clone(&clock)),
            shifts: ShiftService::new(connection.clone(), Arc::clone(&clock)),
            settings: SettingsRepository::new(connection),
            clock,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.settings.is_initialized()
    }

    /// Seed the default catalogs if stores, employees and shifts are all empty
    pub fn seed_if_empty(&self) -> Result<SeedOutcome> {
        if !(self.stores.is_empty() && self.employees.is_empty() && self.shifts.is_empty()) {
            return Ok(SeedOutcome::AlreadyPopulated);
        }

        info!("🌱 Catalogs are empty, seeding defaults");
        let now = self.clock.now();

        let stores: Vec<Store> = DEFAULT_STORES
            .iter()
            .enumerate()
            .map(|(index, name)| Store {
                id: format!("store{}", index + 1),
                name: name.to_string(),
                address: String::new(),
                phone: String::new(),
                created_at: Some(now),
                updated_at: None,
            })
            .collect();

        let shifts: Vec<Shift> = DEFAULT_SHIFTS
            .iter()
            .map(|(name, start, end, color)| Shift {
                id: generate_id(),
                name: name.to_string(),
                start_time: start.to_string(),
                end_time: end.to_string(),
                color: color.to_string(),
                created_at: Some(now),
                updated_at: None,
            })
            .collect();

        let employees: Vec<Employee> = DEFAULT_EMPLOYEES
            .iter()
            .map(|(name, color)| Employee {
                id: generate_id(),
                name: name.to_string(),
                position: DEFAULT_POSITION.to_string(),
                phone: String::new(),
                email: String::new(),
                color: color.to_string(),
                created_at: Some(now),
                updated_at: None,
            })
            .collect();

        self.stores.replace_all(&stores)?;
        self.shifts.replace_all(&shifts)?;
        self.employees.replace_all(&employees)?;
        self.settings.mark_initialized()?;

        info!(
            "🌱 Seeded {} stores, {} shifts, {} employees",
            stores.len(),
            shifts.len(),
            employees.len()
        );
        Ok(SeedOutcome::Seeded {
            stores: stores.len(),
            shifts: shifts.len(),
            employees: employees.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::models::StoreDraft;
    use crate::backend::test_utils::TestHelper;
    use std::collections::HashSet;

    #[test]
    fn test_seed_from_empty() {
        let helper = TestHelper::new().unwrap();
        let backend = &helper.backend;
        assert!(!backend.seeder().is_initialized());

        let outcome = backend.seeder().seed_if_empty().unwrap();
        assert_eq!(
            outcome,
            SeedOutcome::Seeded {
                stores: 9,
                shifts: 3,
                employees: 17
            }
        );
        assert!(backend.seeder().is_initialized());

        let store_ids: Vec<_> = backend.stores().get_all().into_iter().map(|s| s.id).collect();
        let expected: Vec<_> = (1..=9).map(|n| format!("store{n}")).collect();
        assert_eq!(store_ids, expected);
        assert_eq!(backend.stores().get_by_id("store9").unwrap().name, "星光");

        let shifts = backend.shifts().get_all();
        assert_eq!(shifts[0].name, "早班");
        assert_eq!(shifts[0].duration().unwrap().to_string(), "7h");
        assert_eq!(shifts[2].end_time, "23:00");

        let employees = backend.employees().get_all();
        assert_eq!(employees.len(), 17);
        assert!(employees.iter().all(|e| e.position == "咖啡师"));
        let ids: HashSet<_> = employees.iter().map(|e| e.id.clone()).collect();
        assert_eq!(ids.len(), 17);
    }

    #[test]
    fn test_seed_skipped_when_any_catalog_has_data() {
        let helper = TestHelper::new().unwrap();
        let backend = &helper.backend;
        backend.stores().add(StoreDraft::named("独立店")).unwrap();

        assert_eq!(backend.seeder().seed_if_empty().unwrap(), SeedOutcome::AlreadyPopulated);
        assert_eq!(backend.stores().count(), 1);
        assert!(backend.shifts().get_all().is_empty());
        assert!(!backend.seeder().is_initialized());
    }

    #[test]
    fn test_flag_does_not_prevent_reseeding() {
        let helper = TestHelper::new().unwrap();
        let backend = &helper.backend;
        backend.seeder().seed_if_empty().unwrap();
        assert_eq!(backend.seeder().seed_if_empty().unwrap(), SeedOutcome::AlreadyPopulated);

        backend.stores().clear().unwrap();
        backend.shifts().clear().unwrap();
        backend.employees().clear().unwrap();
        assert!(backend.seeder().is_initialized());

        assert!(matches!(
            backend.seeder().seed_if_empty().unwrap(),
            SeedOutcome::Seeded { .. }
        ));
        assert_eq!(backend.stores().count(), 9);
    }
}
