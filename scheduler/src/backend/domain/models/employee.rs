use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{Employee, DEFAULT_EMPLOYEE_COLOR};

use super::{validate_name, EntityDraft};
use crate::backend::storage::{Entity, StorageKeys};
use crate::error::Result;

impl Entity for Employee {
    const KIND: &'static str = "employee";

    fn collection_key(keys: &StorageKeys) -> &str {
        &keys.employees
    }

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployeeDraft {
    pub name: String,
    pub position: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub color: Option<String>,
}

impl EntityDraft<Employee> for EmployeeDraft {
    fn validate(&self) -> Result<()> {
        validate_name("Employee", &self.name)
    }

    fn into_new(self, id: String, now: DateTime<Utc>) -> Employee {
        Employee {
            id,
            name: self.name.trim().to_string(),
            position: self.position,
            phone: self.phone.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            color: self.color.unwrap_or_else(|| DEFAULT_EMPLOYEE_COLOR.to_string()),
            created_at: Some(now),
            updated_at: None,
        }
    }

    fn apply_to(self, existing: Employee, now: DateTime<Utc>) -> Employee {
        Employee {
            name: self.name.trim().to_string(),
            position: self.position,
            phone: self.phone.unwrap_or(existing.phone),
            email: self.email.unwrap_or(existing.email),
            color: self.color.unwrap_or(existing.color),
            updated_at: Some(now),
            ..existing
        }
    }
}
