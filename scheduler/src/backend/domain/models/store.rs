use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::Store;

use super::{validate_name, EntityDraft};
use crate::backend::storage::{Entity, StorageKeys};
use crate::error::Result;

impl Entity for Store {
    const KIND: &'static str = "store";

    fn collection_key(keys: &StorageKeys) -> &str {
        &keys.stores
    }

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreDraft {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
}

impl StoreDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl EntityDraft<Store> for StoreDraft {
    fn validate(&self) -> Result<()> {
        validate_name("Store", &self.name)
    }

    fn into_new(self, id: String, now: DateTime<Utc>) -> Store {
        Store {
            id,
            name: self.name.trim().to_string(),
            address: self.address.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            created_at: Some(now),
            updated_at: None,
        }
    }

    fn apply_to(self, existing: Store, now: DateTime<Utc>) -> Store {
        Store {
            name: self.name.trim().to_string(),
            address: self.address.unwrap_or(existing.address),
            phone: self.phone.unwrap_or(existing.phone),
            updated_at: Some(now),
            ..existing
        }
    }
}
