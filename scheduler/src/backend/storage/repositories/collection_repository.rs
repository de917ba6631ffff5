use log::{debug, info};
use std::marker::PhantomData;

use crate::backend::storage::connection::StorageConnection;
use crate::backend::storage::error::StorageResult;
use crate::backend::storage::traits::{CollectionStorage, Entity};

/// Whole-collection JSON array repository for one entity kind
pub struct CollectionRepository<E: Entity> {
    connection: StorageConnection,
    _entity: PhantomData<fn() -> E>,
}

// Manual impl: deriving would require `E: Clone` on the marker
impl<E: Entity> Clone for CollectionRepository<E> {
    fn clone(&self) -> Self {
        Self {
            connection: self.connection.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> CollectionRepository<E> {
    pub fn new(connection: StorageConnection) -> Self {
        Self {
            connection,
            _entity: PhantomData,
        }
    }

    fn key(&self) -> &str {
        E::collection_key(self.connection.keys())
    }

    fn save(&self, entities: &[E]) -> StorageResult<()> {
        self.connection.save_json(self.key(), entities)
    }
}

impl<E: Entity> CollectionStorage<E> for CollectionRepository<E> {
    fn list(&self) -> Vec<E> {
        let entities: Vec<E> = self.connection.load_json(self.key()).unwrap_or_default();
        debug!("Loaded {} {} records", entities.len(), E::KIND);
        entities
    }

    fn get(&self, id: &str) -> Option<E> {
        self.list().into_iter().find(|e| e.id() == id)
    }

    fn insert(&self, entity: &E) -> StorageResult<()> {
        let mut entities = self.list();
        entities.push(entity.clone());
        self.save(&entities)
    }

    fn replace(&self, entity: &E) -> StorageResult<bool> {
        let mut entities = self.list();
        let Some(slot) = entities.iter_mut().find(|e| e.id() == entity.id()) else {
            return Ok(false);
        };
        *slot = entity.clone();
        self.save(&entities)?;
        Ok(true)
    }

    fn remove(&self, id: &str) -> StorageResult<bool> {
        let mut entities = self.list();
        let before = entities.len();
        entities.retain(|e| e.id() != id);
        if entities.len() == before {
            return Ok(false);
        }
        self.save(&entities)?;
        Ok(true)
    }

    fn replace_all(&self, entities: &[E]) -> StorageResult<()> {
        self.save(entities)?;
        info!("Replaced {} collection with {} records", E::KIND, entities.len());
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        self.connection.remove(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::test_utils::TestHelper;
    use shared::Store;

    fn store(id: &str, name: &str) -> Store {
        Store {
            id: id.to_string(),
            name: name.to_string(),
            address: String::new(),
            phone: String::new(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_insert_preserves_order() {
        let helper = TestHelper::new().unwrap();
        let repo = &helper.store_repo;

        repo.insert(&store("store1", "联庄")).unwrap();
        repo.insert(&store("store2", "余杭")).unwrap();

        let names: Vec<_> = repo.list().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["联庄", "余杭"]);
        assert_eq!(repo.get("store2").unwrap().name, "余杭");
        assert!(repo.get("store3").is_none());
    }

    #[test]
    fn test_replace_and_remove_report_presence() {
        let helper = TestHelper::new().unwrap();
        let repo = &helper.store_repo;
        repo.insert(&store("store1", "联庄")).unwrap();

        assert!(repo.replace(&store("store1", "新联庄")).unwrap());
        assert!(!repo.replace(&store("nope", "x")).unwrap());
        assert_eq!(repo.get("store1").unwrap().name, "新联庄");

        assert!(repo.remove("store1").unwrap());
        assert!(!repo.remove("store1").unwrap());
        assert!(repo.list().is_empty());
    }

    #[test]
    fn test_corrupt_collection_reads_as_empty() {
        let helper = TestHelper::new().unwrap();
        let key = helper.env.connection.keys().stores.clone();
        helper.env.connection.write_raw(&key, "{\"oops\":").unwrap();

        assert!(helper.store_repo.list().is_empty());
    }

    #[test]
    fn test_data_is_shared_through_connection() {
        let helper = TestHelper::new().unwrap();
        helper.store_repo.insert(&store("store1", "联庄")).unwrap();

        let other: CollectionRepository<Store> =
            CollectionRepository::new(helper.env.connection.clone());
        assert_eq!(other.list().len(), 1);
    }
}
