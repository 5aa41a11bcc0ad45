//! In-memory storage implementation

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::storage::{Storage, StorageEntity, StorageKey};
use crate::domain::DomainError;

/// Thread-safe in-memory storage implementation
///
/// Useful for testing and development. Data is lost when the process
/// terminates.
#[derive(Debug)]
pub struct InMemoryStorage<E>
where
    E: StorageEntity,
{
    entities: RwLock<HashMap<String, E>>,
}

impl<E> Default for InMemoryStorage<E>
where
    E: StorageEntity,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E> InMemoryStorage<E>
where
    E: StorageEntity,
{
    /// Creates a new empty in-memory storage
    pub fn new() -> Self {
        Self {
            entities: RwLock::new(HashMap::new()),
        }
    }

    /// Creates storage pre-populated with entities
    pub fn with_entities(entities: Vec<E>) -> Self {
        let storage = Self::new();
        {
            let mut map = storage.entities.write().unwrap();

            for entity in entities {
                map.insert(entity.key().as_str().to_string(), entity);
            }
        }
        storage
    }

    fn read_lock(&self) -> Result<std::sync::RwLockReadGuard<'_, HashMap<String, E>>, DomainError> {
        self.entities
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write_lock(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<String, E>>, DomainError> {
        self.entities
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))
    }
}

#[async_trait]
impl<E> Storage<E> for InMemoryStorage<E>
where
    E: StorageEntity + 'static,
{
    async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError> {
        Ok(self.read_lock()?.get(key.as_str()).cloned())
    }

    async fn list(&self) -> Result<Vec<E>, DomainError> {
        Ok(self.read_lock()?.values().cloned().collect())
    }

    async fn create(&self, entity: E) -> Result<E, DomainError> {
        let key = entity.key().as_str().to_string();
        let mut entities = self.write_lock()?;

        if entities.contains_key(&key) {
            return Err(DomainError::conflict(format!(
                "Entity with key '{}' already exists",
                key
            )));
        }

        entities.insert(key, entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: E) -> Result<E, DomainError> {
        let key = entity.key().as_str().to_string();
        let mut entities = self.write_lock()?;

        if !entities.contains_key(&key) {
            return Err(DomainError::not_found(format!(
                "Entity with key '{}' not found",
                key
            )));
        }

        entities.insert(key, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, key: &E::Key) -> Result<bool, DomainError> {
        Ok(self.write_lock()?.remove(key.as_str()).is_some())
    }

    async fn exists(&self, key: &E::Key) -> Result<bool, DomainError> {
        Ok(self.read_lock()?.contains_key(key.as_str()))
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.read_lock()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::storage::StorageKey;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    struct TestId(String);

    impl StorageKey for TestId {
        fn as_str(&self) -> &str {
            &self.0
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct TestEntity {
        id: TestId,
        name: String,
    }

    impl StorageEntity for TestEntity {
        type Key = TestId;

        fn key(&self) -> &Self::Key {
            &self.id
        }
    }

    fn entity(id: &str, name: &str) -> TestEntity {
        TestEntity {
            id: TestId(id.to_string()),
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let storage: InMemoryStorage<TestEntity> = InMemoryStorage::new();
        let e = entity("1", "Test");

        storage.create(e.clone()).await.unwrap();

        let result = storage.get(&TestId("1".to_string())).await.unwrap();
        assert_eq!(result, Some(e));
    }

    #[tokio::test]
    async fn test_create_conflict() {
        let storage: InMemoryStorage<TestEntity> = InMemoryStorage::new();

        storage.create(entity("1", "Test")).await.unwrap();
        let result = storage.create(entity("1", "Test")).await;

        assert!(matches!(result.unwrap_err(), DomainError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_update() {
        let storage: InMemoryStorage<TestEntity> = InMemoryStorage::new();

        storage.create(entity("1", "Test")).await.unwrap();
        storage.update(entity("1", "Updated")).await.unwrap();

        let result = storage.get(&TestId("1".to_string())).await.unwrap();
        assert_eq!(result.unwrap().name, "Updated");
    }

    #[tokio::test]
    async fn test_update_not_found() {
        let storage: InMemoryStorage<TestEntity> = InMemoryStorage::new();

        let result = storage.update(entity("1", "Test")).await;
        assert!(matches!(result.unwrap_err(), DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete() {
        let storage: InMemoryStorage<TestEntity> = InMemoryStorage::new();

        storage.create(entity("1", "Test")).await.unwrap();

        assert!(storage.delete(&TestId("1".to_string())).await.unwrap());
        assert!(!storage.exists(&TestId("1".to_string())).await.unwrap());
        assert!(!storage.delete(&TestId("1".to_string())).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_and_count() {
        let storage: InMemoryStorage<TestEntity> = InMemoryStorage::new();

        storage.create(entity("1", "A")).await.unwrap();
        storage.create(entity("2", "B")).await.unwrap();
        storage.create(entity("3", "C")).await.unwrap();

        assert_eq!(storage.list().await.unwrap().len(), 3);
        assert_eq!(storage.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_with_entities() {
        let storage = InMemoryStorage::with_entities(vec![entity("1", "A"), entity("2", "B")]);

        let count = storage.count().await.unwrap();
        assert_eq!(count, 2);
    }
}
