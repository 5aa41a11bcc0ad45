//! Storage trait definition

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

use super::entity::StorageEntity;

/// Generic storage trait for CRUD operations on any entity type
#[async_trait]
pub trait Storage<E>: Send + Sync + Debug
where
    E: StorageEntity + 'static,
{
    /// Retrieves an entity by its key
    async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError>;

    /// Retrieves all entities
    async fn list(&self) -> Result<Vec<E>, DomainError>;

    /// Creates a new entity, returns error if already exists
    async fn create(&self, entity: E) -> Result<E, DomainError>;

    /// Updates an existing entity, returns error if not found
    async fn update(&self, entity: E) -> Result<E, DomainError>;

    /// Deletes an entity by its key, returns true if deleted
    async fn delete(&self, key: &E::Key) -> Result<bool, DomainError>;

    /// Checks if an entity exists by its key
    async fn exists(&self, key: &E::Key) -> Result<bool, DomainError> {
        Ok(self.get(key).await?.is_some())
    }

    /// Returns the count of entities
    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.list().await?.len())
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::domain::storage::StorageKey;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock storage for testing
    #[derive(Debug)]
    pub struct MockStorage<E>
    where
        E: StorageEntity,
    {
        entities: Mutex<HashMap<String, E>>,
        error: Mutex<Option<String>>,
    }

    impl<E> Default for MockStorage<E>
    where
        E: StorageEntity,
    {
        fn default() -> Self {
            Self::new()
        }
    }

    impl<E> MockStorage<E>
    where
        E: StorageEntity,
    {
        pub fn new() -> Self {
            Self {
                entities: Mutex::new(HashMap::new()),
                error: Mutex::new(None),
            }
        }

        /// Pre-populate the store with an entity
        pub fn with_entity(self, entity: E) -> Self {
            self.entities
                .lock()
                .unwrap()
                .insert(entity.key().as_str().to_string(), entity);
            self
        }

        /// Make every operation fail with the given storage error
        pub fn with_error(self, error: impl Into<String>) -> Self {
            *self.error.lock().unwrap() = Some(error.into());
            self
        }

        fn check_error(&self) -> Result<(), DomainError> {
            if let Some(error) = self.error.lock().unwrap().clone() {
                return Err(DomainError::storage(error));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl<E> Storage<E> for MockStorage<E>
    where
        E: StorageEntity + 'static,
    {
        async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError> {
            self.check_error()?;
            Ok(self.entities.lock().unwrap().get(key.as_str()).cloned())
        }

        async fn list(&self) -> Result<Vec<E>, DomainError> {
            self.check_error()?;
            Ok(self.entities.lock().unwrap().values().cloned().collect())
        }

        async fn create(&self, entity: E) -> Result<E, DomainError> {
            self.check_error()?;
            let key = entity.key().as_str().to_string();
            let mut entities = self.entities.lock().unwrap();

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
            self.check_error()?;
            let key = entity.key().as_str().to_string();
            let mut entities = self.entities.lock().unwrap();

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
            self.check_error()?;
            Ok(self.entities.lock().unwrap().remove(key.as_str()).is_some())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use serde::{Deserialize, Serialize};

        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        struct TestKey(String);

        impl StorageKey for TestKey {
            fn as_str(&self) -> &str {
                &self.0
            }
        }

        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        struct TestEntity {
            id: TestKey,
            name: String,
        }

        impl StorageEntity for TestEntity {
            type Key = TestKey;

            fn key(&self) -> &Self::Key {
                &self.id
            }
        }

        fn entity(id: &str, name: &str) -> TestEntity {
            TestEntity {
                id: TestKey(id.to_string()),
                name: name.to_string(),
            }
        }

        #[tokio::test]
        async fn test_mock_create_and_get() {
            let storage: MockStorage<TestEntity> = MockStorage::new();

            storage.create(entity("1", "First")).await.unwrap();

            let result = storage.get(&TestKey("1".to_string())).await.unwrap();
            assert_eq!(result.unwrap().name, "First");
        }

        #[tokio::test]
        async fn test_mock_create_conflict() {
            let storage = MockStorage::new().with_entity(entity("1", "First"));

            let result = storage.create(entity("1", "Again")).await;
            assert!(matches!(result, Err(DomainError::Conflict { .. })));
        }

        #[tokio::test]
        async fn test_mock_update_not_found() {
            let storage: MockStorage<TestEntity> = MockStorage::new();

            let result = storage.update(entity("1", "Ghost")).await;
            assert!(matches!(result, Err(DomainError::NotFound { .. })));
        }

        #[tokio::test]
        async fn test_mock_delete() {
            let storage = MockStorage::new().with_entity(entity("1", "First"));

            assert!(storage.delete(&TestKey("1".to_string())).await.unwrap());
            assert!(!storage.exists(&TestKey("1".to_string())).await.unwrap());
            assert!(!storage.delete(&TestKey("1".to_string())).await.unwrap());
        }

        #[tokio::test]
        async fn test_mock_list_and_count() {
            let storage = MockStorage::new()
                .with_entity(entity("1", "First"))
                .with_entity(entity("2", "Second"));

            assert_eq!(storage.list().await.unwrap().len(), 2);
            assert_eq!(storage.count().await.unwrap(), 2);
        }

        #[tokio::test]
        async fn test_mock_with_error() {
            let storage: MockStorage<TestEntity> = MockStorage::new().with_error("boom");

            let result = storage.list().await;
            assert!(matches!(result, Err(DomainError::Storage { .. })));
        }
    }
}
