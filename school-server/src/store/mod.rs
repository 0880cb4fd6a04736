use crate::config::{SchoolConfig, StoreBackendKind};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

pub mod memory;
pub mod redis;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to serialize record: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Failed to parse record: {0}")]
    Deserialization(String),
    #[error("Redis error: {0}")]
    Redis(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// The record tables kept by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    Students,
    Faculties,
    Avatars,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Students => "students",
            Self::Faculties => "faculties",
            Self::Avatars => "avatars",
        }
    }
}

/// Record store interface shared by every backend.
///
/// Records are JSON documents addressed by a table and a numeric id.
/// Ids come from a per-table sequence and never repeat, even after deletes.
/// `list` always returns records ordered by ascending id.
#[async_trait::async_trait]
pub trait StoreBackend: Send + Sync {
    /// Reserve the next id of a table
    async fn next_id(&self, table: Table) -> Result<u64, StoreError>;

    /// Insert or replace a record
    async fn put<T: Serialize + Send + Sync>(
        &self,
        table: Table,
        id: u64,
        value: &T,
    ) -> Result<(), StoreError>;

    /// Retrieve a record
    async fn get<T: DeserializeOwned + Send + Sync>(
        &self,
        table: Table,
        id: u64,
    ) -> Result<Option<T>, StoreError>;

    /// Retrieve every record of a table, ordered by id
    async fn list<T: DeserializeOwned + Send + Sync>(
        &self,
        table: Table,
    ) -> Result<Vec<T>, StoreError>;

    /// Delete a record, returning whether it existed
    async fn delete(&self, table: Table, id: u64) -> Result<bool, StoreError>;

    /// Number of records in a table
    async fn count(&self, table: Table) -> Result<u64, StoreError>;

    /// Returns Ok(()) if the backend is reachable
    async fn health_check(&self) -> Result<(), String>;
}

/// Store implementation chosen at runtime from the configuration.
#[derive(Clone)]
pub enum Store {
    /// Process-local store, lost on restart
    InMemory(memory::InMemoryStore),
    /// Redis hashes, one per table
    Redis(redis::RedisStore),
}

#[async_trait::async_trait]
impl StoreBackend for Store {
    async fn next_id(&self, table: Table) -> Result<u64, StoreError> {
        match self {
            Self::InMemory(store) => store.next_id(table).await,
            Self::Redis(store) => store.next_id(table).await,
        }
    }

    async fn put<T: Serialize + Send + Sync>(
        &self,
        table: Table,
        id: u64,
        value: &T,
    ) -> Result<(), StoreError> {
        match self {
            Self::InMemory(store) => store.put(table, id, value).await,
            Self::Redis(store) => store.put(table, id, value).await,
        }
    }

    async fn get<T: DeserializeOwned + Send + Sync>(
        &self,
        table: Table,
        id: u64,
    ) -> Result<Option<T>, StoreError> {
        match self {
            Self::InMemory(store) => store.get(table, id).await,
            Self::Redis(store) => store.get(table, id).await,
        }
    }

    async fn list<T: DeserializeOwned + Send + Sync>(
        &self,
        table: Table,
    ) -> Result<Vec<T>, StoreError> {
        match self {
            Self::InMemory(store) => store.list(table).await,
            Self::Redis(store) => store.list(table).await,
        }
    }

    async fn delete(&self, table: Table, id: u64) -> Result<bool, StoreError> {
        match self {
            Self::InMemory(store) => store.delete(table, id).await,
            Self::Redis(store) => store.delete(table, id).await,
        }
    }

    async fn count(&self, table: Table) -> Result<u64, StoreError> {
        match self {
            Self::InMemory(store) => store.count(table).await,
            Self::Redis(store) => store.count(table).await,
        }
    }

    async fn health_check(&self) -> Result<(), String> {
        match self {
            Self::InMemory(store) => store.health_check().await,
            Self::Redis(store) => store.health_check().await,
        }
    }
}

/// Creates the store selected by the configuration
pub async fn create_store(config: &SchoolConfig) -> Result<Store, StoreError> {
    match config.store.backend {
        StoreBackendKind::InMemory => {
            log::info!("Using in-memory record store");
            Ok(Store::InMemory(memory::InMemoryStore::new()))
        }
        StoreBackendKind::Redis => {
            if config.store.redis.url.is_empty() {
                return Err(StoreError::Config(
                    "Redis store selected but SCHOOL_STORE__REDIS__URL is not set".to_string(),
                ));
            }
            log::info!("Using Redis record store at {}", config.store.redis.url);
            let store =
                redis::RedisStore::new(&config.store.redis.url, &config.store.redis.key_prefix)
                    .await
                    .map_err(StoreError::Redis)?;
            Ok(Store::Redis(store))
        }
    }
}
