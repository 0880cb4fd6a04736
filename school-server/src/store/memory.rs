use super::{StoreBackend, StoreError, Table};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Tables {
    records: HashMap<Table, BTreeMap<u64, String>>,
    sequences: HashMap<Table, u64>,
}

#[derive(Clone, Debug, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }
}

fn decode<T: DeserializeOwned>(value: &str) -> Result<T, StoreError> {
    serde_json::from_str(value).map_err(|e| StoreError::Deserialization(e.to_string()))
}

#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn next_id(&self, table: Table) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        let sequence = tables.sequences.entry(table).or_insert(0);
        *sequence += 1;
        Ok(*sequence)
    }

    async fn put<T: Serialize + Send + Sync>(
        &self,
        table: Table,
        id: u64,
        value: &T,
    ) -> Result<(), StoreError> {
        let serialized = serde_json::to_string(value)?;
        let mut tables = self.tables.write().await;
        tables.records.entry(table).or_default().insert(id, serialized);
        Ok(())
    }

    async fn get<T: DeserializeOwned + Send + Sync>(
        &self,
        table: Table,
        id: u64,
    ) -> Result<Option<T>, StoreError> {
        let tables = self.tables.read().await;
        tables
            .records
            .get(&table)
            .and_then(|records| records.get(&id))
            .map(|value| decode(value))
            .transpose()
    }

    async fn list<T: DeserializeOwned + Send + Sync>(
        &self,
        table: Table,
    ) -> Result<Vec<T>, StoreError> {
        let tables = self.tables.read().await;
        match tables.records.get(&table) {
            Some(records) => records.values().map(|value| decode(value)).collect(),
            None => Ok(Vec::new()),
        }
    }

    async fn delete(&self, table: Table, id: u64) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .records
            .get_mut(&table)
            .map(|records| records.remove(&id).is_some())
            .unwrap_or(false))
    }

    async fn count(&self, table: Table) -> Result<u64, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .records
            .get(&table)
            .map(|records| records.len() as u64)
            .unwrap_or(0))
    }

    async fn health_check(&self) -> Result<(), String> {
        Ok(())
    }
}
