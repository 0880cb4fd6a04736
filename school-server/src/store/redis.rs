use super::{StoreBackend, StoreError, Table};
use async_trait::async_trait;
use log::error;
use redis::{aio::ConnectionManager, AsyncCommands, Client};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;

/// Redis backed store.
///
/// Each table is a hash at `<prefix>:<table>` mapping the record id to its
/// JSON document, next to an `INCR` counter at `<prefix>:<table>:seq`.
#[derive(Clone)]
pub struct RedisStore {
    _client: Client,
    conn_manager: ConnectionManager,
    key_prefix: String,
}

impl RedisStore {
    /// Initialize a new Redis store instance
    pub async fn new(redis_url: &str, key_prefix: &str) -> Result<Self, String> {
        let client = match Client::open(redis_url) {
            Ok(client) => client,
            Err(err) => {
                return Err(format!("Failed to connect to Redis: {}", err));
            }
        };

        let conn_manager = match ConnectionManager::new(client.clone()).await {
            Ok(manager) => manager,
            Err(err) => {
                return Err(format!(
                    "Failed to create Redis connection manager: {}",
                    err
                ));
            }
        };

        // Test the connection to ensure it's working
        let mut conn = conn_manager.clone();
        if let Err(err) = redis::cmd("PING").query_async::<String>(&mut conn).await {
            return Err(format!("Failed to ping Redis: {}", err));
        }

        Ok(Self {
            _client: client,
            conn_manager,
            key_prefix: key_prefix.to_string(),
        })
    }

    fn table_key(&self, table: Table) -> String {
        format!("{}:{}", self.key_prefix, table.as_str())
    }

    fn sequence_key(&self, table: Table) -> String {
        format!("{}:{}:seq", self.key_prefix, table.as_str())
    }
}

fn redis_error(operation: &str, key: &str, err: redis::RedisError) -> StoreError {
    error!("Redis error while {} {}: {}", operation, key, err);
    StoreError::Redis(err.to_string())
}

fn decode<T: DeserializeOwned>(value: &str) -> Result<T, StoreError> {
    serde_json::from_str(value).map_err(|e| StoreError::Deserialization(e.to_string()))
}

#[async_trait]
impl StoreBackend for RedisStore {
    async fn next_id(&self, table: Table) -> Result<u64, StoreError> {
        let key = self.sequence_key(table);
        let mut conn = self.conn_manager.clone();
        let id: u64 = conn
            .incr(&key, 1u64)
            .await
            .map_err(|err| redis_error("incrementing", &key, err))?;
        Ok(id)
    }

    async fn put<T: Serialize + Send + Sync>(
        &self,
        table: Table,
        id: u64,
        value: &T,
    ) -> Result<(), StoreError> {
        let serialized = serde_json::to_string(value)?;
        let key = self.table_key(table);
        let mut conn = self.conn_manager.clone();
        let _: () = conn
            .hset(&key, id, serialized)
            .await
            .map_err(|err| redis_error("writing", &key, err))?;
        Ok(())
    }

    async fn get<T: DeserializeOwned + Send + Sync>(
        &self,
        table: Table,
        id: u64,
    ) -> Result<Option<T>, StoreError> {
        let key = self.table_key(table);
        let mut conn = self.conn_manager.clone();
        let value: Option<String> = conn
            .hget(&key, id)
            .await
            .map_err(|err| redis_error("reading", &key, err))?;

        value.map(|value| decode(&value)).transpose()
    }

    async fn list<T: DeserializeOwned + Send + Sync>(
        &self,
        table: Table,
    ) -> Result<Vec<T>, StoreError> {
        let key = self.table_key(table);
        let mut conn = self.conn_manager.clone();
        let entries: HashMap<String, String> = conn
            .hgetall(&key)
            .await
            .map_err(|err| redis_error("listing", &key, err))?;

        let mut records = entries
            .into_iter()
            .map(|(field, value)| {
                field
                    .parse::<u64>()
                    .map(|id| (id, value))
                    .map_err(|e| StoreError::Deserialization(format!("invalid id {field}: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        records.sort_unstable_by_key(|(id, _)| *id);

        records.iter().map(|(_, value)| decode(value)).collect()
    }

    async fn delete(&self, table: Table, id: u64) -> Result<bool, StoreError> {
        let key = self.table_key(table);
        let mut conn = self.conn_manager.clone();
        let removed: u64 = conn
            .hdel(&key, id)
            .await
            .map_err(|err| redis_error("deleting from", &key, err))?;
        Ok(removed > 0)
    }

    async fn count(&self, table: Table) -> Result<u64, StoreError> {
        let key = self.table_key(table);
        let mut conn = self.conn_manager.clone();
        let count: u64 = conn
            .hlen(&key)
            .await
            .map_err(|err| redis_error("counting", &key, err))?;
        Ok(count)
    }

    async fn health_check(&self) -> Result<(), String> {
        let mut conn = self.conn_manager.clone();
        match redis::cmd("PING").query_async::<String>(&mut conn).await {
            Ok(_) => Ok(()),
            Err(err) => Err(format!("Redis health check failed: {}", err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redis_test::server::RedisServer;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestData {
        field: String,
    }

    fn get_redis_url(server: &RedisServer) -> String {
        match &server.addr {
            redis::ConnectionAddr::Tcp(host, port) => {
                format!("redis://{}:{}/", host, port)
            }
            _ => "redis://127.0.0.1:6379/".to_string(),
        }
    }

    #[tokio::test]
    #[ignore]
    async fn test_redis_store_operations() {
        // Start a Redis server for testing
        let server = RedisServer::new();
        let redis_url = get_redis_url(&server);

        let store = RedisStore::new(&redis_url, "school-test").await.unwrap();

        let first = store.next_id(Table::Students).await.unwrap();
        let second = store.next_id(Table::Students).await.unwrap();
        assert_eq!(second, first + 1);

        for (id, field) in [(second, "second"), (first, "first")] {
            store
                .put(
                    Table::Students,
                    id,
                    &TestData {
                        field: field.to_string(),
                    },
                )
                .await
                .unwrap();
        }

        let listed: Vec<TestData> = store.list(Table::Students).await.unwrap();
        assert_eq!(listed[0].field, "first");
        assert_eq!(listed[1].field, "second");
        assert_eq!(store.count(Table::Students).await.unwrap(), 2);

        assert!(store.delete(Table::Students, first).await.unwrap());
        assert!(store
            .get::<TestData>(Table::Students, first)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    #[ignore]
    async fn test_redis_health_check() {
        let server = RedisServer::new();
        let redis_url = get_redis_url(&server);
        let store = RedisStore::new(&redis_url, "school-test").await.unwrap();

        let result = store.health_check().await;

        assert!(result.is_ok(), "health check failed: {:?}", result);
    }
}
