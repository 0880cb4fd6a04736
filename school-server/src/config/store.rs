use serde::Deserialize;

/// Specifies which record store implementation to use
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum StoreBackendKind {
    #[default]
    InMemory,
    Redis,
}

/// Configuration for the record store
#[derive(Debug, Deserialize, Clone, Default)]
pub struct StoreConfig {
    /// Store backend: "in-memory" (default) or "redis"
    #[serde(default)]
    pub backend: StoreBackendKind,

    /// Redis store specific configuration
    #[serde(default)]
    pub redis: RedisStoreConfig,
}

/// Redis store configuration options
#[derive(Debug, Deserialize, Clone)]
pub struct RedisStoreConfig {
    /// Redis connection string
    #[serde(default)]
    pub url: String,

    /// Prefix of every key written by the store (default: "school")
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

fn default_key_prefix() -> String {
    "school".to_string()
}

impl Default for RedisStoreConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            key_prefix: default_key_prefix(),
        }
    }
}
