use crate::config::SchoolConfig;
use crate::printer::StudentPrinter;
use crate::store::{create_store, Store, StoreBackend, StoreError};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SchoolConfig>,
    pub store: Arc<Store>,
    pub printer: Arc<StudentPrinter>,
    /// Cancelled when the server starts shutting down
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Builds the state with the store selected by the configuration
    pub async fn new(config: &SchoolConfig) -> Result<Self, StoreError> {
        let store = create_store(config).await?;
        Ok(Self::with_existing_store(config, store))
    }

    pub fn with_existing_store(config: &SchoolConfig, store: Store) -> Self {
        Self {
            config: Arc::new(config.clone()),
            store: Arc::new(store),
            printer: Arc::new(StudentPrinter::stdout(config.printer.clone())),
            shutdown: CancellationToken::new(),
        }
    }

    #[cfg(test)]
    pub fn for_testing(config: &SchoolConfig) -> Self {
        Self::with_existing_store(
            config,
            Store::InMemory(crate::store::memory::InMemoryStore::new()),
        )
    }

    /// Check if all components are healthy
    pub async fn health_check(&self) -> bool {
        match self.store.health_check().await {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Store health check failed: {}", e);
                false
            }
        }
    }
}
