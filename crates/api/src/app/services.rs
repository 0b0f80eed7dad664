//! Store selection and rules wiring.

use std::sync::Arc;

use anyhow::Context;

use stockroom_infra::{InMemoryInventoryStore, PostgresInventoryStore};
use stockroom_inventory::{InventoryRules, RecordStore};

use crate::config::{ApiConfig, StoreBackend};

/// Rules over whichever store the process was configured with.
pub type DynInventoryRules = InventoryRules<Arc<dyn RecordStore>>;

/// Shared services handed to every request handler.
pub struct AppServices {
    inventory: DynInventoryRules,
    backend: StoreBackend,
}

impl AppServices {
    pub fn new(store: Arc<dyn RecordStore>, backend: StoreBackend) -> Self {
        Self {
            inventory: InventoryRules::with_system_clock(store),
            backend,
        }
    }

    /// In-memory wiring (dev/test).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryInventoryStore::new()), StoreBackend::InMemory)
    }

    pub fn inventory(&self) -> &DynInventoryRules {
        &self.inventory
    }

    pub fn backend(&self) -> StoreBackend {
        self.backend
    }
}

pub async fn build_services(config: &ApiConfig) -> anyhow::Result<AppServices> {
    match &config.store {
        StoreBackend::InMemory => {
            tracing::info!("using in-memory inventory store");
            Ok(AppServices::in_memory())
        }
        StoreBackend::Postgres => {
            let database = config
                .database
                .as_ref()
                .context("DATABASE_URL must be set when USE_PERSISTENT_STORES=true")?;
            let store = PostgresInventoryStore::connect(&database.url, database.max_connections)
                .await
                .context("failed to connect to Postgres")?;
            tracing::info!(
                max_connections = database.max_connections,
                "using Postgres inventory store"
            );
            Ok(AppServices::new(Arc::new(store), StoreBackend::Postgres))
        }
    }
}
