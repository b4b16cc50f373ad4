//! Store selection at process start
//!
//! Local and test deployments always use the fixture store. Other
//! deployments use the table-backed store when it is fully configured and
//! reachable, and fall back to the fixture store otherwise.

use cowork_core::config::ServerConfig;
use std::sync::Arc;

use crate::memory::MemoryDirectoryStore;
use crate::ports::{DirectoryStore, StorageBackend};
use crate::postgres::{PostgresConfig, PostgresDirectoryStore};

/// The store chosen for this process
#[derive(Clone)]
pub struct StoreSelection {
    pub store: Arc<dyn DirectoryStore>,
    pub backend: StorageBackend,

    /// Why the table-backed store was not used, when one was expected
    pub fallback_reason: Option<String>,
}

impl StoreSelection {
    fn fixture(fallback_reason: Option<String>) -> Self {
        Self {
            store: Arc::new(MemoryDirectoryStore::seeded()),
            backend: StorageBackend::Fixture,
            fallback_reason,
        }
    }

    fn fallback(reason: String) -> Self {
        tracing::warn!("Falling back to fixture store: {}", reason);
        Self::fixture(Some(reason))
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback_reason.is_some()
    }
}

/// Pick the directory store for the given configuration. Never fails.
pub async fn open_store(config: &ServerConfig) -> StoreSelection {
    let environment = config.environment.value;
    if environment.uses_fixtures() {
        tracing::info!(?environment, "Using fixture store");
        return StoreSelection::fixture(None);
    }

    let Some(tables) = config.table_config() else {
        return StoreSelection::fallback(format!(
            "missing settings: {}",
            config.missing_table_settings().join(", ")
        ));
    };

    let pg_config = match PostgresConfig::from_table_config(tables) {
        Ok(pg_config) => pg_config,
        Err(e) => return StoreSelection::fallback(e.to_string()),
    };

    match PostgresDirectoryStore::with_schema(pg_config).await {
        Ok(store) => {
            tracing::info!(
                spaces = %store.tables().spaces,
                pricing = %store.tables().pricing,
                "Using table-backed store"
            );
            StoreSelection {
                store: Arc::new(store),
                backend: StorageBackend::Postgres,
                fallback_reason: None,
            }
        }
        Err(e) => StoreSelection::fallback(e.to_string()),
    }
}
