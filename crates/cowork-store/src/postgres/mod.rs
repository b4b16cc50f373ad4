//! PostgreSQL table-backed directory store

pub mod config;
pub mod directory;
pub mod schema;

pub use config::{ConfigError, PoolConfig, PostgresConfig, TableNames};

use cowork_core::error::{CoworkError, Result};
use sqlx::{postgres::PgPoolOptions, PgPool};

/// PostgreSQL storage adapter
pub struct PostgresDirectoryStore {
    pool: PgPool,
    config: PostgresConfig,
}

impl PostgresDirectoryStore {
    /// Connect with the given configuration and verify the connection
    pub async fn connect(config: PostgresConfig) -> Result<Self> {
        config.validate().map_err(|e| CoworkError::ConfigInvalid {
            key: "database_url".to_string(),
            reason: e.to_string(),
        })?;

        let pool = PgPoolOptions::new()
            .min_connections(config.pool.min_connections)
            .max_connections(config.pool.max_connections)
            .acquire_timeout(config.pool.acquire_timeout)
            .idle_timeout(config.pool.idle_timeout)
            .connect(&config.database_url)
            .await
            .map_err(|e| CoworkError::Storage(format!("Failed to connect to database: {}", e)))?;

        let store = Self { pool, config };
        store.health_check().await?;
        Ok(store)
    }

    /// Connect and create any missing tables
    pub async fn with_schema(config: PostgresConfig) -> Result<Self> {
        let store = Self::connect(config).await?;
        schema::ensure_schema(&store.pool, &store.config.tables)
            .await
            .map_err(|e| CoworkError::Storage(format!("Failed to create tables: {}", e)))?;
        Ok(store)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn tables(&self) -> &TableNames {
        &self.config.tables
    }

    /// Perform a health check on the database connection
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| CoworkError::Storage(format!("Health check failed: {}", e)))?;
        Ok(())
    }
}
