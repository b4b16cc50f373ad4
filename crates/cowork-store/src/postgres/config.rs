//! PostgreSQL configuration

use cowork_core::config::TableConfig;
use std::time::Duration;
use thiserror::Error;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {0}")]
    Missing(String),

    #[error("Invalid configuration value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

/// Table identifiers, injected per deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNames {
    pub spaces: String,
    pub pricing: String,
    pub services: String,
    pub reports: String,
    pub posts: String,
}

impl TableNames {
    /// Every identifier must be `name` or `schema.name` made of ASCII
    /// letters, digits and underscores, since they are spliced into SQL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, name) in [
            ("tables.spaces", &self.spaces),
            ("tables.pricing", &self.pricing),
            ("tables.services", &self.services),
            ("tables.reports", &self.reports),
            ("tables.posts", &self.posts),
        ] {
            if !is_identifier(name) {
                return Err(ConfigError::Invalid {
                    key: key.to_string(),
                    reason: format!("'{}' is not a valid table identifier", name),
                });
            }
        }
        Ok(())
    }
}

fn is_identifier(name: &str) -> bool {
    let parts: Vec<&str> = name.split('.').collect();
    parts.len() <= 2
        && parts.iter().all(|part| {
            let mut chars = part.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}

/// PostgreSQL connection and behavior configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Table identifiers
    pub tables: TableNames,
    /// Connection pool configuration
    pub pool: PoolConfig,
}

impl PostgresConfig {
    /// Build from the server's table settings
    pub fn from_table_config(tables: TableConfig) -> Result<Self, ConfigError> {
        if tables.database_url.trim().is_empty() {
            return Err(ConfigError::Missing("DATABASE_URL".to_string()));
        }

        let config = Self {
            database_url: tables.database_url,
            tables: TableNames {
                spaces: tables.spaces,
                pricing: tables.pricing,
                services: tables.services,
                reports: tables.reports,
                posts: tables.posts,
            },
            pool: PoolConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "database_url".to_string(),
                reason: "cannot be empty".to_string(),
            });
        }

        self.tables.validate()?;
        self.pool.validate()?;

        Ok(())
    }
}

/// Connection pool configuration
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Maximum number of connections allowed
    pub max_connections: u32,
    /// Timeout for acquiring a connection from the pool
    pub acquire_timeout: Duration,
    /// Timeout for idle connections before they are closed
    pub idle_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            min_connections: 0,
            max_connections: 5,
            acquire_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(300),
        }
    }
}

impl PoolConfig {
    /// Validate pool configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_connections > self.max_connections {
            return Err(ConfigError::Invalid {
                key: "pool.min_connections".to_string(),
                reason: format!(
                    "min_connections ({}) cannot be greater than max_connections ({})",
                    self.min_connections, self.max_connections
                ),
            });
        }

        if self.max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "pool.max_connections".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_config() -> TableConfig {
        TableConfig {
            database_url: "postgresql://localhost/cowork".to_string(),
            spaces: "spaces".to_string(),
            pricing: "public.pricing_packages".to_string(),
            services: "services".to_string(),
            reports: "reports".to_string(),
            posts: "blog_posts".to_string(),
        }
    }

    #[test]
    fn test_from_table_config_valid() {
        let config = PostgresConfig::from_table_config(table_config()).unwrap();
        assert_eq!(config.tables.pricing, "public.pricing_packages");
    }

    #[test]
    fn test_rejects_unsafe_identifiers() {
        let mut tables = table_config();
        tables.spaces = "spaces; DROP TABLE reports".to_string();
        match PostgresConfig::from_table_config(tables) {
            Err(ConfigError::Invalid { key, .. }) => assert_eq!(key, "tables.spaces"),
            other => panic!("Expected Invalid error, got {:?}", other.map(|c| c.tables)),
        }
    }

    #[test]
    fn test_rejects_empty_url() {
        let mut tables = table_config();
        tables.database_url = " ".to_string();
        assert!(matches!(
            PostgresConfig::from_table_config(tables),
            Err(ConfigError::Missing(_))
        ));
    }

    #[test]
    fn test_identifier_shapes() {
        assert!(is_identifier("spaces"));
        assert!(is_identifier("_private.spaces_2024"));
        assert!(!is_identifier("1spaces"));
        assert!(!is_identifier("a.b.c"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("spaces\""));
    }

    #[test]
    fn test_pool_config_invalid_min_max() {
        let pool = PoolConfig { min_connections: 20, max_connections: 10, ..PoolConfig::default() };
        assert!(pool.validate().is_err());
    }
}
