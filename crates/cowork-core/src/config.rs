use crate::error::{CoworkError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Environment variable naming an optional TOML configuration file
pub const CONFIG_PATH_VAR: &str = "COWORK_CONFIG";

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Deployment environment indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Local,
    Test,
    Production,
}

impl Environment {
    /// Local and test deployments always run on the fixture store
    pub fn uses_fixtures(&self) -> bool {
        matches!(self, Environment::Local | Environment::Test)
    }
}

/// Table identifiers and connection string of the table-backed store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    pub database_url: String,
    pub spaces: String,
    pub pricing: String,
    pub services: String,
    pub reports: String,
    pub posts: String,
}

/// Layered configuration of the API server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: ConfigValue<u16>,
    pub environment: ConfigValue<Environment>,
    pub base_path: ConfigValue<Option<String>>,
    pub database_url: ConfigValue<Option<String>>,
    pub spaces_table: ConfigValue<Option<String>>,
    pub pricing_table: ConfigValue<Option<String>>,
    pub services_table: ConfigValue<Option<String>>,
    pub reports_table: ConfigValue<String>,
    pub posts_table: ConfigValue<String>,
}

impl ServerConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            port: ConfigValue::new(3001, ConfigSource::Default),
            environment: ConfigValue::new(Environment::Local, ConfigSource::Default),
            base_path: ConfigValue::new(None, ConfigSource::Default),
            database_url: ConfigValue::new(None, ConfigSource::Default),
            spaces_table: ConfigValue::new(None, ConfigSource::Default),
            pricing_table: ConfigValue::new(None, ConfigSource::Default),
            services_table: ConfigValue::new(None, ConfigSource::Default),
            reports_table: ConfigValue::new("reports".to_string(), ConfigSource::Default),
            posts_table: ConfigValue::new("blog_posts".to_string(), ConfigSource::Default),
        }
    }

    /// Defaults, then the file named by `COWORK_CONFIG` (if any), then environment
    pub fn load() -> Result<Self> {
        let config = Self::with_defaults();
        let config = match env::var(CONFIG_PATH_VAR) {
            Ok(path) => config.load_from_file(path)?,
            Err(_) => config,
        };
        Ok(config.load_from_env())
    }

    /// Load configuration from the `[server]` section of a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let Some(server) = read_file_config(path.as_ref())?.server else {
            return Ok(self);
        };

        if let Some(port) = server.port {
            self.port.update(port, ConfigSource::File);
        }
        if let Some(environment) = server.environment {
            self.environment.update(environment, ConfigSource::File);
        }
        if let Some(base_path) = server.base_path {
            self.base_path.update(normalize_base_path(&base_path), ConfigSource::File);
        }
        if let Some(url) = server.database_url {
            self.database_url.update(Some(url), ConfigSource::File);
        }
        if let Some(tables) = server.tables {
            if let Some(name) = tables.spaces {
                self.spaces_table.update(Some(name), ConfigSource::File);
            }
            if let Some(name) = tables.pricing {
                self.pricing_table.update(Some(name), ConfigSource::File);
            }
            if let Some(name) = tables.services {
                self.services_table.update(Some(name), ConfigSource::File);
            }
            if let Some(name) = tables.reports {
                self.reports_table.update(name, ConfigSource::File);
            }
            if let Some(name) = tables.posts {
                self.posts_table.update(name, ConfigSource::File);
            }
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(self) -> Self {
        self.load_from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup
    pub fn load_from_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let src = ConfigSource::Environment;
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(port_str) = non_empty("COWORK_PORT") {
            match port_str.parse::<u16>() {
                Ok(port) => self.port.update(port, src),
                Err(_) => tracing::warn!(
                    "Invalid COWORK_PORT value '{}': expected a port number",
                    port_str
                ),
            }
        }

        if let Some(env_str) = non_empty("COWORK_ENV") {
            match parse_environment(&env_str) {
                Ok(environment) => self.environment.update(environment, src),
                Err(_) => tracing::warn!(
                    "Invalid COWORK_ENV value '{}': expected local, test or production",
                    env_str
                ),
            }
        }

        if let Some(base_path) = non_empty("COWORK_BASE_PATH") {
            self.base_path.update(normalize_base_path(&base_path), src);
        }
        if let Some(url) = non_empty("DATABASE_URL") {
            self.database_url.update(Some(url), src);
        }
        if let Some(name) = non_empty("COWORK_SPACES_TABLE") {
            self.spaces_table.update(Some(name), src);
        }
        if let Some(name) = non_empty("COWORK_PRICING_TABLE") {
            self.pricing_table.update(Some(name), src);
        }
        if let Some(name) = non_empty("COWORK_SERVICES_TABLE") {
            self.services_table.update(Some(name), src);
        }
        if let Some(name) = non_empty("COWORK_REPORTS_TABLE") {
            self.reports_table.update(name, src);
        }
        if let Some(name) = non_empty("COWORK_POSTS_TABLE") {
            self.posts_table.update(name, src);
        }

        self
    }

    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port.value)
    }

    /// Names of required table-store settings that are not set
    pub fn missing_table_settings(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.database_url.value.is_none() {
            missing.push("DATABASE_URL");
        }
        if self.spaces_table.value.is_none() {
            missing.push("COWORK_SPACES_TABLE");
        }
        if self.pricing_table.value.is_none() {
            missing.push("COWORK_PRICING_TABLE");
        }
        if self.services_table.value.is_none() {
            missing.push("COWORK_SERVICES_TABLE");
        }
        missing
    }

    /// Table-store settings, or `None` when any required one is missing
    pub fn table_config(&self) -> Option<TableConfig> {
        Some(TableConfig {
            database_url: self.database_url.value.clone()?,
            spaces: self.spaces_table.value.clone()?,
            pricing: self.pricing_table.value.clone()?,
            services: self.services_table.value.clone()?,
            reports: self.reports_table.value.clone(),
            posts: self.posts_table.value.clone(),
        })
    }

    /// Get all configuration values as a map for inspection.
    ///
    /// The database URL is reported as set or unset, never echoed.
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();
        let optional = |v: &Option<String>| v.clone().unwrap_or_else(|| "(unset)".to_string());

        map.insert("port".to_string(), (self.port.value.to_string(), self.port.source));
        map.insert(
            "environment".to_string(),
            (format!("{:?}", self.environment.value), self.environment.source),
        );
        map.insert("base_path".to_string(), (optional(&self.base_path.value), self.base_path.source));
        map.insert(
            "database_url".to_string(),
            (
                if self.database_url.value.is_some() { "(set)" } else { "(unset)" }.to_string(),
                self.database_url.source,
            ),
        );
        map.insert(
            "spaces_table".to_string(),
            (optional(&self.spaces_table.value), self.spaces_table.source),
        );
        map.insert(
            "pricing_table".to_string(),
            (optional(&self.pricing_table.value), self.pricing_table.source),
        );
        map.insert(
            "services_table".to_string(),
            (optional(&self.services_table.value), self.services_table.source),
        );
        map.insert(
            "reports_table".to_string(),
            (self.reports_table.value.clone(), self.reports_table.source),
        );
        map.insert("posts_table".to_string(), (self.posts_table.value.clone(), self.posts_table.source));

        map
    }
}

/// Layered configuration of the directory client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: ConfigValue<String>,
    pub api_key: ConfigValue<Option<String>>,
    pub timeout_secs: ConfigValue<u64>,
    pub retries: ConfigValue<u32>,
}

impl ClientConfig {
    pub fn with_defaults() -> Self {
        Self {
            api_url: ConfigValue::new("http://localhost:3001".to_string(), ConfigSource::Default),
            api_key: ConfigValue::new(None, ConfigSource::Default),
            timeout_secs: ConfigValue::new(10, ConfigSource::Default),
            retries: ConfigValue::new(0, ConfigSource::Default),
        }
    }

    /// Load configuration from the `[client]` section of a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let Some(client) = read_file_config(path.as_ref())?.client else {
            return Ok(self);
        };

        if let Some(url) = client.api_url {
            self.api_url.update(url, ConfigSource::File);
        }
        if let Some(key) = client.api_key {
            self.api_key.update(Some(key), ConfigSource::File);
        }
        if let Some(timeout) = client.timeout_secs {
            self.timeout_secs.update(timeout, ConfigSource::File);
        }
        if let Some(retries) = client.retries {
            self.retries.update(retries, ConfigSource::File);
        }

        Ok(self)
    }

    pub fn load_from_env(self) -> Self {
        self.load_from_lookup(|key| env::var(key).ok())
    }

    pub fn load_from_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let src = ConfigSource::Environment;
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty("COWORK_API_URL") {
            self.api_url.update(url, src);
        }
        if let Some(key) = non_empty("COWORK_API_KEY") {
            self.api_key.update(Some(key), src);
        }
        if let Some(timeout_str) = non_empty("COWORK_TIMEOUT_SECS") {
            match timeout_str.parse::<u64>() {
                Ok(timeout) => self.timeout_secs.update(timeout, src),
                Err(_) => tracing::warn!(
                    "Invalid COWORK_TIMEOUT_SECS value '{}': expected whole seconds",
                    timeout_str
                ),
            }
        }
        if let Some(retries_str) = non_empty("COWORK_RETRIES") {
            match retries_str.parse::<u32>() {
                Ok(retries) => self.retries.update(retries, src),
                Err(_) => tracing::warn!(
                    "Invalid COWORK_RETRIES value '{}': expected a whole number",
                    retries_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: ClientOverrides) {
        if let Some(url) = overrides.api_url {
            self.api_url.update(url, ConfigSource::Cli);
        }
        if let Some(key) = overrides.api_key {
            self.api_key.update(Some(key), ConfigSource::Cli);
        }
        if let Some(timeout) = overrides.timeout_secs {
            self.timeout_secs.update(timeout, ConfigSource::Cli);
        }
        if let Some(retries) = overrides.retries {
            self.retries.update(retries, ConfigSource::Cli);
        }
    }

    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();
        map.insert("api_url".to_string(), (self.api_url.value.clone(), self.api_url.source));
        map.insert(
            "api_key".to_string(),
            (
                if self.api_key.value.is_some() { "(set)" } else { "(unset)" }.to_string(),
                self.api_key.source,
            ),
        );
        map.insert(
            "timeout_secs".to_string(),
            (self.timeout_secs.value.to_string(), self.timeout_secs.source),
        );
        map.insert("retries".to_string(), (self.retries.value.to_string(), self.retries.source));
        map
    }
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct ClientOverrides {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
    pub retries: Option<u32>,
}

/// Configuration loaded from TOML file
#[derive(Debug, Default, Deserialize, Serialize)]
struct FileConfig {
    server: Option<ServerFileConfig>,
    client: Option<ClientFileConfig>,
}

#[derive(Debug, Deserialize, Serialize)]
struct ServerFileConfig {
    port: Option<u16>,
    environment: Option<Environment>,
    base_path: Option<String>,
    database_url: Option<String>,
    tables: Option<TablesFileConfig>,
}

#[derive(Debug, Deserialize, Serialize)]
struct TablesFileConfig {
    spaces: Option<String>,
    pricing: Option<String>,
    services: Option<String>,
    reports: Option<String>,
    posts: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
struct ClientFileConfig {
    api_url: Option<String>,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
    retries: Option<u32>,
}

fn read_file_config(path: &Path) -> Result<FileConfig> {
    let content = fs::read_to_string(path).map_err(|e| CoworkError::ConfigInvalid {
        key: "file".to_string(),
        reason: format!("Failed to read config file: {}", e),
    })?;

    toml::from_str(&content).map_err(|e| CoworkError::ConfigInvalid {
        key: "file".to_string(),
        reason: format!("Failed to parse TOML: {}", e),
    })
}

/// Parse environment indicator from string
pub fn parse_environment(s: &str) -> Result<Environment> {
    match s.trim().to_lowercase().as_str() {
        "local" | "dev" | "development" => Ok(Environment::Local),
        "test" => Ok(Environment::Test),
        "production" | "prod" | "staging" => Ok(Environment::Production),
        _ => Err(CoworkError::ConfigInvalid {
            key: "environment".to_string(),
            reason: format!("Invalid environment: {}. Use local, test or production", s),
        }),
    }
}

/// `"prod/"` and `"/prod"` both become `Some("/prod")`; `"/"` becomes `None`
fn normalize_base_path(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(format!("/{}", trimmed))
    }
}
