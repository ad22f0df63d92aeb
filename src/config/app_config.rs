use serde::Deserialize;

use crate::infrastructure::storage::{connection_url, PostgresConfig, StorageConfig, StorageType};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Storage backend selection
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// `postgres` or `memory`
    pub backend: String,
    pub postgres: PostgresSettings,
}

/// PostgreSQL connection settings
///
/// A non-empty `url` is used as is; otherwise the URL is assembled from
/// the individual parts.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PostgresSettings {
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: "postgres".to_string(),
            postgres: PostgresSettings::default(),
        }
    }
}

impl Default for PostgresSettings {
    fn default() -> Self {
        let pool = PostgresConfig::default();

        Self {
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            database: "person_registry".to_string(),
            user: "postgres".to_string(),
            password: String::new(),
            max_connections: pool.max_connections,
            min_connections: pool.min_connections,
            connect_timeout_secs: pool.connect_timeout_secs,
            idle_timeout_secs: pool.idle_timeout_secs,
        }
    }
}

impl PostgresSettings {
    pub fn connection_url(&self) -> String {
        match self.url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => connection_url(&self.user, &self.password, &self.host, self.port, &self.database),
        }
    }

    pub fn pool_config(&self) -> PostgresConfig {
        PostgresConfig::new(self.connection_url())
            .with_max_connections(self.max_connections)
            .with_min_connections(self.min_connections)
            .with_connect_timeout(self.connect_timeout_secs)
            .with_idle_timeout(self.idle_timeout_secs)
    }
}

impl StorageSettings {
    /// Resolves the configured backend into a storage configuration
    pub fn storage_config(&self) -> anyhow::Result<StorageConfig> {
        match StorageType::from_str(&self.backend) {
            Some(StorageType::InMemory) => Ok(StorageConfig::in_memory()),
            Some(StorageType::Postgres) => Ok(StorageConfig::postgres(self.postgres.pool_config())),
            None => anyhow::bail!("Unknown storage backend '{}'", self.backend),
        }
    }
}

impl AppConfig {
    /// Loads `config/default`, then `config/local`, then `APP__*` variables
    ///
    /// `DATABASE_URL`, when set, overrides `storage.postgres.url`.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("storage.postgres.url", std::env::var("DATABASE_URL").ok())?
            .build()?;

        config.try_deserialize()
    }
}
