//! PostgreSQL connection pooling

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use crate::domain::DomainError;

/// PostgreSQL pool configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Idle timeout in seconds
    pub idle_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost:5432/person_registry".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    pub fn with_idle_timeout(mut self, secs: u64) -> Self {
        self.idle_timeout_secs = secs;
        self
    }

    /// The URL with any password masked, for logging
    pub fn redacted_url(&self) -> String {
        redact_password(&self.url)
    }
}

/// Assemble a connection URL from its parts
pub fn connection_url(user: &str, password: &str, host: &str, port: u16, database: &str) -> String {
    if password.is_empty() {
        format!("postgres://{}@{}:{}/{}?sslmode=disable", user, host, port, database)
    } else {
        format!(
            "postgres://{}:{}@{}:{}/{}?sslmode=disable",
            user, password, host, port, database
        )
    }
}

fn redact_password(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let Some((credentials, location)) = rest.split_once('@') else {
        return url.to_string();
    };

    match credentials.split_once(':') {
        Some((user, _)) => format!("{}://{}:***@{}", scheme, user, location),
        None => url.to_string(),
    }
}

/// Open a connection pool and check it with a round trip
pub async fn connect(config: &PostgresConfig) -> Result<PgPool, DomainError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect(&config.url)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))?;

    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .map_err(|e| DomainError::storage(format!("PostgreSQL ping failed: {}", e)))?;

    info!(url = %config.redacted_url(), "Connected to PostgreSQL");

    Ok(pool)
}
