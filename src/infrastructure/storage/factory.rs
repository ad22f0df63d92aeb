//! Storage factory for runtime backend selection

use std::sync::Arc;

use tracing::info;

use crate::domain::{DomainError, PersonKind};
use crate::infrastructure::person::{InMemoryPersonRepository, PostgresPersonRepository};

use super::postgres::{self, PostgresConfig};

/// Supported storage types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl StorageType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    InMemory,
    Postgres(PostgresConfig),
}

impl StorageConfig {
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    pub fn postgres(config: PostgresConfig) -> Self {
        Self::Postgres(config)
    }

    /// Creates a PostgreSQL configuration from a URL
    pub fn postgres_url(url: impl Into<String>) -> Self {
        Self::Postgres(PostgresConfig::new(url))
    }

    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }
}

/// User and admin repositories sharing one backend
#[derive(Debug, Clone)]
pub enum PersonRepositories {
    InMemory {
        users: Arc<InMemoryPersonRepository>,
        admins: Arc<InMemoryPersonRepository>,
    },
    Postgres {
        users: Arc<PostgresPersonRepository>,
        admins: Arc<PostgresPersonRepository>,
    },
}

/// Factory for creating repositories
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Creates the user and admin repositories for the configured backend
    ///
    /// Both PostgreSQL repositories share a single connection pool.
    pub async fn create(config: &StorageConfig) -> Result<PersonRepositories, DomainError> {
        match config {
            StorageConfig::InMemory => {
                info!("Using in-memory storage");
                Ok(Self::create_in_memory())
            }
            StorageConfig::Postgres(pg_config) => {
                let pool = postgres::connect(pg_config).await?;

                Ok(PersonRepositories::Postgres {
                    users: Arc::new(PostgresPersonRepository::new(pool.clone(), PersonKind::User)),
                    admins: Arc::new(PostgresPersonRepository::new(pool, PersonKind::Admin)),
                })
            }
        }
    }

    /// Creates empty in-memory repositories
    pub fn create_in_memory() -> PersonRepositories {
        PersonRepositories::InMemory {
            users: Arc::new(InMemoryPersonRepository::new(PersonKind::User)),
            admins: Arc::new(InMemoryPersonRepository::new(PersonKind::Admin)),
        }
    }
}
