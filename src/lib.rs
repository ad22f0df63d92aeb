//! Person Registry
//!
//! A REST service managing two record types, users and admins, with:
//! - Validation of every record before it is written
//! - PostgreSQL or in-memory storage
//! - Bulk listing that skips unreadable rows instead of failing

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use api::state::AppState;
use infrastructure::storage::{PersonRepositories, StorageFactory};
use tracing::info;

/// Create the application state for the configured storage backend
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let storage_config = config.storage.storage_config()?;
    info!(storage = ?storage_config.storage_type(), "Initializing storage");

    let state = match StorageFactory::create(&storage_config).await? {
        PersonRepositories::InMemory { users, admins } => {
            AppState::from_repositories(users, admins)
        }
        PersonRepositories::Postgres { users, admins } => {
            AppState::from_repositories(users, admins)
        }
    };

    info!("Application state initialized");

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::PersonServiceTrait;

    #[tokio::test]
    async fn test_create_in_memory_state() {
        let mut config = AppConfig::default();
        config.storage.backend = "memory".to_string();

        let state = create_app_state_with_config(&config).await.unwrap();

        assert!(state.users.get_all().await.unwrap().records.is_empty());
        assert!(state.admins.get_all().await.unwrap().records.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_backend() {
        let mut config = AppConfig::default();
        config.storage.backend = "cassandra".to_string();

        assert!(create_app_state_with_config(&config).await.is_err());
    }
}
