//! Storage infrastructure - backend selection and connection pooling

mod factory;
mod postgres;

pub use factory::{PersonRepositories, StorageConfig, StorageFactory, StorageType};
pub use postgres::{connect, connection_url, PostgresConfig};
