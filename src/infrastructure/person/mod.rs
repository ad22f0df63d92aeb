//! Person infrastructure module
//!
//! Repository implementations for user and admin records (PostgreSQL and
//! in-memory) and the service that validates records before they reach them.

mod in_memory;
mod postgres_repository;
mod service;

pub use in_memory::InMemoryPersonRepository;
pub use postgres_repository::PostgresPersonRepository;
pub use service::PersonService;
