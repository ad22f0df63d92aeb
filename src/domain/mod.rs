//! Domain layer - Core business logic and entities

pub mod error;
pub mod person;

pub use error::DomainError;
pub use person::{Person, PersonKind, PersonListing, PersonRepository};
