//! Person repository trait

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::entity::{Person, PersonListing};
use crate::domain::DomainError;

/// Repository for person records of a single kind
///
/// Implementations do not apply business rules on writes; callers validate
/// first. Reads only ever return records that pass validation.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PersonRepository: Send + Sync {
    /// Scan every stored record, skipping rows that fail to decode or validate
    async fn get_all(&self) -> Result<PersonListing, DomainError>;

    /// Insert a record and return the id confirmed by the store
    async fn create_record(&self, person: &Person) -> Result<String, DomainError>;

    /// Fetch a record by id
    async fn read_record(&self, id: &str) -> Result<Person, DomainError>;

    /// Replace the record stored under `id` and return the stored id
    async fn update_record(&self, id: &str, person: &Person) -> Result<String, DomainError>;

    /// Remove the record stored under `id`; fails if nothing was removed
    async fn delete_record(&self, id: &str) -> Result<String, DomainError>;

    /// Check that the store is reachable, without scanning records
    async fn ping(&self) -> Result<(), DomainError>;
}
