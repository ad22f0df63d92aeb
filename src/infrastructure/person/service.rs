//! Person service: validation in front of the repository

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::person::{
    validate_person, Person, PersonKind, PersonListing, PersonRepository,
};
use crate::domain::DomainError;

/// Usecase layer for one kind of person record
///
/// Create and update are gated on validation; a record that fails never
/// reaches the repository. Reads and deletes pass straight through.
pub struct PersonService<R: PersonRepository> {
    kind: PersonKind,
    repository: Arc<R>,
}

impl<R: PersonRepository> std::fmt::Debug for PersonService<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersonService")
            .field("kind", &self.kind)
            .finish()
    }
}

impl<R: PersonRepository> PersonService<R> {
    /// Create a new person service
    pub fn new(kind: PersonKind, repository: Arc<R>) -> Self {
        Self { kind, repository }
    }

    pub fn kind(&self) -> PersonKind {
        self.kind
    }

    /// List every valid record
    pub async fn get_all(&self) -> Result<PersonListing, DomainError> {
        self.repository.get_all().await
    }

    /// Validate and store a new record, returning the stored id
    pub async fn create(&self, person: Person) -> Result<String, DomainError> {
        self.check(&person)?;

        let id = self.repository.create_record(&person).await?;
        debug!(kind = %self.kind, id = %id, "Record created");

        Ok(id)
    }

    /// Get a record by id
    pub async fn get_by_id(&self, id: &str) -> Result<Person, DomainError> {
        self.repository.read_record(id).await
    }

    /// Validate and replace the record stored under `id`
    pub async fn update(&self, id: &str, person: Person) -> Result<String, DomainError> {
        self.check(&person)?;

        let updated_id = self.repository.update_record(id, &person).await?;
        debug!(kind = %self.kind, id = %id, updated_id = %updated_id, "Record updated");

        Ok(updated_id)
    }

    /// Delete a record by id
    pub async fn delete(&self, id: &str) -> Result<String, DomainError> {
        self.repository.delete_record(id).await
    }

    /// Check that the backing store is reachable
    pub async fn ping(&self) -> Result<(), DomainError> {
        self.repository.ping().await
    }

    fn check(&self, person: &Person) -> Result<(), DomainError> {
        validate_person(person).map_err(|e| {
            warn!(
                kind = %self.kind,
                person = %person,
                fields = ?e.fields(),
                error = %e,
                "Validation failed"
            );
            DomainError::validation(e.to_string())
        })
    }
}
