//! Application state for shared services

use std::sync::Arc;

use crate::domain::person::PersonRepository;
use crate::domain::{DomainError, Person, PersonKind, PersonListing};
use crate::infrastructure::person::{InMemoryPersonRepository, PersonService};

/// Application state holding one service per resource, using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn PersonServiceTrait>,
    pub admins: Arc<dyn PersonServiceTrait>,
}

/// Trait for person service operations
#[async_trait::async_trait]
pub trait PersonServiceTrait: Send + Sync {
    fn kind(&self) -> PersonKind;
    async fn get_all(&self) -> Result<PersonListing, DomainError>;
    async fn create(&self, person: Person) -> Result<String, DomainError>;
    async fn get_by_id(&self, id: &str) -> Result<Person, DomainError>;
    async fn update(&self, id: &str, person: Person) -> Result<String, DomainError>;
    async fn delete(&self, id: &str) -> Result<String, DomainError>;
    async fn ping(&self) -> Result<(), DomainError>;
}

#[async_trait::async_trait]
impl<R: PersonRepository + 'static> PersonServiceTrait for PersonService<R> {
    fn kind(&self) -> PersonKind {
        PersonService::kind(self)
    }

    async fn get_all(&self) -> Result<PersonListing, DomainError> {
        PersonService::get_all(self).await
    }

    async fn create(&self, person: Person) -> Result<String, DomainError> {
        PersonService::create(self, person).await
    }

    async fn get_by_id(&self, id: &str) -> Result<Person, DomainError> {
        PersonService::get_by_id(self, id).await
    }

    async fn update(&self, id: &str, person: Person) -> Result<String, DomainError> {
        PersonService::update(self, id, person).await
    }

    async fn delete(&self, id: &str) -> Result<String, DomainError> {
        PersonService::delete(self, id).await
    }

    async fn ping(&self) -> Result<(), DomainError> {
        PersonService::ping(self).await
    }
}

impl AppState {
    /// Create new application state with provided services
    pub fn new(users: Arc<dyn PersonServiceTrait>, admins: Arc<dyn PersonServiceTrait>) -> Self {
        Self { users, admins }
    }

    /// Build state over the given repositories
    pub fn from_repositories<U, A>(users: Arc<U>, admins: Arc<A>) -> Self
    where
        U: PersonRepository + 'static,
        A: PersonRepository + 'static,
    {
        Self::new(
            Arc::new(PersonService::new(PersonKind::User, users)),
            Arc::new(PersonService::new(PersonKind::Admin, admins)),
        )
    }

    /// State backed by empty in-memory repositories
    pub fn in_memory() -> Self {
        Self::from_repositories(
            Arc::new(InMemoryPersonRepository::new(PersonKind::User)),
            Arc::new(InMemoryPersonRepository::new(PersonKind::Admin)),
        )
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("users", &self.users.kind())
            .field("admins", &self.admins.kind())
            .finish()
    }
}
