//! Person domain
//!
//! Domain types and traits shared by the user and admin resources:
//! the record entity, its validation rules and the repository contract.

mod entity;
mod repository;
mod validation;

pub use entity::{Person, PersonKind, PersonListing};
pub use repository::PersonRepository;
pub use validation::{
    validate_age, validate_created, validate_email, validate_name, validate_person,
    validate_person_id, PersonValidationError, PersonValidationErrors,
};

#[cfg(test)]
pub use repository::MockPersonRepository;
