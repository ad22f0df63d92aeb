//! Person validation utilities

use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;
use validator::ValidateEmail;

use super::entity::Person;

/// A single rule violation, naming the field and the rule that failed
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PersonValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("ID '{0}' is not a canonical UUID")]
    InvalidId(String),

    #[error("{field} contains non-alphabetic character '{found}'")]
    NonAlphabetic { field: &'static str, found: char },

    #[error("{field} is too short. Minimum length is {min} characters")]
    TooShort { field: &'static str, min: usize },

    #[error("{field} exceeds maximum length of {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("Email '{0}' is not a valid address")]
    InvalidEmail(String),

    #[error("Age {0} is outside the allowed range 0-100")]
    AgeOutOfRange(i32),

    #[error("created timestamp is required")]
    MissingCreated,
}

impl PersonValidationError {
    /// Name of the field that failed
    pub fn field(&self) -> &'static str {
        match self {
            Self::Required { field }
            | Self::NonAlphabetic { field, .. }
            | Self::TooShort { field, .. }
            | Self::TooLong { field, .. } => *field,
            Self::InvalidId(_) => "id",
            Self::InvalidEmail(_) => "email",
            Self::AgeOutOfRange(_) => "age",
            Self::MissingCreated => "created",
        }
    }

    /// Short name of the rule that failed
    pub fn rule(&self) -> &'static str {
        match self {
            Self::Required { .. } | Self::MissingCreated => "required",
            Self::InvalidId(_) => "uuid",
            Self::NonAlphabetic { .. } => "alpha",
            Self::TooShort { .. } => "min",
            Self::TooLong { .. } => "max",
            Self::InvalidEmail(_) => "email",
            Self::AgeOutOfRange(_) => "range",
        }
    }
}

/// Every rule violation found on one record
#[derive(Debug, Clone, PartialEq)]
pub struct PersonValidationErrors(Vec<PersonValidationError>);

impl PersonValidationErrors {
    pub fn errors(&self) -> &[PersonValidationError] {
        &self.0
    }

    /// Fields that failed, in declaration order
    pub fn fields(&self) -> Vec<&'static str> {
        self.0.iter().map(PersonValidationError::field).collect()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field() == field)
    }
}

impl fmt::Display for PersonValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{} [{}]: {}", e.field(), e.rule(), e))
            .collect();

        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for PersonValidationErrors {}

const UUID_CANONICAL_LENGTH: usize = 36;
const MIN_NAME_LENGTH: usize = 3;
const MAX_NAME_LENGTH: usize = 20;
const MIN_AGE: i32 = 0;
const MAX_AGE: i32 = 100;
/// Seconds from the Unix epoch back to 0001-01-01T00:00:00Z
const ZERO_TIME_SECONDS: i64 = -62_135_596_800;

/// Validate a person ID
///
/// Rules:
/// - Cannot be empty
/// - Canonical hyphenated UUID (36 characters)
pub fn validate_person_id(id: &str) -> Result<Uuid, PersonValidationError> {
    if id.is_empty() {
        return Err(PersonValidationError::Required { field: "id" });
    }

    if id.len() != UUID_CANONICAL_LENGTH {
        return Err(PersonValidationError::InvalidId(id.to_string()));
    }

    Uuid::try_parse(id).map_err(|_| PersonValidationError::InvalidId(id.to_string()))
}

/// Validate a first or last name
///
/// Rules, checked in order:
/// - Cannot be empty
/// - ASCII letters only
/// - Between 3 and 20 characters
pub fn validate_name(field: &'static str, value: &str) -> Result<(), PersonValidationError> {
    if value.is_empty() {
        return Err(PersonValidationError::Required { field });
    }

    if let Some(found) = value.chars().find(|c| !c.is_ascii_alphabetic()) {
        return Err(PersonValidationError::NonAlphabetic { field, found });
    }

    let length = value.chars().count();

    if length < MIN_NAME_LENGTH {
        return Err(PersonValidationError::TooShort {
            field,
            min: MIN_NAME_LENGTH,
        });
    }

    if length > MAX_NAME_LENGTH {
        return Err(PersonValidationError::TooLong {
            field,
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(())
}

/// Validate an email address
pub fn validate_email(email: &str) -> Result<(), PersonValidationError> {
    if email.is_empty() {
        return Err(PersonValidationError::Required { field: "email" });
    }

    if !email.validate_email() {
        return Err(PersonValidationError::InvalidEmail(email.to_string()));
    }

    Ok(())
}

/// Validate an age (0 to 100 inclusive)
pub fn validate_age(age: i32) -> Result<(), PersonValidationError> {
    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(PersonValidationError::AgeOutOfRange(age));
    }

    Ok(())
}

/// Validate the creation timestamp
///
/// Only the unset sentinels are rejected: the Unix epoch (chrono's default)
/// and `0001-01-01T00:00:00Z`, the zero time sent by older clients.
pub fn validate_created(created: &DateTime<Utc>) -> Result<(), PersonValidationError> {
    let seconds = created.timestamp();
    let unset = created.timestamp_subsec_nanos() == 0
        && (seconds == 0 || seconds == ZERO_TIME_SECONDS);

    if unset {
        return Err(PersonValidationError::MissingCreated);
    }

    Ok(())
}

/// Validate a whole record, collecting every violation
pub fn validate_person(person: &Person) -> Result<(), PersonValidationErrors> {
    let checks = [
        validate_person_id(person.id()).map(|_| ()),
        validate_name("firstname", person.firstname()),
        validate_name("lastname", person.lastname()),
        validate_email(person.email()),
        validate_age(person.age()),
        validate_created(&person.created()),
    ];

    let errors: Vec<PersonValidationError> =
        checks.into_iter().filter_map(Result::err).collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(PersonValidationErrors(errors))
    }
}
