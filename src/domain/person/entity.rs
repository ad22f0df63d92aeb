//! Person entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which resource a person record belongs to
///
/// Both variants share the same shape; the kind only selects the backing
/// table and the label used in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonKind {
    User,
    Admin,
}

impl PersonKind {
    /// Table holding records of this kind
    pub fn table(&self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Admin => "admins",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for PersonKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A user or admin record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    #[serde(alias = "ID")]
    id: String,
    #[serde(alias = "Firstname")]
    firstname: String,
    #[serde(alias = "Lastname")]
    lastname: String,
    #[serde(alias = "Email")]
    email: String,
    #[serde(alias = "Age")]
    age: i32,
    #[serde(alias = "Created")]
    created: DateTime<Utc>,
}

impl Person {
    /// Create a new person with a fresh UUID and the current time
    pub fn new(
        firstname: impl Into<String>,
        lastname: impl Into<String>,
        email: impl Into<String>,
        age: i32,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            firstname: firstname.into(),
            lastname: lastname.into(),
            email: email.into(),
            age,
            created: Utc::now(),
        }
    }

    /// Rebuild a person from stored or submitted values, without validation
    pub fn from_parts(
        id: impl Into<String>,
        firstname: impl Into<String>,
        lastname: impl Into<String>,
        email: impl Into<String>,
        age: i32,
        created: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            firstname: firstname.into(),
            lastname: lastname.into(),
            email: email.into(),
            age,
            created,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_created(mut self, created: DateTime<Utc>) -> Self {
        self.created = created;
        self
    }

    // Getters

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn firstname(&self) -> &str {
        &self.firstname
    }

    pub fn lastname(&self) -> &str {
        &self.lastname
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn age(&self) -> i32 {
        self.age
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }
}

impl std::fmt::Display for Person {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "id={}, firstname={}, lastname={}",
            self.id, self.firstname, self.lastname
        )
    }
}

/// Result of a bulk read
///
/// Rows that could not be decoded or failed validation are left out of
/// `records` and counted in `skipped`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonListing {
    pub records: Vec<Person>,
    pub skipped: usize,
}

impl PersonListing {
    pub fn new(records: Vec<Person>, skipped: usize) -> Self {
        Self { records, skipped }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_person_gets_fresh_identity() {
        let a = Person::new("FirstUser", "LastNameA", "user1@gmail.com", 20);
        let b = Person::new("FirstUser", "LastNameA", "user1@gmail.com", 20);

        assert_ne!(a.id(), b.id());
        assert_eq!(a.id().len(), 36);
        assert!(Uuid::parse_str(a.id()).is_ok());
        assert!(a.created() <= Utc::now());
    }

    #[test]
    fn test_kind_tables() {
        assert_eq!(PersonKind::User.table(), "users");
        assert_eq!(PersonKind::Admin.table(), "admins");
        assert_eq!(PersonKind::Admin.to_string(), "admin");
    }

    #[test]
    fn test_serialization_shape() {
        let person = Person::from_parts(
            "1d2ef152-f440-4be2-b659-46cc6dcbc966",
            "FirstUser",
            "LastNameA",
            "user1@gmail.com",
            20,
            Utc.with_ymd_and_hms(2022, 5, 7, 0, 0, 0).unwrap(),
        );

        let json = serde_json::to_value(&person).unwrap();
        assert_eq!(json["id"], "1d2ef152-f440-4be2-b659-46cc6dcbc966");
        assert_eq!(json["firstname"], "FirstUser");
        assert_eq!(json["age"], 20);
        assert_eq!(json["created"], "2022-05-07T00:00:00Z");
    }

    #[test]
    fn test_deserialize_capitalized_names() {
        let json = r#"{
            "ID": "1636c7ff-e1bc-40d1-a368-3cdbfc2dd97c",
            "Firstname": "SecondUser",
            "Lastname": "LastNameB",
            "Email": "user2@gmail.com",
            "Age": 21,
            "Created": "2022-05-07T00:00:00Z"
        }"#;

        let person: Person = serde_json::from_str(json).unwrap();
        assert_eq!(person.firstname(), "SecondUser");
        assert_eq!(person.age(), 21);
    }

    #[test]
    fn test_display() {
        let person = Person::new("FirstUser", "LastNameA", "user1@gmail.com", 20)
            .with_id("1d2ef152-f440-4be2-b659-46cc6dcbc966");

        assert_eq!(
            person.to_string(),
            "id=1d2ef152-f440-4be2-b659-46cc6dcbc966, firstname=FirstUser, lastname=LastNameA"
        );
    }
}
