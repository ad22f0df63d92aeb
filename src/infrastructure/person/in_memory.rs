//! In-memory person repository implementation

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::domain::person::{
    validate_person, Person, PersonKind, PersonListing, PersonRepository,
};
use crate::domain::DomainError;

/// In-memory implementation of PersonRepository
///
/// Rows are kept as JSON documents in insertion order, so reads go through
/// the same decode-then-validate path a database-backed store uses.
#[derive(Debug)]
pub struct InMemoryPersonRepository {
    kind: PersonKind,
    rows: Arc<RwLock<Vec<Value>>>,
}

impl InMemoryPersonRepository {
    /// Create a new empty repository
    pub fn new(kind: PersonKind) -> Self {
        Self::with_rows(kind, Vec::new())
    }

    /// Create a repository holding raw rows, which are not validated
    pub fn with_rows(kind: PersonKind, rows: Vec<Value>) -> Self {
        Self {
            kind,
            rows: Arc::new(RwLock::new(rows)),
        }
    }

    /// Create a repository with initial records
    pub fn with_records(kind: PersonKind, records: Vec<Person>) -> Result<Self, DomainError> {
        let rows = records
            .iter()
            .map(encode_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::with_rows(kind, rows))
    }
}

fn encode_row(person: &Person) -> Result<Value, DomainError> {
    serde_json::to_value(person)
        .map_err(|e| DomainError::storage(format!("Failed to encode record: {}", e)))
}

fn decode_row(row: &Value) -> Result<Person, String> {
    let person: Person = serde_json::from_value(row.clone()).map_err(|e| e.to_string())?;
    validate_person(&person).map_err(|e| e.to_string())?;
    Ok(person)
}

fn row_id(row: &Value) -> Option<&str> {
    row.get("id").and_then(Value::as_str)
}

fn position_of(rows: &[Value], id: &str) -> Option<usize> {
    rows.iter().position(|row| row_id(row) == Some(id))
}

#[async_trait]
impl PersonRepository for InMemoryPersonRepository {
    async fn get_all(&self) -> Result<PersonListing, DomainError> {
        let rows = self.rows.read().await;
        let mut listing = PersonListing::default();

        for row in rows.iter() {
            match decode_row(row) {
                Ok(person) => listing.records.push(person),
                Err(e) => {
                    warn!(kind = %self.kind, error = %e, "Skipping unreadable row");
                    listing.skipped += 1;
                }
            }
        }

        debug!(
            kind = %self.kind,
            count = listing.records.len(),
            skipped = listing.skipped,
            "Listed records"
        );

        Ok(listing)
    }

    async fn create_record(&self, person: &Person) -> Result<String, DomainError> {
        let mut rows = self.rows.write().await;

        if position_of(&rows, person.id()).is_some() {
            return Err(DomainError::conflict(format!(
                "{} with ID '{}' already exists",
                self.kind,
                person.id()
            )));
        }

        let row = encode_row(person)?;
        let id = row_id(&row)
            .map(str::to_string)
            .ok_or_else(|| DomainError::storage("Stored row has no id"))?;

        rows.push(row);

        Ok(id)
    }

    async fn read_record(&self, id: &str) -> Result<Person, DomainError> {
        let rows = self.rows.read().await;

        let row = position_of(&rows, id)
            .map(|index| &rows[index])
            .ok_or_else(|| DomainError::not_found(format!("{} '{}' not found", self.kind, id)))?;

        decode_row(row).map_err(|e| {
            DomainError::storage(format!("Stored {} '{}' is unreadable: {}", self.kind, id, e))
        })
    }

    async fn update_record(&self, id: &str, person: &Person) -> Result<String, DomainError> {
        let mut rows = self.rows.write().await;

        let index = position_of(&rows, id)
            .ok_or_else(|| DomainError::not_found(format!("{} '{}' not found", self.kind, id)))?;

        if person.id() != id && position_of(&rows, person.id()).is_some() {
            return Err(DomainError::conflict(format!(
                "{} with ID '{}' already exists",
                self.kind,
                person.id()
            )));
        }

        let mut row = encode_row(person)?;

        // created is never rewritten by an update
        if let (Some(fields), Some(created)) = (row.as_object_mut(), rows[index].get("created")) {
            fields.insert("created".to_string(), created.clone());
        }

        let stored_id = row_id(&row)
            .map(str::to_string)
            .ok_or_else(|| DomainError::storage("Stored row has no id"))?;

        rows[index] = row;

        Ok(stored_id)
    }

    async fn delete_record(&self, id: &str) -> Result<String, DomainError> {
        let mut rows = self.rows.write().await;

        let index = position_of(&rows, id)
            .ok_or_else(|| DomainError::not_found("no row found to delete"))?;

        rows.remove(index);

        Ok(id.to_string())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
