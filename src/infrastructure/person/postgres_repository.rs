//! PostgreSQL person repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::{debug, warn};

use crate::domain::person::{
    validate_person, Person, PersonKind, PersonListing, PersonRepository,
};
use crate::domain::DomainError;

const COLUMNS: &str = "id, first_name, last_name, email, age, created";

/// PostgreSQL implementation of PersonRepository
///
/// One row per record in the table selected by the repository's kind.
#[derive(Debug, Clone)]
pub struct PostgresPersonRepository {
    pool: PgPool,
    kind: PersonKind,
}

impl PostgresPersonRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool, kind: PersonKind) -> Self {
        Self { pool, kind }
    }
}

fn select_all_sql(kind: PersonKind) -> String {
    format!("SELECT {} FROM {} ORDER BY created", COLUMNS, kind.table())
}

fn select_one_sql(kind: PersonKind) -> String {
    format!("SELECT {} FROM {} WHERE id = $1", COLUMNS, kind.table())
}

fn insert_sql(kind: PersonKind) -> String {
    format!(
        "INSERT INTO {} ({}) VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        kind.table(),
        COLUMNS
    )
}

// created is never rewritten by an update
fn update_sql(kind: PersonKind) -> String {
    format!(
        "UPDATE {} SET id = $1, first_name = $2, last_name = $3, email = $4, age = $5 \
         WHERE id = $6 RETURNING id",
        kind.table()
    )
}

fn delete_sql(kind: PersonKind) -> String {
    format!("DELETE FROM {} WHERE id = $1", kind.table())
}

fn ping_sql(kind: PersonKind) -> String {
    format!("SELECT 1 FROM {} LIMIT 1", kind.table())
}

fn row_to_person(row: &PgRow) -> Result<Person, sqlx::Error> {
    let id: String = row.try_get("id")?;
    let first_name: String = row.try_get("first_name")?;
    let last_name: String = row.try_get("last_name")?;
    let email: String = row.try_get("email")?;
    let age: i32 = row.try_get("age")?;
    let created: DateTime<Utc> = row.try_get("created")?;

    Ok(Person::from_parts(id, first_name, last_name, email, age, created))
}

fn map_write_error(kind: PersonKind, id: &str, e: sqlx::Error) -> DomainError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            DomainError::conflict(format!("{} with ID '{}' already exists", kind, id))
        }
        _ => DomainError::storage(format!("Failed to write {} '{}': {}", kind, id, e)),
    }
}

#[async_trait]
impl PersonRepository for PostgresPersonRepository {
    async fn get_all(&self) -> Result<PersonListing, DomainError> {
        let sql = select_all_sql(self.kind);
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list {}s: {}", self.kind, e)))?;

        let mut listing = PersonListing::default();

        for row in &rows {
            let person = match row_to_person(row) {
                Ok(person) => person,
                Err(e) => {
                    warn!(kind = %self.kind, error = %e, "Skipping row that failed to decode");
                    listing.skipped += 1;
                    continue;
                }
            };

            if let Err(e) = validate_person(&person) {
                warn!(kind = %self.kind, person = %person, error = %e, "Skipping invalid row");
                listing.skipped += 1;
                continue;
            }

            listing.records.push(person);
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
        let sql = insert_sql(self.kind);
        let row = sqlx::query(&sql)
            .bind(person.id())
            .bind(person.firstname())
            .bind(person.lastname())
            .bind(person.email())
            .bind(person.age())
            .bind(person.created())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(self.kind, person.id(), e))?;

        row.try_get("id")
            .map_err(|e| DomainError::storage(format!("Failed to read created id: {}", e)))
    }

    async fn read_record(&self, id: &str) -> Result<Person, DomainError> {
        let sql = select_one_sql(self.kind);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get {}: {}", self.kind, e)))?
            .ok_or_else(|| DomainError::not_found(format!("{} '{}' not found", self.kind, id)))?;

        let person = row_to_person(&row).map_err(|e| {
            DomainError::storage(format!("Failed to decode {} '{}': {}", self.kind, id, e))
        })?;

        validate_person(&person).map_err(|e| {
            DomainError::storage(format!("Stored {} '{}' is invalid: {}", self.kind, id, e))
        })?;

        Ok(person)
    }

    async fn update_record(&self, id: &str, person: &Person) -> Result<String, DomainError> {
        let sql = update_sql(self.kind);
        let row = sqlx::query(&sql)
            .bind(person.id())
            .bind(person.firstname())
            .bind(person.lastname())
            .bind(person.email())
            .bind(person.age())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error(self.kind, person.id(), e))?
            .ok_or_else(|| DomainError::not_found(format!("{} '{}' not found", self.kind, id)))?;

        row.try_get("id")
            .map_err(|e| DomainError::storage(format!("Failed to read updated id: {}", e)))
    }

    async fn delete_record(&self, id: &str) -> Result<String, DomainError> {
        let sql = delete_sql(self.kind);
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete {}: {}", self.kind, e)))?;

        if result.rows_affected() != 1 {
            return Err(DomainError::not_found("no row found to delete"));
        }

        Ok(id.to_string())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query(&ping_sql(self.kind))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("{} store unreachable: {}", self.kind, e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_targets_kind_table() {
        assert_eq!(
            select_all_sql(PersonKind::User),
            "SELECT id, first_name, last_name, email, age, created FROM users ORDER BY created"
        );
        assert_eq!(
            select_one_sql(PersonKind::Admin),
            "SELECT id, first_name, last_name, email, age, created FROM admins WHERE id = $1"
        );
        assert_eq!(delete_sql(PersonKind::Admin), "DELETE FROM admins WHERE id = $1");
        assert_eq!(ping_sql(PersonKind::User), "SELECT 1 FROM users LIMIT 1");
    }

    #[test]
    fn test_insert_returns_id() {
        let sql = insert_sql(PersonKind::User);
        assert!(sql.starts_with("INSERT INTO users (id, first_name"));
        assert!(sql.ends_with("RETURNING id"));
    }

    #[test]
    fn test_update_never_touches_created() {
        let sql = update_sql(PersonKind::User);
        assert!(sql.starts_with("UPDATE users SET"));
        assert!(!sql.contains("created"));
        assert!(sql.contains("WHERE id = $6 RETURNING id"));
    }

    #[test]
    fn test_map_write_error_non_database() {
        let err = map_write_error(PersonKind::User, "some-id", sqlx::Error::PoolTimedOut);
        assert!(matches!(err, DomainError::Storage { .. }));
    }
}
