//! User and admin record endpoints
//!
//! Both resources share these handlers; each is mounted with its own
//! service as router state.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::HeaderValue,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use super::state::PersonServiceTrait;
use super::types::{ApiError, Json};
use crate::domain::person::validate_person_id;
use crate::domain::{DomainError, Person, PersonKind};

/// Header reporting how many stored rows a listing left out
pub const SKIPPED_RECORDS_HEADER: &str = "x-skipped-records";

type Service = Arc<dyn PersonServiceTrait>;

/// Record as submitted by a client
///
/// `id` and `created` are optional; missing names and email decode as empty
/// and are then rejected by validation. `age` must be present.
#[derive(Debug, Clone, Deserialize)]
pub struct PersonPayload {
    #[serde(default, alias = "ID")]
    pub id: Option<String>,
    #[serde(default, alias = "Firstname")]
    pub firstname: String,
    #[serde(default, alias = "Lastname")]
    pub lastname: String,
    #[serde(default, alias = "Email")]
    pub email: String,
    #[serde(alias = "Age")]
    pub age: i32,
    #[serde(default, alias = "Created")]
    pub created: Option<DateTime<Utc>>,
}

impl PersonPayload {
    /// Applies the payload over a freshly constructed record
    pub fn into_new_person(self) -> Person {
        let mut person = Person::new(self.firstname, self.lastname, self.email, self.age);

        if let Some(id) = self.id {
            person = person.with_id(id);
        }
        if let Some(created) = self.created {
            person = person.with_created(created);
        }

        person
    }

    /// Builds the replacement for the record stored under `path_id`
    pub fn into_replacement(self, path_id: &str) -> Person {
        Person::from_parts(
            self.id.unwrap_or_else(|| path_id.to_string()),
            self.firstname,
            self.lastname,
            self.email,
            self.age,
            self.created.unwrap_or_else(Utc::now),
        )
    }
}

/// Confirmation returned by create, update and delete
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationResponse {
    pub message: String,
    pub id: String,
}

impl MutationResponse {
    fn new(id: String, action: &str) -> Self {
        Self {
            message: format!("Record with ID > {} {} successfully!", id, action),
            id,
        }
    }
}

/// Routes for one resource, mounted under `prefix`
pub fn create_person_router<S>(prefix: &str, service: Service) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route(prefix, get(list_records).post(create_record))
        .route(
            &format!("{}/{{id}}", prefix),
            get(read_record).put(update_record).delete(delete_record),
        )
        .with_state(service)
}

/// Logs the failure and returns the generic client error
///
/// Validation detail is already logged by the service.
fn reject(kind: PersonKind, context: &str, err: DomainError) -> ApiError {
    match &err {
        DomainError::Storage { .. } => error!(kind = %kind, error = %err, "{}", context),
        DomainError::Validation { .. } => warn!(kind = %kind, "{}", context),
        _ => warn!(kind = %kind, error = %err, "{}", context),
    }

    ApiError::from_domain(&err, format!("{} (see logs for more info)", context))
}

fn check_id(kind: PersonKind, context: &str, id: &str) -> Result<(), ApiError> {
    validate_person_id(id)
        .map(|_| ())
        .map_err(|e| reject(kind, context, DomainError::invalid_id(format!("'{}': {}", id, e))))
}

/// GET /{resource}
pub async fn list_records(State(service): State<Service>) -> Result<Response, ApiError> {
    let kind = service.kind();
    debug!(kind = %kind, "Listing records");

    let listing = service
        .get_all()
        .await
        .map_err(|e| reject(kind, "Get all records error", e))?;

    if listing.skipped > 0 {
        warn!(kind = %kind, skipped = listing.skipped, "Listing left out unreadable rows");
    }

    let mut response = Json(listing.records).into_response();

    if listing.skipped > 0 {
        response
            .headers_mut()
            .insert(SKIPPED_RECORDS_HEADER, HeaderValue::from(listing.skipped));
    }

    Ok(response)
}

/// POST /{resource}
pub async fn create_record(
    State(service): State<Service>,
    Json(payload): Json<PersonPayload>,
) -> Result<Json<MutationResponse>, ApiError> {
    let kind = service.kind();
    let person = payload.into_new_person();
    debug!(kind = %kind, person = %person, "Creating record");

    let id = service
        .create(person)
        .await
        .map_err(|e| reject(kind, "Create record error", e))?;

    Ok(Json(MutationResponse::new(id, "created")))
}

/// GET /{resource}/{id}
pub async fn read_record(
    State(service): State<Service>,
    Path(id): Path<String>,
) -> Result<Json<Person>, ApiError> {
    let kind = service.kind();
    check_id(kind, "Read record error", &id)?;

    let person = service
        .get_by_id(&id)
        .await
        .map_err(|e| reject(kind, "Read record error", e))?;

    Ok(Json(person))
}

/// PUT /{resource}/{id}
pub async fn update_record(
    State(service): State<Service>,
    Path(id): Path<String>,
    Json(payload): Json<PersonPayload>,
) -> Result<Json<MutationResponse>, ApiError> {
    let kind = service.kind();
    check_id(kind, "Update record by ID error", &id)?;

    let person = payload.into_replacement(&id);
    debug!(kind = %kind, id = %id, person = %person, "Updating record");

    let updated_id = service
        .update(&id, person)
        .await
        .map_err(|e| reject(kind, "Update error", e))?;

    Ok(Json(MutationResponse::new(updated_id, "updated")))
}

/// DELETE /{resource}/{id}
pub async fn delete_record(
    State(service): State<Service>,
    Path(id): Path<String>,
) -> Result<Json<MutationResponse>, ApiError> {
    let kind = service.kind();
    check_id(kind, "Delete by ID error", &id)?;

    let deleted_id = service
        .delete(&id)
        .await
        .map_err(|e| reject(kind, "Delete record error", e))?;

    Ok(Json(MutationResponse::new(deleted_id, "deleted")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn payload(id: Option<&str>, created: Option<DateTime<Utc>>) -> PersonPayload {
        PersonPayload {
            id: id.map(str::to_string),
            firstname: "NewUser".to_string(),
            lastname: "NewUserLastname".to_string(),
            email: "newuser@gmail.com".to_string(),
            age: 30,
            created,
        }
    }

    #[test]
    fn test_new_person_gets_fresh_identity() {
        let person = payload(None, None).into_new_person();

        assert_eq!(person.id().len(), 36);
        assert_eq!(person.firstname(), "NewUser");
        assert!(person.created() <= Utc::now());
    }

    #[test]
    fn test_new_person_keeps_supplied_fields() {
        let created = Utc.with_ymd_and_hms(2022, 5, 7, 0, 0, 0).unwrap();
        let person = payload(Some("a01c6ae7-86c1-400e-beb2-5a5c6e15785c"), Some(created))
            .into_new_person();

        assert_eq!(person.id(), "a01c6ae7-86c1-400e-beb2-5a5c6e15785c");
        assert_eq!(person.created(), created);
    }

    #[test]
    fn test_replacement_defaults_to_path_id() {
        let person = payload(None, None).into_replacement("1d2ef152-f440-4be2-b659-46cc6dcbc966");
        assert_eq!(person.id(), "1d2ef152-f440-4be2-b659-46cc6dcbc966");

        let person = payload(Some("1636c7ff-e1bc-40d1-a368-3cdbfc2dd97c"), None)
            .into_replacement("1d2ef152-f440-4be2-b659-46cc6dcbc966");
        assert_eq!(person.id(), "1636c7ff-e1bc-40d1-a368-3cdbfc2dd97c");
    }

    #[test]
    fn test_payload_accepts_capitalized_names() {
        let payload: PersonPayload = serde_json::from_str(
            r#"{"Firstname": "NewUser", "Lastname": "NewUserLastname", "Email": "newuser@gmail.com", "Age": 30}"#,
        )
        .unwrap();

        assert_eq!(payload.firstname, "NewUser");
        assert_eq!(payload.age, 30);
        assert!(payload.id.is_none());
    }

    #[test]
    fn test_payload_requires_age() {
        let result = serde_json::from_str::<PersonPayload>(r#"{"firstname": "NewUser"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_mutation_message() {
        let response = MutationResponse::new(
            "a01c6ae7-86c1-400e-beb2-5a5c6e15785c".to_string(),
            "created",
        );

        assert_eq!(
            response.message,
            "Record with ID > a01c6ae7-86c1-400e-beb2-5a5c6e15785c created successfully!"
        );
    }

    #[test]
    fn test_reject_uses_generic_message() {
        let err = reject(
            PersonKind::User,
            "Read record error",
            DomainError::storage("relation \"users\" does not exist"),
        );

        assert_eq!(err.response.error, "Read record error (see logs for more info)");
    }

    #[test]
    fn test_check_id() {
        assert!(check_id(PersonKind::User, "Read record error", "1d2ef152-f440-4be2-b659-46cc6dcbc966").is_ok());

        let err = check_id(PersonKind::User, "Read record error", "42").unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
    }
}
