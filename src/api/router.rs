use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::health;
use super::middleware::logging_middleware;
use super::persons::create_person_router;
use super::state::AppState;

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::index))
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Record resources
        .merge(create_person_router("/users", state.users.clone()))
        .merge(create_person_router("/admins", state.admins.clone()))
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use chrono::{TimeZone, Utc};
    use serde_json::{json, Value};
    use tower::util::ServiceExt;
    use tracing_test::traced_test;

    use super::*;
    use crate::api::persons::SKIPPED_RECORDS_HEADER;
    use crate::domain::{Person, PersonKind};
    use crate::infrastructure::person::InMemoryPersonRepository;

    const FIRST_ID: &str = "1d2ef152-f440-4be2-b659-46cc6dcbc966";
    const SECOND_ID: &str = "1636c7ff-e1bc-40d1-a368-3cdbfc2dd97c";
    const NEW_USER_ID: &str = "a01c6ae7-86c1-400e-beb2-5a5c6e15785c";
    const ABSENT_ID: &str = "a01c6ae7-86c1-400e-beb2-5a5c6e15785a";

    fn stored(id: &str, firstname: &str, age: i32) -> Person {
        Person::from_parts(
            id,
            firstname,
            "LastNameA",
            "user1@gmail.com",
            age,
            Utc.with_ymd_and_hms(2022, 5, 7, 0, 0, 0).unwrap(),
        )
    }

    fn seeded_router() -> Router {
        let users = InMemoryPersonRepository::with_records(
            PersonKind::User,
            vec![stored(FIRST_ID, "FirstUser", 20), stored(SECOND_ID, "SecondUser", 21)],
        )
        .unwrap();
        let admins = InMemoryPersonRepository::new(PersonKind::Admin);

        create_router(AppState::from_repositories(Arc::new(users), Arc::new(admins)))
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn new_user_body() -> Value {
        json!({
            "id": NEW_USER_ID,
            "firstname": "NewUser",
            "lastname": "NewUserLastname",
            "email": "newuser@gmail.com",
            "age": 30
        })
    }

    #[tokio::test]
    async fn test_index() {
        let response = seeded_router().oneshot(empty_request("GET", "/")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"REST API works fine");
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let router = seeded_router();

        let response = router.clone().oneshot(empty_request("GET", "/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "healthy");

        let response = router.clone().oneshot(empty_request("GET", "/live")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router.oneshot(empty_request("GET", "/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["checks"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_request_id_echoed() {
        let request = Request::builder()
            .uri("/live")
            .header("x-request-id", "req-42")
            .body(Body::empty())
            .unwrap();

        let response = seeded_router().oneshot(request).await.unwrap();
        assert_eq!(response.headers()["x-request-id"], "req-42");
    }

    #[tokio::test]
    async fn test_list_users() {
        let response = seeded_router()
            .oneshot(empty_request("GET", "/users"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(SKIPPED_RECORDS_HEADER).is_none());

        let body = body_json(response).await;
        let records = body.as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["id"], FIRST_ID);
        assert_eq!(records[1]["firstname"], "SecondUser");
    }

    #[tokio::test]
    async fn test_list_reports_skipped_rows() {
        let mut corrupted = serde_json::to_value(stored(SECOND_ID, "SecondUser", 21)).unwrap();
        corrupted["age"] = json!(150);

        let users = InMemoryPersonRepository::with_rows(
            PersonKind::User,
            vec![serde_json::to_value(stored(FIRST_ID, "FirstUser", 20)).unwrap(), corrupted],
        );
        let router = create_router(AppState::from_repositories(
            Arc::new(users),
            Arc::new(InMemoryPersonRepository::new(PersonKind::Admin)),
        ));

        let response = router.oneshot(empty_request("GET", "/users")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[SKIPPED_RECORDS_HEADER], "1");
        assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_and_read_user() {
        let router = seeded_router();

        let response = router
            .clone()
            .oneshot(json_request("POST", "/users", new_user_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["id"], NEW_USER_ID);
        assert_eq!(
            body["message"],
            "Record with ID > a01c6ae7-86c1-400e-beb2-5a5c6e15785c created successfully!"
        );

        let response = router
            .oneshot(empty_request("GET", &format!("/users/{}", NEW_USER_ID)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["firstname"], "NewUser");
        assert_eq!(body["age"], 30);
    }

    #[tokio::test]
    async fn test_create_without_id_generates_one() {
        let mut payload = new_user_body();
        payload.as_object_mut().unwrap().remove("id");

        let response = seeded_router()
            .oneshot(json_request("POST", "/admins", payload))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["id"].as_str().unwrap().len(), 36);
    }

    #[tokio::test]
    async fn test_create_with_pre_epoch_created() {
        let router = seeded_router();
        let mut payload = new_user_body();
        payload["created"] = json!("1965-03-01T00:00:00Z");

        let response = router
            .clone()
            .oneshot(json_request("POST", "/users", payload.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        payload["firstname"] = json!("Renamed");
        let response = router
            .oneshot(json_request("PUT", &format!("/users/{}", NEW_USER_ID), payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_with_zero_time_created() {
        let mut payload = new_user_body();
        payload["created"] = json!("0001-01-01T00:00:00Z");

        let response = seeded_router()
            .oneshot(json_request("POST", "/users", payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_invalid_firstname() {
        let router = seeded_router();
        let mut payload = new_user_body();
        payload["firstname"] = json!("r".repeat(61));

        let response = router
            .clone()
            .oneshot(json_request("POST", "/users", payload))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({"error": "Create record error (see logs for more info)"})
        );

        let response = router
            .oneshot(empty_request("GET", &format!("/users/{}", NEW_USER_ID)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[traced_test]
    #[tokio::test]
    async fn test_validation_detail_logged_once() {
        let mut payload = new_user_body();
        payload["firstname"] = json!("r".repeat(61));

        let response = seeded_router()
            .oneshot(json_request("POST", "/users", payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        assert!(logs_contain("Validation failed"));
        assert!(logs_contain("Create record error"));
        logs_assert(|lines: &[&str]| {
            match lines.iter().filter(|line| line.contains("firstname [max]")).count() {
                1 => Ok(()),
                n => Err(format!("expected validation detail once, found {}", n)),
            }
        });
    }

    #[tokio::test]
    async fn test_create_duplicate_is_conflict() {
        let mut payload = new_user_body();
        payload["id"] = json!(FIRST_ID);

        let response = seeded_router()
            .oneshot(json_request("POST", "/users", payload))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_create_malformed_body() {
        let request = Request::builder()
            .method("POST")
            .uri("/users")
            .header("content-type", "application/json")
            .body(Body::from("{\"firstname\": "))
            .unwrap();

        let response = seeded_router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_read_malformed_id() {
        let response = seeded_router()
            .oneshot(empty_request("GET", "/users/not-a-uuid"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({"error": "Read record error (see logs for more info)"})
        );
    }

    #[tokio::test]
    async fn test_update_user() {
        let router = seeded_router();
        let payload = json!({
            "firstname": "Renamed",
            "lastname": "LastNameA",
            "email": "user1@gmail.com",
            "age": 44
        });

        let response = router
            .clone()
            .oneshot(json_request("PUT", &format!("/users/{}", FIRST_ID), payload))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["id"], FIRST_ID);
        assert_eq!(
            body["message"],
            "Record with ID > 1d2ef152-f440-4be2-b659-46cc6dcbc966 updated successfully!"
        );

        let response = router
            .oneshot(empty_request("GET", &format!("/users/{}", FIRST_ID)))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["firstname"], "Renamed");
        assert_eq!(body["age"], 44);
        assert_eq!(body["created"], "2022-05-07T00:00:00Z");
    }

    #[tokio::test]
    async fn test_update_absent_record() {
        let response = seeded_router()
            .oneshot(json_request("PUT", &format!("/users/{}", ABSENT_ID), new_user_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({"error": "Update error (see logs for more info)"})
        );
    }

    #[tokio::test]
    async fn test_delete_user_twice() {
        let router = seeded_router();
        let uri = format!("/users/{}", SECOND_ID);

        let response = router.clone().oneshot(empty_request("DELETE", &uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await["message"],
            "Record with ID > 1636c7ff-e1bc-40d1-a368-3cdbfc2dd97c deleted successfully!"
        );

        let response = router.oneshot(empty_request("DELETE", &uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_absent_record() {
        let response = seeded_router()
            .oneshot(empty_request("DELETE", &format!("/admins/{}", ABSENT_ID)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({"error": "Delete record error (see logs for more info)"})
        );
    }

    #[tokio::test]
    async fn test_resources_are_separate() {
        let router = seeded_router();

        let response = router
            .clone()
            .oneshot(json_request("POST", "/admins", new_user_body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .clone()
            .oneshot(empty_request("GET", "/admins"))
            .await
            .unwrap();
        assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);

        let response = router
            .oneshot(empty_request("GET", &format!("/users/{}", NEW_USER_ID)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
