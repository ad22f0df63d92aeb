//! Request logging middleware

use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tracing::{info, warn};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Logs each request and its outcome, and echoes the request id
///
/// The span itself comes from `TraceLayer`; this only adds events.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = extract_path(&request);
    let request_id = extract_request_id(&request);

    info!(
        method = %method,
        path = %path,
        uri = %request.uri(),
        request_id = %request_id,
        "Incoming request"
    );

    let mut response = next.run(request).await;

    let status = response.status();
    let duration_ms = start.elapsed().as_millis();

    if status.is_server_error() {
        warn!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms = %duration_ms,
            request_id = %request_id,
            "Request failed"
        );
    } else {
        info!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms = %duration_ms,
            request_id = %request_id,
            "Request completed"
        );
    }

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

fn extract_path(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string())
}

fn extract_request_id(request: &Request<Body>) -> String {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_request_id_from_header() {
        let request = Request::builder()
            .uri("/users")
            .header(REQUEST_ID_HEADER, "abc-123")
            .body(Body::empty())
            .unwrap();

        assert_eq!(extract_request_id(&request), "abc-123");
    }

    #[test]
    fn test_extract_request_id_generated() {
        let request = Request::builder().uri("/users").body(Body::empty()).unwrap();

        let id = extract_request_id(&request);
        assert!(uuid::Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn test_extract_path_falls_back_to_uri() {
        let request = Request::builder()
            .uri("/users/1d2ef152-f440-4be2-b659-46cc6dcbc966?x=1")
            .body(Body::empty())
            .unwrap();

        assert_eq!(
            extract_path(&request),
            "/users/1d2ef152-f440-4be2-b659-46cc6dcbc966"
        );
    }
}
