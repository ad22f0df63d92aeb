//! JSON extractor whose rejections use the API error body

use axum::{
    extract::{rejection::JsonRejection as AxumJsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json as AxumJson,
};
use serde::de::DeserializeOwned;
use tracing::warn;

use super::error::ApiError;

/// Wrapper around `axum::Json` that reports body errors as `{"error": ...}`
///
/// The parser's detail is logged; the client only sees a generic message.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Rejection for a body that could not be read or decoded
#[derive(Debug)]
pub struct JsonRejection {
    status: StatusCode,
}

impl JsonRejection {
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for JsonRejection {
    fn into_response(self) -> Response {
        ApiError::new(self.status, "Decode record error (see logs for more info)").into_response()
    }
}

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = JsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match AxumJson::<T>::from_request(req, state).await {
            Ok(AxumJson(value)) => Ok(Json(value)),
            Err(rejection) => {
                warn!(error = %rejection.body_text(), "Rejected request body");

                Err(JsonRejection {
                    status: rejection_status(&rejection),
                })
            }
        }
    }
}

/// Malformed or mistyped bodies are all bad requests
fn rejection_status(rejection: &AxumJsonRejection) -> StatusCode {
    match rejection {
        AxumJsonRejection::MissingJsonContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        AxumJsonRejection::BytesRejection(_) => rejection.status(),
        _ => StatusCode::BAD_REQUEST,
    }
}

impl<T> IntoResponse for Json<T>
where
    T: serde::Serialize,
{
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}
