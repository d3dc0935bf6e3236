//! HTTP error mapping
//!
//! Every failure leaves the server as `{"error": "..."}` with a status:
//! validation 400, missing record 404, anything the store can't explain 500.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chatmate_store::StoreError;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { .. } => Self::not_found(e.to_string()),
            StoreError::Invalid(inner) => Self::bad_request(inner.to_string()),
            StoreError::Io(_) | StoreError::Serialization(_) => {
                tracing::error!("store failure: {}", e);
                Self::internal(e.to_string())
            }
        }
    }
}

impl From<chatmate_core::Error> for ApiError {
    fn from(e: chatmate_core::Error) -> Self {
        Self::bad_request(e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Unwrap a JSON body, turning decode failures into `{"error"}` responses.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload.map(|Json(body)| body).map_err(ApiError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatmate_store::RecordKind;

    #[test]
    fn test_store_error_status() {
        let nf: ApiError = StoreError::NotFound {
            kind: RecordKind::Chat,
            id: "x".into(),
        }
        .into();
        assert_eq!(nf.status, StatusCode::NOT_FOUND);
        assert_eq!(nf.message, "chat x not found");

        let invalid: ApiError = StoreError::Invalid(chatmate_core::Error::MissingField("name")).into();
        assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
        assert_eq!(invalid.message, "name is required");

        let io: ApiError = StoreError::Io(std::io::Error::other("disk on fire")).into();
        assert_eq!(io.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
