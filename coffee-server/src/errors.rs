use crate::store::StoreError;
use axum::response::IntoResponse;
use axum::Json;
use coffee_auth::AuthError;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of every error response
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct ErrorResponse {
    pub success: bool,
    /// HTTP status code, repeated in the body
    pub error: u16,
    pub message: String,
    /// Short machine readable code, present on authorization failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApiError {
    pub message: String,
    pub status_code: StatusCode,
    /// Machine readable code, only set for authorization failures
    pub code: Option<String>,
}

impl ApiError {
    /// Create a new ApiError with a message and status code
    pub fn new<S: ToString>(message: S, status_code: StatusCode) -> Self {
        Self {
            message: message.to_string(),
            status_code,
            code: None,
        }
    }

    /// Create new Internal Server Error (500) with a message
    pub fn internal<S: ToString>(message: S) -> Self {
        Self::new(message, StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Create new Not Found Error (404)
    pub fn not_found() -> Self {
        Self::new("resource not found", StatusCode::NOT_FOUND)
    }

    /// Create new Method Not Allowed Error (405)
    pub fn method_not_allowed() -> Self {
        Self::new("method not allowed", StatusCode::METHOD_NOT_ALLOWED)
    }

    /// Create new Unprocessable Entity Error (422)
    pub fn unprocessable() -> Self {
        Self::new("unprocessable", StatusCode::UNPROCESSABLE_ENTITY)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let status_code = StatusCode::from_u16(err.status).unwrap_or(StatusCode::UNAUTHORIZED);
        Self {
            message: err.description,
            status_code,
            code: Some(err.kind.code().to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => Self::not_found(),
            StoreError::Conflict(title) => {
                log::warn!("Rejected duplicate drink title '{}'", title);
                Self::unprocessable()
            }
            err => {
                log::error!("Store failure: {}", err);
                Self::internal("internal server error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status_code = self.status_code;
        let body = ErrorResponse {
            success: false,
            error: status_code.as_u16(),
            message: self.message,
            code: self.code,
        };
        (status_code, Json(body)).into_response()
    }
}
