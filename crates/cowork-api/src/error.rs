use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cowork_core::error::CoworkError;
use cowork_core::validation::{FieldError, ValidationErrors};
use serde::Serialize;

/// Unified API error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub errors: Option<Vec<FieldError>>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, message: message.into(), errors: None }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self { status: StatusCode::NOT_FOUND, message: message.into(), errors: None }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self { status: StatusCode::INTERNAL_SERVER_ERROR, message: message.into(), errors: None }
    }

    pub fn with_errors(mut self, errors: Vec<FieldError>) -> Self {
        self.errors = Some(errors);
        self
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<FieldError>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { message: self.message, errors: self.errors };
        (self.status, Json(body)).into_response()
    }
}

impl From<CoworkError> for ApiError {
    fn from(err: CoworkError) -> Self {
        match &err {
            CoworkError::SpaceNotFound { .. } => Self::not_found("Space not found"),
            CoworkError::PostNotFound { .. } => Self::not_found("Blog post not found"),
            _ if err.is_client_error() => Self::bad_request(err.to_string()),
            _ => {
                tracing::error!(error = %err, "Request failed");
                Self::internal("Internal server error")
            }
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::bad_request(errors.summary()).with_errors(errors.errors)
    }
}
