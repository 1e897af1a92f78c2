use actix_web::{
    HttpRequest, HttpResponse, ResponseError,
    error::{JsonPayloadError, PathError, QueryPayloadError},
    http::StatusCode,
};
use derive_more::Display;
use serde_json::{Value, json};
use tracing::{error, warn};

use crate::{models::ErrorResponse, repository::StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    BadRequest,
    Validation,
    Unauthorized,
    TooManyRequests,
    Misconfigured,
    Internal,
}

/// Error raised by the operation sets and the key gate.
///
/// Carries its classification and optional structured details untouched up to
/// the HTTP boundary, where it becomes the `{message, details}` envelope.
#[derive(Debug, Display)]
#[display(fmt = "{}: {}", kind, message)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
    pub details: Option<Value>,
}

impl AppError {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn too_many_requests(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TooManyRequests, message)
    }

    pub fn misconfigured(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Misconfigured, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Message and details as the caller may see them. Internal faults are
    /// reduced to a generic message.
    pub(crate) fn public_body(&self) -> ErrorResponse {
        match self.kind {
            ErrorKind::Internal => ErrorResponse {
                message: "Internal server error".to_string(),
                details: None,
            },
            _ => ErrorResponse {
                message: self.message.clone(),
                details: self.details.clone(),
            },
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self.kind {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            ErrorKind::Misconfigured | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        if status.is_server_error() {
            error!(kind = %self.kind, message = %self.message, "Request failed");
        } else {
            warn!(
                kind = %self.kind,
                message = %self.message,
                details = ?self.details,
                "Request rejected"
            );
        }

        HttpResponse::build(status).json(self.public_body())
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        error!(error = %e, "Store operation failed");
        AppError::internal(e.to_string())
    }
}

fn extraction_failure(source: &str, reason: String) -> AppError {
    AppError::validation("Validation error").with_details(json!({
        "errors": [{ "source": source, "message": reason }]
    }))
}

/// `JsonConfig` error handler: malformed bodies become 422 envelopes.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    extraction_failure("body", err.to_string()).into()
}

/// `QueryConfig` error handler, e.g. `?date=2026-13-45`.
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    extraction_failure("query", err.to_string()).into()
}

pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    extraction_failure("path", err.to_string()).into()
}

/// Fallback for unmatched routes.
pub async fn not_found() -> Result<HttpResponse, AppError> {
    Err(AppError::not_found("Not Found"))
}
