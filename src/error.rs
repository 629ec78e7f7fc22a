use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use thiserror::Error;

use crate::response::ApiResponse;
use crate::validation::FieldError;

/// Failures raised by a storage gateway.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A write would break a unique key (`code`, `staffNo` or `id`).
    #[error("duplicate key")]
    DuplicateKey,

    #[error("storage error: {0}")]
    Backend(String),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

/// Failures returned by the managers and rendered by the HTTP layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{entity} not found with {field}: {value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("{0}")]
    Conflict(String),

    #[error("Validation failed: {}", format_fields(.0))]
    ValidationFailed(Vec<FieldError>),

    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

fn format_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ServiceError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        ServiceError::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, ServiceError::Conflict(_))
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            // Managers translate duplicates with the offending key; this is the fallback.
            StoreError::DuplicateKey => ServiceError::Conflict("duplicate key".to_string()),
            StoreError::Backend(msg) => ServiceError::Unexpected(msg),
        }
    }
}

#[derive(Serialize)]
struct FieldErrors<'a> {
    errors: &'a [FieldError],
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            ServiceError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }
        match self {
            ServiceError::ValidationFailed(errors) => HttpResponse::build(status).json(
                ApiResponse::error_with(status.as_u16(), self.to_string(), FieldErrors { errors }),
            ),
            _ => HttpResponse::build(status)
                .json(ApiResponse::<()>::error(status.as_u16(), self.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        assert_eq!(
            ServiceError::not_found("Department", "id", 7).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::ValidationFailed(vec![]).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::from(StoreError::Backend("down".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_message_names_the_key() {
        let err = ServiceError::not_found("Staff", "staff number", "S404");
        assert_eq!(err.to_string(), "Staff not found with staff number: S404");
    }
}
