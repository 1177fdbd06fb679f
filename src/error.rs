use std::borrow::Cow;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Map, Value as JsonValue};
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Application failed: {0}")]
    ApplyFailed(JsonValue),

    /// An Application already exists for the (applicant, job) pair.
    #[error("Duplicate application: {0}")]
    DuplicateApplication(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Multipart error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),
}

impl Error {
    /// Single-field validation failure, shaped like the derive-generated ones.
    pub fn field(field: &'static str, code: &'static str, message: impl Into<String>) -> Self {
        let mut error = ValidationError::new(code);
        error.message = Some(Cow::Owned(message.into()));
        let mut errors = ValidationErrors::new();
        errors.add(field, error);
        Error::Validation(errors)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            Error::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, json!({ "error": msg })),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            Error::DuplicateApplication(msg) => {
                (StatusCode::BAD_REQUEST, json!({ "error": msg }))
            }
            Error::Validation(err) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "validation_failed", "details": validation_details(&err) }),
            ),
            Error::ApplyFailed(details) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Application failed", "details": details }),
            ),
            Error::Multipart(err) => (StatusCode::BAD_REQUEST, json!({ "error": err.to_string() })),
            Error::Database(err) => {
                tracing::error!(error = ?err, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "An unexpected database error occurred" }),
                )
            }
            Error::Internal(msg) => {
                tracing::error!("internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": msg }))
            }
            Error::Io(err) => {
                tracing::error!(error = ?err, "io error");
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": err.to_string() }))
            }
            Error::Config(msg) => {
                tracing::error!("configuration error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "An unexpected error occurred" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("Resource not found".to_string()),
            other => Error::Database(other),
        }
    }
}

/// Flattens `ValidationErrors` into `{field: [messages]}`, recursing into
/// nested structs and lists (`{"items": {"0": {"quantity": [...]}}}`).
pub fn validation_details(errors: &ValidationErrors) -> JsonValue {
    let mut out = Map::new();
    for (field, kind) in errors.errors() {
        let value = match kind {
            ValidationErrorsKind::Field(list) => JsonValue::Array(
                list.iter()
                    .map(|e| {
                        JsonValue::String(
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string()),
                        )
                    })
                    .collect(),
            ),
            ValidationErrorsKind::Struct(inner) => validation_details(inner),
            ValidationErrorsKind::List(entries) => {
                let mut indexed = Map::new();
                for (index, inner) in entries {
                    indexed.insert(index.to_string(), validation_details(inner));
                }
                JsonValue::Object(indexed)
            }
        };
        out.insert(field.to_string(), value);
    }
    JsonValue::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_error_is_reported_under_its_name() {
        let Error::Validation(errors) = Error::field("email", "unique", "taken") else {
            panic!("expected a validation error");
        };
        assert_eq!(validation_details(&errors), json!({ "email": ["taken"] }));
    }

    #[test]
    fn row_not_found_becomes_not_found() {
        assert!(matches!(
            Error::from(sqlx::Error::RowNotFound),
            Error::NotFound(_)
        ));
    }
}
