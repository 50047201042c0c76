//! # Application Errors
//!
//! `AppError` covers everything the binary can fail on: registry operations,
//! file I/O, configuration, (de)serialization and rejected HTTP input. It doubles as the error
//! type of the HTTP handlers, so each variant maps to one status code.

use crate::api::ErrorResponse;
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gradebook_core::GradebookError;
use thiserror::Error;

/// Errors surfaced by the Gradebook binary.
#[derive(Debug, Error)]
pub enum AppError {
    /// A registry operation was rejected.
    #[error(transparent)]
    Registry(#[from] GradebookError),

    /// Reading or writing a file, or binding a socket, failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// A configuration value is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A document could not be parsed or produced.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// An HTTP request body, path or query string was rejected before
    /// reaching the registry. Keeps the extractor's status code.
    #[error("Invalid request: {message}")]
    InvalidRequest { status: StatusCode, message: String },
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::InvalidRequest {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidRequest {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl AppError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Registry(err) => match err {
                GradebookError::DuplicateId { .. } => StatusCode::CONFLICT,
                GradebookError::IdMismatch { .. } => StatusCode::BAD_REQUEST,
                GradebookError::NotFound { .. }
                | GradebookError::MissingStudent(_)
                | GradebookError::MissingTeacher(_)
                | GradebookError::MissingSubject(_)
                | GradebookError::StudentNotFound(_)
                | GradebookError::SubjectNotFound(_)
                | GradebookError::NoGradesFound { .. } => StatusCode::NOT_FOUND,
            },
            Self::Serialization(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequest { status, .. } => *status,
            Self::Io(_) | Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable snake_case tag for the error, sent as `kind` in error bodies.
    pub fn kind_tag(&self) -> &'static str {
        match self {
            Self::Registry(err) => err.kind_tag(),
            Self::Io(_) => "io",
            Self::Config(_) => "config",
            Self::Serialization(_) => "serialization",
            Self::InvalidRequest { .. } => "invalid_request",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(kind = self.kind_tag(), error = %self, "Request rejected");
        }

        let body = ErrorResponse {
            error: self.to_string(),
            kind: self.kind_tag().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use gradebook_core::EntityKind;

    #[test]
    fn duplicate_is_conflict() {
        let err = AppError::from(GradebookError::DuplicateId {
            kind: EntityKind::Student,
            id: 1,
        });
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.kind_tag(), "duplicate_id");
    }

    #[test]
    fn missing_references_are_not_found() {
        for err in [
            GradebookError::MissingStudent(1),
            GradebookError::MissingTeacher(1),
            GradebookError::MissingSubject(1),
            GradebookError::NoGradesFound {
                student_id: 1,
                subject_id: 1,
            },
        ] {
            assert_eq!(AppError::from(err).status_code(), StatusCode::NOT_FOUND);
        }
    }

    #[test]
    fn registry_message_is_passed_through() {
        let err = AppError::from(GradebookError::SubjectNotFound(4));
        assert_eq!(err.to_string(), "subject with id 4 is not registered");
    }

    #[test]
    fn invalid_request_keeps_status() {
        let err = AppError::InvalidRequest {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: "missing field `value`".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.kind_tag(), "invalid_request");
    }

    #[test]
    fn config_error_is_server_error() {
        let err = AppError::Config("bad port".to_string());
        assert!(err.status_code().is_server_error());
    }
}
