//! Error types for Bookshelf server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::ValidationErrors;

use crate::{models::EntityKind, response::ApiResponse};

/// Closed set of failure classes reported in every failure envelope.
///
/// Callers branch on this value instead of inspecting message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The targeted row does not exist
    NotFound,
    /// A genre or author with the same name already exists
    DuplicateName,
    /// A book references a genre or author that does not exist
    DanglingReference,
    /// A genre or author is still referenced by books
    IntegrityViolation,
    /// The payload is malformed or violates field constraints
    InvalidInput,
    /// Store or infrastructure fault
    UnexpectedFailure,
}

impl ErrorKind {
    /// HTTP status answered for this kind of failure
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::DuplicateName
            | ErrorKind::DanglingReference
            | ErrorKind::IntegrityViolation
            | ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::UnexpectedFailure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    DuplicateName(String),

    #[error("{0}")]
    DanglingReference(String),

    #[error("{0}")]
    IntegrityViolation(String),

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Target of a get/update/delete does not exist
    pub fn not_found(entity: EntityKind) -> Self {
        AppError::NotFound(format!("{} not found", entity.label()))
    }

    /// A book points at a genre or author that does not exist
    pub fn dangling_reference(entity: EntityKind) -> Self {
        AppError::DanglingReference(format!("{} not found", entity.label()))
    }

    pub fn duplicate_name(entity: EntityKind) -> Self {
        AppError::DuplicateName(format!(
            "{} with this name already exists",
            entity.indefinite(true)
        ))
    }

    /// Deletion blocked because books still reference the row
    pub fn still_referenced(entity: EntityKind) -> Self {
        AppError::IntegrityViolation(format!(
            "Cannot delete {} that has associated books",
            entity.indefinite(false)
        ))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::DuplicateName(_) => ErrorKind::DuplicateName,
            AppError::DanglingReference(_) => ErrorKind::DanglingReference,
            AppError::IntegrityViolation(_) => ErrorKind::IntegrityViolation,
            AppError::Validation(_) => ErrorKind::InvalidInput,
            AppError::Database(_) | AppError::Internal(_) => ErrorKind::UnexpectedFailure,
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("Invalid value for {}", field),
                })
            })
            .collect();
        messages.sort();
        AppError::Validation(messages.join("; "))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.kind() == ErrorKind::UnexpectedFailure {
            tracing::error!("Request failed: {}", self);
        }
        ApiResponse::<()>::failure(&self).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
