//! Uniform result envelope returned by every catalog operation

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult, ErrorKind};

/// Envelope wrapping the outcome of an operation.
///
/// On success `data` holds the payload (absent for deletes). On failure
/// `data` is absent and `error_kind` classifies the failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    /// Human readable confirmation or diagnostic
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error_kind: None,
            data: Some(data),
        }
    }

    /// Successful outcome without payload
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error_kind: None,
            data: None,
        }
    }

    pub fn failure(error: &AppError) -> Self {
        Self {
            success: false,
            message: error.to_string(),
            error_kind: Some(error.kind()),
            data: None,
        }
    }

    /// Wrap a service result. Unexpected failures are prefixed with
    /// `failure_context` and logged; domain failures keep their own message.
    pub fn from_result(result: AppResult<T>, success_message: &str, failure_context: &str) -> Self {
        match result {
            Ok(data) => Self::success(data, success_message),
            Err(error) => Self::from_error(error, failure_context),
        }
    }

    fn from_error(error: AppError, failure_context: &str) -> Self {
        match error.kind() {
            ErrorKind::UnexpectedFailure => {
                tracing::error!("{}: {}", failure_context, error);
                Self {
                    success: false,
                    message: format!("{}: {}", failure_context, error),
                    error_kind: Some(ErrorKind::UnexpectedFailure),
                    data: None,
                }
            }
            kind => {
                tracing::debug!("{} rejected ({:?}): {}", failure_context, kind, error);
                Self::failure(&error)
            }
        }
    }

    /// HTTP status matching this envelope
    pub fn status_code(&self) -> StatusCode {
        match self.error_kind {
            Some(kind) if !self.success => kind.status_code(),
            _ => StatusCode::OK,
        }
    }
}

impl ApiResponse<()> {
    /// Wrap a payload-less result (deletes)
    pub fn from_outcome(result: AppResult<()>, success_message: &str, failure_context: &str) -> Self {
        match result {
            Ok(()) => Self::message_only(success_message),
            Err(error) => Self::from_error(error, failure_context),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

/// Answer a create operation: 201 with a `Location` header on success,
/// the regular failure status otherwise.
pub fn created<T: Serialize>(response: ApiResponse<T>, location: impl FnOnce(&T) -> String) -> Response {
    let target = match (&response.data, response.success) {
        (Some(data), true) => Some(location(data)),
        _ => None,
    };

    match target {
        Some(target) => (
            StatusCode::CREATED,
            [(header::LOCATION, target)],
            Json(response),
        )
            .into_response(),
        None => response.into_response(),
    }
}

/// Answer an update of a row holding references. A reference to a missing
/// row is answered 404 like a missing target; `error_kind` still tells
/// them apart.
pub fn updated<T: Serialize>(response: ApiResponse<T>) -> Response {
    match response.error_kind {
        Some(ErrorKind::DanglingReference) => {
            (StatusCode::NOT_FOUND, Json(response)).into_response()
        }
        _ => response.into_response(),
    }
}
