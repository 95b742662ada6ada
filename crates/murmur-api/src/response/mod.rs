//! Response types and error handling for API endpoints
//!
//! Every endpoint answers with the same envelope: `success`, a user-facing
//! `message`, and an optional flattened payload. Errors reuse the envelope
//! with `success: false` plus a machine-readable `code`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use murmur_common::AppError;
use murmur_core::DomainError;
use murmur_service::ServiceError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

/// Message used for every sanitized server error
pub const GENERIC_SERVER_ERROR: &str = "Internal server error";

/// Message for the one unsanitized server error
pub const EMAIL_DISPATCH_ERROR: &str = "Failed to send verification email";

// ============================================================================
// Success envelope
// ============================================================================

/// Response envelope shared by every endpoint
///
/// The payload, when present, is flattened into the envelope object rather
/// than nested under a key.
#[derive(Debug, Serialize)]
pub struct Envelope<T = ()> {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub data: Option<T>,
}

impl Envelope<()> {
    /// A successful outcome carrying only a message
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }

    /// A well-formed request whose answer is "no", delivered as 200
    ///
    /// Used by the availability check, where "taken" is an answer rather
    /// than an error.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

impl<T> Envelope<T> {
    /// A successful outcome with a flattened payload
    pub fn ok_with(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

// ============================================================================
// Error type
// ============================================================================

/// API error type for consistent error responses
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    App(#[from] AppError),

    #[error("{0}")]
    Service(#[from] ServiceError),

    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("{}", validation_message(.0))]
    Validation(#[from] ValidationErrors),

    #[error("Invalid path parameter: {0}")]
    InvalidPath(String),

    #[error("Invalid query parameter: {0}")]
    InvalidQuery(String),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Not authenticated")]
    MissingAuth,

    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),
}

/// First declared field message, or a generic fallback
///
/// The client shows the envelope message in a toast, so one clear sentence
/// beats the full multi-field dump.
fn validation_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .into_values()
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(ToString::to_string))
        .unwrap_or_else(|| "Validation error".to_string())
}

impl ApiError {
    /// Get HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::App(e) => {
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            Self::Service(e) => {
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            Self::Domain(e) => {
                if e.is_not_found() {
                    StatusCode::NOT_FOUND
                } else if e.is_authentication() {
                    StatusCode::UNAUTHORIZED
                } else if e.is_infrastructure() {
                    StatusCode::INTERNAL_SERVER_ERROR
                } else {
                    StatusCode::BAD_REQUEST
                }
            }
            Self::Validation(_) | Self::InvalidPath(_) | Self::InvalidQuery(_)
            | Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::MissingAuth => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code for API responses
    #[must_use]
    pub fn error_code(&self) -> &str {
        match self {
            Self::App(e) => e.error_code(),
            Self::Service(e) => e.error_code(),
            Self::Domain(e) => e.code(),
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidPath(_) => "INVALID_PATH_PARAMETER",
            Self::InvalidQuery(_) => "INVALID_QUERY_PARAMETER",
            Self::InvalidBody(_) => "INVALID_BODY",
            Self::MissingAuth => "NOT_AUTHENTICATED",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }

    /// Create an invalid path parameter error
    pub fn invalid_path(msg: impl Into<String>) -> Self {
        Self::InvalidPath(msg.into())
    }

    /// Create an invalid query parameter error
    pub fn invalid_query(msg: impl Into<String>) -> Self {
        Self::InvalidQuery(msg.into())
    }

    /// Create an invalid request body error
    pub fn invalid_body(msg: impl Into<String>) -> Self {
        Self::InvalidBody(msg.into())
    }

    /// Whether this is the verification email failure, which keeps its
    /// specific message even as a server error
    fn is_email_dispatch_failure(&self) -> bool {
        match self {
            Self::Service(e) => e.is_email_dispatch_failure(),
            Self::Domain(DomainError::EmailError(_)) => true,
            Self::App(AppError::Domain(DomainError::EmailError(_))) => true,
            _ => false,
        }
    }
}

/// Error payload: the envelope with `success: false` and an error code
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code().to_string();

        // Log server errors with their internals before sanitizing
        if status.is_server_error() {
            error!(error = ?self, "Server error occurred");
        }

        // Client errors surface verbatim; server errors are replaced by
        // generic text, except the email dispatch failure
        let message = if status.is_server_error() {
            if self.is_email_dispatch_failure() {
                EMAIL_DISPATCH_ERROR.to_string()
            } else {
                GENERIC_SERVER_ERROR.to_string()
            }
        } else {
            self.to_string()
        };

        let body = ErrorBody {
            success: false,
            message,
            code,
        };

        (status, Json(body)).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
