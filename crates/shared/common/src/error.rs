//! Unified error handling for HTTP and gRPC.
//!
//! [`AppError`] wraps the domain taxonomy together with the opaque
//! infrastructure failures that can reach the application layer. It can be
//! converted to:
//! - Axum HTTP responses (for the gateway)
//! - Tonic gRPC status codes (see [`crate::status`])

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::{ApplicationErrorCode, DomainError, ErrorKind};
use serde::Serialize;
use thiserror::Error;

/// Message returned to clients in place of any internal error text.
pub const INTERNAL_ERROR_MESSAGE: &str = "internal error.";

/// Application error types with support for both HTTP and gRPC.
#[derive(Error, Debug)]
pub enum AppError {
    /// An error already classified by the application taxonomy.
    #[error(transparent)]
    Domain(#[from] DomainError),

    // External service errors
    #[cfg(feature = "database")]
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[cfg(feature = "jwt")]
    #[error("authentication error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Another error annotated with the operation that failed.
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<AppError>,
    },

    // Cancellation
    #[error("deadline exceeded")]
    DeadlineExceeded,

    #[error("request cancelled")]
    Cancelled,

    // Upstream gRPC service could not be reached
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    // Internal
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Wrap the error with the name of the operation that failed.
    pub fn context(self, context: impl Into<String>) -> Self {
        AppError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping every context wrapper.
    pub fn root(&self) -> &AppError {
        match self {
            AppError::Context { source, .. } => source.root(),
            other => other,
        }
    }

    /// The classified domain error inside the chain, if there is one.
    pub fn domain(&self) -> Option<&DomainError> {
        match self.root() {
            AppError::Domain(err) => Some(err),
            _ => None,
        }
    }

    /// Coarse taxonomy kind of the error.
    ///
    /// Anything that was not classified on its way up is `internal`.
    pub fn kind(&self) -> ErrorKind {
        match self.root() {
            AppError::Domain(err) => err.kind(),
            #[cfg(feature = "jwt")]
            AppError::Jwt(_) => ErrorKind::Unauthorized,
            _ => ErrorKind::Internal,
        }
    }

    /// Application code carried by a classified error.
    pub fn application_code(&self) -> Option<ApplicationErrorCode> {
        self.domain().and_then(DomainError::application_code)
    }

    /// Whether the failure comes from the caller's deadline or cancellation.
    pub fn is_cancellation(&self) -> bool {
        matches!(self.root(), AppError::DeadlineExceeded | AppError::Cancelled)
    }

    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self.root() {
            AppError::DeadlineExceeded => "DEADLINE_EXCEEDED",
            AppError::Cancelled => "CANCELLED",
            AppError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            _ => match self.kind() {
                ErrorKind::Invalid => "INVALID_ARGUMENT",
                ErrorKind::NotFound => "NOT_FOUND",
                ErrorKind::Unauthorized => "UNAUTHENTICATED",
                ErrorKind::Internal => "INTERNAL",
            },
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self.root() {
            AppError::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
            // Client closed request, as used by grpc-gateway.
            AppError::Cancelled => {
                StatusCode::from_u16(499).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => match self.kind() {
                ErrorKind::Invalid => StatusCode::BAD_REQUEST,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
                ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self.root() {
            AppError::Domain(err) if err.kind() != ErrorKind::Internal => err.message().to_string(),
            #[cfg(feature = "jwt")]
            AppError::Jwt(_) => "invalid or expired token".to_string(),
            AppError::DeadlineExceeded | AppError::Cancelled => self.root().to_string(),
            AppError::ServiceUnavailable(_) => "service unavailable".to_string(),
            _ => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}

// =============================================================================
// HTTP Response (Axum)
// =============================================================================

/// Error response body for HTTP
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    application_code: Option<u8>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code(),
                message: self.user_message(),
                application_code: self.application_code().map(ApplicationErrorCode::value),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait attaching call-site context to fallible results.
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> AppResult<T>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<AppError>,
{
    fn context(self, context: impl Into<String>) -> AppResult<T> {
        self.map_err(|err| err.into().context(context))
    }
}

/// Convenience constructors
impl AppError {
    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
