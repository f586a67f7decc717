//! Application error taxonomy.
//!
//! A small, closed vocabulary for classifying failures. Transport adapters
//! map an error's [`ErrorKind`] to a protocol status without ever looking at
//! the message text. When a client needs a finer, machine-readable reason,
//! the error carries [`ErrorDetails`] with an [`ApplicationErrorCode`].

use std::fmt;

use thiserror::Error;

/// Coarse error category, mapped one-to-one onto protocol status classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid data was passed to the application (gRPC 3, HTTP 400).
    Invalid,
    /// The requested resource does not exist (gRPC 5, HTTP 404).
    NotFound,
    /// The caller is not allowed to perform the action (gRPC 16, HTTP 401).
    Unauthorized,
    /// Something failed inside the system (gRPC 13, HTTP 500).
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Invalid => "invalid",
            ErrorKind::NotFound => "not-found",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application specific error codes.
///
/// The numeric values are part of the wire contract: they match the
/// `ErrorCode` enum in `user.proto`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ApplicationErrorCode {
    /// The user balance is not enough to perform a transaction.
    NotEnoughBalance = 1,
    /// The caller's session expired.
    SessionExpired = 2,
    /// A user attempted to register without an email.
    EmailNotProvided = 3,
}

impl ApplicationErrorCode {
    /// Numeric value as carried on the wire.
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Inverse of [`ApplicationErrorCode::value`]. Unknown values yield `None`.
    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            1 => Some(ApplicationErrorCode::NotEnoughBalance),
            2 => Some(ApplicationErrorCode::SessionExpired),
            3 => Some(ApplicationErrorCode::EmailNotProvided),
            _ => None,
        }
    }
}

impl fmt::Display for ApplicationErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Extra, machine-readable data attached to an application error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetails {
    code: ApplicationErrorCode,
    message: String,
}

impl ErrorDetails {
    pub fn new(code: ApplicationErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn code(&self) -> ApplicationErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A classified application error.
///
/// Two errors are equal when they share the same kind and the same
/// application code (an error without details only equals other errors
/// without details). The message is ignored so tests can assert on the
/// category of a failure without pinning its wording.
#[derive(Error, Debug, Clone)]
#[error("application error: type: {kind} message: {message}")]
pub struct DomainError {
    kind: ErrorKind,
    message: String,
    details: Option<ErrorDetails>,
}

impl DomainError {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    /// Invalid data was passed to the application.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Invalid, msg)
    }

    /// A resource could not be found.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, msg)
    }

    /// The caller attempted an action they are not allowed to perform.
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, msg)
    }

    /// An internal failure. Its message must never be shown to a client.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, msg)
    }

    /// A registration attempt without an email.
    pub fn email_not_provided() -> Self {
        Self::invalid("email not provided")
            .with_details(ErrorDetails::new(ApplicationErrorCode::EmailNotProvided, ""))
    }

    /// Attach details to the error.
    pub fn with_details(mut self, details: ErrorDetails) -> Self {
        self.details = Some(details);
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&ErrorDetails> {
        self.details.as_ref()
    }

    /// Application code carried by the details, if any.
    pub fn application_code(&self) -> Option<ApplicationErrorCode> {
        self.details.as_ref().map(ErrorDetails::code)
    }
}

impl PartialEq for DomainError {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.application_code() == other.application_code()
    }
}

impl Eq for DomainError {}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_message_text() {
        assert_eq!(
            DomainError::invalid("id is nil"),
            DomainError::invalid("something else entirely")
        );
    }

    #[test]
    fn equality_requires_same_kind() {
        assert_ne!(DomainError::invalid("user"), DomainError::not_found("user"));
    }

    #[test]
    fn equality_compares_application_codes() {
        let expired = DomainError::invalid("a")
            .with_details(ErrorDetails::new(ApplicationErrorCode::SessionExpired, "x"));

        assert_eq!(DomainError::email_not_provided(), DomainError::email_not_provided());
        assert_ne!(DomainError::email_not_provided(), expired);
        assert_ne!(DomainError::email_not_provided(), DomainError::invalid("email"));
    }

    #[test]
    fn internal_constructor_has_internal_kind() {
        assert_eq!(DomainError::internal("boom").kind(), ErrorKind::Internal);
    }

    #[test]
    fn display_includes_kind_and_message() {
        let err = DomainError::not_found("user");
        assert_eq!(err.to_string(), "application error: type: not-found message: user");
    }

    #[test]
    fn application_code_values_match_wire_contract() {
        assert_eq!(ApplicationErrorCode::EmailNotProvided.value(), 3);
        assert_eq!(
            ApplicationErrorCode::from_value(2),
            Some(ApplicationErrorCode::SessionExpired)
        );
        assert_eq!(ApplicationErrorCode::from_value(0), None);
    }
}
