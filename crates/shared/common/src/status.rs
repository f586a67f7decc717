//! gRPC status mapping.
//!
//! The single place where an [`AppError`] becomes a [`tonic::Status`] and
//! back. Classified errors keep their message; anything internal is replaced
//! with [`INTERNAL_ERROR_MESSAGE`]. Error details travel in the
//! `grpc-status-details-bin` trailer as a `google.rpc.Status` holding one
//! packed `user.v1.ErrorResponse`.

use prost::Message;
use tonic::{Code, Status};

use domain::{ApplicationErrorCode, DomainError, ErrorDetails, ErrorKind};
use proto::user::{error_response, ErrorResponse, RpcStatus, ERROR_RESPONSE_TYPE_URL};

use crate::error::{AppError, INTERNAL_ERROR_MESSAGE};

/// gRPC code for a taxonomy kind.
pub fn code_for_kind(kind: ErrorKind) -> Code {
    match kind {
        ErrorKind::Invalid => Code::InvalidArgument,
        ErrorKind::NotFound => Code::NotFound,
        ErrorKind::Unauthorized => Code::Unauthenticated,
        ErrorKind::Internal => Code::Internal,
    }
}

/// Convert an application error into the status returned to clients.
pub fn status_from_error(err: &AppError) -> Status {
    match err.root() {
        AppError::DeadlineExceeded => return Status::deadline_exceeded("deadline exceeded"),
        AppError::Cancelled => return Status::cancelled("request cancelled"),
        AppError::ServiceUnavailable(_) => return Status::unavailable(err.user_message()),
        _ => {}
    }

    let code = code_for_kind(err.kind());
    if code == Code::Internal {
        return Status::internal(INTERNAL_ERROR_MESSAGE);
    }

    let message = err.user_message();
    match err.domain().and_then(DomainError::details) {
        Some(details) => {
            let payload = encode_details(code, &message, details);
            Status::with_details(code, message, payload.into())
        }
        None => Status::new(code, message),
    }
}

impl From<AppError> for Status {
    fn from(err: AppError) -> Self {
        status_from_error(&err)
    }
}

impl From<Status> for AppError {
    fn from(status: Status) -> Self {
        let message = status.message().to_string();
        let classified = match status.code() {
            Code::InvalidArgument => DomainError::invalid(message),
            Code::NotFound => DomainError::not_found(message),
            Code::Unauthenticated | Code::PermissionDenied => DomainError::unauthorized(message),
            Code::DeadlineExceeded => return AppError::DeadlineExceeded,
            Code::Cancelled => return AppError::Cancelled,
            Code::Unavailable => return AppError::ServiceUnavailable(message),
            _ => return AppError::Internal(message),
        };

        match decode_details(status.details()) {
            Some(details) => AppError::Domain(classified.with_details(details)),
            None => AppError::Domain(classified),
        }
    }
}

fn encode_details(code: Code, message: &str, details: &ErrorDetails) -> Vec<u8> {
    let response = ErrorResponse {
        error_code: wire_error_code(details.code()) as i32,
        message: details.message().to_string(),
    };

    RpcStatus {
        code: code as i32,
        message: message.to_string(),
        details: vec![prost_types::Any {
            type_url: ERROR_RESPONSE_TYPE_URL.to_string(),
            value: response.encode_to_vec(),
        }],
    }
    .encode_to_vec()
}

/// Extract the application error details from a status trailer, if present.
pub fn decode_details(raw: &[u8]) -> Option<ErrorDetails> {
    if raw.is_empty() {
        return None;
    }

    let rpc_status = RpcStatus::decode(raw).ok()?;
    let any = rpc_status
        .details
        .into_iter()
        .find(|any| any.type_url == ERROR_RESPONSE_TYPE_URL)?;
    let response = ErrorResponse::decode(any.value.as_slice()).ok()?;
    let code = ApplicationErrorCode::from_value(response.error_code)?;

    Some(ErrorDetails::new(code, response.message))
}

fn wire_error_code(code: ApplicationErrorCode) -> error_response::ErrorCode {
    match code {
        ApplicationErrorCode::NotEnoughBalance => error_response::ErrorCode::NotEnoughBalance,
        ApplicationErrorCode::SessionExpired => error_response::ErrorCode::SessionExpired,
        ApplicationErrorCode::EmailNotProvided => error_response::ErrorCode::EmailNotProvided,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_grpc_codes() {
        let cases = [
            (DomainError::invalid("bad"), Code::InvalidArgument),
            (DomainError::not_found("user"), Code::NotFound),
            (DomainError::unauthorized("user"), Code::Unauthenticated),
            (DomainError::internal("boom"), Code::Internal),
        ];

        for (err, code) in cases {
            assert_eq!(Status::from(AppError::from(err)).code(), code);
        }
    }

    #[test]
    fn internal_errors_do_not_leak() {
        let status = Status::from(
            AppError::internal("duplicate key value violates unique constraint")
                .context("create user"),
        );

        assert_eq!(status.code(), Code::Internal);
        assert_eq!(status.message(), INTERNAL_ERROR_MESSAGE);
        assert!(status.details().is_empty());
    }

    #[test]
    fn classified_message_is_kept() {
        let status = Status::from(AppError::from(DomainError::not_found("user")).context("query"));
        assert_eq!(status.message(), "user");
    }

    #[test]
    fn details_travel_in_the_status() {
        let status = Status::from(AppError::from(DomainError::email_not_provided()));

        assert_eq!(status.code(), Code::InvalidArgument);
        let details = decode_details(status.details()).expect("details attached");
        assert_eq!(details.code(), ApplicationErrorCode::EmailNotProvided);
    }

    #[test]
    fn status_converts_back_to_classified_error() {
        let status = Status::from(AppError::from(DomainError::email_not_provided()));
        let err = AppError::from(status);

        assert_eq!(err.domain(), Some(&DomainError::email_not_provided()));
    }

    #[test]
    fn cancellation_is_not_masked() {
        let status = Status::from(AppError::DeadlineExceeded.context("read model"));
        assert_eq!(status.code(), Code::DeadlineExceeded);

        assert!(AppError::from(Status::cancelled("gone")).is_cancellation());
    }

    #[test]
    fn garbage_details_are_ignored() {
        assert!(decode_details(b"\xff\xff\xff").is_none());
        assert!(decode_details(&[]).is_none());
    }
}
