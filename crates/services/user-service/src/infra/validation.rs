//! Record validation applied by the SQL adapter before writes.

use validator::{Validate, ValidationErrors};

use common::{AppError, AppResult};
use domain::{DomainError, User};

#[derive(Debug, Validate)]
struct UserRecord {
    #[validate(email(message = "invalid email format"))]
    email: String,
}

/// Checks storage-level constraints the domain entity does not enforce.
///
/// Built once at startup and handed to the adapters that need it.
#[derive(Debug, Clone, Default)]
pub struct RecordValidator;

impl RecordValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate_user(&self, user: &User) -> AppResult<()> {
        UserRecord {
            email: user.email().to_string(),
        }
        .validate()
        .map_err(|errors| AppError::from(DomainError::invalid(format_validation_errors(&errors))))
    }
}

fn format_validation_errors(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}
