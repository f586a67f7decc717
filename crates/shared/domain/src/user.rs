//! User domain entity and related types.

use uuid::Uuid;

use crate::error::{DomainError, DomainResult};

/// User domain entity.
///
/// A `User` built through [`User::new`] always has a non-nil id and a
/// non-empty email. Fields are private so that nothing can mutate a user
/// after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: Uuid,
    email: String,
}

impl User {
    /// Create a validated user.
    ///
    /// Fails with an `invalid` error when `id` is nil, and with an `invalid`
    /// error carrying the `EmailNotProvided` code when `email` is empty.
    pub fn new(id: Uuid, email: impl Into<String>) -> DomainResult<Self> {
        if id.is_nil() {
            return Err(DomainError::invalid("nil id"));
        }

        let email = email.into();
        if email.is_empty() {
            return Err(DomainError::email_not_provided());
        }

        Ok(Self { id, email })
    }

    /// Same as [`User::new`] but panics on invalid input.
    ///
    /// Only for tests and initialisation code where invalid input is a bug.
    ///
    /// # Panics
    /// Panics when the id is nil or the email is empty.
    pub fn must_new(id: Uuid, email: impl Into<String>) -> Self {
        match Self::new(id, email) {
            Ok(user) => user,
            Err(err) => panic!("invalid user: {err}"),
        }
    }

    /// Rebuild a user from persisted data without validation.
    ///
    /// Storage adapters use this to hydrate rows that were validated when
    /// they were written. Calling it with any other data breaks the
    /// guarantee that no invalid `User` exists in memory.
    pub fn unmarshal_from_database(id: Uuid, email: String) -> Self {
        Self { id, email }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Criteria used to narrow a "find users" read.
///
/// A `None` field places no constraint on that column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub id: Option<Uuid>,
    pub email: Option<String>,
}

impl Filter {
    pub fn by_id(id: Uuid) -> Self {
        Self {
            id: Some(id),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Whether a user with the given fields satisfies this filter.
    pub fn matches(&self, id: Uuid, email: &str) -> bool {
        self.id.map_or(true, |wanted| wanted == id)
            && self.email.as_deref().map_or(true, |wanted| wanted == email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ApplicationErrorCode, ErrorKind};

    #[test]
    fn new_keeps_given_fields() {
        let id = Uuid::new_v4();
        let user = User::new(id, "me@test.com").unwrap();

        assert_eq!(user.id(), id);
        assert_eq!(user.email(), "me@test.com");
    }

    #[test]
    fn new_rejects_nil_id_whatever_the_email() {
        for email in ["", "a@b.com"] {
            let err = User::new(Uuid::nil(), email).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Invalid);
        }
    }

    #[test]
    fn new_rejects_empty_email_with_code() {
        let err = User::new(Uuid::new_v4(), "").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Invalid);
        assert_eq!(
            err.application_code(),
            Some(ApplicationErrorCode::EmailNotProvided)
        );
    }

    #[test]
    fn new_does_not_validate_email_format() {
        assert!(User::new(Uuid::new_v4(), "not-an-email").is_ok());
    }

    #[test]
    #[should_panic(expected = "invalid user")]
    fn must_new_panics_on_invalid_input() {
        User::must_new(Uuid::nil(), "a@b.com");
    }

    #[test]
    fn filter_matches_only_constrained_fields() {
        let id = Uuid::new_v4();

        assert!(Filter::default().matches(id, "a@b.com"));
        assert!(Filter::by_id(id).matches(id, "a@b.com"));
        assert!(!Filter::by_id(Uuid::new_v4()).matches(id, "a@b.com"));
        assert!(!Filter::by_id(id).with_email("x@y.com").matches(id, "a@b.com"));
    }
}
