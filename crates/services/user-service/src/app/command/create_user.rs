//! Add a new user to the system.

use std::sync::Arc;

use uuid::Uuid;

use common::{AppResult, ResultExt};
use domain::User;

use crate::app::Context;
use crate::repository::UserRepository;

/// Data required to add a new user.
///
/// The id is generated by the caller, not by storage.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub id: Uuid,
    pub email: String,
}

#[derive(Clone)]
pub struct CreateUserHandler {
    repo: Arc<dyn UserRepository>,
}

impl CreateUserHandler {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    /// Validate the user and persist it exactly once.
    ///
    /// Validation errors keep their classification; storage failures are
    /// wrapped and stay unclassified.
    pub async fn handle(&self, ctx: &Context, cmd: CreateUser) -> AppResult<()> {
        let user = User::new(cmd.id, cmd.email).context("new user")?;

        ctx.run(self.repo.create_user(&user))
            .await
            .context("create user")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockUserRepository;
    use common::AppError;
    use domain::{ApplicationErrorCode, DomainError, ErrorKind};

    #[tokio::test]
    async fn stores_valid_user_once() {
        let id = Uuid::new_v4();
        let expected = User::must_new(id, "a@b.io");
        let mut repo = MockUserRepository::new();
        repo.expect_create_user()
            .withf(move |user| *user == expected)
            .times(1)
            .returning(|_| Ok(()));

        let handler = CreateUserHandler::new(Arc::new(repo));
        let result = handler
            .handle(
                &Context::background(),
                CreateUser {
                    id,
                    email: "a@b.io".to_string(),
                },
            )
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn empty_email_never_reaches_storage() {
        let mut repo = MockUserRepository::new();
        repo.expect_create_user().never();

        let handler = CreateUserHandler::new(Arc::new(repo));
        let err = handler
            .handle(
                &Context::background(),
                CreateUser {
                    id: Uuid::new_v4(),
                    email: String::new(),
                },
            )
            .await
            .unwrap_err();

        assert_eq!(err.domain(), Some(&DomainError::email_not_provided()));
        assert_eq!(
            err.application_code(),
            Some(ApplicationErrorCode::EmailNotProvided)
        );
    }

    #[tokio::test]
    async fn nil_id_never_reaches_storage() {
        let mut repo = MockUserRepository::new();
        repo.expect_create_user().never();

        let handler = CreateUserHandler::new(Arc::new(repo));
        let err = handler
            .handle(
                &Context::background(),
                CreateUser {
                    id: Uuid::nil(),
                    email: "a@b.io".to_string(),
                },
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Invalid);
        assert_eq!(err.application_code(), None);
    }

    #[tokio::test]
    async fn storage_failure_is_wrapped_and_unclassified() {
        let mut repo = MockUserRepository::new();
        repo.expect_create_user()
            .times(1)
            .returning(|_| Err(AppError::internal("duplicate key")));

        let handler = CreateUserHandler::new(Arc::new(repo));
        let err = handler
            .handle(
                &Context::background(),
                CreateUser {
                    id: Uuid::new_v4(),
                    email: "a@b.io".to_string(),
                },
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(err.to_string().starts_with("create user: "));
    }
}
