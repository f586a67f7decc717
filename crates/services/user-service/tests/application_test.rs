//! Application layer tests over the in-memory store.

use std::sync::Arc;

use uuid::Uuid;

use domain::{DomainError, ErrorKind, Filter};
use user_service_lib::app::command::{CreateUser, TracingReporter};
use user_service_lib::app::query;
use user_service_lib::app::{Application, Context};
use user_service_lib::infra::RecordValidator;
use user_service_lib::repository::InMemoryUserStore;

fn application() -> Application {
    let store = InMemoryUserStore::new(RecordValidator::new());
    Application::from_store(Arc::new(store), Arc::new(TracingReporter))
}

#[tokio::test]
async fn test_created_user_is_returned_by_id() {
    let app = application();
    let ctx = Context::background();
    let id = Uuid::new_v4();

    app.commands
        .create_user
        .handle(
            &ctx,
            CreateUser {
                id,
                email: "me@test.com".to_string(),
            },
        )
        .await
        .unwrap();

    let user = app.queries.user_by_id.handle(&ctx, id).await.unwrap();
    assert_eq!(
        user,
        query::User {
            id,
            email: "me@test.com".to_string(),
        }
    );
}

#[tokio::test]
async fn test_never_created_user_is_not_found() {
    let app = application();

    let err = app
        .queries
        .user_by_id
        .handle(&Context::background(), Uuid::new_v4())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.domain(), Some(&DomainError::not_found("user")));
}

#[tokio::test]
async fn test_find_users_by_email() {
    let app = application();
    let ctx = Context::background();
    for email in ["one@test.com", "two@test.com"] {
        app.commands
            .create_user
            .handle(
                &ctx,
                CreateUser {
                    id: Uuid::new_v4(),
                    email: email.to_string(),
                },
            )
            .await
            .unwrap();
    }

    let users = app
        .queries
        .find_users
        .handle(&ctx, Filter::default().with_email("two@test.com"))
        .await
        .unwrap();

    assert_eq!(users.len(), 1);
    assert_eq!(users[0].email, "two@test.com");
}

#[tokio::test]
async fn test_duplicate_user_is_internal() {
    let app = application();
    let ctx = Context::background();
    let cmd = CreateUser {
        id: Uuid::new_v4(),
        email: "me@test.com".to_string(),
    };

    app.commands.create_user.handle(&ctx, cmd.clone()).await.unwrap();
    let err = app.commands.create_user.handle(&ctx, cmd).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Internal);
}

#[tokio::test]
async fn test_malformed_email_is_invalid() {
    let app = application();
    let ctx = Context::background();
    let id = Uuid::new_v4();

    let err = app
        .commands
        .create_user
        .handle(
            &ctx,
            CreateUser {
                id,
                email: "not-an-email".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Invalid);

    let lookup = app.queries.user_by_id.handle(&ctx, id).await.unwrap_err();
    assert_eq!(lookup.kind(), ErrorKind::NotFound);
}
