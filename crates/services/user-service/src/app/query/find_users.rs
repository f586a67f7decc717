use std::sync::Arc;

use async_trait::async_trait;

use common::{AppResult, ResultExt};
use domain::Filter;

use super::User;
use crate::app::Context;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Read model able to list users matching a filter.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait FindUsersReadModel: Send + Sync {
    async fn find_users(&self, filter: Filter) -> AppResult<Vec<User>>;
}

#[derive(Clone)]
pub struct FindUsersHandler {
    read_model: Arc<dyn FindUsersReadModel>,
}

impl FindUsersHandler {
    pub fn new(read_model: Arc<dyn FindUsersReadModel>) -> Self {
        Self { read_model }
    }

    /// An empty result is a success, not a not-found error.
    pub async fn handle(&self, ctx: &Context, filter: Filter) -> AppResult<Vec<User>> {
        ctx.run(self.read_model.find_users(filter))
            .await
            .context("read model")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::AppError;
    use domain::ErrorKind;
    use uuid::Uuid;

    #[tokio::test]
    async fn passes_filter_through() {
        let id = Uuid::new_v4();
        let mut read_model = MockFindUsersReadModel::new();
        read_model
            .expect_find_users()
            .withf(move |filter| filter.id == Some(id) && filter.email.is_none())
            .times(1)
            .returning(move |_| {
                Ok(vec![User {
                    id,
                    email: "a@b.io".to_string(),
                }])
            });

        let handler = FindUsersHandler::new(Arc::new(read_model));
        let users = handler
            .handle(&Context::background(), Filter::by_id(id))
            .await
            .unwrap();

        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, id);
    }

    #[tokio::test]
    async fn no_match_is_empty_success() {
        let mut read_model = MockFindUsersReadModel::new();
        read_model.expect_find_users().returning(|_| Ok(vec![]));

        let handler = FindUsersHandler::new(Arc::new(read_model));
        let users = handler
            .handle(&Context::background(), Filter::default())
            .await
            .unwrap();

        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn storage_failure_is_wrapped() {
        let mut read_model = MockFindUsersReadModel::new();
        read_model
            .expect_find_users()
            .returning(|_| Err(AppError::internal("timeout")));

        let handler = FindUsersHandler::new(Arc::new(read_model));
        let err = handler
            .handle(&Context::background(), Filter::default())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(err.to_string().starts_with("read model: "));
    }
}
