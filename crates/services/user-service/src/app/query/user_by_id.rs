use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use common::{AppError, AppResult, ResultExt};
use domain::DomainError;

use super::User;
use crate::app::Context;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Read model able to load a single user.
///
/// Absence is reported as `Ok(None)`; deciding that it is an error belongs
/// to [`UserByIdHandler`].
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserByIdReadModel: Send + Sync {
    async fn get_user_by_id(&self, id: Uuid) -> AppResult<Option<User>>;
}

#[derive(Clone)]
pub struct UserByIdHandler {
    read_model: Arc<dyn UserByIdReadModel>,
}

impl UserByIdHandler {
    pub fn new(read_model: Arc<dyn UserByIdReadModel>) -> Self {
        Self { read_model }
    }

    pub async fn handle(&self, ctx: &Context, id: Uuid) -> AppResult<User> {
        ctx.run(self.read_model.get_user_by_id(id))
            .await
            .context("read model")?
            .ok_or_else(|| AppError::from(DomainError::not_found("user")))
    }
}
