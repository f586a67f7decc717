//! In-process user store.
//!
//! Behaves like the SQL store (record validation before insert, unique id
//! and email, opaque failures on conflict) without a database. Used by `USER_SERVICE_STORAGE=memory` and
//! the end-to-end tests.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::UserRepository;
use crate::app::query::{self, FindUsersReadModel, UserByIdReadModel};
use crate::infra::RecordValidator;
use common::{AppError, AppResult};
use domain::{Filter, User};

#[derive(Debug, Clone)]
struct UserRow {
    user_id: Uuid,
    email: String,
}

impl UserRow {
    fn hydrate(&self) -> query::User {
        query::User::from(&User::unmarshal_from_database(
            self.user_id,
            self.email.clone(),
        ))
    }
}

/// Rows are kept in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    rows: RwLock<Vec<UserRow>>,
    validator: RecordValidator,
}

impl InMemoryUserStore {
    pub fn new(validator: RecordValidator) -> Self {
        Self {
            rows: RwLock::default(),
            validator,
        }
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserStore {
    async fn create_user(&self, user: &User) -> AppResult<()> {
        self.validator.validate_user(user)?;

        let mut rows = self.rows.write().await;

        if rows.iter().any(|row| row.user_id == user.id()) {
            return Err(AppError::internal("duplicate key value violates users_pkey"));
        }
        if rows.iter().any(|row| row.email == user.email()) {
            return Err(AppError::internal(
                "duplicate key value violates users_email_key",
            ));
        }

        rows.push(UserRow {
            user_id: user.id(),
            email: user.email().to_string(),
        });
        Ok(())
    }
}

#[async_trait]
impl FindUsersReadModel for InMemoryUserStore {
    async fn find_users(&self, filter: Filter) -> AppResult<Vec<query::User>> {
        let rows = self.rows.read().await;

        Ok(rows
            .iter()
            .filter(|row| filter.matches(row.user_id, &row.email))
            .map(UserRow::hydrate)
            .collect())
    }
}

#[async_trait]
impl UserByIdReadModel for InMemoryUserStore {
    async fn get_user_by_id(&self, id: Uuid) -> AppResult<Option<query::User>> {
        let rows = self.rows.read().await;

        Ok(rows
            .iter()
            .find(|row| row.user_id == id)
            .map(UserRow::hydrate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::ErrorKind;

    #[tokio::test]
    async fn stored_user_is_readable() {
        let store = InMemoryUserStore::new(RecordValidator::new());
        let user = User::must_new(Uuid::new_v4(), "a@b.io");
        store.create_user(&user).await.unwrap();

        let found = store.get_user_by_id(user.id()).await.unwrap();
        assert_eq!(
            found,
            Some(query::User {
                id: user.id(),
                email: "a@b.io".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn duplicate_email_is_opaque_failure() {
        let store = InMemoryUserStore::new(RecordValidator::new());
        store
            .create_user(&User::must_new(Uuid::new_v4(), "a@b.io"))
            .await
            .unwrap();

        let err = store
            .create_user(&User::must_new(Uuid::new_v4(), "a@b.io"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn malformed_email_is_invalid_and_not_stored() {
        let store = InMemoryUserStore::new(RecordValidator::new());

        let err = store
            .create_user(&User::must_new(Uuid::new_v4(), "not-an-email"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Invalid);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn missing_user_is_none() {
        let store = InMemoryUserStore::new(RecordValidator::new());
        assert_eq!(store.get_user_by_id(Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn find_applies_every_filter_field() {
        let store = InMemoryUserStore::new(RecordValidator::new());
        let alice = User::must_new(Uuid::new_v4(), "alice@b.io");
        let bob = User::must_new(Uuid::new_v4(), "bob@b.io");
        store.create_user(&alice).await.unwrap();
        store.create_user(&bob).await.unwrap();

        let all = store.find_users(Filter::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let by_id = store.find_users(Filter::by_id(bob.id())).await.unwrap();
        assert_eq!(by_id.len(), 1);
        assert_eq!(by_id[0].email, "bob@b.io");

        let mismatch = store
            .find_users(Filter::by_id(bob.id()).with_email("alice@b.io"))
            .await
            .unwrap();
        assert!(mismatch.is_empty());
    }
}
