//! PostgreSQL user store backed by SeaORM.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use super::UserRepository;
use crate::app::query::{self, FindUsersReadModel, UserByIdReadModel};
use crate::infra::RecordValidator;
use common::{AppError, AppResult};
use domain::{Filter, User};

/// Implements the write port and both read models over one connection pool.
pub struct UserStore {
    db: DatabaseConnection,
    validator: RecordValidator,
}

impl UserStore {
    pub fn new(db: DatabaseConnection, validator: RecordValidator) -> Self {
        Self { db, validator }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn create_user(&self, user: &User) -> AppResult<()> {
        self.validator.validate_user(user)?;

        let active_model = ActiveModel {
            user_id: Set(user.id()),
            email: Set(user.email().to_string()),
        };

        active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(())
    }
}

#[async_trait]
impl FindUsersReadModel for UserStore {
    async fn find_users(&self, filter: Filter) -> AppResult<Vec<query::User>> {
        let mut select = UserEntity::find();
        if let Some(id) = filter.id {
            select = select.filter(user::Column::UserId.eq(id));
        }
        if let Some(email) = filter.email {
            select = select.filter(user::Column::Email.eq(email));
        }

        let models = select
            .order_by_asc(user::Column::Email)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(query::User::from).collect())
    }
}

#[async_trait]
impl UserByIdReadModel for UserStore {
    async fn get_user_by_id(&self, id: Uuid) -> AppResult<Option<query::User>> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(query::User::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::ErrorKind;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};

    fn model(id: Uuid, email: &str) -> user::Model {
        user::Model {
            user_id: id,
            email: email.to_string(),
        }
    }

    fn store(db: MockDatabase) -> UserStore {
        UserStore::new(db.into_connection(), RecordValidator::new())
    }

    /// SQL text of every statement the store sent, in order.
    fn executed_sql(store: UserStore) -> Vec<String> {
        store
            .db
            .into_transaction_log()
            .iter()
            .flat_map(|txn| txn.statements().iter().map(|stmt| stmt.sql.clone()))
            .collect()
    }

    #[tokio::test]
    async fn missing_row_is_none_not_error() {
        let store = store(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()]),
        );

        let found = store.get_user_by_id(Uuid::new_v4()).await.unwrap();
        assert_eq!(found, None);
    }

    #[tokio::test]
    async fn stored_row_is_hydrated() {
        let id = Uuid::new_v4();
        let store = store(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![model(id, "a@b.io")]]),
        );

        let found = store.get_user_by_id(id).await.unwrap();
        assert_eq!(
            found,
            Some(query::User {
                id,
                email: "a@b.io".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn find_constrains_only_the_id_when_email_is_absent() {
        let id = Uuid::new_v4();
        let store = store(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![model(id, "a@b.io")]]),
        );

        let users = store.find_users(Filter::by_id(id)).await.unwrap();
        assert_eq!(users.len(), 1);

        let sql = executed_sql(store);
        assert_eq!(sql.len(), 1);
        assert!(sql[0].contains(r#""users"."user_id" = $1"#));
        assert!(!sql[0].contains(r#""users"."email" ="#));
    }

    #[tokio::test]
    async fn find_constrains_both_fields_when_set() {
        let id = Uuid::new_v4();
        let store = store(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()]),
        );

        let users = store
            .find_users(Filter::by_id(id).with_email("a@b.io"))
            .await
            .unwrap();
        assert!(users.is_empty());

        let sql = executed_sql(store);
        assert!(sql[0].contains(r#""users"."user_id" = $1"#));
        assert!(sql[0].contains(r#""users"."email" = $2"#));
    }

    #[tokio::test]
    async fn invalid_record_never_reaches_the_database() {
        let store = store(MockDatabase::new(DatabaseBackend::Postgres));

        let err = store
            .create_user(&User::must_new(Uuid::new_v4(), "not-an-email"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Invalid);
        assert!(executed_sql(store).is_empty());
    }

    #[tokio::test]
    async fn valid_record_is_inserted_once() {
        let id = Uuid::new_v4();
        let store = store(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![model(id, "a@b.io")]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }]),
        );

        store
            .create_user(&User::must_new(id, "a@b.io"))
            .await
            .unwrap();

        let sql = executed_sql(store);
        assert_eq!(sql.len(), 1);
        assert!(sql[0].starts_with(r#"INSERT INTO "users""#));
    }

    #[tokio::test]
    async fn database_failure_is_internal() {
        let store = store(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_errors([DbErr::Custom("connection reset".to_string())]),
        );

        let err = store.get_user_by_id(Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
