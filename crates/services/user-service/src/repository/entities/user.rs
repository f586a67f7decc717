//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::app::query;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Rows were validated on write, so hydration skips the checks.
impl From<Model> for domain::User {
    fn from(model: Model) -> Self {
        domain::User::unmarshal_from_database(model.user_id, model.email)
    }
}

impl From<Model> for query::User {
    fn from(model: Model) -> Self {
        query::User::from(&domain::User::from(model))
    }
}
