use sea_orm::entity::prelude::*;

/// Browser session issued after a successful login.
///
/// At most one live row exists per (user, browser token) pair; a re-login
/// from the same browser replaces the prior row. Rows are never updated in
/// place.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_session")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub browser_token: String,
    #[sea_orm(unique)]
    pub token: String,
    pub remember: bool,
    pub created_at: ChronoDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
