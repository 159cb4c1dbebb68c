use sea_orm::entity::prelude::*;

/// Denormalized snapshot of provider-supplied profile attributes.
///
/// One row per user, replaced wholesale on every successful reconciliation.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_profile")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i32,
    pub rating: i32,
    pub pilot_rating: i32,
    pub country_code: String,
    pub country_name: String,
    pub region_code: String,
    pub region_name: String,
    pub division_code: String,
    pub division_name: String,
    pub subdivision_code: Option<String>,
    pub subdivision_name: Option<String>,
    pub updated_at: ChronoDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
