use sea_orm::entity::prelude::*;

/// Supervised-solo-flight authorization.
///
/// `vateud_solo_id` holds the remote identifier once the record has been
/// mirrored to VATEUD Core; it stays empty while delivery is pending.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "solo_authorization")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub instructor_id: i32,
    pub position: String,
    pub expires_at: ChronoDateTime,
    pub vateud_solo_id: Option<String>,
    pub created_at: ChronoDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
