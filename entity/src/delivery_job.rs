use sea_orm::entity::prelude::*;

/// Persisted side-effect delivery job (outbox row).
///
/// Rows are immutable: a retry consumes the row and re-creates an equivalent
/// one with `attempts` incremented. Terminal rows keep `failed_at` set and
/// are surfaced as dead letters instead of being retried.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "delivery_job")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub kind: String,
    #[sea_orm(column_type = "Text")]
    pub payload: String,
    /// Local identifier embedded in the payload, duplicated as a column so
    /// pending jobs can be cancelled by the record they belong to.
    pub correlation_id: i32,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub next_attempt_at: ChronoDateTime,
    pub failed_at: Option<ChronoDateTime>,
    pub created_at: ChronoDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
