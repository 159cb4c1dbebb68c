use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260301_000001_create_user_table::User;

static FK_SOLO_AUTHORIZATION_USER_ID: &str = "fk_solo_authorization_user_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SoloAuthorization::Table)
                    .if_not_exists()
                    .col(pk_auto(SoloAuthorization::Id))
                    .col(integer(SoloAuthorization::UserId))
                    .col(integer(SoloAuthorization::InstructorId))
                    .col(string(SoloAuthorization::Position))
                    .col(timestamp(SoloAuthorization::ExpiresAt))
                    .col(string_null(SoloAuthorization::VateudSoloId))
                    .col(timestamp(SoloAuthorization::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_SOLO_AUTHORIZATION_USER_ID)
                    .from_tbl(SoloAuthorization::Table)
                    .from_col(SoloAuthorization::UserId)
                    .to_tbl(User::Table)
                    .to_col(User::Id)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_SOLO_AUTHORIZATION_USER_ID)
                    .table(SoloAuthorization::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(SoloAuthorization::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum SoloAuthorization {
    Table,
    Id,
    UserId,
    InstructorId,
    Position,
    ExpiresAt,
    VateudSoloId,
    CreatedAt,
}
