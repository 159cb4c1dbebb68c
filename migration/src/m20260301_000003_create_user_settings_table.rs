use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260301_000001_create_user_table::User;

static FK_USER_SETTINGS_USER_ID: &str = "fk_user_settings_user_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserSettings::Table)
                    .if_not_exists()
                    .col(integer(UserSettings::UserId).primary_key())
                    .col(string(UserSettings::Language))
                    .col(boolean(UserSettings::EmailNotifications))
                    .col(timestamp(UserSettings::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_USER_SETTINGS_USER_ID)
                    .from_tbl(UserSettings::Table)
                    .from_col(UserSettings::UserId)
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
                    .name(FK_USER_SETTINGS_USER_ID)
                    .table(UserSettings::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(UserSettings::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum UserSettings {
    Table,
    UserId,
    Language,
    EmailNotifications,
    CreatedAt,
}
