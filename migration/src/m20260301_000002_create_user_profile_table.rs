use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260301_000001_create_user_table::User;

static FK_USER_PROFILE_USER_ID: &str = "fk_user_profile_user_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserProfile::Table)
                    .if_not_exists()
                    .col(integer(UserProfile::UserId).primary_key())
                    .col(integer(UserProfile::Rating))
                    .col(integer(UserProfile::PilotRating))
                    .col(string(UserProfile::CountryCode))
                    .col(string(UserProfile::CountryName))
                    .col(string(UserProfile::RegionCode))
                    .col(string(UserProfile::RegionName))
                    .col(string(UserProfile::DivisionCode))
                    .col(string(UserProfile::DivisionName))
                    .col(string_null(UserProfile::SubdivisionCode))
                    .col(string_null(UserProfile::SubdivisionName))
                    .col(timestamp(UserProfile::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_USER_PROFILE_USER_ID)
                    .from_tbl(UserProfile::Table)
                    .from_col(UserProfile::UserId)
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
                    .name(FK_USER_PROFILE_USER_ID)
                    .table(UserProfile::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(UserProfile::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum UserProfile {
    Table,
    UserId,
    Rating,
    PilotRating,
    CountryCode,
    CountryName,
    RegionCode,
    RegionName,
    DivisionCode,
    DivisionName,
    SubdivisionCode,
    SubdivisionName,
    UpdatedAt,
}
