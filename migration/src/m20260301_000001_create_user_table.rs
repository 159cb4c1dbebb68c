use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    // Primary key is the VATSIM CID, not an auto-increment column
                    .col(integer(User::Id).primary_key())
                    .col(string(User::FirstName))
                    .col(string(User::LastName))
                    .col(string(User::Email))
                    .col(string_null(User::AccessToken))
                    .col(string_null(User::RefreshToken))
                    .col(timestamp(User::CreatedAt))
                    .col(timestamp(User::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum User {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    AccessToken,
    RefreshToken,
    CreatedAt,
    UpdatedAt,
}
