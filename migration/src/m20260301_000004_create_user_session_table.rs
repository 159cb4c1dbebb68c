use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260301_000001_create_user_table::User;

static IDX_USER_SESSION_USER_BROWSER: &str = "idx_user_session_user_id_browser_token";
static FK_USER_SESSION_USER_ID: &str = "fk_user_session_user_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserSession::Table)
                    .if_not_exists()
                    .col(pk_auto(UserSession::Id))
                    .col(integer(UserSession::UserId))
                    .col(string(UserSession::BrowserToken))
                    .col(string_uniq(UserSession::Token))
                    .col(boolean(UserSession::Remember))
                    .col(timestamp(UserSession::CreatedAt))
                    .to_owned(),
            )
            .await?;

        // At most one live session per (user, browser token)
        manager
            .create_index(
                Index::create()
                    .name(IDX_USER_SESSION_USER_BROWSER)
                    .table(UserSession::Table)
                    .col(UserSession::UserId)
                    .col(UserSession::BrowserToken)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_USER_SESSION_USER_ID)
                    .from_tbl(UserSession::Table)
                    .from_col(UserSession::UserId)
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
                    .name(FK_USER_SESSION_USER_ID)
                    .table(UserSession::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(UserSession::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum UserSession {
    Table,
    Id,
    UserId,
    BrowserToken,
    Token,
    Remember,
    CreatedAt,
}
