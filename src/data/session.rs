use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DbErr, DeleteResult, EntityTrait, QueryFilter,
    TransactionError, TransactionTrait,
};

pub struct SessionRepository<'a, C: TransactionTrait + sea_orm::ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: TransactionTrait + sea_orm::ConnectionTrait> SessionRepository<'a, C> {
    /// Creates a new instance of [`SessionRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Replaces the session for a (user, browser token) pair.
    ///
    /// Destroy-then-create runs inside one transaction so two concurrent
    /// logins from the same browser cannot both end up holding a row.
    pub async fn replace(
        &self,
        user_id: i32,
        browser_token: &str,
        token: &str,
        remember: bool,
    ) -> Result<entity::user_session::Model, DbErr> {
        let browser_token = browser_token.to_string();
        let token = token.to_string();

        self.db
            .transaction::<_, entity::user_session::Model, DbErr>(move |txn| {
                Box::pin(async move {
                    entity::prelude::UserSession::delete_many()
                        .filter(entity::user_session::Column::UserId.eq(user_id))
                        .filter(entity::user_session::Column::BrowserToken.eq(browser_token.clone()))
                        .exec(txn)
                        .await?;

                    let session = entity::user_session::ActiveModel {
                        user_id: ActiveValue::Set(user_id),
                        browser_token: ActiveValue::Set(browser_token),
                        token: ActiveValue::Set(token),
                        remember: ActiveValue::Set(remember),
                        created_at: ActiveValue::Set(Utc::now().naive_utc()),
                        ..Default::default()
                    };

                    session.insert(txn).await
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(e) => e,
                TransactionError::Transaction(e) => e,
            })
    }

    pub async fn find_by_token(
        &self,
        token: &str,
    ) -> Result<Option<entity::user_session::Model>, DbErr> {
        entity::prelude::UserSession::find()
            .filter(entity::user_session::Column::Token.eq(token))
            .one(self.db)
            .await
    }

    pub async fn delete_by_token(&self, token: &str) -> Result<DeleteResult, DbErr> {
        entity::prelude::UserSession::delete_many()
            .filter(entity::user_session::Column::Token.eq(token))
            .exec(self.db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
    use trainingcenter_test_utils::prelude::*;

    use crate::data::session::SessionRepository;

    /// Expect replace to leave exactly one row per (user, browser) pair
    #[tokio::test]
    async fn replace_leaves_single_row_per_browser() -> Result<(), TestError> {
        let test = test_setup_with_tables!(entity::prelude::UserSession)?;
        let repo = SessionRepository::new(&test.db);

        repo.replace(1_000_001, "browser-a", "token-1", false).await?;
        let second = repo.replace(1_000_001, "browser-a", "token-2", false).await?;

        let rows = entity::prelude::UserSession::find()
            .filter(entity::user_session::Column::UserId.eq(1_000_001))
            .filter(entity::user_session::Column::BrowserToken.eq("browser-a"))
            .all(&test.db)
            .await?;

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].token, second.token);

        Ok(())
    }

    /// Expect two racing replaces for the same browser to leave one row
    #[tokio::test]
    async fn concurrent_replaces_leave_single_row() -> Result<(), TestError> {
        let test = test_setup_with_tables!(entity::prelude::UserSession)?;
        let repo = SessionRepository::new(&test.db);

        let (first, second) = tokio::join!(
            repo.replace(1_000_001, "browser-a", "token-1", false),
            repo.replace(1_000_001, "browser-a", "token-2", false),
        );
        let first = first?;
        let second = second?;

        let rows = entity::prelude::UserSession::find()
            .filter(entity::user_session::Column::UserId.eq(1_000_001))
            .filter(entity::user_session::Column::BrowserToken.eq("browser-a"))
            .all(&test.db)
            .await?;

        assert_eq!(rows.len(), 1);
        assert!(rows[0].token == first.token || rows[0].token == second.token);

        Ok(())
    }

    /// Expect sessions for different browsers to coexist
    #[tokio::test]
    async fn replace_keeps_other_browsers() -> Result<(), TestError> {
        let test = test_setup_with_tables!(entity::prelude::UserSession)?;
        let repo = SessionRepository::new(&test.db);

        repo.replace(1_000_001, "browser-a", "token-1", false).await?;
        repo.replace(1_000_001, "browser-b", "token-2", true).await?;

        let rows = entity::prelude::UserSession::find().all(&test.db).await?;
        assert_eq!(rows.len(), 2);

        Ok(())
    }

    /// Expect find_by_token to resolve a live session and miss a deleted one
    #[tokio::test]
    async fn find_and_delete_by_token() -> Result<(), TestError> {
        let test = test_setup_with_tables!(entity::prelude::UserSession)?;
        let repo = SessionRepository::new(&test.db);

        repo.replace(1_000_001, "browser-a", "token-1", false).await?;

        let found = repo.find_by_token("token-1").await?;
        assert!(found.is_some());

        let deleted = repo.delete_by_token("token-1").await?;
        assert_eq!(deleted.rows_affected, 1);

        let found = repo.find_by_token("token-1").await?;
        assert!(found.is_none());

        Ok(())
    }
}
