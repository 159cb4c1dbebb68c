//! Session token resolution and logout.

use sea_orm::DatabaseConnection;

use crate::{
    data::{session::SessionRepository, user::UserRepository},
    error::{auth::AuthError, Error},
};

pub struct SessionService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SessionService<'a> {
    /// Creates a new instance of [`SessionService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Resolves a bearer session token to its user.
    pub async fn resolve(&self, token: &str) -> Result<entity::user::Model, Error> {
        let session = SessionRepository::new(self.db)
            .find_by_token(token)
            .await?
            .ok_or(AuthError::InvalidSession)?;

        UserRepository::new(self.db)
            .get(session.user_id)
            .await?
            // Session rows are deleted with their user, so a dangling row is
            // treated the same as no session at all.
            .ok_or_else(|| AuthError::InvalidSession.into())
    }

    /// Destroys the session behind a bearer token. Unknown tokens are a
    /// no-op so logout is idempotent.
    pub async fn logout(&self, token: &str) -> Result<(), Error> {
        SessionRepository::new(self.db).delete_by_token(token).await?;

        Ok(())
    }
}
