use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, ConnectionTrait, DbErr, EntityTrait};

pub struct UserRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UserRepository<'a, C> {
    /// Creates a new instance of [`UserRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn get(&self, cid: i32) -> Result<Option<entity::user::Model>, DbErr> {
        entity::prelude::User::find_by_id(cid).one(self.db).await
    }

    /// Creates or updates the identity row for a CID.
    ///
    /// Token arguments are what gets persisted verbatim; callers pass `None`
    /// when the provider did not mark the tokens valid.
    pub async fn upsert(
        &self,
        cid: i32,
        first_name: &str,
        last_name: &str,
        email: &str,
        access_token: Option<String>,
        refresh_token: Option<String>,
    ) -> Result<entity::user::Model, DbErr> {
        let now = Utc::now().naive_utc();

        match entity::prelude::User::find_by_id(cid).one(self.db).await? {
            Some(existing) => {
                let mut user: entity::user::ActiveModel = existing.into();
                user.first_name = ActiveValue::Set(first_name.to_string());
                user.last_name = ActiveValue::Set(last_name.to_string());
                user.email = ActiveValue::Set(email.to_string());
                user.access_token = ActiveValue::Set(access_token);
                user.refresh_token = ActiveValue::Set(refresh_token);
                user.updated_at = ActiveValue::Set(now);

                user.update(self.db).await
            }
            None => {
                let user = entity::user::ActiveModel {
                    id: ActiveValue::Set(cid),
                    first_name: ActiveValue::Set(first_name.to_string()),
                    last_name: ActiveValue::Set(last_name.to_string()),
                    email: ActiveValue::Set(email.to_string()),
                    access_token: ActiveValue::Set(access_token),
                    refresh_token: ActiveValue::Set(refresh_token),
                    created_at: ActiveValue::Set(now),
                    updated_at: ActiveValue::Set(now),
                };

                user.insert(self.db).await
            }
        }
    }

    /// Clears the stored tokens, used when the provider reports them
    /// invalid.
    pub async fn clear_tokens(&self, cid: i32) -> Result<(), DbErr> {
        if let Some(existing) = entity::prelude::User::find_by_id(cid).one(self.db).await? {
            let mut user: entity::user::ActiveModel = existing.into();
            user.access_token = ActiveValue::Set(None);
            user.refresh_token = ActiveValue::Set(None);
            user.updated_at = ActiveValue::Set(Utc::now().naive_utc());

            user.update(self.db).await?;
        }

        Ok(())
    }
}
