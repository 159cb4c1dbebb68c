use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, ConnectionTrait, DbErr, EntityTrait};

const DEFAULT_LANGUAGE: &str = "en";

pub struct SettingsRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> SettingsRepository<'a, C> {
    /// Creates a new instance of [`SettingsRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Returns the settings row for a user, creating defaults when absent.
    /// Existing settings are never overwritten.
    pub async fn ensure_default(
        &self,
        user_id: i32,
    ) -> Result<entity::user_settings::Model, DbErr> {
        if let Some(existing) = entity::prelude::UserSettings::find_by_id(user_id)
            .one(self.db)
            .await?
        {
            return Ok(existing);
        }

        let settings = entity::user_settings::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            language: ActiveValue::Set(DEFAULT_LANGUAGE.to_string()),
            email_notifications: ActiveValue::Set(true),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
        };

        settings.insert(self.db).await
    }
}
