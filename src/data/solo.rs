use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ConnectionTrait, DbErr, DeleteResult, EntityTrait,
};

pub struct SoloRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> SoloRepository<'a, C> {
    /// Creates a new instance of [`SoloRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        user_id: i32,
        instructor_id: i32,
        position: &str,
        expires_at: NaiveDateTime,
    ) -> Result<entity::solo_authorization::Model, DbErr> {
        let solo = entity::solo_authorization::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            instructor_id: ActiveValue::Set(instructor_id),
            position: ActiveValue::Set(position.to_string()),
            expires_at: ActiveValue::Set(expires_at),
            vateud_solo_id: ActiveValue::Set(None),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        solo.insert(self.db).await
    }

    pub async fn get(
        &self,
        solo_id: i32,
    ) -> Result<Option<entity::solo_authorization::Model>, DbErr> {
        entity::prelude::SoloAuthorization::find_by_id(solo_id)
            .one(self.db)
            .await
    }

    /// Writes the remote identifier back onto the local record.
    ///
    /// Returns `false` when the record no longer exists (deleted locally
    /// while its create job was still in flight).
    pub async fn set_remote_id(&self, solo_id: i32, remote_id: &str) -> Result<bool, DbErr> {
        match entity::prelude::SoloAuthorization::find_by_id(solo_id)
            .one(self.db)
            .await?
        {
            Some(existing) => {
                let mut solo: entity::solo_authorization::ActiveModel = existing.into();
                solo.vateud_solo_id = ActiveValue::Set(Some(remote_id.to_string()));
                solo.update(self.db).await?;

                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub async fn delete(&self, solo_id: i32) -> Result<DeleteResult, DbErr> {
        entity::prelude::SoloAuthorization::delete_by_id(solo_id)
            .exec(self.db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use trainingcenter_test_utils::prelude::*;

    use crate::data::solo::SoloRepository;

    /// Expect the remote id to land on the created row
    #[tokio::test]
    async fn set_remote_id_updates_row() -> Result<(), TestError> {
        let test = test_setup_with_tables!(entity::prelude::SoloAuthorization)?;
        let repo = SoloRepository::new(&test.db);

        let solo = repo
            .create(1_000_001, 1_000_002, "EDDF_TWR", chrono::Utc::now().naive_utc())
            .await?;

        let found = repo.set_remote_id(solo.id, "r-9").await?;
        assert!(found);

        let solo = repo.get(solo.id).await?.unwrap();
        assert_eq!(solo.vateud_solo_id.as_deref(), Some("r-9"));

        Ok(())
    }

    /// Expect set_remote_id to report a missing row instead of erroring
    #[tokio::test]
    async fn set_remote_id_on_missing_row() -> Result<(), TestError> {
        let test = test_setup_with_tables!(entity::prelude::SoloAuthorization)?;
        let repo = SoloRepository::new(&test.db);

        let found = repo.set_remote_id(9999, "r-9").await?;
        assert!(!found);

        Ok(())
    }
}
