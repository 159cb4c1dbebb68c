use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, ConnectionTrait, DbErr, EntityTrait};

use crate::model::auth::ProfileData;

pub struct ProfileRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ProfileRepository<'a, C> {
    /// Creates a new instance of [`ProfileRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn get(&self, user_id: i32) -> Result<Option<entity::user_profile::Model>, DbErr> {
        entity::prelude::UserProfile::find_by_id(user_id)
            .one(self.db)
            .await
    }

    /// Replaces the profile snapshot wholesale with the provider's latest
    /// document. No partial merge: last write wins.
    pub async fn replace(
        &self,
        user_id: i32,
        profile: &ProfileData,
    ) -> Result<entity::user_profile::Model, DbErr> {
        entity::prelude::UserProfile::delete_by_id(user_id)
            .exec(self.db)
            .await?;

        let row = entity::user_profile::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            rating: ActiveValue::Set(profile.vatsim.rating.id),
            pilot_rating: ActiveValue::Set(profile.vatsim.pilotrating.id),
            country_code: ActiveValue::Set(profile.personal.country.id.clone().unwrap_or_default()),
            country_name: ActiveValue::Set(
                profile.personal.country.name.clone().unwrap_or_default(),
            ),
            region_code: ActiveValue::Set(profile.vatsim.region.id.clone().unwrap_or_default()),
            region_name: ActiveValue::Set(profile.vatsim.region.name.clone().unwrap_or_default()),
            division_code: ActiveValue::Set(profile.vatsim.division.id.clone().unwrap_or_default()),
            division_name: ActiveValue::Set(
                profile.vatsim.division.name.clone().unwrap_or_default(),
            ),
            subdivision_code: ActiveValue::Set(profile.vatsim.subdivision.id.clone()),
            subdivision_name: ActiveValue::Set(profile.vatsim.subdivision.name.clone()),
            updated_at: ActiveValue::Set(Utc::now().naive_utc()),
        };

        row.insert(self.db).await
    }
}
