//! Administrative solo authorization management.
//!
//! The local record is authoritative: creates and removes take effect
//! locally no matter whether VATEUD is reachable, and the delivery queue
//! converges the remote side afterwards.

use chrono::NaiveDateTime;
use sea_orm::DatabaseConnection;

use crate::{
    data::solo::SoloRepository,
    error::Error,
    external::vateud::VateudClient,
    model::delivery::DeliveryJob,
    service::delivery::DeliveryService,
};

pub struct SoloService<'a> {
    db: &'a DatabaseConnection,
    vateud: &'a VateudClient,
}

impl<'a> SoloService<'a> {
    /// Creates a new instance of [`SoloService`]
    pub fn new(db: &'a DatabaseConnection, vateud: &'a VateudClient) -> Self {
        Self { db, vateud }
    }

    /// Creates a solo authorization and mirrors it to VATEUD.
    ///
    /// The local row is persisted first and is usable immediately; the
    /// mirror call runs through the delivery queue and never blocks or
    /// fails the create.
    pub async fn create_solo(
        &self,
        user_id: i32,
        instructor_id: i32,
        position: &str,
        expires_at: NaiveDateTime,
    ) -> Result<entity::solo_authorization::Model, Error> {
        let repository = SoloRepository::new(self.db);
        let solo = repository
            .create(user_id, instructor_id, position, expires_at)
            .await?;

        DeliveryService::new(self.db, self.vateud)
            .attempt(DeliveryJob::SoloCreate {
                local_solo_id: solo.id,
                user_cid: solo.user_id,
                instructor_cid: solo.instructor_id,
                position: solo.position.clone(),
                expires_at: solo.expires_at,
            })
            .await?;

        // The inline attempt may have written the remote id back.
        Ok(repository.get(solo.id).await?.unwrap_or(solo))
    }

    /// Removes a solo authorization locally and from VATEUD.
    ///
    /// Pending create jobs for the solo are cancelled first; replaying a
    /// create for a record that no longer exists would be pointless. The
    /// remote delete is only attempted when a remote id was ever assigned.
    pub async fn remove_solo(&self, solo_id: i32) -> Result<(), Error> {
        let repository = SoloRepository::new(self.db);
        let solo = repository
            .get(solo_id)
            .await?
            .ok_or_else(|| Error::NotFound("Solo authorization".to_string()))?;

        let delivery = DeliveryService::new(self.db, self.vateud);
        delivery.cancel_pending("solo_create", solo.id).await?;

        if let Some(remote_id) = &solo.vateud_solo_id {
            delivery
                .attempt(DeliveryJob::SoloRemove {
                    local_solo_id: solo.id,
                    vateud_solo_id: remote_id.clone(),
                })
                .await?;
        }

        repository.delete(solo.id).await?;

        Ok(())
    }
}
