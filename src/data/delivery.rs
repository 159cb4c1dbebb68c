use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, DeleteResult, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

/// Column values for a new delivery job row.
///
/// Rows are only ever inserted and deleted: a retry consumes its row and
/// inserts a replacement, a dead letter is an insert with `failed_at` set.
pub struct NewDeliveryJob {
    pub kind: String,
    pub payload: String,
    pub correlation_id: i32,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub next_attempt_at: NaiveDateTime,
    pub failed_at: Option<NaiveDateTime>,
}

pub struct DeliveryJobRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> DeliveryJobRepository<'a, C> {
    /// Creates a new instance of [`DeliveryJobRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        new: NewDeliveryJob,
    ) -> Result<entity::delivery_job::Model, DbErr> {
        let job = entity::delivery_job::ActiveModel {
            kind: ActiveValue::Set(new.kind),
            payload: ActiveValue::Set(new.payload),
            correlation_id: ActiveValue::Set(new.correlation_id),
            attempts: ActiveValue::Set(new.attempts),
            last_error: ActiveValue::Set(new.last_error),
            next_attempt_at: ActiveValue::Set(new.next_attempt_at),
            failed_at: ActiveValue::Set(new.failed_at),
            created_at: ActiveValue::Set(chrono::Utc::now().naive_utc()),
            ..Default::default()
        };

        job.insert(self.db).await
    }

    /// Pending jobs whose next attempt time has passed, oldest first.
    pub async fn due(
        &self,
        now: NaiveDateTime,
        limit: u64,
    ) -> Result<Vec<entity::delivery_job::Model>, DbErr> {
        entity::prelude::DeliveryJob::find()
            .filter(entity::delivery_job::Column::FailedAt.is_null())
            .filter(entity::delivery_job::Column::NextAttemptAt.lte(now))
            .order_by_asc(entity::delivery_job::Column::NextAttemptAt)
            .limit(limit)
            .all(self.db)
            .await
    }

    pub async fn delete(&self, job_id: i32) -> Result<DeleteResult, DbErr> {
        entity::prelude::DeliveryJob::delete_by_id(job_id)
            .exec(self.db)
            .await
    }

    /// Terminal jobs kept for operator inspection.
    pub async fn dead_letters(&self) -> Result<Vec<entity::delivery_job::Model>, DbErr> {
        entity::prelude::DeliveryJob::find()
            .filter(entity::delivery_job::Column::FailedAt.is_not_null())
            .order_by_asc(entity::delivery_job::Column::FailedAt)
            .all(self.db)
            .await
    }

    /// Removes pending jobs of a kind for one correlation id. Used to
    /// cancel superseded work, e.g. a create job for a solo that has since
    /// been deleted locally.
    pub async fn delete_pending(
        &self,
        kind: &str,
        correlation_id: i32,
    ) -> Result<DeleteResult, DbErr> {
        entity::prelude::DeliveryJob::delete_many()
            .filter(entity::delivery_job::Column::Kind.eq(kind))
            .filter(entity::delivery_job::Column::CorrelationId.eq(correlation_id))
            .filter(entity::delivery_job::Column::FailedAt.is_null())
            .exec(self.db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use trainingcenter_test_utils::prelude::*;

    use crate::data::delivery::{DeliveryJobRepository, NewDeliveryJob};

    fn new_job(correlation_id: i32, offset_secs: i64) -> NewDeliveryJob {
        NewDeliveryJob {
            kind: "solo_create".to_string(),
            payload: "{}".to_string(),
            correlation_id,
            attempts: 1,
            last_error: None,
            next_attempt_at: (Utc::now() + Duration::seconds(offset_secs)).naive_utc(),
            failed_at: None,
        }
    }

    /// Expect only jobs whose attempt time has passed to be returned
    #[tokio::test]
    async fn due_filters_future_jobs() -> Result<(), TestError> {
        let test = test_setup_with_tables!(entity::prelude::DeliveryJob)?;
        let repo = DeliveryJobRepository::new(&test.db);

        repo.create(new_job(1, -60)).await?;
        repo.create(new_job(2, 3600)).await?;

        let due = repo.due(Utc::now().naive_utc(), 10).await?;

        assert_eq!(due.len(), 1);
        assert_eq!(due[0].correlation_id, 1);

        Ok(())
    }

    /// Expect dead letters to be excluded from due and listed separately
    #[tokio::test]
    async fn dead_letters_are_not_due() -> Result<(), TestError> {
        let test = test_setup_with_tables!(entity::prelude::DeliveryJob)?;
        let repo = DeliveryJobRepository::new(&test.db);

        let mut dead = new_job(1, -60);
        dead.failed_at = Some(Utc::now().naive_utc());
        dead.last_error = Some("remote unreachable".to_string());
        repo.create(dead).await?;

        let due = repo.due(Utc::now().naive_utc(), 10).await?;
        assert!(due.is_empty());

        let dead = repo.dead_letters().await?;
        assert_eq!(dead.len(), 1);
        assert_eq!(dead[0].last_error.as_deref(), Some("remote unreachable"));

        Ok(())
    }

    /// Expect delete_pending to remove only matching pending jobs
    #[tokio::test]
    async fn delete_pending_scopes_by_kind_and_correlation() -> Result<(), TestError> {
        let test = test_setup_with_tables!(entity::prelude::DeliveryJob)?;
        let repo = DeliveryJobRepository::new(&test.db);

        repo.create(new_job(7, -60)).await?;
        repo.create(new_job(8, -60)).await?;

        let deleted = repo.delete_pending("solo_create", 7).await?;
        assert_eq!(deleted.rows_affected, 1);

        let due = repo.due(Utc::now().naive_utc(), 10).await?;
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].correlation_id, 8);

        Ok(())
    }
}
