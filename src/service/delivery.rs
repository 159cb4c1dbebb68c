//! Reliable delivery of side-effecting calls to VATEUD Core.
//!
//! Every outbound mirror call goes through [`DeliveryService::attempt`]: one
//! inline try, and on failure a persisted `delivery_job` row that the
//! scheduler tick replays with exponential backoff. Delivery failures never
//! propagate to the caller that triggered them; the local record is
//! authoritative and the remote side converges later.

use chrono::{Duration, NaiveDateTime, Utc};
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::{
    data::{
        delivery::{DeliveryJobRepository, NewDeliveryJob},
        solo::SoloRepository,
    },
    error::Error,
    external::vateud::{SoloCreateBody, VateudClient},
    model::delivery::DeliveryJob,
};

/// Outcome of an inline delivery attempt.
#[derive(Debug, PartialEq, Eq)]
pub enum Attempt {
    /// The remote call succeeded and any write-back was applied.
    Delivered,
    /// The remote call failed; a retry job was persisted.
    Queued,
}

pub struct DeliveryService<'a> {
    db: &'a DatabaseConnection,
    vateud: &'a VateudClient,
}

impl<'a> DeliveryService<'a> {
    /// Total attempts (inline + replays) before a job becomes a dead letter.
    pub const MAX_ATTEMPTS: i32 = 10;

    const BACKOFF_BASE_SECS: i64 = 30;
    const BACKOFF_CAP_SECS: i64 = 3600;

    /// Creates a new instance of [`DeliveryService`]
    pub fn new(db: &'a DatabaseConnection, vateud: &'a VateudClient) -> Self {
        Self { db, vateud }
    }

    /// Tries a job inline once, persisting a retry row on failure.
    ///
    /// Only database errors surface to the caller; an unreachable remote is
    /// not an error from the triggering request's point of view.
    pub async fn attempt(&self, job: DeliveryJob) -> Result<Attempt, Error> {
        if self.execute(&job).await? {
            return Ok(Attempt::Delivered);
        }

        tracing::warn!("Inline delivery of {} failed, queueing for retry", job);

        let repository = DeliveryJobRepository::new(self.db);
        repository
            .create(NewDeliveryJob {
                kind: job.kind().to_string(),
                payload: job.to_payload()?,
                correlation_id: job.correlation_id(),
                attempts: 1,
                last_error: Some(format!("inline delivery of {} failed", job)),
                next_attempt_at: Self::next_attempt(Utc::now().naive_utc(), 1),
                failed_at: None,
            })
            .await?;

        Ok(Attempt::Queued)
    }

    /// Replays due jobs, consuming each row and re-creating it with an
    /// incremented attempt count on failure. Returns the number delivered.
    ///
    /// A job past [`Self::MAX_ATTEMPTS`] is re-created as a dead letter
    /// instead of being scheduled again. A database error during a job's
    /// write-back leaves its row untouched so a later tick can retry it.
    pub async fn run_due(&self, limit: u64) -> Result<usize, Error> {
        let repository = DeliveryJobRepository::new(self.db);
        let now = Utc::now().naive_utc();

        let due = repository.due(now, limit).await?;
        let mut delivered = 0;

        for row in due {
            let job = match DeliveryJob::from_payload(&row.payload) {
                Ok(job) => job,
                Err(e) => {
                    // Undecodable payloads can never succeed; dead-letter
                    // them immediately so they surface to an operator.
                    tracing::error!("Dropping undecodable delivery job {}: {}", row.id, e);
                    self.swap(
                        row.id,
                        NewDeliveryJob {
                            kind: row.kind.clone(),
                            payload: row.payload.clone(),
                            correlation_id: row.correlation_id,
                            attempts: row.attempts,
                            last_error: Some(e.to_string()),
                            next_attempt_at: row.next_attempt_at,
                            failed_at: Some(now),
                        },
                    )
                    .await?;
                    continue;
                }
            };

            match self.execute(&job).await {
                Ok(true) => {
                    repository.delete(row.id).await?;
                    delivered += 1;
                }
                Ok(false) => {
                    let attempts = row.attempts + 1;
                    let (next_attempt_at, failed_at) = if attempts >= Self::MAX_ATTEMPTS {
                        tracing::error!(
                            "Delivery of {} failed {} times, writing dead letter",
                            job,
                            attempts
                        );
                        (now, Some(now))
                    } else {
                        tracing::warn!(
                            "Delivery of {} failed (attempt {}), rescheduling",
                            job,
                            attempts
                        );
                        (Self::next_attempt(now, attempts), None)
                    };

                    self.swap(
                        row.id,
                        NewDeliveryJob {
                            kind: job.kind().to_string(),
                            payload: row.payload.clone(),
                            correlation_id: job.correlation_id(),
                            attempts,
                            last_error: Some(format!("delivery of {} failed", job)),
                            next_attempt_at,
                            failed_at,
                        },
                    )
                    .await?;
                }
                Err(e) => {
                    // Remote call may have succeeded but the write-back did
                    // not; the row stays put and the next tick replays it.
                    tracing::error!("Delivery job {} left in place after error: {}", row.id, e);
                }
            }
        }

        Ok(delivered)
    }

    /// Terminal jobs for operator inspection.
    pub async fn dead_letters(&self) -> Result<Vec<entity::delivery_job::Model>, Error> {
        Ok(DeliveryJobRepository::new(self.db).dead_letters().await?)
    }

    /// Cancels pending jobs of one kind for a correlation id.
    ///
    /// Used when later local state makes the queued work moot, e.g. a solo
    /// deleted before its create job ever reached VATEUD.
    pub async fn cancel_pending(&self, kind: &str, correlation_id: i32) -> Result<u64, Error> {
        let result = DeliveryJobRepository::new(self.db)
            .delete_pending(kind, correlation_id)
            .await?;

        Ok(result.rows_affected)
    }

    /// Replaces a job row with its successor in one transaction.
    ///
    /// A failure between the delete and the create would otherwise drop the
    /// job entirely, with no pending row and no dead letter left behind.
    async fn swap(&self, job_id: i32, replacement: NewDeliveryJob) -> Result<(), Error> {
        self.db
            .transaction::<_, (), Error>(move |txn| {
                Box::pin(async move {
                    let repository = DeliveryJobRepository::new(txn);
                    repository.delete(job_id).await?;
                    repository.create(replacement).await?;

                    Ok(())
                })
            })
            .await
            .map_err(Error::from_transaction)
    }

    /// Performs the remote call for a job.
    ///
    /// `Ok(false)` means the remote side did not accept the call and the job
    /// should be retried; `Err` means a local database failure after the
    /// call.
    async fn execute(&self, job: &DeliveryJob) -> Result<bool, Error> {
        match job {
            DeliveryJob::SoloCreate {
                local_solo_id,
                user_cid,
                instructor_cid,
                position,
                expires_at,
            } => {
                let body = SoloCreateBody {
                    user_cid: *user_cid,
                    instructor_cid: *instructor_cid,
                    position: position.clone(),
                    expire_at: *expires_at,
                };

                match self.vateud.create_solo(&body).await {
                    Some(remote) => {
                        let found = SoloRepository::new(self.db)
                            .set_remote_id(*local_solo_id, &remote.id)
                            .await?;
                        if !found {
                            tracing::debug!(
                                "Solo {} was deleted locally before its remote id arrived",
                                local_solo_id
                            );
                        }

                        Ok(true)
                    }
                    None => Ok(false),
                }
            }
            DeliveryJob::SoloRemove { vateud_solo_id, .. } => {
                Ok(self.vateud.remove_solo(vateud_solo_id).await.is_some())
            }
        }
    }

    fn next_attempt(now: NaiveDateTime, attempts: i32) -> NaiveDateTime {
        let exponent = (attempts - 1).clamp(0, 30) as u32;
        let delay = Self::BACKOFF_BASE_SECS
            .saturating_mul(1_i64 << exponent.min(20))
            .min(Self::BACKOFF_CAP_SECS);

        now + Duration::seconds(delay)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sea_orm::EntityTrait;
    use trainingcenter_test_utils::prelude::*;

    use super::{Attempt, DeliveryService};
    use crate::{
        data::delivery::{DeliveryJobRepository, NewDeliveryJob},
        external::vateud::VateudClient,
        model::delivery::DeliveryJob,
    };

    fn create_job(local_solo_id: i32) -> DeliveryJob {
        DeliveryJob::SoloCreate {
            local_solo_id,
            user_cid: 1_000_001,
            instructor_cid: 1_000_002,
            position: "EDDF_TWR".to_string(),
            expires_at: Utc::now().naive_utc(),
        }
    }

    fn vateud_for(test: &TestSetup) -> VateudClient {
        VateudClient::new(&test.server.url(), Some(constant::TEST_VATEUD_API_KEY.to_string()))
            .unwrap()
    }

    /// Expect an inline success to write the remote id back onto the solo
    #[tokio::test]
    async fn attempt_delivers_inline_and_writes_back() -> Result<(), TestError> {
        let mut test = test_setup_with_tables!(
            entity::prelude::SoloAuthorization,
            entity::prelude::DeliveryJob
        )?;
        let solo = test.user().insert_solo(1_000_001, 1_000_002, "EDDF_TWR", None).await?;
        let mock = test.vateud().mock_solo_create("r-9");

        let db = test.db.clone();
        let vateud = vateud_for(&test);
        let service = DeliveryService::new(&db, &vateud);

        let outcome = service.attempt(create_job(solo.id)).await.unwrap();
        assert_eq!(outcome, Attempt::Delivered);
        mock.assert();

        let solo = entity::prelude::SoloAuthorization::find_by_id(solo.id)
            .one(&test.db)
            .await?
            .unwrap();
        assert_eq!(solo.vateud_solo_id.as_deref(), Some("r-9"));

        let jobs = entity::prelude::DeliveryJob::find().all(&test.db).await?;
        assert!(jobs.is_empty());

        Ok(())
    }

    /// Expect an inline failure to queue exactly one correlated retry job
    #[tokio::test]
    async fn attempt_queues_job_on_failure() -> Result<(), TestError> {
        let mut test = test_setup_with_tables!(
            entity::prelude::SoloAuthorization,
            entity::prelude::DeliveryJob
        )?;
        let solo = test.user().insert_solo(1_000_001, 1_000_002, "EDDF_TWR", None).await?;
        test.vateud().mock_solo_create_failure();

        let db = test.db.clone();
        let vateud = vateud_for(&test);
        let service = DeliveryService::new(&db, &vateud);

        let outcome = service.attempt(create_job(solo.id)).await.unwrap();
        assert_eq!(outcome, Attempt::Queued);

        let jobs = entity::prelude::DeliveryJob::find().all(&test.db).await?;
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].kind, "solo_create");
        assert_eq!(jobs[0].correlation_id, solo.id);
        assert_eq!(jobs[0].attempts, 1);
        assert!(jobs[0].failed_at.is_none());

        Ok(())
    }

    /// Expect a replayed create to consume its row and apply the write-back
    #[tokio::test]
    async fn run_due_delivers_and_consumes_row() -> Result<(), TestError> {
        let mut test = test_setup_with_tables!(
            entity::prelude::SoloAuthorization,
            entity::prelude::DeliveryJob
        )?;
        let solo = test.user().insert_solo(1_000_001, 1_000_002, "EDDF_TWR", None).await?;
        test.vateud().mock_solo_create_failure();

        let db = test.db.clone();
        let vateud = vateud_for(&test);
        let service = DeliveryService::new(&db, &vateud);
        service.attempt(create_job(solo.id)).await.unwrap();

        // Make the queued job due and the remote side healthy again.
        make_all_due(&test).await?;
        test.vateud().mock_solo_create("r-9");

        let delivered = service.run_due(10).await.unwrap();
        assert_eq!(delivered, 1);

        let solo = entity::prelude::SoloAuthorization::find_by_id(solo.id)
            .one(&test.db)
            .await?
            .unwrap();
        assert_eq!(solo.vateud_solo_id.as_deref(), Some("r-9"));

        let jobs = entity::prelude::DeliveryJob::find().all(&test.db).await?;
        assert!(jobs.is_empty());

        Ok(())
    }

    /// Expect a failed replay to re-create the job with attempts + 1
    #[tokio::test]
    async fn run_due_requeues_with_incremented_attempts() -> Result<(), TestError> {
        let mut test = test_setup_with_tables!(
            entity::prelude::SoloAuthorization,
            entity::prelude::DeliveryJob
        )?;
        let solo = test.user().insert_solo(1_000_001, 1_000_002, "EDDF_TWR", None).await?;
        test.vateud().mock_solo_create_failure();

        let db = test.db.clone();
        let vateud = vateud_for(&test);
        let service = DeliveryService::new(&db, &vateud);
        service.attempt(create_job(solo.id)).await.unwrap();
        make_all_due(&test).await?;

        let delivered = service.run_due(10).await.unwrap();
        assert_eq!(delivered, 0);

        let jobs = entity::prelude::DeliveryJob::find().all(&test.db).await?;
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].attempts, 2);
        assert!(jobs[0].failed_at.is_none());
        assert!(jobs[0].next_attempt_at > Utc::now().naive_utc());

        Ok(())
    }

    /// Expect a job at the attempt limit to become a dead letter
    #[tokio::test]
    async fn run_due_dead_letters_exhausted_job() -> Result<(), TestError> {
        let mut test = test_setup_with_tables!(
            entity::prelude::SoloAuthorization,
            entity::prelude::DeliveryJob
        )?;
        test.vateud().mock_solo_remove_failure("r-9");

        let job = DeliveryJob::SoloRemove {
            local_solo_id: 7,
            vateud_solo_id: "r-9".to_string(),
        };
        DeliveryJobRepository::new(&test.db)
            .create(NewDeliveryJob {
                kind: job.kind().to_string(),
                payload: job.to_payload().unwrap(),
                correlation_id: job.correlation_id(),
                attempts: DeliveryService::MAX_ATTEMPTS - 1,
                last_error: None,
                next_attempt_at: Utc::now().naive_utc() - chrono::Duration::seconds(1),
                failed_at: None,
            })
            .await?;

        let db = test.db.clone();
        let vateud = vateud_for(&test);
        let service = DeliveryService::new(&db, &vateud);

        let delivered = service.run_due(10).await.unwrap();
        assert_eq!(delivered, 0);

        let dead = service.dead_letters().await.unwrap();
        assert_eq!(dead.len(), 1);
        assert_eq!(dead[0].attempts, DeliveryService::MAX_ATTEMPTS);
        assert!(dead[0].failed_at.is_some());

        // Dead letters are never picked up again.
        let delivered = service.run_due(10).await.unwrap();
        assert_eq!(delivered, 0);

        Ok(())
    }

    /// Expect cancel_pending to drop only the matching queued job
    #[tokio::test]
    async fn cancel_pending_removes_superseded_create() -> Result<(), TestError> {
        let mut test = test_setup_with_tables!(
            entity::prelude::SoloAuthorization,
            entity::prelude::DeliveryJob
        )?;
        let solo = test.user().insert_solo(1_000_001, 1_000_002, "EDDF_TWR", None).await?;
        test.vateud().mock_solo_create_failure();

        let db = test.db.clone();
        let vateud = vateud_for(&test);
        let service = DeliveryService::new(&db, &vateud);
        service.attempt(create_job(solo.id)).await.unwrap();

        let cancelled = service.cancel_pending("solo_create", solo.id).await.unwrap();
        assert_eq!(cancelled, 1);

        let jobs = entity::prelude::DeliveryJob::find().all(&test.db).await?;
        assert!(jobs.is_empty());

        Ok(())
    }

    /// Expect a delivered create whose solo is gone to still be consumed
    #[tokio::test]
    async fn run_due_consumes_job_for_deleted_solo() -> Result<(), TestError> {
        let mut test = test_setup_with_tables!(
            entity::prelude::SoloAuthorization,
            entity::prelude::DeliveryJob
        )?;
        test.vateud().mock_solo_create("r-9");

        let job = create_job(424_242);
        DeliveryJobRepository::new(&test.db)
            .create(NewDeliveryJob {
                kind: job.kind().to_string(),
                payload: job.to_payload().unwrap(),
                correlation_id: job.correlation_id(),
                attempts: 1,
                last_error: None,
                next_attempt_at: Utc::now().naive_utc() - chrono::Duration::seconds(1),
                failed_at: None,
            })
            .await?;

        let db = test.db.clone();
        let vateud = vateud_for(&test);
        let service = DeliveryService::new(&db, &vateud);

        let delivered = service.run_due(10).await.unwrap();
        assert_eq!(delivered, 1);

        let jobs = entity::prelude::DeliveryJob::find().all(&test.db).await?;
        assert!(jobs.is_empty());

        Ok(())
    }

    /// Expect every failed replay to swap the row for its successor, never
    /// leaving the queue without a trace of the job
    #[tokio::test]
    async fn failed_replays_never_lose_the_job() -> Result<(), TestError> {
        let mut test = test_setup_with_tables!(
            entity::prelude::SoloAuthorization,
            entity::prelude::DeliveryJob
        )?;
        let solo = test.user().insert_solo(1_000_001, 1_000_002, "EDDF_TWR", None).await?;
        test.vateud().mock_solo_create_failure();

        let db = test.db.clone();
        let vateud = vateud_for(&test);
        let service = DeliveryService::new(&db, &vateud);
        service.attempt(create_job(solo.id)).await.unwrap();

        for _ in 1..DeliveryService::MAX_ATTEMPTS {
            make_all_due(&test).await?;
            service.run_due(10).await.unwrap();

            let jobs = entity::prelude::DeliveryJob::find().all(&db).await?;
            assert_eq!(jobs.len(), 1);
            assert_eq!(jobs[0].correlation_id, solo.id);
        }

        let dead = service.dead_letters().await.unwrap();
        assert_eq!(dead.len(), 1);
        assert_eq!(dead[0].attempts, DeliveryService::MAX_ATTEMPTS);

        Ok(())
    }

    async fn make_all_due(test: &TestSetup) -> Result<(), TestError> {
        use sea_orm::{ActiveValue, IntoActiveModel};

        for row in entity::prelude::DeliveryJob::find().all(&test.db).await? {
            let mut job = row.into_active_model();
            job.next_attempt_at =
                ActiveValue::Set(Utc::now().naive_utc() - chrono::Duration::seconds(1));
            sea_orm::ActiveModelTrait::update(job, &test.db).await?;
        }

        Ok(())
    }
}
