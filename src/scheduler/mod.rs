//! Background job scheduling.
//!
//! A cron-based scheduler drains the delivery queue: every tick replays
//! due `delivery_job` rows against VATEUD. Tick failures are logged and
//! the next tick tries again; the scheduler itself never dies over an
//! unreachable remote.

use sea_orm::DatabaseConnection;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::{
    error::Error,
    external::{vateud::VateudClient, CALL_TIMEOUT},
    service::delivery::DeliveryService,
};

/// Every minute, on the half-minute offset to avoid clashing with
/// top-of-minute work elsewhere.
const DELIVERY_CRON_EXPRESSION: &str = "30 * * * * *";

/// Seconds between two delivery ticks, per [`DELIVERY_CRON_EXPRESSION`].
const DELIVERY_TICK_SECS: u64 = 60;

/// Jobs replayed per tick. A backlog larger than this simply spills into
/// the next tick. A full batch of timed-out calls must finish within one
/// tick period, otherwise two ticks could replay the same rows.
const DELIVERY_BATCH_SIZE: u64 = 10;

const _: () = assert!(DELIVERY_BATCH_SIZE * CALL_TIMEOUT.as_secs() < DELIVERY_TICK_SECS);

/// Job scheduler for background delivery replay.
pub struct Scheduler {
    db: DatabaseConnection,
    vateud: VateudClient,
    sched: JobScheduler,
}

impl Scheduler {
    /// Creates a new instance of [`Scheduler`].
    pub async fn new(db: DatabaseConnection, vateud: VateudClient) -> Result<Self, Error> {
        let sched = JobScheduler::new().await?;
        Ok(Self { db, vateud, sched })
    }

    /// Registers all scheduled jobs and starts the scheduler.
    ///
    /// # Returns
    /// - `Ok(())` - All jobs successfully registered and scheduler started
    /// - `Err(Error)` - Failed to register a job or start the scheduler
    pub async fn start(self) -> Result<(), Error> {
        let db = self.db.clone();
        let vateud = self.vateud.clone();

        self.sched
            .add(Job::new_async(DELIVERY_CRON_EXPRESSION, move |_, _| {
                let db = db.clone();
                let vateud = vateud.clone();

                Box::pin(async move {
                    let service = DeliveryService::new(&db, &vateud);

                    match service.run_due(DELIVERY_BATCH_SIZE).await {
                        Ok(0) => tracing::debug!("Delivery tick: nothing due"),
                        Ok(count) => tracing::info!("Delivery tick: {} job(s) delivered", count),
                        Err(e) => tracing::error!("Delivery tick failed: {}", e),
                    }
                })
            })?)
            .await?;

        self.sched.start().await?;

        Ok(())
    }
}
