use sea_orm_migration::{prelude::*, schema::*};

static IDX_DELIVERY_JOB_NEXT_ATTEMPT: &str = "idx_delivery_job_next_attempt_at";
static IDX_DELIVERY_JOB_CORRELATION: &str = "idx_delivery_job_correlation_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DeliveryJob::Table)
                    .if_not_exists()
                    .col(pk_auto(DeliveryJob::Id))
                    .col(string(DeliveryJob::Kind))
                    .col(text(DeliveryJob::Payload))
                    .col(integer(DeliveryJob::CorrelationId))
                    .col(integer(DeliveryJob::Attempts))
                    .col(string_null(DeliveryJob::LastError))
                    .col(timestamp(DeliveryJob::NextAttemptAt))
                    .col(timestamp_null(DeliveryJob::FailedAt))
                    .col(timestamp(DeliveryJob::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_DELIVERY_JOB_NEXT_ATTEMPT)
                    .table(DeliveryJob::Table)
                    .col(DeliveryJob::NextAttemptAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_DELIVERY_JOB_CORRELATION)
                    .table(DeliveryJob::Table)
                    .col(DeliveryJob::CorrelationId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DeliveryJob::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum DeliveryJob {
    Table,
    Id,
    Kind,
    Payload,
    CorrelationId,
    Attempts,
    LastError,
    NextAttemptAt,
    FailedAt,
    CreatedAt,
}
